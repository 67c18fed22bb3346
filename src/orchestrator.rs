use crate::error::{ShotlistError, ShotlistResult};
use crate::gemini::ImageModel;
use crate::notify::{NotificationCenter, Severity};
use crate::plan::{GenerationState, SceneRecord};
use crate::refs::ReferenceImage;
use futures::future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Default ceiling on concurrent image-generation calls in a batch run.
pub const MAX_PARALLEL: usize = 4;

/// Aggregate result of one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub succeeded: usize,
    pub failed: usize,
}

/// Drives preview-image generation for the current scene plan.
///
/// The scene sequence is the one piece of shared mutable state; every
/// mutation is a per-id read-modify-write against the latest sequence, so
/// near-simultaneous settlements never clobber each other. Batch runs are
/// single-flight, gated by an atomic flag that is set before the first group
/// dispatches and cleared only after the aggregate notification is posted.
pub struct Orchestrator {
    scenes: Mutex<Vec<SceneRecord>>,
    refs: Vec<ReferenceImage>,
    model: Arc<dyn ImageModel>,
    notifier: NotificationCenter,
    max_parallel: usize,
    batch_running: AtomicBool,
}

impl Orchestrator {
    pub fn new(
        scenes: Vec<SceneRecord>,
        refs: Vec<ReferenceImage>,
        model: Arc<dyn ImageModel>,
        notifier: NotificationCenter,
        max_parallel: usize,
    ) -> Self {
        Self {
            scenes: Mutex::new(scenes),
            refs,
            model,
            notifier,
            max_parallel: max_parallel.max(1),
            batch_running: AtomicBool::new(false),
        }
    }

    pub fn is_running(&self) -> bool {
        self.batch_running.load(Ordering::SeqCst)
    }

    /// Snapshot of the current scene sequence, in plan order.
    pub fn scenes(&self) -> Vec<SceneRecord> {
        self.lock().clone()
    }

    /// Replace the whole plan atomically. Rejected while a batch is running,
    /// so in-flight settlements never land in a foreign plan.
    pub fn replace_plan(&self, scenes: Vec<SceneRecord>) -> ShotlistResult<()> {
        if self.is_running() {
            return Err(ShotlistError::BatchInFlight);
        }
        *self.lock() = scenes;
        Ok(())
    }

    /// Generate (or regenerate) the preview image for one scene.
    ///
    /// The record goes `Pending` before the call is issued, regardless of
    /// outcome. On failure the record goes `Failed` and keeps any previously
    /// successful image; only a new success replaces it. Not throttled by the
    /// batch ceiling.
    pub async fn generate_one(&self, scene_id: u32) -> ShotlistResult<()> {
        let prompt = self.mark_pending(scene_id)?;
        tracing::debug!(scene_id, "image generation dispatched");

        match self.model.generate_image(&prompt, &self.refs).await {
            Ok(image) => {
                self.settle(scene_id, Some(image));
                Ok(())
            }
            Err(e) => {
                self.settle(scene_id, None);
                let message = e.to_string();
                self.notifier.post(
                    Severity::Error,
                    "Image generation failed",
                    format!("Scene {scene_id}: {message}"),
                    false,
                );
                Err(ShotlistError::GenerationFailed { scene_id, message })
            }
        }
    }

    /// Generate images for every scene that has none yet, in plan order,
    /// dispatching consecutive groups of at most `max_parallel` scenes.
    ///
    /// A group must fully settle before the next one starts; a member's
    /// failure never aborts its siblings. Completion posts exactly one
    /// persistent notification with the aggregate counts. Returns
    /// `BatchInFlight` if a run is already active.
    pub async fn generate_all_pending(&self) -> ShotlistResult<BatchOutcome> {
        if self.batch_running.swap(true, Ordering::SeqCst) {
            return Err(ShotlistError::BatchInFlight);
        }

        // Scenes without an image are eligible, including previously failed ones.
        let pending: Vec<u32> = self
            .lock()
            .iter()
            .filter(|s| s.generated_image.is_none())
            .map(|s| s.id)
            .collect();
        tracing::info!(pending = pending.len(), ceiling = self.max_parallel, "batch run started");

        let mut outcome = BatchOutcome::default();
        for group in pending.chunks(self.max_parallel) {
            let settled =
                future::join_all(group.iter().map(|&id| self.generate_one(id))).await;
            for result in settled {
                match result {
                    Ok(()) => outcome.succeeded += 1,
                    Err(_) => outcome.failed += 1,
                }
            }
        }

        let severity = if outcome.failed == 0 {
            Severity::Success
        } else {
            Severity::Warning
        };
        self.notifier.post(
            severity,
            "Batch generation complete",
            format!("{} succeeded, {} failed", outcome.succeeded, outcome.failed),
            true,
        );
        self.batch_running.store(false, Ordering::SeqCst);
        Ok(outcome)
    }

    /// Transition a scene to `Pending` and return its image prompt.
    fn mark_pending(&self, scene_id: u32) -> ShotlistResult<String> {
        let mut scenes = self.lock();
        let scene = scenes
            .iter_mut()
            .find(|s| s.id == scene_id)
            .ok_or(ShotlistError::SceneNotFound(scene_id))?;
        scene.state = GenerationState::Pending;
        Ok(scene.image_prompt.clone())
    }

    /// Apply a terminal state for one scene. `Some` replaces the image,
    /// `None` marks failure and leaves any prior image in place.
    fn settle(&self, scene_id: u32, image: Option<String>) {
        let mut scenes = self.lock();
        if let Some(scene) = scenes.iter_mut().find(|s| s.id == scene_id) {
            match image {
                Some(data) => {
                    scene.generated_image = Some(data);
                    scene.state = GenerationState::Succeeded;
                }
                None => scene.state = GenerationState::Failed,
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<SceneRecord>> {
        self.scenes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
