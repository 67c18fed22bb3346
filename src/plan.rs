use crate::config::PlanConfig;
use crate::error::{ShotlistError, ShotlistResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Per-scene image generation state.
///
/// `Pending` only exists while a call is in flight; it is normalized back to
/// `Idle` when a plan is loaded from disk, since no call can survive a
/// process boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationState {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed,
}

/// One unit of the generated shot list: an image prompt and a video prompt,
/// plus the preview image once generated.
///
/// Ids are assigned by the text model and trusted as-is; records are never
/// renumbered or reordered outside a full plan replacement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneRecord {
    pub id: u32,
    pub phase: String,
    pub image_prompt: String,
    pub video_prompt: String,
    /// Base64-encoded preview image. A failed regeneration keeps the prior
    /// successful image; only a new success replaces it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_image: Option<String>,
    #[serde(default)]
    pub state: GenerationState,
}

/// The structured request sent to the text model. Built fresh per plan call.
#[derive(Debug, Clone)]
pub struct ScenePlanRequest {
    pub style_directive: String,
    pub narrative: String,
    pub total_duration_seconds: u32,
    pub scene_seconds: u32,
    pub target_scene_count: u32,
    pub phases: Vec<(String, f64)>,
}

impl ScenePlanRequest {
    pub fn new(plan: &PlanConfig, narrative: String, minutes: u32) -> Self {
        let total_duration_seconds = minutes * 60;
        Self {
            style_directive: plan.style_directive.clone(),
            narrative,
            total_duration_seconds,
            scene_seconds: plan.scene_seconds,
            target_scene_count: target_scene_count(minutes, plan.scene_seconds),
            phases: plan
                .phases
                .iter()
                .map(|p| (p.name.clone(), p.fraction))
                .collect(),
        }
    }

    /// Full prompt text: style directive, narrative, duration, scene count,
    /// and the phase distribution with literal percentages.
    pub fn prompt_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.style_directive);
        out.push_str("\n\n");
        out.push_str(&format!(
            "Break the following story into exactly {} scenes of {} seconds each \
             ({} seconds total).\n",
            self.target_scene_count, self.scene_seconds, self.total_duration_seconds
        ));
        out.push_str("Distribute scenes across these narrative phases:\n");
        for (name, fraction) in &self.phases {
            out.push_str(&format!("- {}: {:.0}% of scenes\n", name, fraction * 100.0));
        }
        out.push_str(
            "\nFor every scene produce a detailed still-image prompt and a matching \
             8-second video prompt describing camera movement and action.\n",
        );
        out.push_str(
            "Respond with a JSON array only. Each element must have integer \"id\" \
             (sequential from 1), string \"phase\" (one of the phases above), string \
             \"imagePrompt\" and string \"videoPrompt\".\n\nStory:\n",
        );
        out.push_str(&self.narrative);
        out
    }

    /// JSON schema enforced server-side where the service supports it.
    pub fn response_schema(&self) -> serde_json::Value {
        let phase_names: Vec<&str> = self.phases.iter().map(|(n, _)| n.as_str()).collect();
        serde_json::json!({
            "type": "ARRAY",
            "items": {
                "type": "OBJECT",
                "properties": {
                    "id": { "type": "INTEGER" },
                    "phase": { "type": "STRING", "enum": phase_names },
                    "imagePrompt": { "type": "STRING" },
                    "videoPrompt": { "type": "STRING" }
                },
                "required": ["id", "phase", "imagePrompt", "videoPrompt"]
            }
        })
    }
}

/// Scenes needed to cover the duration at the fixed scene length.
pub fn target_scene_count(minutes: u32, scene_seconds: u32) -> u32 {
    (minutes * 60).div_ceil(scene_seconds.max(1))
}

/// Wire shape of one scene in the model response.
#[derive(Deserialize)]
struct RawScene {
    id: i64,
    phase: String,
    #[serde(rename = "imagePrompt")]
    image_prompt: String,
    #[serde(rename = "videoPrompt")]
    video_prompt: String,
}

/// Parse the raw model response into scene records.
///
/// Surfaces `EmptyResponse` for blank text and `MalformedPlan` for anything
/// that fails to parse or validate. Nothing is auto-repaired.
pub fn parse_plan_response(text: &str, phase_names: &[String]) -> ShotlistResult<Vec<SceneRecord>> {
    if text.trim().is_empty() {
        return Err(ShotlistError::EmptyResponse);
    }
    let raw: Vec<RawScene> =
        serde_json::from_str(text).map_err(|e| ShotlistError::MalformedPlan(e.to_string()))?;
    if raw.is_empty() {
        return Err(ShotlistError::MalformedPlan("scene list is empty".into()));
    }

    let mut seen = HashSet::new();
    let mut scenes = Vec::with_capacity(raw.len());
    for scene in raw {
        if scene.id < 1 {
            return Err(ShotlistError::MalformedPlan(format!(
                "scene id must be a positive integer, got {}",
                scene.id
            )));
        }
        let id = scene.id as u32;
        if !seen.insert(id) {
            return Err(ShotlistError::MalformedPlan(format!(
                "duplicate scene id {id}"
            )));
        }
        if !phase_names.iter().any(|name| name == &scene.phase) {
            return Err(ShotlistError::MalformedPlan(format!(
                "unknown phase \"{}\" in scene {id}",
                scene.phase
            )));
        }
        scenes.push(SceneRecord {
            id,
            phase: scene.phase,
            image_prompt: scene.image_prompt,
            video_prompt: scene.video_prompt,
            generated_image: None,
            state: GenerationState::Idle,
        });
    }
    Ok(scenes)
}

pub fn plan_path(project_path: &Path) -> PathBuf {
    project_path.join("plan.json")
}

/// Load the current plan. `Pending` states are normalized to `Idle`.
pub fn load_plan(project_path: &Path) -> ShotlistResult<Vec<SceneRecord>> {
    let path = plan_path(project_path);
    if !path.exists() {
        return Err(ShotlistError::PlanNotFound(path));
    }
    let content = std::fs::read_to_string(&path)?;
    let mut scenes: Vec<SceneRecord> =
        serde_json::from_str(&content).map_err(|e| ShotlistError::MalformedPlan(e.to_string()))?;
    for scene in &mut scenes {
        if scene.state == GenerationState::Pending {
            scene.state = GenerationState::Idle;
        }
    }
    Ok(scenes)
}

/// Load the plan if one exists, otherwise an empty sequence (used by export).
pub fn load_plan_or_empty(project_path: &Path) -> ShotlistResult<Vec<SceneRecord>> {
    match load_plan(project_path) {
        Ok(scenes) => Ok(scenes),
        Err(ShotlistError::PlanNotFound(_)) => Ok(Vec::new()),
        Err(e) => Err(e),
    }
}

/// Replace the persisted plan wholesale. Prior records and images are gone.
pub fn save_plan(project_path: &Path, scenes: &[SceneRecord]) -> ShotlistResult<()> {
    let json = serde_json::to_string_pretty(scenes)
        .map_err(|e| ShotlistError::Other(format!("Failed to serialize plan: {e}")))?;
    std::fs::write(plan_path(project_path), json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlanConfig;

    fn phase_names() -> Vec<String> {
        PlanConfig::default()
            .phases
            .iter()
            .map(|p| p.name.clone())
            .collect()
    }

    fn scene_json(id: u32, phase: &str) -> String {
        format!(
            r#"{{"id": {id}, "phase": "{phase}", "imagePrompt": "img {id}", "videoPrompt": "vid {id}"}}"#
        )
    }

    #[test]
    fn test_target_scene_count_rounds_up() {
        assert_eq!(target_scene_count(1, 8), 8); // 60/8 = 7.5
        assert_eq!(target_scene_count(2, 8), 15); // 120/8 = 15
        assert_eq!(target_scene_count(3, 8), 23); // 180/8 = 22.5
        assert_eq!(target_scene_count(10, 8), 75);
    }

    #[test]
    fn test_request_prompt_contains_contract_fields() {
        let plan = PlanConfig::default();
        let request = ScenePlanRequest::new(&plan, "a tribe discovers fire".into(), 2);
        assert_eq!(request.target_scene_count, 15);
        assert_eq!(request.total_duration_seconds, 120);
        let prompt = request.prompt_text();
        assert!(prompt.contains("exactly 15 scenes"));
        assert!(prompt.contains("Hook: 5%"));
        assert!(prompt.contains("Quest: 15%"));
        assert!(prompt.contains("Conflict: 25%"));
        assert!(prompt.contains("Innovation: 25%"));
        assert!(prompt.contains("Civilization: 20%"));
        assert!(prompt.contains("Reflection: 10%"));
        assert!(prompt.contains("a tribe discovers fire"));
        assert!(prompt.starts_with(&plan.style_directive));
    }

    #[test]
    fn test_response_schema_requires_all_fields() {
        let plan = PlanConfig::default();
        let request = ScenePlanRequest::new(&plan, "story".into(), 1);
        let schema = request.response_schema();
        let required = schema["items"]["required"].as_array().unwrap();
        let required: Vec<&str> = required.iter().filter_map(|v| v.as_str()).collect();
        assert_eq!(required, vec!["id", "phase", "imagePrompt", "videoPrompt"]);
    }

    #[test]
    fn test_parse_valid_plan() {
        let json = format!("[{}, {}]", scene_json(1, "Hook"), scene_json(2, "Quest"));
        let scenes = parse_plan_response(&json, &phase_names()).unwrap();
        assert_eq!(scenes.len(), 2);
        assert_eq!(scenes[0].id, 1);
        assert_eq!(scenes[0].phase, "Hook");
        assert_eq!(scenes[0].image_prompt, "img 1");
        assert_eq!(scenes[0].video_prompt, "vid 1");
        assert_eq!(scenes[0].state, GenerationState::Idle);
        assert!(scenes[0].generated_image.is_none());
    }

    #[test]
    fn test_parse_empty_text_is_empty_response() {
        assert!(matches!(
            parse_plan_response("   \n", &phase_names()).unwrap_err(),
            ShotlistError::EmptyResponse
        ));
    }

    #[test]
    fn test_parse_invalid_json_is_malformed() {
        assert!(matches!(
            parse_plan_response("not json", &phase_names()).unwrap_err(),
            ShotlistError::MalformedPlan(_)
        ));
    }

    #[test]
    fn test_parse_missing_field_is_malformed() {
        let json = r#"[{"id": 1, "phase": "Hook", "imagePrompt": "img"}]"#;
        assert!(matches!(
            parse_plan_response(json, &phase_names()).unwrap_err(),
            ShotlistError::MalformedPlan(_)
        ));
    }

    #[test]
    fn test_parse_unknown_phase_is_malformed() {
        let json = format!("[{}]", scene_json(1, "Prologue"));
        let err = parse_plan_response(&json, &phase_names()).unwrap_err();
        assert!(err.to_string().contains("Prologue"));
    }

    #[test]
    fn test_parse_rejects_nonpositive_and_duplicate_ids() {
        let zero = r#"[{"id": 0, "phase": "Hook", "imagePrompt": "a", "videoPrompt": "b"}]"#;
        assert!(parse_plan_response(zero, &phase_names()).is_err());

        let dup = format!("[{}, {}]", scene_json(3, "Hook"), scene_json(3, "Quest"));
        let err = parse_plan_response(&dup, &phase_names()).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_parse_empty_array_is_malformed() {
        assert!(matches!(
            parse_plan_response("[]", &phase_names()).unwrap_err(),
            ShotlistError::MalformedPlan(_)
        ));
    }

    #[test]
    fn test_plan_roundtrip_and_pending_normalization() {
        let dir = tempfile::tempdir().unwrap();
        let scenes = vec![
            SceneRecord {
                id: 1,
                phase: "Hook".into(),
                image_prompt: "img".into(),
                video_prompt: "vid".into(),
                generated_image: Some("QUJD".into()),
                state: GenerationState::Succeeded,
            },
            SceneRecord {
                id: 2,
                phase: "Quest".into(),
                image_prompt: "img".into(),
                video_prompt: "vid".into(),
                generated_image: None,
                state: GenerationState::Pending,
            },
        ];
        save_plan(dir.path(), &scenes).unwrap();
        let loaded = load_plan(dir.path()).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].state, GenerationState::Succeeded);
        assert_eq!(loaded[0].generated_image.as_deref(), Some("QUJD"));
        // Pending cannot survive a process boundary
        assert_eq!(loaded[1].state, GenerationState::Idle);
    }

    #[test]
    fn test_save_plan_replaces_wholesale() {
        let dir = tempfile::tempdir().unwrap();
        let first = parse_plan_response(
            &format!("[{}, {}]", scene_json(1, "Hook"), scene_json(2, "Quest")),
            &phase_names(),
        )
        .unwrap();
        save_plan(dir.path(), &first).unwrap();

        let second =
            parse_plan_response(&format!("[{}]", scene_json(7, "Conflict")), &phase_names())
                .unwrap();
        save_plan(dir.path(), &second).unwrap();

        let loaded = load_plan(dir.path()).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, 7);
    }

    #[test]
    fn test_load_plan_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_plan(dir.path()).unwrap_err(),
            ShotlistError::PlanNotFound(_)
        ));
        assert!(load_plan_or_empty(dir.path()).unwrap().is_empty());
    }
}
