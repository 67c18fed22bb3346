use crate::capability::ApiCredential;
use crate::config;
use crate::error::ShotlistResult;
use crate::gemini::GeminiClient;
use crate::notify::NotificationCenter;
use crate::orchestrator::Orchestrator;
use crate::plan;
use crate::refs::ReferenceStore;
use colored::*;
use std::path::Path;
use std::sync::Arc;

pub async fn run(path: &Path, scene: Option<u32>) -> ShotlistResult<()> {
    let config = config::load_config(path)?;
    config.validate()?;

    let scenes = plan::load_plan(path)?;
    let refs = ReferenceStore::load_dir(&path.join("refs"))?;

    let credential = ApiCredential::resolve(&config.generation.api_key_env);
    let api_key = credential.require()?;
    let client = Arc::new(GeminiClient::new(
        api_key,
        &config.generation.text_model,
        &config.generation.image_model,
    ));

    let notifier = NotificationCenter::new();
    let orchestrator = Orchestrator::new(
        scenes,
        refs.into_images(),
        client,
        notifier,
        config.generation.max_parallel,
    );

    let result = match scene {
        Some(id) => {
            eprintln!("{} Generating scene {id}...", "generate:".cyan().bold());
            orchestrator.generate_one(id).await.map(|_| ())
        }
        None => {
            eprintln!(
                "{} Generating all pending scenes (max {} concurrent)...",
                "generate:".cyan().bold(),
                config.generation.max_parallel
            );
            orchestrator.generate_all_pending().await.map(|outcome| {
                eprintln!(
                    "{} {} succeeded, {} failed",
                    "done:".green().bold(),
                    outcome.succeeded,
                    outcome.failed
                );
            })
        }
    };

    // Terminal states are persisted even when the run reports a failure, so
    // a retry only picks up what is still missing.
    plan::save_plan(path, &orchestrator.scenes())?;
    result
}
