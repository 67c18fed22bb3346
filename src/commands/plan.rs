use crate::capability::ApiCredential;
use crate::config;
use crate::error::{ShotlistError, ShotlistResult};
use crate::gemini::{GeminiClient, TextModel};
use crate::narrative::{self, NarrativeInput};
use crate::notify::{NotificationCenter, Severity};
use crate::plan::{self, ScenePlanRequest};
use crate::refs::ReferenceStore;
use colored::*;
use std::path::{Path, PathBuf};

pub async fn run(
    path: &Path,
    scenario: Option<String>,
    script: Option<PathBuf>,
    minutes: Option<u32>,
) -> ShotlistResult<()> {
    let config = config::load_config(path)?;
    config.validate()?;

    let refs = ReferenceStore::load_dir(&path.join("refs"))?;

    // A script overrides scenario text and manual duration.
    let input = match (script, scenario) {
        (Some(script_path), _) => {
            let text = std::fs::read_to_string(&script_path)?;
            NarrativeInput::Script(text)
        }
        (None, Some(text)) => NarrativeInput::Scenario(text),
        (None, None) => {
            return Err(ShotlistError::Other(
                "Provide --scenario text or a --script file.".into(),
            ))
        }
    };
    let minutes = narrative::effective_minutes(&input, minutes, config.plan.reading_wpm);

    if !narrative::can_build_plan(&refs, Some(&input), minutes) {
        return Err(ShotlistError::PlanPreconditions(format!(
            "{} reference image(s), narrative {}, duration {} min",
            refs.len(),
            if input.text().trim().is_empty() { "empty" } else { "present" },
            minutes
        )));
    }

    let credential = ApiCredential::resolve(&config.generation.api_key_env);
    let api_key = credential.require()?;
    let client = GeminiClient::new(
        api_key,
        &config.generation.text_model,
        &config.generation.image_model,
    );

    let request = ScenePlanRequest::new(&config.plan, input.text().to_string(), minutes);
    eprintln!(
        "{} Requesting {} scenes ({} min) from {}...",
        "plan:".cyan().bold(),
        request.target_scene_count,
        minutes,
        config.generation.text_model
    );

    let notifier = NotificationCenter::new();
    let text = client.generate_plan_text(&request).await?;
    let scenes = plan::parse_plan_response(&text, &config.phase_names())?;

    // Replaces any prior plan wholesale, generated images included.
    plan::save_plan(path, &scenes)?;
    notifier.post(
        Severity::Success,
        "Plan generated",
        format!("{} scenes written to plan.json", scenes.len()),
        false,
    );
    for scene in &scenes {
        eprintln!("  {:>3}  {:<12} {}", scene.id, scene.phase, truncate(&scene.image_prompt, 70));
    }
    Ok(())
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{cut}...")
    }
}
