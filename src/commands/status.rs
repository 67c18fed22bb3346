use crate::config;
use crate::error::ShotlistResult;
use crate::plan::{self, GenerationState};
use colored::*;
use std::path::Path;

pub fn run(path: &Path) -> ShotlistResult<()> {
    let config = config::load_config(path)?;
    let scenes = plan::load_plan(path)?;

    eprintln!(
        "{} {} ({} scenes)",
        "plan:".cyan().bold(),
        config.project.name,
        scenes.len()
    );
    for scene in &scenes {
        let state = match scene.state {
            GenerationState::Idle => "idle".dimmed(),
            GenerationState::Pending => "pending".cyan(),
            GenerationState::Succeeded => "done".green(),
            GenerationState::Failed => "failed".red(),
        };
        let image = if scene.generated_image.is_some() { "*" } else { " " };
        eprintln!(
            "  {:>3} {} {:<12} [{:<7}] {}",
            scene.id,
            image,
            scene.phase,
            state,
            truncate(&scene.image_prompt, 60)
        );
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
