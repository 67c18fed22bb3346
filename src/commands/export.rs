use crate::config;
use crate::error::ShotlistResult;
use crate::export;
use crate::plan;
use colored::*;
use std::path::Path;

pub fn run(path: &Path, images: bool, prompts: bool) -> ShotlistResult<()> {
    let config = config::load_config(path)?;
    // A zero-row workbook is a valid export.
    let scenes = plan::load_plan_or_empty(path)?;

    let output_rel = config
        .output
        .directory
        .strip_prefix("./")
        .unwrap_or(&config.output.directory);
    let output_dir = path.join(output_rel);

    let workbook = export::write_workbook(&scenes, &output_dir)?;
    eprintln!(
        "{} Workbook: {} ({} rows)",
        "done:".green().bold(),
        workbook.display(),
        scenes.len()
    );

    if images {
        let written = export::write_images(&scenes, &output_dir)?;
        eprintln!(
            "{} Images: {} file(s) in {}/images",
            "done:".green().bold(),
            written,
            output_dir.display()
        );
    }

    if prompts {
        let text_path = export::write_prompts_text(&scenes, &output_dir)?;
        eprintln!("{} Prompts: {}", "done:".green().bold(), text_path.display());
    }
    Ok(())
}
