use crate::error::{ShotlistError, ShotlistResult};
use colored::*;
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"[project]
name = "my-story"
version = "1.0.0"

[plan]
# Fixed length of one scene in seconds; scene count = ceil(duration / scene_seconds)
scene_seconds = 8
# Reading speed used to derive duration from a script (words per minute)
reading_wpm = 150
# Sent verbatim with every plan request
style_directive = """
Ultra-realistic cinematic documentary still set in the prehistoric era. \
Natural volumetric light, 35mm film grain, grounded earthy palette. \
Characters must stay visually consistent with the supplied reference images. \
No text, captions or watermarks."""

# Narrative phases; fractions must sum to 1.0
[[plan.phases]]
name = "Hook"
fraction = 0.05

[[plan.phases]]
name = "Quest"
fraction = 0.15

[[plan.phases]]
name = "Conflict"
fraction = 0.25

[[plan.phases]]
name = "Innovation"
fraction = 0.25

[[plan.phases]]
name = "Civilization"
fraction = 0.20

[[plan.phases]]
name = "Reflection"
fraction = 0.10

[generation]
text_model = "gemini-2.5-flash"
image_model = "gemini-2.5-flash-image-preview"
# Maximum concurrent image-generation calls in a batch run
max_parallel = 4
api_key_env = "GEMINI_API_KEY"

[output]
directory = "./output"
"#;

pub fn run(path: &Path) -> ShotlistResult<()> {
    let config_path = path.join("project.toml");
    if config_path.exists() {
        return Err(ShotlistError::AlreadyInitialized(config_path));
    }

    std::fs::create_dir_all(path.join("refs"))?;
    std::fs::create_dir_all(path.join("output"))?;
    std::fs::write(&config_path, DEFAULT_CONFIG)?;

    eprintln!(
        "{} Created project at {}",
        "done:".green().bold(),
        path.display()
    );
    eprintln!("  Next steps:");
    eprintln!("    1. Drop exactly 3 reference images into {}/refs/", path.display());
    eprintln!("    2. Set GEMINI_API_KEY (or add it to .env)");
    eprintln!(
        "    3. shotlist plan {} --scenario \"...\" --minutes 2",
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config;

    #[test]
    fn test_init_scaffolds_project() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("story");
        run(&project).unwrap();
        assert!(project.join("project.toml").exists());
        assert!(project.join("refs").is_dir());
        assert!(project.join("output").is_dir());

        // Generated config parses and validates
        let loaded = config::load_config(&project).unwrap();
        loaded.validate().unwrap();
        assert_eq!(loaded.plan.phases.len(), 6);
    }

    #[test]
    fn test_init_refuses_existing_project() {
        let dir = tempfile::tempdir().unwrap();
        run(dir.path()).unwrap();
        assert!(matches!(
            run(dir.path()).unwrap_err(),
            ShotlistError::AlreadyInitialized(_)
        ));
    }
}
