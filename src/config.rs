use crate::error::{ShotlistError, ShotlistResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProjectConfig {
    pub project: ProjectInfo,
    #[serde(default)]
    pub plan: PlanConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProjectInfo {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlanConfig {
    /// Fixed length of one scene in seconds.
    #[serde(default = "default_scene_seconds")]
    pub scene_seconds: u32,
    /// Reading speed used to derive duration from an uploaded script.
    #[serde(default = "default_reading_wpm")]
    pub reading_wpm: u32,
    /// Style directive sent verbatim with every plan request.
    #[serde(default = "default_style_directive")]
    pub style_directive: String,
    /// Narrative phases with their target share of total scene count.
    #[serde(default = "default_phases")]
    pub phases: Vec<PhaseConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PhaseConfig {
    pub name: String,
    pub fraction: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerationConfig {
    #[serde(default = "default_text_model")]
    pub text_model: String,
    #[serde(default = "default_image_model")]
    pub image_model: String,
    /// Maximum concurrent image-generation calls in a batch run.
    #[serde(default = "default_max_parallel")]
    pub max_parallel: usize,
    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub directory: String,
}

// Defaults
fn default_version() -> String {
    "1.0.0".into()
}
fn default_scene_seconds() -> u32 {
    8
}
fn default_reading_wpm() -> u32 {
    150
}
fn default_style_directive() -> String {
    "Ultra-realistic cinematic documentary still set in the prehistoric era. \
     Natural volumetric light, 35mm film grain, grounded earthy palette. \
     Characters must stay visually consistent with the supplied reference images. \
     No text, captions or watermarks."
        .into()
}
fn default_phases() -> Vec<PhaseConfig> {
    [
        ("Hook", 0.05),
        ("Quest", 0.15),
        ("Conflict", 0.25),
        ("Innovation", 0.25),
        ("Civilization", 0.20),
        ("Reflection", 0.10),
    ]
    .into_iter()
    .map(|(name, fraction)| PhaseConfig {
        name: name.into(),
        fraction,
    })
    .collect()
}
fn default_text_model() -> String {
    "gemini-2.5-flash".into()
}
fn default_image_model() -> String {
    "gemini-2.5-flash-image-preview".into()
}
fn default_max_parallel() -> usize {
    4
}
fn default_api_key_env() -> String {
    "GEMINI_API_KEY".into()
}
fn default_output_dir() -> String {
    "./output".into()
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            scene_seconds: default_scene_seconds(),
            reading_wpm: default_reading_wpm(),
            style_directive: default_style_directive(),
            phases: default_phases(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            text_model: default_text_model(),
            image_model: default_image_model(),
            max_parallel: default_max_parallel(),
            api_key_env: default_api_key_env(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
        }
    }
}

impl ProjectConfig {
    pub fn validate(&self) -> ShotlistResult<()> {
        if self.plan.scene_seconds == 0 {
            return Err(ShotlistError::ConfigParse(
                "plan.scene_seconds must be at least 1".into(),
            ));
        }
        if self.plan.reading_wpm == 0 {
            return Err(ShotlistError::ConfigParse(
                "plan.reading_wpm must be at least 1".into(),
            ));
        }
        if self.generation.max_parallel == 0 {
            return Err(ShotlistError::ConfigParse(
                "generation.max_parallel must be at least 1".into(),
            ));
        }
        if self.plan.phases.is_empty() {
            return Err(ShotlistError::ConfigParse(
                "at least one [[plan.phases]] entry is required".into(),
            ));
        }
        for phase in &self.plan.phases {
            if phase.name.trim().is_empty() {
                return Err(ShotlistError::ConfigParse(
                    "phase names must be non-empty".into(),
                ));
            }
            if !(phase.fraction > 0.0 && phase.fraction <= 1.0) {
                return Err(ShotlistError::ConfigParse(format!(
                    "phase \"{}\" fraction must be in (0, 1], got {}",
                    phase.name, phase.fraction
                )));
            }
        }
        let sum: f64 = self.plan.phases.iter().map(|p| p.fraction).sum();
        if (sum - 1.0).abs() > 1e-6 {
            return Err(ShotlistError::ConfigParse(format!(
                "phase fractions must sum to 1.0, got {sum}"
            )));
        }
        Ok(())
    }

    pub fn phase_names(&self) -> Vec<String> {
        self.plan.phases.iter().map(|p| p.name.clone()).collect()
    }
}

pub fn config_path(project_path: &Path) -> std::path::PathBuf {
    project_path.join("project.toml")
}

pub fn load_config(project_path: &Path) -> ShotlistResult<ProjectConfig> {
    if !project_path.exists() {
        return Err(ShotlistError::ProjectNotFound(project_path.to_path_buf()));
    }
    let path = config_path(project_path);
    if !path.exists() {
        return Err(ShotlistError::ConfigNotFound(path));
    }
    let content = std::fs::read_to_string(&path)?;
    let config: ProjectConfig =
        toml::from_str(&content).map_err(|e| ShotlistError::ConfigParse(e.to_string()))?;
    Ok(config)
}
