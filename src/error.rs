use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShotlistError {
    #[error("Project not found: {0}")]
    ProjectNotFound(PathBuf),

    #[error("Config file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("Failed to parse config: {0}")]
    ConfigParse(String),

    #[error("Already initialized: {0} already exists")]
    AlreadyInitialized(PathBuf),

    #[error("No plan found at {0}")]
    PlanNotFound(PathBuf),

    #[error("Cannot build a plan: {0}")]
    PlanPreconditions(String),

    #[error("No API credential available")]
    CapabilityUnavailable,

    #[error("Plan service returned an empty response")]
    EmptyResponse,

    #[error("Plan response is not a valid scene list: {0}")]
    MalformedPlan(String),

    #[error("Image generation failed for scene {scene_id}: {message}")]
    GenerationFailed { scene_id: u32, message: String },

    #[error("Image service error: {0}")]
    ImageService(String),

    #[error("Scene {0} does not exist in the current plan")]
    SceneNotFound(u32),

    #[error("A batch generation run is already in progress")]
    BatchInFlight,

    #[error("Reference image error: {0}")]
    RefImage(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl ShotlistError {
    /// Return an actionable hint for the user, if applicable.
    pub fn hint(&self) -> Option<String> {
        match self {
            ShotlistError::ProjectNotFound(_) => Some(
                "Run 'shotlist init <path>' to create a new project, or check the path.".into(),
            ),
            ShotlistError::ConfigNotFound(_) => Some(
                "A valid project needs a project.toml file. Run 'shotlist init' to create one."
                    .into(),
            ),
            ShotlistError::ConfigParse(msg) => {
                if msg.contains("fraction") {
                    Some("Phase fractions in [[plan.phases]] must sum to exactly 1.0.".into())
                } else {
                    Some("Check project.toml syntax. Run 'shotlist init <path>' to generate a valid example config.".into())
                }
            }
            ShotlistError::AlreadyInitialized(_) => {
                Some("Use a different path, or delete the existing project first.".into())
            }
            ShotlistError::PlanNotFound(_) => {
                Some("Run 'shotlist plan' first to generate a scene plan.".into())
            }
            ShotlistError::PlanPreconditions(_) => Some(
                "A plan needs exactly 3 reference images in refs/, a non-empty scenario or script, and a duration above zero.".into(),
            ),
            ShotlistError::CapabilityUnavailable => Some(
                "Set the API key env var named in [generation] api_key_env (default GEMINI_API_KEY), or add it to .env in your project.".into(),
            ),
            ShotlistError::EmptyResponse | ShotlistError::MalformedPlan(_) => Some(
                "The text model did not return a usable scene list. Re-run 'shotlist plan'; the request is not retried automatically.".into(),
            ),
            ShotlistError::GenerationFailed { .. } => Some(
                "Retry with 'shotlist generate --scene <id>'. Failed scenes stay in the plan and are picked up by the next batch run.".into(),
            ),
            ShotlistError::BatchInFlight => Some(
                "Only one batch run may be active at a time. Wait for the current run to finish.".into(),
            ),
            ShotlistError::RefImage(_) => Some(
                "Reference images must be .png, .jpg, .jpeg, .webp or .gif files in the refs/ directory.".into(),
            ),
            _ => None,
        }
    }
}

pub type ShotlistResult<T> = Result<T, ShotlistError>;
