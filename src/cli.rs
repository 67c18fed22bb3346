use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "shotlist",
    about = "AI-assisted storyboard CLI — plan scene prompt pairs and batch-generate preview images",
    version,
    after_help = "\x1b[1mExamples:\x1b[0m
  shotlist init ./my-story                     Create a new project
  shotlist plan ./my-story --scenario \"a tribe discovers fire\" --minutes 2
  shotlist plan ./my-story --script script.txt Derive duration from the script
  shotlist generate ./my-story                 Generate all pending preview images
  shotlist generate ./my-story --scene 3       Regenerate one scene
  shotlist export ./my-story --images          Workbook plus image files"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize a new storyboard project
    Init {
        /// Path to create the project directory
        path: PathBuf,
    },
    /// Generate a scene plan from a scenario or script (replaces any prior plan)
    Plan {
        /// Path to the project directory
        path: PathBuf,

        /// Freeform scenario text (ignored when --script is given)
        #[arg(long)]
        scenario: Option<String>,

        /// Script file; overrides --scenario and derives the duration
        #[arg(long)]
        script: Option<PathBuf>,

        /// Target duration in minutes (ignored when --script is given)
        #[arg(long)]
        minutes: Option<u32>,
    },
    /// Generate preview images for pending scenes, or one scene with --scene
    Generate {
        /// Path to the project directory
        path: PathBuf,

        /// Generate or regenerate a single scene by id
        #[arg(long, short = 's')]
        scene: Option<u32>,
    },
    /// Show the current plan and per-scene generation state
    Status {
        /// Path to the project directory
        path: PathBuf,
    },
    /// Export the prompts workbook (and optionally images and prompt text)
    Export {
        /// Path to the project directory
        path: PathBuf,

        /// Also write generated preview images to output/images/
        #[arg(long)]
        images: bool,

        /// Also write a clipboard-ready prompts.txt
        #[arg(long)]
        prompts: bool,
    },
}
