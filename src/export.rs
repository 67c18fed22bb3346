use crate::error::{ShotlistError, ShotlistResult};
use crate::plan::SceneRecord;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use rust_xlsxwriter::Workbook;
use std::path::{Path, PathBuf};

/// Fixed workbook filename; a compatibility contract with downstream sheets.
pub const WORKBOOK_FILENAME: &str = "Prehistoric_Project_Prompts.xlsx";
pub const SHEET_NAME: &str = "Prompts";
/// Column set and order, also a compatibility contract.
pub const COLUMNS: [&str; 5] = ["ID", "Phase", "Image Prompt", "Video Prompt", "Image URL"];

/// Filename for one scene's exported preview image.
pub fn image_filename(scene_id: u32) -> String {
    format!("scene-{scene_id:03}.png")
}

/// Write the full scene sequence to the prompts workbook. A zero-row export
/// (headers only) is valid.
pub fn write_workbook(scenes: &[SceneRecord], output_dir: &Path) -> ShotlistResult<PathBuf> {
    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join(WORKBOOK_FILENAME);

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet
        .set_name(SHEET_NAME)
        .map_err(|e| ShotlistError::Export(e.to_string()))?;

    for (col, header) in COLUMNS.iter().enumerate() {
        sheet
            .write_string(0, col as u16, *header)
            .map_err(|e| ShotlistError::Export(e.to_string()))?;
    }

    for (i, scene) in scenes.iter().enumerate() {
        let row = (i + 1) as u32;
        let image_ref = match &scene.generated_image {
            Some(_) => format!("images/{}", image_filename(scene.id)),
            None => String::new(),
        };
        let cells: [(u16, &str); 4] = [
            (1, scene.phase.as_str()),
            (2, scene.image_prompt.as_str()),
            (3, scene.video_prompt.as_str()),
            (4, image_ref.as_str()),
        ];
        sheet
            .write_number(row, 0, scene.id as f64)
            .map_err(|e| ShotlistError::Export(e.to_string()))?;
        for (col, value) in cells {
            sheet
                .write_string(row, col, value)
                .map_err(|e| ShotlistError::Export(e.to_string()))?;
        }
    }

    workbook
        .save(&path)
        .map_err(|e| ShotlistError::Export(e.to_string()))?;
    Ok(path)
}

/// Write every generated preview image to `output_dir/images/`, sequentially.
/// Returns the number of files written.
pub fn write_images(scenes: &[SceneRecord], output_dir: &Path) -> ShotlistResult<usize> {
    let images_dir = output_dir.join("images");
    std::fs::create_dir_all(&images_dir)?;

    let mut written = 0;
    for scene in scenes {
        let Some(data) = &scene.generated_image else {
            continue;
        };
        let bytes = BASE64.decode(data).map_err(|e| {
            ShotlistError::Export(format!("scene {}: invalid image data: {e}", scene.id))
        })?;
        std::fs::write(images_dir.join(image_filename(scene.id)), bytes)?;
        written += 1;
    }
    Ok(written)
}

/// Write a clipboard-ready text dump of all prompts.
pub fn write_prompts_text(scenes: &[SceneRecord], output_dir: &Path) -> ShotlistResult<PathBuf> {
    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join("prompts.txt");
    let mut out = String::new();
    for scene in scenes {
        out.push_str(&format!(
            "Scene {} [{}]\nImage: {}\nVideo: {}\n\n",
            scene.id, scene.phase, scene.image_prompt, scene.video_prompt
        ));
    }
    std::fs::write(&path, out)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::GenerationState;

    fn sample_scenes() -> Vec<SceneRecord> {
        vec![
            SceneRecord {
                id: 1,
                phase: "Hook".into(),
                image_prompt: "dawn over the valley".into(),
                video_prompt: "slow pan across the valley".into(),
                generated_image: Some(BASE64.encode(b"png-bytes")),
                state: GenerationState::Succeeded,
            },
            SceneRecord {
                id: 2,
                phase: "Quest".into(),
                image_prompt: "tracks in the mud".into(),
                video_prompt: "handheld follow shot".into(),
                generated_image: None,
                state: GenerationState::Idle,
            },
        ]
    }

    #[test]
    fn test_column_contract() {
        assert_eq!(
            COLUMNS,
            ["ID", "Phase", "Image Prompt", "Video Prompt", "Image URL"]
        );
        assert_eq!(WORKBOOK_FILENAME, "Prehistoric_Project_Prompts.xlsx");
        assert_eq!(SHEET_NAME, "Prompts");
    }

    #[test]
    fn test_image_filename_padding() {
        assert_eq!(image_filename(1), "scene-001.png");
        assert_eq!(image_filename(42), "scene-042.png");
        assert_eq!(image_filename(123), "scene-123.png");
    }

    #[test]
    fn test_workbook_empty_plan() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_workbook(&[], dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), WORKBOOK_FILENAME);
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_workbook_populated_plan() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_workbook(&sample_scenes(), dir.path()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_write_images_skips_missing() {
        let dir = tempfile::tempdir().unwrap();
        let written = write_images(&sample_scenes(), dir.path()).unwrap();
        assert_eq!(written, 1);
        let image = dir.path().join("images").join("scene-001.png");
        assert_eq!(std::fs::read(image).unwrap(), b"png-bytes");
        assert!(!dir.path().join("images").join("scene-002.png").exists());
    }

    #[test]
    fn test_write_images_rejects_bad_base64() {
        let dir = tempfile::tempdir().unwrap();
        let mut scenes = sample_scenes();
        scenes[0].generated_image = Some("!!! not base64 !!!".into());
        assert!(matches!(
            write_images(&scenes, dir.path()).unwrap_err(),
            ShotlistError::Export(_)
        ));
    }

    #[test]
    fn test_prompts_text_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_prompts_text(&sample_scenes(), dir.path()).unwrap();
        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.contains("Scene 1 [Hook]"));
        assert!(text.contains("Image: dawn over the valley"));
        assert!(text.contains("Video: handheld follow shot"));
    }
}
