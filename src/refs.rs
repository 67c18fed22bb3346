use crate::error::{ShotlistError, ShotlistResult};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Maximum number of reference images held at once. Excess uploads are
/// silently dropped: this is a capacity clamp, not a failure.
pub const MAX_REFERENCE_IMAGES: usize = 3;

/// One user-supplied reference image, normalized to base64 so it can be both
/// displayed inline and sent to the image service. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceImage {
    pub name: String,
    pub mime_type: String,
    pub data: String,
}

impl ReferenceImage {
    pub fn from_file(path: &Path) -> ShotlistResult<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                ShotlistError::RefImage(format!("not a file: {}", path.display()))
            })?;
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        let mime_type = mime_for_extension(&ext).ok_or_else(|| {
            ShotlistError::RefImage(format!("unsupported image type: {name}"))
        })?;
        let bytes = std::fs::read(path)?;
        Ok(Self {
            name,
            mime_type: mime_type.into(),
            data: BASE64.encode(bytes),
        })
    }

    /// Inline data URL form, suitable for display.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

fn mime_for_extension(ext: &str) -> Option<&'static str> {
    match ext {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

/// Holds up to [`MAX_REFERENCE_IMAGES`] reference images in insertion order.
/// That order is the order presented to the image service.
#[derive(Debug, Default)]
pub struct ReferenceStore {
    images: Vec<ReferenceImage>,
}

impl ReferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append images, skipping names already present, then clamp to capacity.
    /// Overflow is never an error.
    pub fn add_images(&mut self, paths: &[PathBuf]) -> ShotlistResult<()> {
        for path in paths {
            if self.images.len() >= MAX_REFERENCE_IMAGES {
                break;
            }
            let image = ReferenceImage::from_file(path)?;
            if self.images.iter().any(|existing| existing.name == image.name) {
                continue;
            }
            self.images.push(image);
        }
        self.images.truncate(MAX_REFERENCE_IMAGES);
        Ok(())
    }

    /// Load reference images from a project's refs/ directory, sorted by
    /// filename so insertion order is stable across runs.
    pub fn load_dir(refs_dir: &Path) -> ShotlistResult<Self> {
        let mut store = Self::new();
        if !refs_dir.exists() {
            return Ok(store);
        }
        let mut entries: Vec<PathBuf> = std::fs::read_dir(refs_dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.extension()
                    .map(|e| e.to_string_lossy().to_ascii_lowercase())
                    .is_some_and(|ext| mime_for_extension(&ext).is_some())
            })
            .collect();
        entries.sort();
        store.add_images(&entries)?;
        Ok(store)
    }

    pub fn images(&self) -> &[ReferenceImage] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Plan generation requires the store to be exactly at capacity.
    pub fn is_complete(&self) -> bool {
        self.images.len() == MAX_REFERENCE_IMAGES
    }

    pub fn into_images(self) -> Vec<ReferenceImage> {
        self.images
    }
}
