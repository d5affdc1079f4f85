use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Container kind of a file on disk, decided by the stage that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKind {
    Video,
    Audio,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Video => "video",
            MediaKind::Audio => "audio",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Handle to a media file on disk
///
/// The kind travels with the path from the point of creation, so later stages
/// branch on the tag instead of re-inspecting the extension.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalMediaFile {
    pub path: PathBuf,
    pub kind: MediaKind,
}

impl LocalMediaFile {
    pub fn video(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: MediaKind::Video,
        }
    }

    pub fn audio(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: MediaKind::Audio,
        }
    }

    /// Lowercased extension of the underlying path
    pub fn extension(&self) -> Option<String> {
        self.path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
    }

    /// Sibling path with `_cropped` appended to the base name, keeping the extension
    pub fn cropped_sibling(&self) -> PathBuf {
        sibling_with_suffix(&self.path, "_cropped")
    }

    /// Sibling path with the same base name and a different extension
    pub fn sibling_with_extension(&self, extension: &str) -> PathBuf {
        self.path.with_extension(extension)
    }
}

/// Build `<base><suffix><ext>` next to the original file
fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let mut name = format!("{}{}", stem, suffix);
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        name.push('.');
        name.push_str(ext);
    }
    path.with_file_name(name)
}
