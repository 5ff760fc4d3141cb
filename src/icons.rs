// Icon asset library
//
// Filesystem boundary for uploaded button icons, confined to one directory
// created lazily on first write. Filenames are treated as single path
// segments: anything containing separators or dot-dot is rejected before it
// ever reaches a filesystem call.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use regex::Regex;

use crate::constants::{ICON_MIME_TYPES, MAX_ICON_BYTES};
use crate::error::{PanelError, Result};

static DATA_URI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^data:([a-zA-Z0-9.+-]+/[a-zA-Z0-9.+-]+);base64,(.+)$").unwrap()
});

/// A decoded, validated icon upload ready to be written to disk.
pub struct IconPayload {
    pub extension: &'static str,
    pub bytes: Vec<u8>,
}

/// Parse and validate a `data:<mime>;base64,<payload>` URI.
///
/// Validation order matters for error reporting: URI shape first, then the
/// mime allowlist, then the decoded size cap (512 KiB inclusive).
pub fn parse_data_uri(data_uri: &str) -> Result<IconPayload> {
    let caps = DATA_URI_RE
        .captures(data_uri)
        .ok_or(PanelError::InvalidImageFormat)?;

    let mime = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
    let extension = ICON_MIME_TYPES
        .iter()
        .find(|(m, _)| m.eq_ignore_ascii_case(mime))
        .map(|(_, ext)| *ext)
        .ok_or_else(|| PanelError::InvalidImageType(mime.to_string()))?;

    let bytes = BASE64
        .decode(caps.get(2).map(|m| m.as_str()).unwrap_or_default())
        .map_err(|_| PanelError::InvalidImageFormat)?;

    if bytes.len() > MAX_ICON_BYTES {
        return Err(PanelError::ImageTooLarge(bytes.len()));
    }

    Ok(IconPayload { extension, bytes })
}

/// True if `name` is safe to use as a single path segment.
pub fn is_safe_segment(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains('\0')
}

pub struct IconLibrary {
    dir: PathBuf,
}

impl IconLibrary {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Join `filename` onto the icon directory, rejecting traversal attempts.
    fn checked_path(&self, filename: &str) -> Result<PathBuf> {
        if !is_safe_segment(filename) {
            return Err(PanelError::NotFound(filename.to_string()));
        }
        Ok(self.dir.join(filename))
    }

    /// Absolute path of an existing icon file, or `NotFound`.
    pub fn resolve(&self, filename: &str) -> Result<PathBuf> {
        let path = self.checked_path(filename)?;
        if !path.is_file() {
            return Err(PanelError::NotFound(filename.to_string()));
        }
        Ok(path)
    }

    /// Write icon bytes, creating the directory if absent. Temp file +
    /// rename so a crash mid-write never leaves a half-written icon.
    pub fn write(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.checked_path(filename)?;
        std::fs::create_dir_all(&self.dir)?;

        let tmp_path = path.with_extension("tmp");
        std::fs::write(&tmp_path, bytes)?;
        if let Err(e) = std::fs::rename(&tmp_path, &path) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        Ok(path)
    }

    /// Best-effort removal. A missing file is a success; any real I/O
    /// failure comes back as a warning string for the caller to log, never
    /// as an error.
    pub fn remove(&self, filename: &str) -> Option<String> {
        let path = match self.checked_path(filename) {
            Ok(p) => p,
            Err(_) => return Some(format!("refusing to delete unsafe icon name {:?}", filename)),
        };

        match std::fs::remove_file(&path) {
            Ok(()) => None,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => Some(format!("could not delete icon {}: {}", filename, e)),
        }
    }
}
