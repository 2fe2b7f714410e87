use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use base64::{engine::general_purpose, Engine as _};
use rand::Rng;
use thiserror::Error;

/// Permitted upload extensions, kept sorted for error messages.
pub const ALLOWED_EXTENSIONS: &[&str] = &["bmp", "gif", "jpeg", "jpg", "png", "webp"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("no file uploaded")]
    MissingFile,
    #[error("no file selected")]
    EmptyFilename,
    #[error("unsupported file format")]
    UnsupportedType,
}

impl ValidationError {
    /// Translation key for the user-facing message.
    pub fn message_key(&self) -> &'static str {
        match self {
            ValidationError::MissingFile => "upload_error_no_file",
            ValidationError::EmptyFilename => "upload_error_empty",
            ValidationError::UnsupportedType => "upload_error_type",
        }
    }
}

/// Lowercased extension after the last dot, if any.
pub fn extension(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
}

/// Checks the filename of a submitted `file` field and returns its
/// normalized extension. The caller maps `MissingFile` itself when the field
/// is absent entirely. Extension-only check by design; no content sniffing.
pub fn validate_filename(filename: Option<&str>) -> Result<String, ValidationError> {
    let filename = match filename {
        Some(name) if !name.is_empty() => name,
        _ => return Err(ValidationError::EmptyFilename),
    };
    match extension(filename) {
        Some(ext) if ALLOWED_EXTENSIONS.contains(&ext.as_str()) => Ok(ext),
        _ => Err(ValidationError::UnsupportedType),
    }
}

fn mime_for(ext: &str) -> &'static str {
    match ext {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "webp" => "image/webp",
        _ => "image/jpeg",
    }
}

/// Encodes image bytes as a self-contained `data:<mime>;base64,<payload>`
/// URI. Pure; unknown extensions fall back to `image/jpeg`.
pub fn data_url(bytes: &[u8], ext: &str) -> String {
    format!(
        "data:{};base64,{}",
        mime_for(ext),
        general_purpose::STANDARD.encode(bytes)
    )
}

/// An upload staged on disk under a collision-free random name. The file is
/// removed when the guard drops, whichever way the handler exits.
pub struct TempUpload {
    path: PathBuf,
}

impl TempUpload {
    pub fn create(dir: &Path, ext: &str, bytes: &[u8]) -> io::Result<Self> {
        let name = format!("{:032x}.{}", rand::thread_rng().gen::<u128>(), ext);
        let path = dir.join(name);
        fs::write(&path, bytes)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> io::Result<Vec<u8>> {
        fs::read(&self.path)
    }
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        if let Err(err) = fs::remove_file(&self.path) {
            tracing::warn!(path = %self.path.display(), %err, "failed to remove temp upload");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_case_insensitive() {
        assert_eq!(extension("photo.TXT").as_deref(), Some("txt"));
        assert_eq!(extension("a.b.PNG").as_deref(), Some("png"));
        assert_eq!(extension("noext"), None);
    }

    #[test]
    fn uppercase_txt_is_rejected() {
        assert_eq!(
            validate_filename(Some("photo.TXT")),
            Err(ValidationError::UnsupportedType)
        );
    }

    #[test]
    fn empty_filename_fails_before_extension_check() {
        assert_eq!(
            validate_filename(Some("")),
            Err(ValidationError::EmptyFilename)
        );
        assert_eq!(validate_filename(None), Err(ValidationError::EmptyFilename));
    }

    #[test]
    fn allowed_extensions_pass() {
        assert_eq!(validate_filename(Some("cat.JPeG")).unwrap(), "jpeg");
        assert_eq!(validate_filename(Some("dog.webp")).unwrap(), "webp");
        assert_eq!(
            validate_filename(Some("archive.tar.gz")),
            Err(ValidationError::UnsupportedType)
        );
    }

    #[test]
    fn data_url_round_trips() {
        let bytes: Vec<u8> = (0u8..=255).collect();
        let url = data_url(&bytes, "png");
        let payload = url.strip_prefix("data:image/png;base64,").unwrap();
        let decoded = general_purpose::STANDARD.decode(payload).unwrap();
        assert_eq!(decoded, bytes);
    }

    #[test]
    fn unknown_extension_defaults_to_jpeg_mime() {
        let url = data_url(b"x", "tiff");
        assert!(url.starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn temp_upload_is_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = {
            let staged = TempUpload::create(dir.path(), "png", b"payload").unwrap();
            assert_eq!(staged.read().unwrap(), b"payload");
            staged.path().to_path_buf()
        };
        assert!(!path.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
