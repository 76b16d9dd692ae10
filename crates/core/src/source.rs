use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD, Engine};
use image::ImageFormat;
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Raw image handed to the builder: the bytes plus whatever the picker knew
/// about them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSource {
    /// Original filename, if any.
    pub name: Option<String>,
    pub bytes: Vec<u8>,
    /// Existing reference to the bytes (object URL, remote URL). When absent
    /// the bytes are embedded as a `data:` URL.
    pub url: Option<String>,
}

impl ImageSource {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            name: None,
            bytes,
            url: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Read a file from disk, keeping its filename.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let mut source = Self::new(bytes);
        source.name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned());
        Ok(source)
    }

    /// Filename without its extension, e.g. `beach.jpg` → `beach`.
    pub fn stem(&self) -> Option<String> {
        let name = self.name.as_deref()?.trim();
        let stem = Path::new(name).file_stem()?.to_string_lossy();
        if stem.trim().is_empty() {
            None
        } else {
            Some(stem.into_owned())
        }
    }

    /// Name used in reports and error messages.
    pub fn label(&self) -> String {
        self.name.clone().unwrap_or_else(|| "<unnamed>".to_string())
    }

    pub fn mime_type(&self) -> &'static str {
        image::guess_format(&self.bytes)
            .map(|f| f.to_mime_type())
            .unwrap_or("application/octet-stream")
    }

    /// The reference stored in the photo record.
    pub fn resolve_url(&self) -> String {
        match &self.url {
            Some(url) => url.clone(),
            None => format!("data:{};base64,{}", self.mime_type(), STANDARD.encode(&self.bytes)),
        }
    }
}

/// True for files whose extension names a format this build can decode.
pub fn is_image_path(path: &Path) -> bool {
    ImageFormat::from_path(path)
        .map(|f| f.reading_enabled())
        .unwrap_or(false)
}

/// Expand a path into image files: a file is taken as-is, a directory is
/// walked recursively. Results are sorted so uploads keep a stable order.
pub fn collect_image_files(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        if !is_image_path(path) {
            return Err(Error::UnsupportedFile(path.to_path_buf()));
        }
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() && is_image_path(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_stem_strips_last_extension() {
        let source = ImageSource::new(vec![1]).with_name("beach.day.jpg");
        assert_eq!(source.stem().as_deref(), Some("beach.day"));
    }

    #[test]
    fn test_stem_missing_or_blank() {
        assert_eq!(ImageSource::new(vec![1]).stem(), None);
        assert_eq!(ImageSource::new(vec![1]).with_name("   ").stem(), None);
    }

    #[test]
    fn test_resolve_url_prefers_given_url() {
        let source = ImageSource::new(vec![1, 2, 3]).with_url("blob:abc");
        assert_eq!(source.resolve_url(), "blob:abc");
    }

    #[test]
    fn test_resolve_url_embeds_png() {
        // PNG signature is enough for format sniffing
        let bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        let url = ImageSource::new(bytes).resolve_url();
        assert!(url.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_is_image_path() {
        assert!(is_image_path(Path::new("a/b/photo.JPG")));
        assert!(is_image_path(Path::new("photo.png")));
        assert!(!is_image_path(Path::new("notes.txt")));
        assert!(!is_image_path(Path::new("no_extension")));
    }

    #[test]
    fn test_collect_image_files_walks_sorted() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("nested");
        fs::create_dir_all(&nested).unwrap();
        fs::write(tmp.path().join("b.png"), b"x").unwrap();
        fs::write(tmp.path().join("a.jpg"), b"x").unwrap();
        fs::write(tmp.path().join("readme.txt"), b"x").unwrap();
        fs::write(nested.join("c.webp"), b"x").unwrap();

        let files = collect_image_files(tmp.path()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.jpg", "b.png", "c.webp"]);
    }

    #[test]
    fn test_collect_rejects_non_image_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("notes.txt");
        fs::write(&path, b"x").unwrap();
        assert!(matches!(
            collect_image_files(&path),
            Err(Error::UnsupportedFile(_))
        ));
    }

    #[test]
    fn test_from_path_keeps_filename() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("sunset.png");
        fs::write(&path, b"bytes").unwrap();
        let source = ImageSource::from_path(&path).unwrap();
        assert_eq!(source.name.as_deref(), Some("sunset.png"));
        assert_eq!(source.bytes, b"bytes");
    }
}
