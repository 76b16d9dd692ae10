use std::path::PathBuf;

/// Coarse classification of an [`Error`], used by front ends to decide how to
/// present a failure. None of these are fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The stored snapshot could not be read; the session starts empty.
    Parse,
    /// A write was rejected; memory holds changes the store does not.
    Persistence,
    /// An album or photo id is no longer present.
    NotFound,
    /// Input was rejected before any state changed.
    Validation,
    Other,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image decoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("walkdir error: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("stored album data is unreadable: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("storage quota exceeded: {requested} bytes requested, {quota} allowed")]
    QuotaExceeded { requested: usize, quota: usize },

    #[error("changes may not survive a reload: {0}")]
    Persistence(#[source] Box<Error>),

    #[error("album not found: {0}")]
    AlbumNotFound(String),

    #[error("photo {photo_id} not found in album {album_id}")]
    PhotoNotFound { album_id: String, photo_id: String },

    #[error("title must not be empty")]
    EmptyTitle,

    #[error("image source is empty: {0}")]
    EmptySource(String),

    #[error("not an image file: {}", .0.display())]
    UnsupportedFile(PathBuf),

    #[error("unknown setting: {0}")]
    UnknownSetting(String),

    #[error("invalid value for {key}: {value}")]
    InvalidSetting { key: String, value: String },

    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("store schema version {db} is newer than supported version {code}")]
    SchemaTooNew { db: u32, code: u32 },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Parse(_) => ErrorKind::Parse,
            Error::QuotaExceeded { .. } | Error::Persistence(_) => ErrorKind::Persistence,
            Error::AlbumNotFound(_) | Error::PhotoNotFound { .. } => ErrorKind::NotFound,
            Error::EmptyTitle
            | Error::EmptySource(_)
            | Error::UnsupportedFile(_)
            | Error::UnknownSetting(_)
            | Error::InvalidSetting { .. } => ErrorKind::Validation,
            _ => ErrorKind::Other,
        }
    }

    /// Wrap a backend failure as a rejected snapshot write.
    pub(crate) fn persistence(err: Error) -> Self {
        match err {
            Error::Persistence(_) => err,
            other => Error::Persistence(Box::new(other)),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
