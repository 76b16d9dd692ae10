use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Portrait or landscape, decided once from the intrinsic pixel size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    // Snapshots written before orientation was tracked load as landscape.
    #[default]
    Landscape,
}

impl Orientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Portrait => "portrait",
            Orientation::Landscape => "landscape",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Orientation::Portrait => "Portrait",
            Orientation::Landscape => "Landscape",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub orientation: Orientation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub cover_url: String,
    #[serde(default)]
    pub photos: Vec<Photo>,
}

impl Album {
    pub fn new(id: String, title: String) -> Self {
        Self {
            id,
            title,
            cover_url: String::new(),
            photos: Vec::new(),
        }
    }

    pub fn photo(&self, photo_id: &str) -> Option<&Photo> {
        self.photos.iter().find(|p| p.id == photo_id)
    }

    /// Keep `cover_url` pointing at a photo in the album: an existing cover
    /// that is still present stays, otherwise the first photo takes over, and
    /// an empty album has no cover.
    pub fn refresh_cover(&mut self) {
        if self.photos.iter().any(|p| p.url == self.cover_url) {
            return;
        }
        self.cover_url = self
            .photos
            .first()
            .map(|p| p.url.clone())
            .unwrap_or_default();
    }

    /// True when the cover invariant holds.
    pub fn cover_is_consistent(&self) -> bool {
        if self.photos.is_empty() {
            self.cover_url.is_empty()
        } else {
            self.photos.iter().any(|p| p.url == self.cover_url)
        }
    }
}

/// The ordered set of all albums in a session.
pub type Collection = Vec<Album>;

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Generate an id of the form `<prefix>-<unix millis>-<sequence>`.
/// The sequence is process-wide, so ids minted in the same millisecond differ.
pub fn next_id(prefix: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{millis}-{seq}")
}
