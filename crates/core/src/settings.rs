use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::layout::{self, DEFAULT_DENSITY, DEFAULT_GAP, MAX_DENSITY, MAX_GAP, MIN_DENSITY};
use crate::storage::KeyValueStore;

pub const VIEW_MODE_KEY: &str = "viewMode";
pub const ALBUM_SIZE_KEY: &str = "albumSize";
pub const PHOTO_SIZE_KEY: &str = "photoSize";
pub const PHOTO_GAP_KEY: &str = "photoGap";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Grid => "grid",
            ViewMode::List => "list",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "grid" => Ok(ViewMode::Grid),
            "list" => Ok(ViewMode::List),
            other => Err(Error::InvalidSetting {
                key: VIEW_MODE_KEY.to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// Display preferences. Each field lives under its own key, so losing or
/// corrupting one never affects the others or the album data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub view_mode: ViewMode,
    pub album_density: u8,
    pub photo_density: u8,
    pub photo_gap: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            view_mode: ViewMode::Grid,
            album_density: DEFAULT_DENSITY,
            photo_density: DEFAULT_DENSITY,
            photo_gap: DEFAULT_GAP,
        }
    }
}

impl Settings {
    /// Read every preference, substituting the default for any that is
    /// missing or unreadable.
    pub fn load<S: KeyValueStore>(store: &S) -> Self {
        let mut settings = Self::default();
        for key in [VIEW_MODE_KEY, ALBUM_SIZE_KEY, PHOTO_SIZE_KEY, PHOTO_GAP_KEY] {
            let raw = match store.get(key) {
                Ok(Some(raw)) => raw,
                Ok(None) => continue,
                Err(err) => {
                    log::warn!("failed to read setting {}: {}", key, err);
                    continue;
                }
            };
            if let Err(err) = settings.set(key, &raw) {
                log::warn!("ignoring stored setting: {}", err);
            }
        }
        settings
    }

    pub fn save<S: KeyValueStore>(&self, store: &mut S) -> Result<()> {
        store.set(VIEW_MODE_KEY, self.view_mode.as_str())?;
        store.set(ALBUM_SIZE_KEY, &self.album_density.to_string())?;
        store.set(PHOTO_SIZE_KEY, &self.photo_density.to_string())?;
        store.set(PHOTO_GAP_KEY, &self.photo_gap.to_string())?;
        Ok(())
    }

    /// Update one preference from its stored key and textual value.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            VIEW_MODE_KEY => self.view_mode = value.parse()?,
            ALBUM_SIZE_KEY => self.album_density = parse_level(key, value, MIN_DENSITY, MAX_DENSITY)?,
            PHOTO_SIZE_KEY => self.photo_density = parse_level(key, value, MIN_DENSITY, MAX_DENSITY)?,
            PHOTO_GAP_KEY => self.photo_gap = parse_level(key, value, 0, MAX_GAP)?,
            other => return Err(Error::UnknownSetting(other.to_string())),
        }
        Ok(())
    }

    pub fn photo_gap_px(&self) -> u32 {
        layout::gap_px(self.photo_gap)
    }

    /// `(key, value)` pairs in display order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            (VIEW_MODE_KEY, self.view_mode.to_string()),
            (ALBUM_SIZE_KEY, self.album_density.to_string()),
            (PHOTO_SIZE_KEY, self.photo_density.to_string()),
            (PHOTO_GAP_KEY, self.photo_gap.to_string()),
        ]
    }
}

fn parse_level(key: &str, value: &str, min: u8, max: u8) -> Result<u8> {
    value
        .trim()
        .parse::<u8>()
        .ok()
        .filter(|v| (min..=max).contains(v))
        .ok_or_else(|| Error::InvalidSetting {
            key: key.to_string(),
            value: value.to_string(),
        })
}
