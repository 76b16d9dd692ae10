//! Album and photo state for a local photo album manager.
//!
//! [`AlbumRepository`] owns the collection of albums and writes the whole of
//! it back to a [`KeyValueStore`] after every change. [`PhotoBuilder`] turns
//! raw image bytes into [`Photo`] records, and [`layout`] decides how tiles
//! are placed in a grid.

pub mod builder;
pub mod domain;
pub mod error;
pub mod layout;
pub mod repository;
pub mod settings;
pub mod source;
pub mod storage;

pub use builder::{classify, measure, HeaderProbe, PhotoBuilder, Probe};
pub use domain::{Album, Collection, Orientation, Photo};
pub use error::{Error, ErrorKind, Result};
pub use layout::{album_grid, layout_for, Columns, LayoutDirective};
pub use repository::{AlbumRepository, Rejected, UploadReport};
pub use settings::{Settings, ViewMode};
pub use source::ImageSource;
pub use storage::{KeyValueStore, MemoryStore, SnapshotStore, SqliteStore};
