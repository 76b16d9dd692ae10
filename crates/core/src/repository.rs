use crate::builder::{PhotoBuilder, Probe};
use crate::domain::{next_id, Album, Collection, Photo};
use crate::error::{Error, Result};
use crate::source::ImageSource;
use crate::storage::{KeyValueStore, Loaded, SnapshotStore};

/// A source that could not be turned into a photo.
#[derive(Debug)]
pub struct Rejected {
    pub source: String,
    pub error: Error,
}

/// Outcome of an upload: photos added to the album, in submission order,
/// and the sources that were turned away.
#[derive(Debug, Default)]
pub struct UploadReport {
    pub added: Vec<Photo>,
    pub rejected: Vec<Rejected>,
    /// Set when the added photos are in memory but the snapshot write failed.
    pub persist_error: Option<Error>,
}

impl UploadReport {
    pub fn is_saved(&self) -> bool {
        self.persist_error.is_none()
    }
}

type Subscriber = Box<dyn FnMut(&[Album])>;

/// Sole owner of the album collection for a session.
///
/// Every mutation changes memory first, then writes the whole collection back
/// through the [`SnapshotStore`]. Validation and not-found failures return
/// before anything changes. A failed write returns `Error::Persistence`, but
/// the in-memory change stays and [`has_unsaved_changes`] reports it until a
/// later save succeeds.
///
/// [`has_unsaved_changes`]: AlbumRepository::has_unsaved_changes
pub struct AlbumRepository<S: KeyValueStore> {
    store: SnapshotStore<S>,
    albums: Collection,
    unsaved: bool,
    load_warning: Option<Error>,
    subscribers: Vec<Subscriber>,
}

impl<S: KeyValueStore> AlbumRepository<S> {
    /// Load the stored collection. An unreadable snapshot leaves the session
    /// empty and is reported through [`load_warning`](Self::load_warning).
    pub fn open(backend: S) -> Self {
        let store = SnapshotStore::new(backend);
        let Loaded { mut albums, warning } = store.load();

        let repaired = repair(&mut albums);
        if repaired > 0 {
            log::warn!("repaired {} inconsistent albums in stored snapshot", repaired);
        }
        log::debug!("opened collection with {} albums", albums.len());

        Self {
            store,
            albums,
            unsaved: repaired > 0,
            load_warning: warning,
            subscribers: Vec::new(),
        }
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub fn list_albums(&self) -> &[Album] {
        &self.albums
    }

    pub fn snapshot(&self) -> Collection {
        self.albums.clone()
    }

    pub fn get_album(&self, id: &str) -> Result<&Album> {
        self.albums
            .iter()
            .find(|a| a.id == id)
            .ok_or_else(|| Error::AlbumNotFound(id.to_string()))
    }

    pub fn load_warning(&self) -> Option<&Error> {
        self.load_warning.as_ref()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    pub fn backend(&self) -> &S {
        self.store.backend()
    }

    /// Register a callback that receives the collection after every change.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&[Album]) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Retry persisting the current collection after an earlier failed write.
    pub fn flush(&mut self) -> Result<()> {
        if !self.unsaved {
            return Ok(());
        }
        self.persist()
    }

    // ── Albums ───────────────────────────────────────────────────────

    /// Create an empty album. A blank or missing title becomes
    /// `New album {n}`, with `n` one past the current album count.
    pub fn create_album(&mut self, title: Option<&str>) -> Result<Album> {
        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("New album {}", self.albums.len() + 1));

        let album = Album::new(self.unique_album_id(), title);
        log::debug!("creating album {} ({})", album.id, album.title);
        self.albums.push(album.clone());
        self.commit()?;
        Ok(album)
    }

    /// Remove an album and its photos. Unknown ids are ignored.
    pub fn delete_album(&mut self, id: &str) -> Result<Option<Album>> {
        let Some(index) = self.albums.iter().position(|a| a.id == id) else {
            log::debug!("delete of unknown album {} ignored", id);
            return Ok(None);
        };
        let removed = self.albums.remove(index);
        self.commit()?;
        Ok(Some(removed))
    }

    /// Drop every album and remove the stored snapshot.
    pub fn delete_all_albums(&mut self) -> Result<()> {
        self.albums.clear();
        self.notify();
        match self.store.clear() {
            Ok(()) => {
                self.unsaved = false;
                Ok(())
            }
            Err(err) => {
                log::warn!("failed to clear album snapshot: {}", err);
                self.unsaved = true;
                Err(err)
            }
        }
    }

    pub fn rename_album(&mut self, id: &str, title: &str) -> Result<()> {
        let title = title.trim();
        if title.is_empty() {
            return Err(Error::EmptyTitle);
        }
        self.album_mut(id)?.title = title.to_string();
        self.commit()
    }

    // ── Photos ───────────────────────────────────────────────────────

    pub fn add_photo(&mut self, album_id: &str, photo: Photo) -> Result<()> {
        self.add_photos(album_id, vec![photo])
    }

    /// Append photos in the given order with a single write.
    pub fn add_photos(&mut self, album_id: &str, photos: Vec<Photo>) -> Result<()> {
        let album = self.album_mut(album_id)?;
        if photos.is_empty() {
            return Ok(());
        }
        album.photos.extend(photos);
        album.refresh_cover();
        self.commit()
    }

    /// Remove one photo. If it was the cover, the first remaining photo
    /// becomes the cover.
    pub fn delete_photo(&mut self, album_id: &str, photo_id: &str) -> Result<Photo> {
        let album = self.album_mut(album_id)?;
        let index = album
            .photos
            .iter()
            .position(|p| p.id == photo_id)
            .ok_or_else(|| Error::PhotoNotFound {
                album_id: album_id.to_string(),
                photo_id: photo_id.to_string(),
            })?;
        let removed = album.photos.remove(index);
        if removed.url == album.cover_url {
            album.cover_url = album
                .photos
                .first()
                .map(|p| p.url.clone())
                .unwrap_or_default();
        }
        self.commit()?;
        Ok(removed)
    }

    /// Empty an album. Returns how many photos were removed.
    pub fn delete_all_photos(&mut self, album_id: &str) -> Result<usize> {
        let album = self.album_mut(album_id)?;
        let count = album.photos.len();
        album.photos.clear();
        album.cover_url.clear();
        self.commit()?;
        Ok(count)
    }

    /// Build photos from raw sources and append the accepted ones in
    /// submission order with one write.
    ///
    /// Only a missing album is an `Err`. A failed write is reported through
    /// [`UploadReport::persist_error`] so the per-source outcome is kept.
    pub fn upload<P: Probe>(
        &mut self,
        builder: &PhotoBuilder<P>,
        album_id: &str,
        sources: &[ImageSource],
    ) -> Result<UploadReport> {
        let existing = self.get_album(album_id)?.photos.len();
        let labels: Vec<String> = sources.iter().map(ImageSource::label).collect();
        let results = builder.build_batch(sources, existing);
        self.commit_upload(album_id, labels, results)
    }

    /// Async form of [`upload`](Self::upload): measuring happens off the
    /// calling thread.
    pub async fn upload_async<P: Probe>(
        &mut self,
        builder: &PhotoBuilder<P>,
        album_id: &str,
        sources: Vec<ImageSource>,
    ) -> Result<UploadReport> {
        let existing = self.get_album(album_id)?.photos.len();
        let labels: Vec<String> = sources.iter().map(ImageSource::label).collect();
        let results = builder.build_batch_async(sources, existing).await;
        self.commit_upload(album_id, labels, results)
    }

    fn commit_upload(
        &mut self,
        album_id: &str,
        labels: Vec<String>,
        results: Vec<Result<Photo>>,
    ) -> Result<UploadReport> {
        let mut report = UploadReport::default();
        for (source, result) in labels.into_iter().zip(results) {
            match result {
                Ok(photo) => report.added.push(photo),
                Err(error) => {
                    log::warn!("rejected upload {}: {}", source, error);
                    report.rejected.push(Rejected { source, error });
                }
            }
        }
        let album = self.album_mut(album_id)?;
        if report.added.is_empty() {
            return Ok(report);
        }
        album.photos.extend(report.added.iter().cloned());
        album.refresh_cover();
        report.persist_error = self.commit().err();
        Ok(report)
    }

    // ── Internals ────────────────────────────────────────────────────

    fn album_mut(&mut self, id: &str) -> Result<&mut Album> {
        self.albums
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| Error::AlbumNotFound(id.to_string()))
    }

    fn unique_album_id(&self) -> String {
        loop {
            let id = next_id("album");
            if !self.albums.iter().any(|a| a.id == id) {
                return id;
            }
        }
    }

    fn notify(&mut self) {
        for subscriber in &mut self.subscribers {
            subscriber(&self.albums);
        }
    }

    fn commit(&mut self) -> Result<()> {
        self.notify();
        self.persist()
    }

    fn persist(&mut self) -> Result<()> {
        match self.store.save(&self.albums) {
            Ok(()) => {
                log::debug!("saved {} album(s)", self.albums.len());
                self.unsaved = false;
                Ok(())
            }
            Err(err) => {
                log::warn!("album changes kept in memory only: {}", err);
                self.unsaved = true;
                Err(err)
            }
        }
    }
}

/// Drop albums whose id repeats an earlier one and fix stale covers.
/// Returns how many albums changed.
fn repair(albums: &mut Collection) -> usize {
    let before = albums.len();
    let mut seen = std::collections::HashSet::new();
    albums.retain(|a| seen.insert(a.id.clone()));
    let mut repaired = before - albums.len();

    for album in albums.iter_mut() {
        if !album.cover_is_consistent() {
            album.refresh_cover();
            repaired += 1;
        }
    }
    repaired
}
