use std::fs;
use std::path::Path;

use photoalbum_core::storage::ALBUMS_KEY;
use photoalbum_core::{
    AlbumRepository, Error, ErrorKind, ImageSource, KeyValueStore, Orientation, PhotoBuilder,
    SqliteStore,
};

/// Write a PNG of the given size with a simple gradient.
fn create_png(path: &Path, width: u32, height: u32) {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    img.save(path).unwrap();
}

fn png_source(name: &str, width: u32, height: u32) -> ImageSource {
    let img = image::RgbImage::new(width, height);
    let mut bytes = std::io::Cursor::new(Vec::new());
    img.write_to(&mut bytes, image::ImageFormat::Png).unwrap();
    ImageSource::new(bytes.into_inner()).with_name(name)
}

fn open(path: &Path) -> AlbumRepository<SqliteStore> {
    AlbumRepository::open(SqliteStore::open(path).unwrap())
}

// ── Albums ───────────────────────────────────────────────────────

#[test]
fn test_trip_album_with_landscape_photo() {
    let tmp = tempfile::tempdir().unwrap();
    let db_path = tmp.path().join("store.db");
    let image_path = tmp.path().join("beach.png");
    create_png(&image_path, 800, 600);

    let album_id;
    let photo_url;
    {
        let mut repo = open(&db_path);
        let album = repo.create_album(Some("Trip")).unwrap();
        album_id = album.id.clone();

        let source = ImageSource::from_path(&image_path).unwrap();
        let report = repo.upload(&PhotoBuilder::new(), &album_id, &[source]).unwrap();
        assert_eq!(report.added.len(), 1);
        assert!(report.rejected.is_empty());

        let photo = &report.added[0];
        assert_eq!(photo.orientation, Orientation::Landscape);
        assert_eq!(photo.title, "beach");
        assert!(photo.url.starts_with("data:image/png;base64,"));
        photo_url = photo.url.clone();
    }

    let repo = open(&db_path);
    let album = repo.get_album(&album_id).unwrap();
    assert_eq!(album.title, "Trip");
    assert_eq!(album.photos.len(), 1);
    assert_eq!(album.cover_url, photo_url);
    assert!(repo.load_warning().is_none());
}

#[test]
fn test_delete_all_albums_removes_snapshot() {
    let tmp = tempfile::tempdir().unwrap();
    let db_path = tmp.path().join("store.db");
    {
        let mut repo = open(&db_path);
        repo.create_album(Some("One")).unwrap();
        repo.create_album(Some("Two")).unwrap();
        assert!(repo.backend().get(ALBUMS_KEY).unwrap().is_some());

        repo.delete_all_albums().unwrap();
        assert!(repo.list_albums().is_empty());
        assert_eq!(repo.backend().get(ALBUMS_KEY).unwrap(), None);
    }

    let repo = open(&db_path);
    assert!(repo.list_albums().is_empty());
    assert!(repo.load_warning().is_none());
}

#[test]
fn test_state_survives_reopen() {
    let tmp = tempfile::tempdir().unwrap();
    let db_path = tmp.path().join("store.db");

    let before = {
        let mut repo = open(&db_path);
        let a = repo.create_album(Some("Summer")).unwrap();
        let b = repo.create_album(None).unwrap();
        let sources = vec![png_source("tall.png", 30, 60), png_source("wide.png", 60, 30)];
        repo.upload(&PhotoBuilder::new(), &a.id, &sources).unwrap();
        repo.rename_album(&b.id, "  Winter ").unwrap();
        repo.snapshot()
    };

    let repo = open(&db_path);
    assert_eq!(repo.snapshot(), before);
    assert_eq!(before[1].title, "Winter");
    assert_eq!(before[0].photos[0].orientation, Orientation::Portrait);
    assert_eq!(before[0].photos[1].orientation, Orientation::Landscape);
}

#[test]
fn test_rename_blank_title_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let mut repo = open(&tmp.path().join("store.db"));
    let album = repo.create_album(Some("Keep")).unwrap();

    let err = repo.rename_album(&album.id, "   ").unwrap_err();
    assert!(matches!(err, Error::EmptyTitle));
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(repo.get_album(&album.id).unwrap().title, "Keep");
}

#[test]
fn test_corrupt_snapshot_starts_empty() {
    let tmp = tempfile::tempdir().unwrap();
    let db_path = tmp.path().join("store.db");
    {
        let mut store = SqliteStore::open(&db_path).unwrap();
        store.set(ALBUMS_KEY, "{not json").unwrap();
    }

    let repo = open(&db_path);
    assert!(repo.list_albums().is_empty());
    assert_eq!(repo.load_warning().map(Error::kind), Some(ErrorKind::Parse));
}

// ── Uploads ──────────────────────────────────────────────────────

#[test]
fn test_batch_upload_keeps_submission_order() {
    let tmp = tempfile::tempdir().unwrap();
    let mut repo = open(&tmp.path().join("store.db"));
    let album = repo.create_album(Some("Order")).unwrap();

    let sources: Vec<ImageSource> = (0..8)
        .map(|i| {
            let (w, h) = if i % 2 == 0 { (40, 20) } else { (20, 40) };
            png_source(&format!("img{i}.png"), w, h)
        })
        .collect();
    let report = repo.upload(&PhotoBuilder::new(), &album.id, &sources).unwrap();

    let titles: Vec<&str> = repo.get_album(&album.id).unwrap().photos.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, ["img0", "img1", "img2", "img3", "img4", "img5", "img6", "img7"]);
    assert_eq!(report.added.len(), 8);
    assert_eq!(
        repo.get_album(&album.id).unwrap().cover_url,
        report.added[0].url
    );
}

#[test]
fn test_batch_upload_skips_unreadable_files() {
    let tmp = tempfile::tempdir().unwrap();
    let mut repo = open(&tmp.path().join("store.db"));
    let album = repo.create_album(Some("Mixed")).unwrap();

    let sources = vec![
        png_source("good.png", 10, 20),
        ImageSource::new(b"not an image".to_vec()).with_name("bad.png"),
        ImageSource::new(Vec::new()).with_name("empty.png"),
    ];
    let report = repo.upload(&PhotoBuilder::new(), &album.id, &sources).unwrap();

    assert_eq!(report.added.len(), 1);
    assert_eq!(report.rejected.len(), 2);
    assert_eq!(report.rejected[0].source, "bad.png");
    assert!(matches!(report.rejected[1].error, Error::EmptySource(_)));
    assert_eq!(repo.get_album(&album.id).unwrap().photos.len(), 1);
}

#[test]
fn test_upload_directory_of_files() {
    let tmp = tempfile::tempdir().unwrap();
    let photos_dir = tmp.path().join("photos");
    fs::create_dir_all(photos_dir.join("nested")).unwrap();
    create_png(&photos_dir.join("b.png"), 16, 8);
    create_png(&photos_dir.join("nested/a.png"), 8, 16);
    fs::write(photos_dir.join("notes.txt"), b"not an image").unwrap();

    let files = photoalbum_core::source::collect_image_files(&photos_dir).unwrap();
    assert_eq!(files.len(), 2);

    let sources: Vec<ImageSource> = files
        .iter()
        .map(|p| ImageSource::from_path(p).unwrap())
        .collect();
    let mut repo = open(&tmp.path().join("store.db"));
    let album = repo.create_album(None).unwrap();
    let report = repo.upload(&PhotoBuilder::new(), &album.id, &sources).unwrap();
    assert_eq!(report.added.len(), 2);
}

#[test]
fn test_upload_to_deleted_album_is_not_found() {
    let tmp = tempfile::tempdir().unwrap();
    let mut repo = open(&tmp.path().join("store.db"));
    let album = repo.create_album(Some("Gone")).unwrap();
    repo.delete_album(&album.id).unwrap();

    let err = repo
        .upload(&PhotoBuilder::new(), &album.id, &[png_source("x.png", 4, 4)])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(repo.list_albums().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_async_upload_persists() {
    let tmp = tempfile::tempdir().unwrap();
    let db_path = tmp.path().join("store.db");

    let album_id = {
        let mut repo = open(&db_path);
        let album = repo.create_album(Some("Async")).unwrap();
        let sources = vec![
            png_source("one.png", 30, 10),
            png_source("two.png", 10, 30),
            png_source("three.png", 20, 20),
        ];
        let report = repo
            .upload_async(&PhotoBuilder::new(), &album.id, sources)
            .await
            .unwrap();
        assert_eq!(report.added.len(), 3);
        album.id
    };

    let repo = open(&db_path);
    let photos = &repo.get_album(&album_id).unwrap().photos;
    let orientations: Vec<Orientation> = photos.iter().map(|p| p.orientation).collect();
    assert_eq!(
        orientations,
        [Orientation::Landscape, Orientation::Portrait, Orientation::Landscape]
    );
    assert_eq!(photos[1].title, "two");
}
