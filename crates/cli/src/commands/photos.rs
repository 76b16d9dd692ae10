use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Result};
use comfy_table::Cell;
use indicatif::{ProgressBar, ProgressStyle};
use photoalbum_core::layout::{layout_for, list_thumbnail};
use photoalbum_core::source::collect_image_files;
use photoalbum_core::{AlbumRepository, ImageSource, PhotoBuilder, Settings, SqliteStore, ViewMode};

use super::{display_url, new_table};

pub fn list(repo: &AlbumRepository<SqliteStore>, album_id: &str) -> Result<()> {
    let album = repo.get_album(album_id)?;
    println!("{} ({})", album.title, album.id);
    if album.photos.is_empty() {
        println!("No photos yet. Add some with `photoalbum photos {} add <PATH>`.", album.id);
        return Ok(());
    }

    let settings = Settings::load(repo.backend());
    let placement = match settings.view_mode {
        ViewMode::Grid => "Span",
        ViewMode::List => "Thumbnail",
    };
    let mut table = new_table(vec!["ID", "Title", "Orientation", placement, "URL"]);
    for photo in &album.photos {
        let placement = match settings.view_mode {
            ViewMode::Grid => {
                let directive = layout_for(photo.orientation, settings.photo_density);
                format!(
                    "{} ({}:{})",
                    directive.span, directive.aspect_ratio.width, directive.aspect_ratio.height
                )
            }
            ViewMode::List => {
                let (w, h) = list_thumbnail(photo.orientation);
                format!("{w}x{h}")
            }
        };
        table.add_row(vec![
            Cell::new(&photo.id),
            Cell::new(&photo.title),
            Cell::new(photo.orientation),
            Cell::new(placement),
            Cell::new(display_url(&photo.url, 48)),
        ]);
    }
    println!("{table}");
    println!("{} photo(s), gap {} px", album.photos.len(), settings.photo_gap_px());
    Ok(())
}

pub fn add(
    repo: &mut AlbumRepository<SqliteStore>,
    album_id: &str,
    paths: &[PathBuf],
    title: Option<&str>,
) -> Result<()> {
    // Fail before reading any files if the album is gone.
    let existing = repo.get_album(album_id)?.photos.len();

    let mut files = Vec::new();
    for path in paths {
        files.extend(collect_image_files(path)?);
    }
    if files.is_empty() {
        bail!("no image files found");
    }
    if title.is_some() && files.len() > 1 {
        bail!("--title can only be used when adding a single file");
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner:.green} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(format!("Reading {} file(s)...", files.len()));

    let sources = files
        .iter()
        .map(|path| ImageSource::from_path(path))
        .collect::<photoalbum_core::Result<Vec<_>>>()?;

    let builder = PhotoBuilder::new();
    if let (Some(title), [source]) = (title, sources.as_slice()) {
        let photo = builder.build(source, Some(title), existing + 1)?;
        spinner.finish_and_clear();
        let summary = format!("Added {} ({}, {})", photo.title, photo.id, photo.orientation);
        repo.add_photo(album_id, photo)?;
        println!("{summary}");
        return Ok(());
    }

    spinner.set_message(format!("Measuring {} image(s)...", sources.len()));
    let report = repo.upload(&builder, album_id, &sources)?;
    spinner.finish_and_clear();

    for photo in &report.added {
        println!("Added {} ({}, {})", photo.title, photo.id, photo.orientation);
    }
    for rejected in &report.rejected {
        eprintln!("Skipped {}: {}", rejected.source, rejected.error);
    }
    println!(
        "{} added, {} skipped",
        report.added.len(),
        report.rejected.len()
    );
    if let Some(err) = report.persist_error {
        return Err(err.into());
    }
    Ok(())
}

pub fn rm(repo: &mut AlbumRepository<SqliteStore>, album_id: &str, photo_id: &str) -> Result<()> {
    let photo = repo.delete_photo(album_id, photo_id)?;
    println!("Deleted {} ({})", photo.title, photo.id);
    Ok(())
}

pub fn clear(repo: &mut AlbumRepository<SqliteStore>, album_id: &str) -> Result<()> {
    let removed = repo.delete_all_photos(album_id)?;
    println!("Deleted {removed} photo(s)");
    Ok(())
}
