use anyhow::{bail, Result};
use comfy_table::Cell;
use photoalbum_core::layout::album_grid;
use photoalbum_core::{AlbumRepository, Settings, SqliteStore};

use super::{display_url, format_size, new_table};

pub fn list(repo: &AlbumRepository<SqliteStore>) -> Result<()> {
    let albums = repo.list_albums();
    if albums.is_empty() {
        println!("No albums yet. Create one with `photoalbum albums create`.");
        return Ok(());
    }

    let settings = Settings::load(repo.backend());
    let mut table = new_table(vec!["ID", "Title", "Photos", "Cover"]);
    for album in albums {
        let cover = if album.cover_url.is_empty() {
            "-".to_string()
        } else {
            display_url(&album.cover_url, 40)
        };
        table.add_row(vec![
            Cell::new(&album.id),
            Cell::new(&album.title),
            Cell::new(album.photos.len()),
            Cell::new(cover),
        ]);
    }
    println!("{table}");

    let columns = album_grid(settings.album_density);
    println!(
        "{} album(s), {} stored, grid {}/{}/{}/{}/{} columns",
        albums.len(),
        format_size(repo.backend().used_bytes()?),
        columns.base,
        columns.sm,
        columns.md,
        columns.lg,
        columns.xl,
    );
    Ok(())
}

pub fn create(repo: &mut AlbumRepository<SqliteStore>, title: Option<&str>) -> Result<()> {
    let album = repo.create_album(title)?;
    println!("Created album {} ({})", album.title, album.id);
    Ok(())
}

pub fn rename(repo: &mut AlbumRepository<SqliteStore>, id: &str, title: &str) -> Result<()> {
    repo.rename_album(id, title)?;
    println!("Renamed {} to {}", id, title.trim());
    Ok(())
}

pub fn rm(repo: &mut AlbumRepository<SqliteStore>, id: &str) -> Result<()> {
    match repo.delete_album(id)? {
        Some(album) => println!(
            "Deleted album {} and its {} photo(s)",
            album.title,
            album.photos.len()
        ),
        None => bail!("album not found: {id}"),
    }
    Ok(())
}

pub fn clear(repo: &mut AlbumRepository<SqliteStore>) -> Result<()> {
    let count = repo.list_albums().len();
    repo.delete_all_albums()?;
    println!("Deleted {count} album(s)");
    Ok(())
}
