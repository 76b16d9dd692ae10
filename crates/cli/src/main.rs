mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use photoalbum_core::storage::LOCAL_STORAGE_QUOTA;
use photoalbum_core::{AlbumRepository, SqliteStore};

/// photoalbum — local photo album manager
#[derive(Parser)]
#[command(name = "photoalbum", version, about)]
struct Cli {
    /// Path to the album store database
    #[arg(long, default_value_t = default_store_path())]
    store: String,

    /// Refuse writes that would grow the store past `--quota=BYTES`. Given
    /// without a value, the browser localStorage limit is used
    #[arg(long, value_name = "BYTES", num_args = 0..=1, require_equals = true)]
    quota: Option<Option<usize>>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List albums, or create, rename and delete them
    Albums {
        #[command(subcommand)]
        action: Option<AlbumsAction>,
    },
    /// List the photos of an album, or add and delete photos
    Photos {
        /// Album ID
        album: String,

        #[command(subcommand)]
        action: Option<PhotosAction>,
    },
    /// Show or change display preferences
    Settings {
        #[command(subcommand)]
        action: Option<SettingsAction>,
    },
}

#[derive(Subcommand)]
enum AlbumsAction {
    /// Create an empty album
    Create {
        /// Album title (defaults to "New album N")
        title: Option<String>,
    },
    /// Rename an album
    Rename { id: String, title: String },
    /// Delete an album and all of its photos
    Rm { id: String },
    /// Delete every album
    Clear,
}

#[derive(Subcommand)]
enum PhotosAction {
    /// Add image files; directories are searched recursively
    Add {
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Title for the photo (only when adding a single file)
        #[arg(long)]
        title: Option<String>,
    },
    /// Delete one photo
    Rm { photo: String },
    /// Delete every photo in the album
    Clear,
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Set a preference: viewMode, albumSize, photoSize or photoGap
    Set { key: String, value: String },
}

fn default_store_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home)
        .join(".photoalbum")
        .join("store.db")
        .to_string_lossy()
        .to_string()
}

fn resolve_quota(flag: Option<Option<usize>>) -> Option<usize> {
    flag.map(|bytes| bytes.unwrap_or(LOCAL_STORAGE_QUOTA))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let store_path = PathBuf::from(&cli.store);
    let backend = SqliteStore::open(&store_path)?.with_quota(resolve_quota(cli.quota));

    match cli.command {
        Commands::Settings { action } => {
            let mut backend = backend;
            match action {
                None => commands::settings::show(&backend)?,
                Some(SettingsAction::Set { key, value }) => {
                    commands::settings::set(&mut backend, &key, &value)?
                }
            }
        }
        Commands::Albums { action } => {
            let mut repo = open_repository(backend);
            match action {
                None => commands::albums::list(&repo)?,
                Some(AlbumsAction::Create { title }) => {
                    commands::albums::create(&mut repo, title.as_deref())?
                }
                Some(AlbumsAction::Rename { id, title }) => {
                    commands::albums::rename(&mut repo, &id, &title)?
                }
                Some(AlbumsAction::Rm { id }) => commands::albums::rm(&mut repo, &id)?,
                Some(AlbumsAction::Clear) => commands::albums::clear(&mut repo)?,
            }
        }
        Commands::Photos { album, action } => {
            let mut repo = open_repository(backend);
            match action {
                None => commands::photos::list(&repo, &album)?,
                Some(PhotosAction::Add { paths, title }) => {
                    commands::photos::add(&mut repo, &album, &paths, title.as_deref())?
                }
                Some(PhotosAction::Rm { photo }) => {
                    commands::photos::rm(&mut repo, &album, &photo)?
                }
                Some(PhotosAction::Clear) => commands::photos::clear(&mut repo, &album)?,
            }
        }
    }

    Ok(())
}

fn open_repository(backend: SqliteStore) -> AlbumRepository<SqliteStore> {
    let repo = AlbumRepository::open(backend);
    if let Some(warning) = repo.load_warning() {
        eprintln!("warning: {warning}");
    }
    repo
}
