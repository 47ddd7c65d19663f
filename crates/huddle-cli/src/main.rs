//! Huddle CLI: add, list and delete meeting photos.
//!
//! Reads configuration from the environment (a `.env` file is loaded first).
//! DATABASE_URL and the storage backend variables must be set.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use huddle_cli::{init_tracing, prepare_entry, truncate_string};
use huddle_core::Config;
use huddle_db::{setup_database, PhotoRepository, PhotoStore};
use huddle_processing::{
    kilobytes, EntryOutcome, PhotoGallery, PhotoPipeline, PhotoValidator, Severity,
};
use huddle_storage::create_storage;
use serde::Serialize;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "huddle", about = "Meeting photo tools")]
struct Cli {
    /// Print machine-readable JSON instead of notices
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recompress and attach photos to a meeting
    Upload {
        /// Meeting UUID
        meeting_id: Uuid,
        /// Image files, processed in order
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// List a meeting's photos, newest first
    List {
        /// Meeting UUID
        meeting_id: Uuid,
    },
    /// Delete a photo and its stored image
    Delete {
        /// Photo UUID
        photo_id: Uuid,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

fn print_notice(entry: &EntryOutcome) {
    let notice = entry.notice();
    let marker = match notice.severity {
        Severity::Success => "ok",
        Severity::Destructive => "!!",
    };
    println!(
        "[{}] {} ({}): {}",
        marker, notice.title, entry.file_name, notice.description
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    let pool = setup_database(&config).await?;
    let store: Arc<dyn PhotoStore> = Arc::new(PhotoRepository::new(pool));
    let storage = create_storage(&config)
        .await
        .context("Failed to initialize photo storage")?;

    match cli.command {
        Commands::Upload { meeting_id, files } => {
            let settings = config.photo_settings();
            let validator = PhotoValidator::new(settings.max_file_size_bytes);
            let mut entries = Vec::with_capacity(files.len());
            for path in &files {
                entries.push(prepare_entry(path, &validator).await);
            }

            let pipeline = PhotoPipeline::new(storage, store, settings);

            let json = cli.json;
            let report = pipeline
                .process_entries_with(meeting_id, entries, |entry| {
                    if !json {
                        print_notice(entry);
                    }
                })
                .await;

            if json {
                print_json(&report.summary())?;
            } else {
                println!(
                    "{} uploaded, {} failed",
                    report.success_count(),
                    report.failure_count()
                );
            }

            if report.success_count() == 0 && !report.is_empty() {
                anyhow::bail!("No photos were uploaded");
            }
        }
        Commands::List { meeting_id } => {
            let gallery = PhotoGallery::new(storage, store);
            let photos = gallery.list(meeting_id).await?;

            if cli.json {
                print_json(&photos)?;
            } else if photos.is_empty() {
                println!("No photos for meeting {}", meeting_id);
            } else {
                for photo in &photos {
                    println!(
                        "{}  {}  {:>6} KB  {:<32}  {}",
                        photo.id,
                        photo.created_at.format("%Y-%m-%d %H:%M"),
                        kilobytes(photo.file_size.max(0) as usize),
                        truncate_string(&photo.file_name, 32),
                        photo.photo_url
                    );
                }
            }
        }
        Commands::Delete { photo_id } => {
            let gallery = PhotoGallery::new(storage, store);
            let photo = gallery
                .delete(photo_id)
                .await
                .context("Delete Failed")?;

            if cli.json {
                print_json(&serde_json::json!({ "deleted": photo }))?;
            } else {
                println!("Photo Deleted: {} removed successfully.", photo.file_name);
            }
        }
    }

    Ok(())
}
