//! Batch orchestrator: validate → recompress → upload → record, per entry.
//!
//! Entries run sequentially in submission order. Every stage failure ends that
//! entry only; the batch always yields one outcome per input. Nothing is
//! retried, and no stage is undone when a later one fails (a blob whose row is
//! rejected stays in storage).

use std::sync::Arc;
use std::time::Instant;

use huddle_core::{ErrorMetadata, LogLevel, PhotoRecord, PhotoSettings};
use huddle_db::PhotoStore;
use huddle_storage::Storage;
use uuid::Uuid;

use super::recorder::MetadataRecorder;
use super::report::{BatchReport, EntryOutcome};
use super::types::{BatchEntry, ProcessedImage, SourceImage};
use super::uploader::PhotoUploader;
use crate::clock::KeyClock;
use crate::compression::{CompressionError, Recompressor};
use crate::error::PipelineError;
use crate::validator::PhotoValidator;

pub struct PhotoPipeline {
    validator: PhotoValidator,
    recompressor: Recompressor,
    uploader: PhotoUploader,
    recorder: MetadataRecorder,
}

impl PhotoPipeline {
    pub fn new(
        storage: Arc<dyn Storage>,
        store: Arc<dyn PhotoStore>,
        settings: PhotoSettings,
    ) -> Self {
        Self::with_clock(storage, store, settings, KeyClock::system())
    }

    /// Same as [`PhotoPipeline::new`] with an explicit key clock.
    pub fn with_clock(
        storage: Arc<dyn Storage>,
        store: Arc<dyn PhotoStore>,
        settings: PhotoSettings,
        clock: KeyClock,
    ) -> Self {
        Self {
            validator: PhotoValidator::new(settings.max_file_size_bytes),
            recompressor: Recompressor::from_settings(&settings),
            uploader: PhotoUploader::new(storage, clock),
            recorder: MetadataRecorder::new(store),
        }
    }

    /// Run one file through every stage.
    pub async fn process_entry(
        &self,
        meeting_id: Uuid,
        source: SourceImage,
    ) -> Result<PhotoRecord, PipelineError> {
        let start = Instant::now();

        self.validator.validate(&source)?;

        let SourceImage {
            file_name, data, ..
        } = source;
        let original_size = data.len();

        let processed = self.recompress(data).await?;

        tracing::debug!(
            meeting_id = %meeting_id,
            file_name = %file_name,
            original_bytes = original_size,
            compressed_bytes = processed.len(),
            width = processed.width,
            height = processed.height,
            "Photo recompressed"
        );

        let blob = self.uploader.upload(meeting_id, processed).await?;
        let record = self.recorder.record(meeting_id, &file_name, &blob).await?;

        tracing::info!(
            meeting_id = %meeting_id,
            photo_id = %record.id,
            file_name = %file_name,
            key = %blob.storage_key,
            original_bytes = original_size,
            size_bytes = blob.size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Photo uploaded"
        );

        Ok(record)
    }

    /// Process a batch and collect one outcome per file, in order.
    pub async fn process_batch(&self, meeting_id: Uuid, sources: Vec<SourceImage>) -> BatchReport {
        self.process_batch_with(meeting_id, sources, |_| {}).await
    }

    /// Like [`PhotoPipeline::process_batch`], calling `on_entry` as soon as each
    /// entry finishes.
    pub async fn process_batch_with<F>(
        &self,
        meeting_id: Uuid,
        sources: Vec<SourceImage>,
        on_entry: F,
    ) -> BatchReport
    where
        F: FnMut(&EntryOutcome),
    {
        let entries: Vec<BatchEntry> = sources.into_iter().map(Ok).collect();
        self.process_entries_with(meeting_id, entries, on_entry)
            .await
    }

    /// Batch in which some positions were already rejected by the caller.
    /// Rejected entries are reported in place and the rest are processed.
    pub async fn process_entries_with<F>(
        &self,
        meeting_id: Uuid,
        entries: Vec<BatchEntry>,
        mut on_entry: F,
    ) -> BatchReport
    where
        F: FnMut(&EntryOutcome),
    {
        let start = Instant::now();
        let mut report = BatchReport::new(meeting_id);

        for (index, entry) in entries.into_iter().enumerate() {
            let (file_name, original_size, result) = match entry {
                Ok(source) => {
                    let file_name = source.file_name.clone();
                    let original_size = source.len();
                    let result = self.process_entry(meeting_id, source).await;
                    (file_name, original_size, result)
                }
                Err(rejected) => (rejected.file_name, rejected.size, Err(rejected.error)),
            };

            if let Err(err) = &result {
                log_rejected(meeting_id, &file_name, err);
            }

            let outcome = EntryOutcome {
                index,
                file_name,
                original_size,
                result,
            };
            on_entry(&outcome);
            report.entries.push(outcome);
        }

        tracing::info!(
            meeting_id = %meeting_id,
            succeeded = report.success_count(),
            failed = report.failure_count(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Photo batch finished"
        );

        report
    }

    async fn recompress(&self, data: Vec<u8>) -> Result<ProcessedImage, PipelineError> {
        let recompressor = self.recompressor;
        // Decode and encode are CPU-bound; run off the async pool.
        let result = tokio::task::spawn_blocking(move || recompressor.recompress(&data))
            .await
            .map_err(|e| CompressionError::Decode(format!("image worker failed: {}", e)))?;
        Ok(result?)
    }
}

fn log_rejected(meeting_id: Uuid, file_name: &str, err: &PipelineError) {
    match err.log_level() {
        LogLevel::Debug | LogLevel::Warn => tracing::warn!(
            meeting_id = %meeting_id,
            file_name = %file_name,
            stage = err.stage(),
            error_code = err.error_code(),
            error = %err,
            "Photo entry rejected"
        ),
        LogLevel::Error => tracing::error!(
            meeting_id = %meeting_id,
            file_name = %file_name,
            stage = err.stage(),
            error_code = err.error_code(),
            error = %err,
            "Photo entry failed"
        ),
    }
}
