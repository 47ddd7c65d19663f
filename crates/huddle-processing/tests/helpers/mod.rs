//! Shared test doubles and image fixtures.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use huddle_core::{AppError, NewPhotoRecord, PhotoRecord, PhotoSettings};
use huddle_db::{InMemoryPhotoStore, InsertRejection, PhotoStore};
use huddle_processing::{Clock, KeyClock, PhotoPipeline};
use huddle_storage::{Storage, StorageError, StorageResult};
use image::{DynamicImage, ImageFormat, RgbImage};
use uuid::Uuid;

pub const PUBLIC_BASE: &str = "https://storage.test/meeting-photos";

/// In-memory blob store with switchable failures.
pub struct MockStorage {
    files: Mutex<HashMap<String, (Vec<u8>, String)>>,
    fail_puts: AtomicBool,
    fail_removes: AtomicBool,
}

impl MockStorage {
    pub fn new() -> Self {
        Self {
            files: Mutex::new(HashMap::new()),
            fail_puts: AtomicBool::new(false),
            fail_removes: AtomicBool::new(false),
        }
    }

    pub fn fail_puts(&self, fail: bool) {
        self.fail_puts.store(fail, Ordering::SeqCst);
    }

    pub fn fail_removes(&self, fail: bool) {
        self.fail_removes.store(fail, Ordering::SeqCst);
    }

    pub fn has_file(&self, key: &str) -> bool {
        self.files.lock().unwrap().contains_key(key)
    }

    pub fn get_file(&self, key: &str) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(key).map(|(data, _)| data.clone())
    }

    pub fn content_type_of(&self, key: &str) -> Option<String> {
        self.files.lock().unwrap().get(key).map(|(_, ct)| ct.clone())
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.files.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl Default for MockStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for MockStorage {
    async fn put(&self, storage_key: &str, data: Vec<u8>, content_type: &str) -> StorageResult<()> {
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(StorageError::UploadFailed("simulated outage".to_string()));
        }
        let mut files = self.files.lock().unwrap();
        if files.contains_key(storage_key) {
            return Err(StorageError::AlreadyExists(storage_key.to_string()));
        }
        files.insert(storage_key.to_string(), (data, content_type.to_string()));
        Ok(())
    }

    fn public_url(&self, storage_key: &str) -> String {
        format!("{}/{}", PUBLIC_BASE, storage_key)
    }

    async fn remove(&self, storage_keys: &[String]) -> StorageResult<()> {
        if self.fail_removes.load(Ordering::SeqCst) {
            return Err(StorageError::DeleteFailed("simulated outage".to_string()));
        }
        let mut files = self.files.lock().unwrap();
        for key in storage_keys {
            files.remove(key);
        }
        Ok(())
    }
}

/// Metadata store whose inserts always fail with a non-limit error.
pub struct FailingPhotoStore;

#[async_trait]
impl PhotoStore for FailingPhotoStore {
    async fn insert(&self, _photo: NewPhotoRecord) -> Result<PhotoRecord, InsertRejection> {
        Err(AppError::Internal("connection refused".to_string()).into())
    }

    async fn list_for_meeting(&self, _meeting_id: Uuid) -> Result<Vec<PhotoRecord>, AppError> {
        Ok(Vec::new())
    }

    async fn get(&self, _id: Uuid) -> Result<Option<PhotoRecord>, AppError> {
        Ok(None)
    }

    async fn delete(&self, _id: Uuid) -> Result<bool, AppError> {
        Ok(false)
    }
}

/// Clock stuck at one instant.
pub struct FrozenClock(pub i64);

impl Clock for FrozenClock {
    fn now_millis(&self) -> i64 {
        self.0
    }
}

pub struct Harness {
    pub storage: Arc<MockStorage>,
    pub store: Arc<InMemoryPhotoStore>,
    pub pipeline: PhotoPipeline,
}

pub fn harness() -> Harness {
    harness_with(PhotoSettings::default(), KeyClock::system())
}

pub fn harness_with(settings: PhotoSettings, clock: KeyClock) -> Harness {
    let storage = Arc::new(MockStorage::new());
    let store = Arc::new(InMemoryPhotoStore::new());
    let pipeline = PhotoPipeline::with_clock(storage.clone(), store.clone(), settings, clock);
    Harness {
        storage,
        store,
        pipeline,
    }
}

fn gradient(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    }))
}

fn encode(img: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, format).unwrap();
    buf.into_inner()
}

pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(gradient(width, height), ImageFormat::Jpeg)
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(gradient(width, height), ImageFormat::Png)
}

/// Storage key embedded at the end of a public URL.
pub fn key_of(url: &str) -> String {
    url.strip_prefix(PUBLIC_BASE)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap()
        .to_string()
}
