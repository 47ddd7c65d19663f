mod helpers;

use huddle_processing::{GalleryError, PhotoGallery, SourceImage};
use uuid::Uuid;

use helpers::{harness, key_of, png_bytes};

async fn seeded(count: usize) -> (helpers::Harness, PhotoGallery, Uuid) {
    let h = harness();
    let meeting_id = Uuid::new_v4();
    let sources = (0..count)
        .map(|i| SourceImage::new(format!("{i}.png"), "image/png", png_bytes(16, 16)))
        .collect();
    let report = h.pipeline.process_batch(meeting_id, sources).await;
    assert_eq!(report.success_count(), count);

    let gallery = PhotoGallery::new(h.storage.clone(), h.store.clone());
    (h, gallery, meeting_id)
}

#[tokio::test]
async fn test_list_is_newest_first() {
    let (_h, gallery, meeting_id) = seeded(3).await;

    let names: Vec<String> = gallery
        .list(meeting_id)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.file_name)
        .collect();
    assert_eq!(names, vec!["2.png", "1.png", "0.png"]);

    assert!(gallery.list(Uuid::new_v4()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_removes_blob_and_row() {
    let (h, gallery, meeting_id) = seeded(3).await;
    let photo = gallery.list(meeting_id).await.unwrap().remove(0);
    let key = key_of(&photo.photo_url);

    let deleted = gallery.delete(photo.id).await.unwrap();
    assert_eq!(deleted.id, photo.id);
    assert!(!h.storage.has_file(&key));
    assert_eq!(h.store.count_for_meeting(meeting_id), 2);

    // A slot is free again.
    let record = h
        .pipeline
        .process_entry(meeting_id, SourceImage::new("new.png", "image/png", png_bytes(8, 8)))
        .await;
    assert!(record.is_ok());
}

#[tokio::test]
async fn test_blob_removal_failure_keeps_the_row() {
    let (h, gallery, meeting_id) = seeded(1).await;
    let photo = gallery.list(meeting_id).await.unwrap().remove(0);
    h.storage.fail_removes(true);

    let err = gallery.delete(photo.id).await.unwrap_err();
    assert!(matches!(err, GalleryError::Storage(_)));
    assert_eq!(h.store.count_for_meeting(meeting_id), 1);
}

#[tokio::test]
async fn test_delete_unknown_photo() {
    let (_h, gallery, _) = seeded(0).await;
    let id = Uuid::new_v4();
    let err = gallery.delete(id).await.unwrap_err();
    assert!(matches!(err, GalleryError::NotFound(missing) if missing == id));
}

