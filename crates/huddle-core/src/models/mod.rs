pub mod photo;

pub use photo::{NewPhotoRecord, PhotoRecord};
