//! Post image validation and storage.

mod local;
mod memory;
mod validate;

pub use local::LocalImageStore;
pub use memory::InMemoryImageStore;
pub use validate::detect_image;

/// Directory under the media root that holds post images.
pub const POSTS_DIR: &str = "posts";

fn image_key(extension: &str) -> String {
    format!("{POSTS_DIR}/{}.{extension}", uuid::Uuid::new_v4())
}
