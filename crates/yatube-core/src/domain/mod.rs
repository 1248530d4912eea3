//! Domain entities - the core business objects.
//!
//! Identifiers are assigned by the store. An entity whose `id` is `0` has not
//! been persisted yet: saving it inserts a row, saving it again updates.

mod comment;
mod follow;
mod group;
mod post;
mod user;

pub use comment::Comment;
pub use follow::Follow;
pub use group::Group;
pub use post::Post;
pub use user::User;

/// Identifier value of an entity that has not been saved yet.
pub const UNSAVED_ID: i64 = 0;
