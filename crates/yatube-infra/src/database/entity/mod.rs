//! SeaORM entities mirroring the tables created by the `migration` app.

pub mod comment;
pub mod follow;
pub mod group;
pub mod post;
pub mod user;

use sea_orm::ActiveValue::{self, NotSet, Set};
use yatube_core::domain::UNSAVED_ID;

/// Unsaved domain ids leave the key to the database sequence.
pub(crate) fn key(id: i64) -> ActiveValue<i64> {
    if id == UNSAVED_ID { NotSet } else { Set(id) }
}
