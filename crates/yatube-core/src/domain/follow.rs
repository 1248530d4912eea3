use serde::{Deserialize, Serialize};

use super::UNSAVED_ID;

/// Follow edge - `user` subscribes to the posts of `author`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Follow {
    pub id: i64,
    pub user_id: i64,
    pub author_id: i64,
}

impl Follow {
    pub fn new(user_id: i64, author_id: i64) -> Self {
        Self {
            id: UNSAVED_ID,
            user_id,
            author_id,
        }
    }
}
