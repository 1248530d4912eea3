use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UNSAVED_ID;

/// Post entity - a single authored text entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    /// Path of the stored image, relative to the media root.
    pub image: Option<String>,
    pub author_id: i64,
    pub group_id: Option<i64>,
}

impl Post {
    /// Create a new post published now.
    pub fn new(author_id: i64, text: String, group_id: Option<i64>, image: Option<String>) -> Self {
        Self {
            id: UNSAVED_ID,
            text,
            pub_date: Utc::now(),
            image,
            author_id,
            group_id,
        }
    }

    pub fn is_authored_by(&self, user_id: i64) -> bool {
        self.author_id == user_id
    }
}
