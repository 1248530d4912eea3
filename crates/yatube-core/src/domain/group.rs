use serde::{Deserialize, Serialize};

use super::UNSAVED_ID;

/// Group entity - a named category posts may belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl Group {
    pub fn new(title: String, slug: String, description: String) -> Self {
        Self {
            id: UNSAVED_ID,
            title,
            slug,
            description,
        }
    }
}
