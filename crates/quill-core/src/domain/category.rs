//! Category record.

use crate::CategoryId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category record. Names are unique among live categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Creates an unsaved category.
    #[must_use]
    pub fn new(name: String, description: String) -> Self {
        let now = Utc::now();
        Self {
            id: CategoryId::default(),
            name,
            description,
            created_at: now,
            updated_at: now,
        }
    }
}
