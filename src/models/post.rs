use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::UserRecord;

/// Post aggregate. Author display fields are snapshots taken at creation
/// time and never re-synced against the user record; a renamed user keeps
/// their old name on existing posts. This staleness is deliberate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub author: Uuid,
    pub author_name: String,
    pub author_avatar: Option<String>,
    pub text: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub likes: Vec<Like>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Post {
    pub fn new(author: &UserRecord, text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            author: author.id,
            author_name: author.name.clone(),
            author_avatar: author.avatar.clone(),
            text,
            created_at: Utc::now(),
            likes: Vec::new(),
            comments: Vec::new(),
        }
    }
}

/// One like by one user. The service enforces at most one entry per user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Like {
    pub user: Uuid,
}

/// Comment embedded in a post, with the same copy-on-create author snapshot
/// as the post itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub author: Uuid,
    pub author_name: String,
    pub author_avatar: Option<String>,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(author: &UserRecord, text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            author: author.id,
            author_name: author.name.clone(),
            author_avatar: author.avatar.clone(),
            text,
            created_at: Utc::now(),
        }
    }
}
