//! Novel definitions.

use serde::{Deserialize, Serialize};

use super::{NovelId, UserId};

/// A novel owned by exactly one author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Novel {
    pub id: NovelId,
    pub author: UserId,
    pub name: String,
    pub is_public: bool,
}

/// Fields needed to insert a novel. The store assigns the ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNovel {
    pub author: UserId,
    pub name: String,
    #[serde(default = "default_public")]
    pub is_public: bool,
}

fn default_public() -> bool {
    true
}

impl NewNovel {
    /// A public novel with the given author and name.
    pub fn new(author: UserId, name: impl Into<String>) -> Self {
        Self {
            author,
            name: name.into(),
            is_public: true,
        }
    }

    /// Set the public flag.
    pub fn with_public(mut self, is_public: bool) -> Self {
        self.is_public = is_public;
        self
    }
}
