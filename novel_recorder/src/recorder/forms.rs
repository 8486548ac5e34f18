//! Request forms for novels, characters, relationships and grants.

use novel_model::{CharacterId, NovelId, PermissionLevel, UserId};
use serde::{Deserialize, Serialize};

use crate::error::RecorderResult;
use crate::validation::check_name;

fn default_public() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NovelDraft {
    pub name: String,
    #[serde(default = "default_public")]
    pub is_public: bool,
}

impl NovelDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_public: true,
        }
    }

    pub fn private(mut self) -> Self {
        self.is_public = false;
        self
    }

    pub fn validate(&self) -> RecorderResult<()> {
        check_name("name", &self.name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NovelPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub is_public: Option<bool>,
}

impl NovelPatch {
    pub fn validate(&self) -> RecorderResult<()> {
        match &self.name {
            Some(name) => check_name("name", name),
            None => Ok(()),
        }
    }
}

/// A character together with its first description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterDraft {
    pub novel: NovelId,
    pub name: String,
    #[serde(alias = "des_title")]
    pub description_title: String,
    #[serde(default, alias = "des_content")]
    pub description_content: String,
}

impl CharacterDraft {
    pub fn new(
        novel: NovelId,
        name: impl Into<String>,
        description_title: impl Into<String>,
    ) -> Self {
        Self {
            novel,
            name: name.into(),
            description_title: description_title.into(),
            description_content: String::new(),
        }
    }

    pub fn with_description_content(mut self, content: impl Into<String>) -> Self {
        self.description_content = content.into();
        self
    }

    pub fn validate(&self) -> RecorderResult<()> {
        check_name("name", &self.name)?;
        check_name("description_title", &self.description_title)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterPatch {
    pub name: String,
}

/// A relationship together with its first description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipDraft {
    pub character1: CharacterId,
    pub character2: CharacterId,
    #[serde(alias = "des_title")]
    pub description_title: String,
    #[serde(default, alias = "des_content")]
    pub description_content: String,
}

impl RelationshipDraft {
    pub fn new(
        character1: CharacterId,
        character2: CharacterId,
        description_title: impl Into<String>,
    ) -> Self {
        Self {
            character1,
            character2,
            description_title: description_title.into(),
            description_content: String::new(),
        }
    }

    pub fn with_description_content(mut self, content: impl Into<String>) -> Self {
        self.description_content = content.into();
        self
    }

    pub fn validate(&self) -> RecorderResult<()> {
        check_name("description_title", &self.description_title)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionGrant {
    pub user: UserId,
    pub permission: PermissionLevel,
}
