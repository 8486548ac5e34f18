//! The relational store - tables of every recorded entity plus the rules
//! that keep them consistent.
//!
//! Constraints enforced here:
//! - uniqueness of (author, name) for novels, (novel, name) for characters and
//!   (character1, character2) for relationships;
//! - protect-on-delete for novels with characters and characters referenced
//!   by relationships;
//! - cascade-on-delete for descriptions of a deleted owner and for grants of a
//!   deleted novel.

mod error;
mod snapshot;

pub use error::*;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::entities::{
    Character, CharacterId, Description, DescriptionId, DescriptionOwner, EntityKind,
    NewCharacter, NewDescription, NewNovel, NewRelationship, Novel, NovelId, Relationship,
    RelationshipId, User, UserId,
};
use crate::permissions::{NovelUserPermission, PermissionLevel};

/// Identity sequences, one per table. Values are never reused.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Sequences {
    novel: i64,
    character: i64,
    relationship: i64,
    description: i64,
}

fn next(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

/// Row counts per table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TableCounts {
    pub users: usize,
    pub novels: usize,
    pub characters: usize,
    pub relationships: usize,
    pub descriptions: usize,
    pub permissions: usize,
}

/// All stored rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NovelStore {
    sequences: Sequences,
    users: BTreeMap<UserId, User>,
    novels: BTreeMap<NovelId, Novel>,
    characters: BTreeMap<CharacterId, Character>,
    relationships: BTreeMap<RelationshipId, Relationship>,
    descriptions: BTreeMap<DescriptionId, Description>,
    #[serde(default)]
    permissions: Vec<NovelUserPermission>,
}

impl NovelStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` as one unit of work: if it fails, every change it made is
    /// rolled back.
    pub fn transaction<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self) -> Result<T, E>,
    {
        let checkpoint = self.clone();
        let result = f(self);
        if result.is_err() {
            *self = checkpoint;
        }
        result
    }

    pub fn counts(&self) -> TableCounts {
        TableCounts {
            users: self.users.len(),
            novels: self.novels.len(),
            characters: self.characters.len(),
            relationships: self.relationships.len(),
            descriptions: self.descriptions.len(),
            permissions: self.permissions.len(),
        }
    }

    // Users

    /// Register a user. Usernames are unique.
    pub fn insert_user(&mut self, user: User) -> StoreResult<UserId> {
        if self.users.contains_key(&user.id) {
            return Err(StoreError::UniqueViolation {
                constraint: "user.id",
            });
        }
        if self.users.values().any(|u| u.username == user.username) {
            return Err(StoreError::UniqueViolation {
                constraint: "user.username",
            });
        }
        let id = user.id;
        self.users.insert(id, user);
        Ok(id)
    }

    pub fn user(&self, id: UserId) -> StoreResult<&User> {
        self.users
            .get(&id)
            .ok_or_else(|| StoreError::not_found(EntityKind::User, id))
    }

    // Novels

    pub fn insert_novel(&mut self, new: NewNovel) -> StoreResult<NovelId> {
        self.user(new.author)?;
        self.check_novel_name(new.author, &new.name, None)?;
        let id = NovelId(next(&mut self.sequences.novel));
        self.novels.insert(
            id,
            Novel {
                id,
                author: new.author,
                name: new.name,
                is_public: new.is_public,
            },
        );
        Ok(id)
    }

    pub fn novel(&self, id: NovelId) -> StoreResult<&Novel> {
        self.novels
            .get(&id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Novel, id))
    }

    pub fn rename_novel(&mut self, id: NovelId, name: impl Into<String>) -> StoreResult<()> {
        let name = name.into();
        let author = self.novel(id)?.author;
        self.check_novel_name(author, &name, Some(id))?;
        if let Some(novel) = self.novels.get_mut(&id) {
            novel.name = name;
        }
        Ok(())
    }

    pub fn set_novel_public(&mut self, id: NovelId, is_public: bool) -> StoreResult<()> {
        let novel = self
            .novels
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Novel, id))?;
        novel.is_public = is_public;
        Ok(())
    }

    fn check_novel_name(
        &self,
        author: UserId,
        name: &str,
        except: Option<NovelId>,
    ) -> StoreResult<()> {
        let taken = self
            .novels
            .values()
            .any(|n| n.author == author && n.name == name && Some(n.id) != except);
        if taken {
            return Err(StoreError::UniqueViolation {
                constraint: "novel(author, name)",
            });
        }
        Ok(())
    }

    /// All novels ordered by name.
    pub fn novels(&self) -> Vec<&Novel> {
        self.sorted_novels(|_| true)
    }

    pub fn public_novels(&self) -> Vec<&Novel> {
        self.sorted_novels(|n| n.is_public)
    }

    pub fn novels_by_author(&self, author: UserId) -> Vec<&Novel> {
        self.sorted_novels(|n| n.author == author)
    }

    fn sorted_novels<F>(&self, predicate: F) -> Vec<&Novel>
    where
        F: Fn(&Novel) -> bool,
    {
        let mut novels: Vec<_> = self.novels.values().filter(|n| predicate(*n)).collect();
        novels.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        novels
    }

    /// Remove a novel that has no characters left. Grants on it cascade.
    pub fn delete_novel(&mut self, id: NovelId) -> StoreResult<Novel> {
        self.novel(id)?;
        if self.characters.values().any(|c| c.novel == id) {
            return Err(StoreError::protected(
                EntityKind::Novel,
                id,
                EntityKind::Character,
            ));
        }
        self.permissions.retain(|p| p.novel != id);
        self.novels
            .remove(&id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Novel, id))
    }

    // Characters

    pub fn insert_character(&mut self, new: NewCharacter) -> StoreResult<CharacterId> {
        self.novel(new.novel)?;
        self.check_character_name(new.novel, &new.name, None)?;
        let id = CharacterId(next(&mut self.sequences.character));
        self.characters.insert(
            id,
            Character {
                id,
                novel: new.novel,
                name: new.name,
            },
        );
        Ok(id)
    }

    pub fn character(&self, id: CharacterId) -> StoreResult<&Character> {
        self.characters
            .get(&id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Character, id))
    }

    pub fn rename_character(
        &mut self,
        id: CharacterId,
        name: impl Into<String>,
    ) -> StoreResult<()> {
        let name = name.into();
        let novel = self.character(id)?.novel;
        self.check_character_name(novel, &name, Some(id))?;
        if let Some(character) = self.characters.get_mut(&id) {
            character.name = name;
        }
        Ok(())
    }

    fn check_character_name(
        &self,
        novel: NovelId,
        name: &str,
        except: Option<CharacterId>,
    ) -> StoreResult<()> {
        let taken = self
            .characters
            .values()
            .any(|c| c.novel == novel && c.name == name && Some(c.id) != except);
        if taken {
            return Err(StoreError::UniqueViolation {
                constraint: "character(novel, name)",
            });
        }
        Ok(())
    }

    /// Characters of a novel ordered by name.
    pub fn characters_of(&self, novel: NovelId) -> Vec<&Character> {
        let mut characters: Vec<_> = self
            .characters
            .values()
            .filter(|c| c.novel == novel)
            .collect();
        characters.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        characters
    }

    /// Remove a character no relationship refers to. Its descriptions cascade.
    pub fn delete_character(&mut self, id: CharacterId) -> StoreResult<Character> {
        self.character(id)?;
        if self.relationships.values().any(|r| r.involves(id)) {
            return Err(StoreError::protected(
                EntityKind::Character,
                id,
                EntityKind::Relationship,
            ));
        }
        self.descriptions.retain(|_, d| d.character != Some(id));
        self.characters
            .remove(&id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Character, id))
    }

    // Relationships

    pub fn insert_relationship(&mut self, new: NewRelationship) -> StoreResult<RelationshipId> {
        self.character(new.character1)?;
        self.character(new.character2)?;
        let taken = self
            .relationships
            .values()
            .any(|r| r.character1 == new.character1 && r.character2 == new.character2);
        if taken {
            return Err(StoreError::UniqueViolation {
                constraint: "relationship(character1, character2)",
            });
        }
        let id = RelationshipId(next(&mut self.sequences.relationship));
        self.relationships.insert(
            id,
            Relationship {
                id,
                character1: new.character1,
                character2: new.character2,
            },
        );
        Ok(id)
    }

    pub fn relationship(&self, id: RelationshipId) -> StoreResult<&Relationship> {
        self.relationships
            .get(&id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Relationship, id))
    }

    /// Relationships leaving `character1`, ordered by target.
    pub fn relationships_from(&self, character1: CharacterId) -> Vec<&Relationship> {
        let mut relationships: Vec<_> = self
            .relationships
            .values()
            .filter(|r| r.character1 == character1)
            .collect();
        relationships.sort_by_key(|r| (r.character2, r.id));
        relationships
    }

    /// Remove a relationship. Its descriptions cascade.
    pub fn delete_relationship(&mut self, id: RelationshipId) -> StoreResult<Relationship> {
        let relationship = self
            .relationships
            .remove(&id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Relationship, id))?;
        self.descriptions.retain(|_, d| d.relationship != Some(id));
        Ok(relationship)
    }

    // Descriptions

    /// Insert a description. `sort_order` and `is_primary` are stored as
    /// given; the caller runs the post-insert fix-up.
    pub fn insert_description(&mut self, new: NewDescription) -> StoreResult<DescriptionId> {
        self.user(new.author)?;
        let (character, relationship) = match new.owner {
            DescriptionOwner::Character(id) => {
                self.character(id)?;
                (Some(id), None)
            }
            DescriptionOwner::Relationship(id) => {
                self.relationship(id)?;
                (None, Some(id))
            }
        };
        let id = DescriptionId(next(&mut self.sequences.description));
        let now = Utc::now();
        self.descriptions.insert(
            id,
            Description {
                id,
                character,
                relationship,
                author: new.author,
                title: new.title,
                content: new.content,
                sort_order: new.sort_order,
                is_primary: false,
                time_created: now,
                time_modified: now,
            },
        );
        Ok(id)
    }

    pub fn description(&self, id: DescriptionId) -> StoreResult<&Description> {
        self.descriptions
            .get(&id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Description, id))
    }

    /// Raw mutable access to a stored description. No constraint is checked.
    pub fn description_mut(&mut self, id: DescriptionId) -> StoreResult<&mut Description> {
        self.descriptions
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Description, id))
    }

    /// Replace title and/or content and bump the modification time.
    pub fn update_description_text(
        &mut self,
        id: DescriptionId,
        title: Option<String>,
        content: Option<String>,
    ) -> StoreResult<()> {
        let description = self.description_mut(id)?;
        if let Some(title) = title {
            description.title = title;
        }
        if let Some(content) = content {
            description.content = content;
        }
        description.time_modified = Utc::now();
        Ok(())
    }

    /// Descriptions of an owner ordered by `(sort_order, id)`.
    pub fn descriptions_of(&self, owner: DescriptionOwner) -> Vec<&Description> {
        let mut descriptions: Vec<_> = self
            .descriptions
            .values()
            .filter(|d| d.belongs_to(owner))
            .collect();
        descriptions.sort_by_key(|d| d.sort_key());
        descriptions
    }

    pub fn delete_description(&mut self, id: DescriptionId) -> StoreResult<Description> {
        self.descriptions
            .remove(&id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Description, id))
    }

    // Permissions

    pub fn permission(&self, novel: NovelId, user: UserId) -> Option<&NovelUserPermission> {
        self.permissions
            .iter()
            .find(|p| p.novel == novel && p.user == user)
    }

    /// Grant `level` to `user` on `novel`, replacing any earlier grant.
    pub fn upsert_permission(
        &mut self,
        novel: NovelId,
        user: UserId,
        level: PermissionLevel,
    ) -> StoreResult<()> {
        self.novel(novel)?;
        self.user(user)?;
        match self
            .permissions
            .iter_mut()
            .find(|p| p.novel == novel && p.user == user)
        {
            Some(existing) => existing.level = level,
            None => self.permissions.push(NovelUserPermission { novel, user, level }),
        }
        Ok(())
    }

    pub fn remove_permission(
        &mut self,
        novel: NovelId,
        user: UserId,
    ) -> StoreResult<NovelUserPermission> {
        let position = self
            .permissions
            .iter()
            .position(|p| p.novel == novel && p.user == user)
            .ok_or_else(|| {
                StoreError::not_found(EntityKind::Permission, format!("{novel}/{user}"))
            })?;
        Ok(self.permissions.remove(position))
    }

    pub fn permissions_for(&self, novel: NovelId) -> Vec<&NovelUserPermission> {
        self.permissions.iter().filter(|p| p.novel == novel).collect()
    }
}
