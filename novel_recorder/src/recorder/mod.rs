//! The recorder service - every read and write of recorded novels goes
//! through here.
//!
//! Each operation:
//! 1. **Checks** the actor against the entity it touches
//! 2. **Validates** the submitted form
//! 3. **Writes** inside one store transaction, running any post-insert fix-up
//!    before the transaction closes
//! 4. **Returns** owned rows or read models, so callers can drop the lock

mod characters;
mod descriptions;
mod forms;
mod relationships;
mod views;

pub use forms::*;
pub use views::*;

use novel_model::{Actor, Novel, NovelId, NovelStore, NovelUserPermission, User, UserId};
use std::collections::BTreeSet;
use tracing::{info, warn};

use crate::access::{NovelEntity, PermissionEvaluator};
use crate::descriptions::PrimaryDescriptionResolver;
use crate::error::{Access, RecorderError, RecorderResult};

/// Service facade over a [`NovelStore`].
#[derive(Debug, Clone, Default)]
pub struct NovelRecorder {
    store: NovelStore,
}

impl NovelRecorder {
    pub fn new(store: NovelStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &NovelStore {
        &self.store
    }

    pub fn into_store(self) -> NovelStore {
        self.store
    }

    fn evaluator(&self) -> PermissionEvaluator<'_> {
        PermissionEvaluator::new(&self.store)
    }

    fn resolver(&self) -> PrimaryDescriptionResolver<'_> {
        PrimaryDescriptionResolver::new(&self.store)
    }

    /// Fail unless `actor` may access `entity` as requested.
    fn require(
        &self,
        actor: &Actor,
        requires_write: bool,
        entity: NovelEntity<'_>,
    ) -> RecorderResult<()> {
        if self.evaluator().evaluate(actor, requires_write, entity)? {
            return Ok(());
        }
        warn!(
            user = ?actor.user_id(),
            entity = %entity.kind(),
            requires_write,
            "access denied"
        );
        if actor.is_anonymous() {
            Err(RecorderError::LoginRequired)
        } else {
            Err(RecorderError::AccessDenied {
                kind: entity.kind(),
                access: Access::from_write(requires_write),
            })
        }
    }

    fn writable(&self, actor: &Actor, entity: NovelEntity<'_>) -> RecorderResult<bool> {
        self.evaluator().evaluate(actor, true, entity)
    }

    fn require_login(actor: &Actor) -> RecorderResult<UserId> {
        actor.user_id().ok_or(RecorderError::LoginRequired)
    }

    // Users

    /// Add a user handed over by the identity provider.
    pub fn register_user(&mut self, user: User) -> RecorderResult<UserId> {
        let id = self.store.insert_user(user)?;
        info!(user = %id, "user registered");
        Ok(id)
    }

    pub fn user(&self, id: UserId) -> RecorderResult<&User> {
        Ok(self.store.user(id)?)
    }

    // Novels

    pub fn create_novel(&mut self, actor: &Actor, draft: NovelDraft) -> RecorderResult<Novel> {
        let author = Self::require_login(actor)?;
        draft.validate()?;
        let id = self.store.insert_novel(
            novel_model::NewNovel::new(author, draft.name).with_public(draft.is_public),
        )?;
        info!(novel = %id, %author, "novel created");
        Ok(self.store.novel(id)?.clone())
    }

    pub fn update_novel(
        &mut self,
        actor: &Actor,
        id: NovelId,
        patch: NovelPatch,
    ) -> RecorderResult<Novel> {
        self.require(actor, true, NovelEntity::Novel(self.store.novel(id)?))?;
        patch.validate()?;
        self.store.transaction(|store| {
            if let Some(name) = patch.name {
                store.rename_novel(id, name)?;
            }
            if let Some(is_public) = patch.is_public {
                store.set_novel_public(id, is_public)?;
            }
            Ok::<_, RecorderError>(())
        })?;
        info!(novel = %id, "novel updated");
        Ok(self.store.novel(id)?.clone())
    }

    pub fn delete_novel(&mut self, actor: &Actor, id: NovelId) -> RecorderResult<Novel> {
        self.require(actor, true, NovelEntity::Novel(self.store.novel(id)?))?;
        let novel = self.store.delete_novel(id)?;
        info!(novel = %id, "novel deleted");
        Ok(novel)
    }

    pub fn novel(&self, actor: &Actor, id: NovelId) -> RecorderResult<Novel> {
        let novel = self.store.novel(id)?;
        self.require(actor, false, NovelEntity::Novel(novel))?;
        Ok(novel.clone())
    }

    /// The novel with its characters and their primary descriptions.
    pub fn novel_detail(&self, actor: &Actor, id: NovelId) -> RecorderResult<NovelDetail> {
        let novel = self.store.novel(id)?;
        let entity = NovelEntity::Novel(novel);
        self.require(actor, false, entity)?;
        Ok(NovelDetail {
            novel: novel.clone(),
            writable: self.writable(actor, entity)?,
            characters: self.character_cards(id)?,
        })
    }

    pub fn public_novels(&self) -> Vec<Novel> {
        self.store.public_novels().into_iter().cloned().collect()
    }

    /// Novels authored by the actor.
    pub fn my_novels(&self, actor: &Actor) -> RecorderResult<Vec<Novel>> {
        let author = Self::require_login(actor)?;
        Ok(self
            .store
            .novels_by_author(author)
            .into_iter()
            .cloned()
            .collect())
    }

    // Permissions

    /// Grant a collaborator a level on a novel, replacing any earlier grant.
    pub fn grant_permission(
        &mut self,
        actor: &Actor,
        novel: NovelId,
        grant: PermissionGrant,
    ) -> RecorderResult<NovelUserPermission> {
        self.require(actor, true, NovelEntity::Novel(self.store.novel(novel)?))?;
        self.store
            .upsert_permission(novel, grant.user, grant.permission)?;
        info!(%novel, user = %grant.user, level = %grant.permission, "permission granted");
        Ok(NovelUserPermission {
            novel,
            user: grant.user,
            level: grant.permission,
        })
    }

    pub fn revoke_permission(
        &mut self,
        actor: &Actor,
        novel: NovelId,
        user: UserId,
    ) -> RecorderResult<NovelUserPermission> {
        self.require(actor, true, NovelEntity::Novel(self.store.novel(novel)?))?;
        let revoked = self.store.remove_permission(novel, user)?;
        info!(%novel, %user, "permission revoked");
        Ok(revoked)
    }

    pub fn novel_permissions(
        &self,
        actor: &Actor,
        novel: NovelId,
    ) -> RecorderResult<Vec<NovelUserPermission>> {
        self.require(actor, true, NovelEntity::Novel(self.store.novel(novel)?))?;
        Ok(self
            .store
            .permissions_for(novel)
            .into_iter()
            .cloned()
            .collect())
    }

    // Site

    pub fn site_summary(&self) -> SiteSummary {
        let counts = self.store.counts();
        let authors: BTreeSet<UserId> = self.store.novels().iter().map(|n| n.author).collect();
        SiteSummary {
            num_novels: counts.novels,
            num_characters: counts.characters,
            num_descriptions: counts.descriptions,
            num_relationships: counts.relationships,
            num_authors: authors.len(),
        }
    }
}
