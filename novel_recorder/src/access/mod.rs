//! Access control - decides who may read or write which novel entity.
//!
//! The evaluation works as follows, stopping at the first rule that applies:
//! 1. **Resolve**: Find the novel the entity belongs to
//! 2. **Level**: Look up the actor's grant on that novel (`Minimal` if none)
//! 3. **Staff**: Staff may do anything
//! 4. **Author**: The novel's author may do anything
//! 5. **Reader**: Reads are allowed on public novels or from `ViewOnly` up
//! 6. **Description writer**: Descriptions may be written by their author or
//!    from `DescriptionOnly` up
//! 7. **Co-editor**: `Coeditor` may write anything in the novel
//! 8. **Deny**

mod entity;

pub use entity::*;

use novel_model::{Actor, DescriptionOwner, Novel, NovelStore, PermissionLevel};
use tracing::debug;

use crate::error::RecorderResult;

/// The rule that settled an access decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessRule {
    Staff,
    Author,
    Reader,
    DescriptionWriter,
    // TODO: restrict co-editors to characters, relationships and descriptions
    // once grant management gets its own permission level.
    Coeditor,
    Denied,
}

impl AccessRule {
    pub fn allows(self) -> bool {
        !matches!(self, AccessRule::Denied)
    }
}

/// Evaluates access against the rows of one store.
#[derive(Debug, Clone, Copy)]
pub struct PermissionEvaluator<'a> {
    store: &'a NovelStore,
}

impl<'a> PermissionEvaluator<'a> {
    pub fn new(store: &'a NovelStore) -> Self {
        Self { store }
    }

    /// The actor's permission level on a novel.
    pub fn permission_level(&self, novel: &Novel, actor: &Actor) -> PermissionLevel {
        actor
            .user_id()
            .and_then(|user| self.store.permission(novel.id, user))
            .map(|grant| grant.level)
            .unwrap_or_default()
    }

    /// Decide whether `actor` may read (or write, if `requires_write`) `entity`.
    ///
    /// Only fails when the entity's novel cannot be resolved because the
    /// stored references are broken.
    pub fn evaluate(
        &self,
        actor: &Actor,
        requires_write: bool,
        entity: NovelEntity<'a>,
    ) -> RecorderResult<bool> {
        Ok(self.decide(actor, requires_write, entity)?.allows())
    }

    /// Like [`evaluate`](Self::evaluate), but reports which rule decided.
    pub fn decide(
        &self,
        actor: &Actor,
        requires_write: bool,
        entity: NovelEntity<'a>,
    ) -> RecorderResult<AccessRule> {
        debug_assert!(
            entity.is_stored_in(self.store),
            "PermissionEvaluator::decide called with a {} that is not a row of the evaluated store",
            entity.kind()
        );

        let novel = entity.novel(self.store)?;
        let level = self.permission_level(novel, actor);

        let rule = if actor.is_staff() {
            AccessRule::Staff
        } else if actor.is(novel.author) {
            AccessRule::Author
        } else if !requires_write && (novel.is_public || level >= PermissionLevel::ViewOnly) {
            AccessRule::Reader
        } else if entity.is_description()
            && (entity.description_author().is_some_and(|author| actor.is(author))
                || level >= PermissionLevel::DescriptionOnly)
        {
            AccessRule::DescriptionWriter
        } else if level == PermissionLevel::Coeditor {
            AccessRule::Coeditor
        } else {
            AccessRule::Denied
        };

        debug!(
            novel = %novel.id,
            entity = %entity.kind(),
            requires_write,
            ?level,
            ?rule,
            "access evaluated"
        );
        Ok(rule)
    }

    /// Decide whether `actor` may add a description to `owner`.
    ///
    /// Anyone who may write the owner may describe it; on top of that an
    /// authenticated reader holding at least `DescriptionOnly` may add
    /// descriptions to characters and relationships they cannot edit.
    pub fn can_create_description(
        &self,
        actor: &Actor,
        owner: DescriptionOwner,
    ) -> RecorderResult<bool> {
        if actor.is_anonymous() {
            return Ok(false);
        }
        let entity = NovelEntity::from_owner(self.store, owner)?;
        if self.evaluate(actor, true, entity)? {
            return Ok(true);
        }
        let novel = entity.novel(self.store)?;
        Ok(self.evaluate(actor, false, entity)?
            && self.permission_level(novel, actor) >= PermissionLevel::DescriptionOnly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use novel_model::{
        CharacterId, DescriptionId, DescriptionOwner, NewCharacter, NewDescription, NewNovel,
        NovelId, User,
    };

    struct Fixture {
        store: NovelStore,
        author: User,
        collaborator: User,
        staff: User,
        novel: NovelId,
        character: CharacterId,
        authors_note: DescriptionId,
        collaborators_note: DescriptionId,
    }

    fn fixture(is_public: bool) -> Fixture {
        let mut store = NovelStore::new();
        let author = User::new("ann", "ann@example.com");
        let collaborator = User::new("bob", "bob@example.com");
        let staff = User::new("root", "root@example.com").with_staff(true);
        for user in [&author, &collaborator, &staff] {
            store.insert_user(user.clone()).unwrap();
        }

        let novel = store
            .insert_novel(NewNovel::new(author.id, "Dune").with_public(is_public))
            .unwrap();
        let character = store
            .insert_character(NewCharacter::new(novel, "Paul"))
            .unwrap();
        let owner = DescriptionOwner::Character(character);
        let authors_note = store
            .insert_description(NewDescription::new(owner, author.id, "Heir"))
            .unwrap();
        let collaborators_note = store
            .insert_description(NewDescription::new(owner, collaborator.id, "Fremen name"))
            .unwrap();

        Fixture {
            store,
            author,
            collaborator,
            staff,
            novel,
            character,
            authors_note,
            collaborators_note,
        }
    }

    fn grant(fixture: &mut Fixture, level: PermissionLevel) {
        fixture
            .store
            .upsert_permission(fixture.novel, fixture.collaborator.id, level)
            .unwrap();
    }

    fn check(fixture: &Fixture, actor: &Actor, write: bool, entity: NovelEntity<'_>) -> bool {
        PermissionEvaluator::new(&fixture.store)
            .evaluate(actor, write, entity)
            .unwrap()
    }

    #[test]
    fn test_author_may_do_anything() {
        for is_public in [true, false] {
            let mut fx = fixture(is_public);
            // A grant on the author's own row changes nothing.
            fx.store
                .upsert_permission(fx.novel, fx.author.id, PermissionLevel::Minimal)
                .unwrap();
            let actor = Actor::from(fx.author.clone());

            let novel = NovelEntity::Novel(fx.store.novel(fx.novel).unwrap());
            let character = NovelEntity::Character(fx.store.character(fx.character).unwrap());
            for write in [false, true] {
                assert!(check(&fx, &actor, write, novel));
                assert!(check(&fx, &actor, write, character));
            }
        }
    }

    #[test]
    fn test_staff_may_do_anything() {
        let fx = fixture(false);
        let actor = Actor::from(fx.staff.clone());
        let novel = NovelEntity::Novel(fx.store.novel(fx.novel).unwrap());

        let rule = PermissionEvaluator::new(&fx.store)
            .decide(&actor, true, novel)
            .unwrap();
        assert_eq!(rule, AccessRule::Staff);
    }

    #[test]
    fn test_anonymous_reads_public_only() {
        let public = fixture(true);
        let novel = NovelEntity::Novel(public.store.novel(public.novel).unwrap());
        assert!(check(&public, &Actor::Anonymous, false, novel));
        assert!(!check(&public, &Actor::Anonymous, true, novel));

        let private = fixture(false);
        let novel = NovelEntity::Novel(private.store.novel(private.novel).unwrap());
        assert!(!check(&private, &Actor::Anonymous, false, novel));
    }

    #[test]
    fn test_view_only_reads_private_novel() {
        let mut fx = fixture(false);
        let actor = Actor::from(fx.collaborator.clone());
        {
            let novel = NovelEntity::Novel(fx.store.novel(fx.novel).unwrap());
            assert!(!check(&fx, &actor, false, novel));
        }

        grant(&mut fx, PermissionLevel::ViewOnly);
        let novel = NovelEntity::Novel(fx.store.novel(fx.novel).unwrap());
        assert!(check(&fx, &actor, false, novel));
        assert!(!check(&fx, &actor, true, novel));
    }

    #[test]
    fn test_non_description_write_requires_coeditor() {
        for level in PermissionLevel::ALL {
            let mut fx = fixture(true);
            grant(&mut fx, level);
            let actor = Actor::from(fx.collaborator.clone());
            let character = NovelEntity::Character(fx.store.character(fx.character).unwrap());
            let novel = NovelEntity::Novel(fx.store.novel(fx.novel).unwrap());

            let expected = level == PermissionLevel::Coeditor;
            assert_eq!(check(&fx, &actor, true, character), expected, "{level}");
            assert_eq!(check(&fx, &actor, true, novel), expected, "{level}");
        }
    }

    #[test]
    fn test_description_only_scenario() {
        let mut fx = fixture(false);
        grant(&mut fx, PermissionLevel::DescriptionOnly);
        let actor = Actor::from(fx.collaborator.clone());

        let character = NovelEntity::Character(fx.store.character(fx.character).unwrap());
        assert!(!check(&fx, &actor, true, character));

        let authors_note = NovelEntity::Description(fx.store.description(fx.authors_note).unwrap());
        let rule = PermissionEvaluator::new(&fx.store)
            .decide(&actor, true, authors_note)
            .unwrap();
        assert_eq!(rule, AccessRule::DescriptionWriter);
    }

    #[test]
    fn test_description_author_may_edit_own_description() {
        let fx = fixture(false);
        let actor = Actor::from(fx.collaborator.clone());

        let own = NovelEntity::Description(fx.store.description(fx.collaborators_note).unwrap());
        let others = NovelEntity::Description(fx.store.description(fx.authors_note).unwrap());
        assert!(check(&fx, &actor, true, own));
        assert!(!check(&fx, &actor, true, others));
    }

    #[test]
    fn test_description_creation_rule() {
        let mut fx = fixture(false);
        let owner = DescriptionOwner::Character(fx.character);
        let collaborator = Actor::from(fx.collaborator.clone());

        let allowed = |fx: &Fixture, actor: &Actor| {
            PermissionEvaluator::new(&fx.store)
                .can_create_description(actor, owner)
                .unwrap()
        };

        assert!(!allowed(&fx, &Actor::Anonymous));
        assert!(!allowed(&fx, &collaborator));
        assert!(allowed(&fx, &Actor::from(fx.author.clone())));

        grant(&mut fx, PermissionLevel::ViewOnly);
        assert!(!allowed(&fx, &collaborator));

        grant(&mut fx, PermissionLevel::DescriptionOnly);
        assert!(allowed(&fx, &collaborator));
    }

    #[test]
    fn test_levels_follow_grants() {
        let mut fx = fixture(true);
        let actor = Actor::from(fx.collaborator.clone());
        {
            let evaluator = PermissionEvaluator::new(&fx.store);
            let novel = fx.store.novel(fx.novel).unwrap();
            assert_eq!(evaluator.permission_level(novel, &actor), PermissionLevel::Minimal);
            assert_eq!(
                evaluator.permission_level(novel, &Actor::Anonymous),
                PermissionLevel::Minimal
            );
        }

        grant(&mut fx, PermissionLevel::Coeditor);
        let evaluator = PermissionEvaluator::new(&fx.store);
        let novel = fx.store.novel(fx.novel).unwrap();
        assert_eq!(evaluator.permission_level(novel, &actor), PermissionLevel::Coeditor);
    }
}
