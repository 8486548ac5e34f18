//! Primary description resolution and the post-insert fix-up.

use novel_model::{Description, DescriptionId, DescriptionOwner, NewDescription, NovelStore};
use tracing::{debug, error};

use crate::error::{RecorderError, RecorderResult};

/// Picks the canonical description of a character or relationship.
#[derive(Debug, Clone, Copy)]
pub struct PrimaryDescriptionResolver<'a> {
    store: &'a NovelStore,
}

impl<'a> PrimaryDescriptionResolver<'a> {
    pub fn new(store: &'a NovelStore) -> Self {
        Self { store }
    }

    /// The owner's description with the smallest `(sort_order, id)`.
    ///
    /// Every owner is created together with its first description, so an
    /// owner without any is reported as a data-integrity error.
    pub fn primary_description(&self, owner: DescriptionOwner) -> RecorderResult<&'a Description> {
        match self.store.descriptions_of(owner).first().copied() {
            Some(description) => Ok(description),
            None => {
                error!(?owner, "owner has no descriptions");
                Err(RecorderError::NoPrimaryDescription { owner })
            }
        }
    }

    /// Whether `description` is currently its owner's primary description,
    /// judged from the stored rows.
    pub fn compute_is_primary(&self, description: &Description) -> RecorderResult<bool> {
        let owner = description.owner()?;
        Ok(self.primary_description(owner)?.id == description.id)
    }
}

/// Bring a freshly inserted description in line with the ordering rules:
/// an unset `sort_order` becomes the description's own ID, then `is_primary`
/// is recomputed from what is stored.
///
/// Must run once, right after the insert and inside the same transaction.
pub fn finish_description_insert(store: &mut NovelStore, id: DescriptionId) -> RecorderResult<()> {
    let description = store.description_mut(id)?;
    if description.sort_order == 0 {
        description.sort_order = id.value();
    }

    let snapshot = store.description(id)?;
    let is_primary = PrimaryDescriptionResolver::new(store).compute_is_primary(snapshot)?;

    let description = store.description_mut(id)?;
    if description.is_primary != is_primary {
        description.is_primary = is_primary;
    }
    debug!(
        description = %id,
        sort_order = description.sort_order,
        is_primary,
        "description insert finished"
    );
    Ok(())
}

/// Insert a description and run the post-insert fix-up on it.
///
/// Callers wrap this in [`NovelStore::transaction`] together with whatever
/// else the unit of work writes.
pub fn insert_description(
    store: &mut NovelStore,
    new: NewDescription,
) -> RecorderResult<DescriptionId> {
    let id = store.insert_description(new)?;
    finish_description_insert(store, id)?;
    Ok(id)
}
