//! Request forms for descriptions.

use novel_model::{CharacterId, DescriptionOwner, RelationshipId};
use serde::{Deserialize, Serialize};

use crate::error::{RecorderError, RecorderResult};
use crate::validation::check_name;

/// A description as submitted for creation.
///
/// Both owner links are optional on the wire; [`validate`](Self::validate)
/// insists on exactly one of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptionDraft {
    #[serde(default)]
    pub character: Option<CharacterId>,
    #[serde(default)]
    pub relationship: Option<RelationshipId>,
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl DescriptionDraft {
    pub fn for_owner(owner: DescriptionOwner, title: impl Into<String>) -> Self {
        let (character, relationship) = match owner {
            DescriptionOwner::Character(id) => (Some(id), None),
            DescriptionOwner::Relationship(id) => (None, Some(id)),
        };
        Self {
            character,
            relationship,
            title: title.into(),
            content: String::new(),
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Check the form and return the owner it links to.
    pub fn validate(&self) -> RecorderResult<DescriptionOwner> {
        let owner = match (self.character, self.relationship) {
            (Some(character), None) => DescriptionOwner::Character(character),
            (None, Some(relationship)) => DescriptionOwner::Relationship(relationship),
            (None, None) => {
                return Err(RecorderError::validation(
                    "owner",
                    "This description is not linked to either a character or a relationship",
                ))
            }
            (Some(_), Some(_)) => {
                return Err(RecorderError::validation(
                    "owner",
                    "This description is linked to both character and relationship",
                ))
            }
        };
        check_name("title", &self.title)?;
        Ok(owner)
    }
}

/// A partial update of a description. Owner and author cannot change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptionPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl DescriptionPatch {
    pub fn validate(&self) -> RecorderResult<()> {
        if let Some(title) = &self.title {
            check_name("title", title)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exactly_one_owner() {
        let on_character =
            DescriptionDraft::for_owner(DescriptionOwner::Character(CharacterId(1)), "Heir");
        assert_eq!(
            on_character.validate().unwrap(),
            DescriptionOwner::Character(CharacterId(1))
        );

        let neither = DescriptionDraft {
            title: "Loose".into(),
            ..Default::default()
        };
        let err = neither.validate().unwrap_err();
        assert!(err.to_string().contains("not linked to either"));

        let both = DescriptionDraft {
            character: Some(CharacterId(1)),
            relationship: Some(RelationshipId(1)),
            title: "Greedy".into(),
            content: String::new(),
        };
        let err = both.validate().unwrap_err();
        assert!(matches!(err, RecorderError::Validation { field: "owner", .. }));
        assert!(err.to_string().contains("both"));
    }

    #[test]
    fn test_blank_title_rejected() {
        let draft =
            DescriptionDraft::for_owner(DescriptionOwner::Relationship(RelationshipId(2)), " ");
        assert!(matches!(
            draft.validate(),
            Err(RecorderError::Validation { field: "title", .. })
        ));
    }

    #[test]
    fn test_draft_decodes_without_optional_fields() {
        let draft: DescriptionDraft =
            serde_json::from_str(r#"{"relationship": 3, "title": "Rivals"}"#).unwrap();
        assert_eq!(draft.relationship, Some(RelationshipId(3)));
        assert!(draft.character.is_none());
        assert!(draft.content.is_empty());
    }

    #[test]
    fn test_patch_validation() {
        assert!(DescriptionPatch::default().validate().is_ok());
        let blank = DescriptionPatch {
            title: Some(String::new()),
            content: None,
        };
        assert!(blank.validate().is_err());
    }
}
