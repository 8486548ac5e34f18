//! Collaborator permission levels and grants.

use serde::{Deserialize, Serialize};

use crate::entities::{NovelId, UserId};

/// Permission levels a novel's author can grant to a collaborator.
///
/// The discriminants are the persisted values and the order is load-bearing:
/// access checks compare levels with inequalities, so a new level must be
/// slotted in at the numeric position matching its strength.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "i32", into = "i32")]
#[repr(i32)]
pub enum PermissionLevel {
    #[default]
    Minimal = 0,
    ViewOnly = 1,
    DescriptionOnly = 2,
    Coeditor = 3,
}

impl PermissionLevel {
    /// All levels, weakest first.
    pub const ALL: [PermissionLevel; 4] = [
        PermissionLevel::Minimal,
        PermissionLevel::ViewOnly,
        PermissionLevel::DescriptionOnly,
        PermissionLevel::Coeditor,
    ];

    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn name(self) -> &'static str {
        match self {
            PermissionLevel::Minimal => "minimal",
            PermissionLevel::ViewOnly => "view_only",
            PermissionLevel::DescriptionOnly => "description_only",
            PermissionLevel::Coeditor => "coeditor",
        }
    }
}

/// Raised when decoding a stored level outside the known range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown permission level {0}")]
pub struct UnknownPermissionLevel(pub i32);

impl TryFrom<i32> for PermissionLevel {
    type Error = UnknownPermissionLevel;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        PermissionLevel::ALL
            .into_iter()
            .find(|level| level.as_i32() == value)
            .ok_or(UnknownPermissionLevel(value))
    }
}

impl From<PermissionLevel> for i32 {
    fn from(level: PermissionLevel) -> Self {
        level.as_i32()
    }
}

impl std::fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A grant of a permission level on one novel to one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NovelUserPermission {
    pub novel: NovelId,
    pub user: UserId,
    #[serde(rename = "permission")]
    pub level: PermissionLevel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_are_totally_ordered() {
        assert!(PermissionLevel::Minimal < PermissionLevel::ViewOnly);
        assert!(PermissionLevel::ViewOnly < PermissionLevel::DescriptionOnly);
        assert!(PermissionLevel::DescriptionOnly < PermissionLevel::Coeditor);
        assert_eq!(PermissionLevel::default(), PermissionLevel::Minimal);
    }

    #[test]
    fn test_levels_persist_as_integers() {
        for (value, level) in PermissionLevel::ALL.into_iter().enumerate() {
            assert_eq!(level.as_i32(), value as i32);
            assert_eq!(PermissionLevel::try_from(value as i32), Ok(level));
        }
        assert_eq!(serde_json::to_string(&PermissionLevel::Coeditor).unwrap(), "3");
    }

    #[test]
    fn test_unknown_level_rejected() {
        assert_eq!(PermissionLevel::try_from(4), Err(UnknownPermissionLevel(4)));
        assert!(serde_json::from_str::<PermissionLevel>("-1").is_err());
    }
}
