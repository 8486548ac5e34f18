//! Users and request principals.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier handed out by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Create a new random user ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for UserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    /// Staff users bypass every novel permission check.
    #[serde(default)]
    pub is_staff: bool,
}

impl User {
    /// Create a non-staff user with a fresh ID.
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: UserId::new(),
            username: username.into(),
            email: email.into(),
            is_staff: false,
        }
    }

    /// Mark the user as staff.
    pub fn with_staff(mut self, is_staff: bool) -> Self {
        self.is_staff = is_staff;
        self
    }
}

/// The principal a request is made on behalf of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Actor {
    Anonymous,
    User(User),
}

impl Actor {
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Actor::Anonymous)
    }

    pub fn is_staff(&self) -> bool {
        match self {
            Actor::Anonymous => false,
            Actor::User(user) => user.is_staff,
        }
    }

    /// The user ID, or `None` for anonymous actors.
    pub fn user_id(&self) -> Option<UserId> {
        match self {
            Actor::Anonymous => None,
            Actor::User(user) => Some(user.id),
        }
    }

    /// Check whether this actor is the given user.
    pub fn is(&self, user: UserId) -> bool {
        self.user_id() == Some(user)
    }
}

impl From<User> for Actor {
    fn from(user: User) -> Self {
        Actor::User(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_actor() {
        let actor = Actor::Anonymous;
        assert!(actor.is_anonymous());
        assert!(!actor.is_staff());
        assert!(actor.user_id().is_none());
        assert!(!actor.is(UserId::new()));
    }

    #[test]
    fn test_user_actor() {
        let user = User::new("ann", "ann@example.com").with_staff(true);
        let id = user.id;
        let actor = Actor::from(user);

        assert!(!actor.is_anonymous());
        assert!(actor.is_staff());
        assert!(actor.is(id));
    }

    #[test]
    fn test_user_id_parse() {
        let id = UserId::new();
        let parsed: UserId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-a-uuid".parse::<UserId>().is_err());
    }
}
