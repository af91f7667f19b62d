//! User records as delivered by the remote service.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single user record.
///
/// Only `id` and `name` are required. Everything else the service sends is
/// carried through untouched in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Service-assigned identifier.
    pub id: u64,

    /// Display name.
    pub name: String,

    /// Login handle, when the service provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Contact address, when the service provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Remaining fields of the wire object.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    /// Create a user with just the required fields.
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            username: None,
            email: None,
            extra: Map::new(),
        }
    }
}

/// An ordered sequence of users, in the order the service returned them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserList(Vec<User>);

impl UserList {
    /// The empty list a store starts with.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, User> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[User] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<User> {
        self.0
    }
}

impl From<Vec<User>> for UserList {
    fn from(users: Vec<User>) -> Self {
        Self(users)
    }
}

impl FromIterator<User> for UserList {
    fn from_iter<I: IntoIterator<Item = User>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a UserList {
    type Item = &'a User;
    type IntoIter = std::slice::Iter<'a, User>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
