use serde::{Deserialize, Serialize};

use crate::domain::user::{Role, User};

/// The actor behind the current request, resolved from a verified token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl AuthenticatedUser {
    pub fn is_super_admin(&self) -> bool {
        self.role == Role::SuperAdmin
    }
}

impl From<User> for AuthenticatedUser {
    fn from(value: User) -> Self {
        Self {
            id: value.id,
            name: value.name,
            email: value.email,
            role: value.role,
        }
    }
}
