use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed set of roles a user can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "super_admin")]
    SuperAdmin,
    #[serde(rename = "inventory_manager")]
    InventoryManager,
    #[serde(rename = "accountant")]
    Accountant,
    #[serde(rename = "sales_rep")]
    SalesRep,
    #[serde(rename = "CSR")]
    Csr,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::SuperAdmin,
        Role::InventoryManager,
        Role::Accountant,
        Role::SalesRep,
        Role::Csr,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::InventoryManager => "inventory_manager",
            Role::Accountant => "accountant",
            Role::SalesRep => "sales_rep",
            Role::Csr => "CSR",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown role `{0}`")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == value)
            .ok_or_else(|| UnknownRole(value.to_string()))
    }
}

/// A user account as exposed to the rest of the application.
///
/// The password hash never leaves the repository layer except through
/// [`UserCredentials`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub active: bool,
    pub last_login: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

/// A user together with the stored password hash, used during login.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

/// Entry of the user directory shown to every authenticated user.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserSummary {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<User> for UserSummary {
    fn from(value: User) -> Self {
        Self {
            id: value.id,
            name: value.name,
            email: value.email,
            role: value.role,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

impl NewUser {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into().to_lowercase(),
            password_hash: password_hash.into(),
            role,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UpdateUser {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub updated_at: NaiveDateTime,
}

impl UpdateUser {
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            email: email.into().to_lowercase(),
            role,
            updated_at: chrono::Local::now().naive_utc(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_its_string_form() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
        assert_eq!(
            "admin".parse::<Role>(),
            Err(UnknownRole("admin".to_string()))
        );
    }

    #[test]
    fn csr_role_keeps_uppercase_wire_name() {
        let value = serde_json::to_value(Role::Csr).expect("serialize role");
        assert_eq!(value, serde_json::json!("CSR"));
    }

    #[test]
    fn new_user_lowercases_email() {
        let user = NewUser::new("Ann", "Ann@Example.COM", "hash", Role::SalesRep);
        assert_eq!(user.email, "ann@example.com");
    }
}
