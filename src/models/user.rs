use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::user::{
    NewUser as DomainNewUser, Role, UpdateUser as DomainUpdateUser, User as DomainUser,
    UserCredentials,
};
use crate::repository::errors::RepositoryError;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::users)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub active: bool,
    pub last_login: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::users)]
pub struct UpdateUser<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub role: &'a str,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<User> for DomainUser {
    type Error = RepositoryError;

    fn try_from(value: User) -> Result<Self, Self::Error> {
        let role = value
            .role
            .parse::<Role>()
            .map_err(|err| RepositoryError::InvalidData(format!("user {}: {err}", value.id)))?;

        Ok(Self {
            id: value.id,
            name: value.name,
            email: value.email,
            role,
            active: value.active,
            last_login: value.last_login,
            created_at: value.created_at,
        })
    }
}

impl TryFrom<User> for UserCredentials {
    type Error = RepositoryError;

    fn try_from(mut value: User) -> Result<Self, Self::Error> {
        let password_hash = std::mem::take(&mut value.password_hash);
        Ok(Self {
            user: value.try_into()?,
            password_hash,
        })
    }
}

impl<'a> From<&'a DomainNewUser> for NewUser<'a> {
    fn from(value: &'a DomainNewUser) -> Self {
        Self {
            name: value.name.as_str(),
            email: value.email.as_str(),
            password_hash: value.password_hash.as_str(),
            role: value.role.as_str(),
        }
    }
}

impl<'a> From<&'a DomainUpdateUser> for UpdateUser<'a> {
    fn from(value: &'a DomainUpdateUser) -> Self {
        Self {
            name: value.name.as_str(),
            email: value.email.as_str(),
            role: value.role.as_str(),
            updated_at: value.updated_at,
        }
    }
}
