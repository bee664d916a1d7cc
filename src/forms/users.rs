use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::user::{NewUser, Role, UpdateUser};
use crate::forms::sanitize_inline_text;

const NAME_MAX_LEN: u64 = 128;
const PASSWORD_MIN_LEN: u64 = 8;
const PASSWORD_MAX_LEN: u64 = 256;

pub type UserFormResult<T> = Result<T, UserFormError>;

#[derive(Debug, Error)]
pub enum UserFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("user name cannot be empty")]
    EmptyName,
}

/// Credentials submitted to the login endpoint.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

impl LoginForm {
    /// Validate and return the lowercased email with the raw password.
    pub fn into_credentials(self) -> UserFormResult<(String, String)> {
        self.validate()?;
        Ok((self.email.trim().to_lowercase(), self.password))
    }
}

/// Payload of the admin "create user" call.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = PASSWORD_MIN_LEN, max = PASSWORD_MAX_LEN))]
    pub password: String,
    pub role: Role,
}

impl CreateUserForm {
    /// Validate the payload and pair it with a hash of the submitted password.
    ///
    /// The hasher is injected so the form stays free of crypto concerns.
    pub fn into_new_user<F, E>(self, hash: F) -> UserFormResult<Result<NewUser, E>>
    where
        F: FnOnce(&str) -> Result<String, E>,
    {
        self.validate()?;
        let name = sanitize_inline_text(&self.name);
        if name.is_empty() {
            return Err(UserFormError::EmptyName);
        }
        let email = self.email.trim().to_string();
        let role = self.role;
        Ok(hash(&self.password).map(|password_hash| NewUser::new(name, email, password_hash, role)))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub role: Role,
}

impl UpdateUserForm {
    pub fn into_update_user(self) -> UserFormResult<UpdateUser> {
        self.validate()?;
        let name = sanitize_inline_text(&self.name);
        if name.is_empty() {
            return Err(UserFormError::EmptyName);
        }
        Ok(UpdateUser::new(name, self.email.trim(), self.role))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct SetPasswordForm {
    #[validate(length(min = PASSWORD_MIN_LEN, max = PASSWORD_MAX_LEN))]
    pub password: String,
}

impl SetPasswordForm {
    pub fn into_password(self) -> UserFormResult<String> {
        self.validate()?;
        Ok(self.password)
    }
}

/// `?role=` filter of the user directory.
#[derive(Debug, Default, Deserialize)]
pub struct RoleQuery {
    pub role: Option<Role>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_form(password: &str) -> CreateUserForm {
        CreateUserForm {
            name: "  Ann   Lee ".into(),
            email: "Ann@Example.com".into(),
            password: password.into(),
            role: Role::SalesRep,
        }
    }

    #[test]
    fn login_lowercases_email() {
        let form = LoginForm {
            email: "Rep@Example.COM".into(),
            password: "secret".into(),
        };
        let (email, password) = form.into_credentials().expect("valid login");
        assert_eq!(email, "rep@example.com");
        assert_eq!(password, "secret");
    }

    #[test]
    fn login_rejects_malformed_email() {
        let form = LoginForm {
            email: "not-an-email".into(),
            password: "secret".into(),
        };
        assert!(matches!(
            form.into_credentials(),
            Err(UserFormError::Validation(_))
        ));
    }

    #[test]
    fn create_user_sanitizes_and_hashes() {
        let user = create_form("long-enough")
            .into_new_user(|password| Ok::<_, ()>(format!("hashed:{password}")))
            .expect("valid form")
            .expect("hash ok");

        assert_eq!(user.name, "Ann Lee");
        assert_eq!(user.email, "ann@example.com");
        assert_eq!(user.password_hash, "hashed:long-enough");
        assert_eq!(user.role, Role::SalesRep);
    }

    #[test]
    fn short_passwords_are_rejected_before_hashing() {
        let result = create_form("short").into_new_user(|_| -> Result<String, ()> {
            panic!("hasher must not run")
        });
        assert!(matches!(result, Err(UserFormError::Validation(_))));
    }

    #[test]
    fn role_query_accepts_wire_names() {
        let query: RoleQuery = serde_json::from_str(r#"{"role":"CSR"}"#).expect("query");
        assert_eq!(query.role, Some(Role::Csr));
    }
}
