//! Login, the user directory and super_admin account management.

use crate::access::{Action, require};
use crate::auth::{TokenKeys, hash_password, verify_password};
use crate::domain::{
    auth::AuthenticatedUser,
    user::{User, UserSummary},
};
use crate::forms::users::{
    CreateUserForm, LoginForm, RoleQuery, SetPasswordForm, UpdateUserForm,
};
use crate::repository::{UserReader, UserWriter};
use crate::services::{ServiceError, ServiceResult};

/// Successful login: the signed token and the account it belongs to.
#[derive(Debug)]
pub struct LoginOutcome {
    pub token: String,
    pub user: User,
}

/// Verify credentials, stamp the login time and issue an access token.
pub fn login<R>(repo: &R, keys: &TokenKeys, form: LoginForm) -> ServiceResult<LoginOutcome>
where
    R: UserReader + UserWriter + ?Sized,
{
    let (email, password) = form.into_credentials().map_err(ServiceError::invalid)?;

    let Some(credentials) = repo.get_user_credentials(&email)? else {
        log::info!("Login failed for unknown email {email}");
        return Err(ServiceError::Unauthorized);
    };

    if !verify_password(&password, &credentials.password_hash) {
        log::info!("Login failed for user {}", credentials.user.id);
        return Err(ServiceError::Unauthorized);
    }

    let mut user = credentials.user;
    if !user.active {
        return Err(ServiceError::Forbidden("account is deactivated".to_string()));
    }

    let now = chrono::Local::now().naive_utc();
    repo.record_login(user.id, now)?;
    user.last_login = Some(now);

    let token = keys.issue(&user).map_err(ServiceError::internal)?;
    log::info!("User {} logged in", user.id);

    Ok(LoginOutcome { token, user })
}

/// Full record of the acting user.
pub fn current_user<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<User>
where
    R: UserReader + ?Sized,
{
    repo.get_user_by_id(user.id)?
        .ok_or_else(|| ServiceError::not_found("user"))
}

/// Directory entries visible to every authenticated user.
pub fn list_directory<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: RoleQuery,
) -> ServiceResult<Vec<UserSummary>>
where
    R: UserReader + ?Sized,
{
    require(user, Action::ReadUserDirectory)?;

    let users = repo.list_users(query.role)?;
    Ok(users.into_iter().map(UserSummary::from).collect())
}

pub fn list_accounts<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<Vec<User>>
where
    R: UserReader + ?Sized,
{
    require(user, Action::ManageUsers)?;
    Ok(repo.list_users(None)?)
}

pub fn create_account<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: CreateUserForm,
) -> ServiceResult<User>
where
    R: UserWriter + ?Sized,
{
    require(user, Action::ManageUsers)?;

    let new_user = form
        .into_new_user(hash_password)
        .map_err(ServiceError::invalid)?
        .map_err(ServiceError::internal)?;

    let created = repo.create_user(&new_user)?;
    log::info!("User {} created account {}", user.id, created.id);
    Ok(created)
}

pub fn update_account<R>(
    repo: &R,
    user: &AuthenticatedUser,
    user_id: i32,
    form: UpdateUserForm,
) -> ServiceResult<User>
where
    R: UserWriter + ?Sized,
{
    require(user, Action::ManageUsers)?;

    let updates = form.into_update_user().map_err(ServiceError::invalid)?;
    Ok(repo.update_user(user_id, &updates)?)
}

pub fn delete_account<R>(repo: &R, user: &AuthenticatedUser, user_id: i32) -> ServiceResult<()>
where
    R: UserWriter + ?Sized,
{
    require(user, Action::ManageUsers)?;

    if user_id == user.id {
        return Err(ServiceError::invalid("you cannot delete your own account"));
    }

    repo.delete_user(user_id)?;
    log::info!("User {} deleted account {user_id}", user.id);
    Ok(())
}

pub fn set_password<R>(
    repo: &R,
    user: &AuthenticatedUser,
    user_id: i32,
    form: SetPasswordForm,
) -> ServiceResult<()>
where
    R: UserWriter + ?Sized,
{
    require(user, Action::ManageUsers)?;

    let password = form.into_password().map_err(ServiceError::invalid)?;
    let password_hash = hash_password(&password).map_err(ServiceError::internal)?;
    repo.set_password_hash(user_id, &password_hash)?;
    Ok(())
}

/// Activate or deactivate an account. Deactivated users cannot log in and
/// their outstanding tokens stop working.
pub fn set_active<R>(
    repo: &R,
    user: &AuthenticatedUser,
    user_id: i32,
    active: bool,
) -> ServiceResult<User>
where
    R: UserWriter + ?Sized,
{
    require(user, Action::ManageUsers)?;

    if !active && user_id == user.id {
        return Err(ServiceError::invalid("you cannot deactivate your own account"));
    }

    let updated = repo.set_user_active(user_id, active)?;
    log::info!(
        "User {} set account {user_id} active={active}",
        user.id
    );
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::{Role, UserCredentials};
    use crate::repository::mock::MockRepository;
    use chrono::NaiveDateTime;

    fn account(id: i32, role: Role, active: bool) -> User {
        User {
            id,
            name: format!("user {id}"),
            email: format!("user{id}@example.com"),
            role,
            active,
            last_login: None,
            created_at: NaiveDateTime::default(),
        }
    }

    fn actor(role: Role) -> AuthenticatedUser {
        account(1, role, true).into()
    }

    fn login_form(password: &str) -> LoginForm {
        LoginForm {
            email: "User2@Example.com".into(),
            password: password.into(),
        }
    }

    fn repo_with_credentials(active: bool) -> MockRepository {
        let hash = hash_password("correct horse").expect("hash");
        let mut repo = MockRepository::new();
        repo.expect_get_user_credentials()
            .withf(|email| email == "user2@example.com")
            .returning(move |_| {
                Ok(Some(UserCredentials {
                    user: account(2, Role::SalesRep, active),
                    password_hash: hash.clone(),
                }))
            });
        repo
    }

    #[test]
    fn login_issues_token_and_stamps_last_login() {
        let keys = TokenKeys::new("secret", 1);
        let mut repo = repo_with_credentials(true);
        repo.expect_record_login()
            .withf(|id, _| *id == 2)
            .times(1)
            .returning(|_, _| Ok(()));

        let outcome = login(&repo, &keys, login_form("correct horse")).expect("login");

        assert_eq!(outcome.user.id, 2);
        assert!(outcome.user.last_login.is_some());
        assert_eq!(keys.decode(&outcome.token).expect("claims").sub, 2);
    }

    #[test]
    fn wrong_password_is_unauthorized() {
        let keys = TokenKeys::new("secret", 1);
        let mut repo = repo_with_credentials(true);
        repo.expect_record_login().never();

        let result = login(&repo, &keys, login_form("battery staple"));
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn deactivated_account_is_forbidden() {
        let keys = TokenKeys::new("secret", 1);
        let mut repo = repo_with_credentials(false);
        repo.expect_record_login().never();

        let result = login(&repo, &keys, login_form("correct horse"));
        assert!(matches!(result, Err(ServiceError::Forbidden(_))));
    }

    #[test]
    fn unknown_email_is_unauthorized() {
        let keys = TokenKeys::new("secret", 1);
        let mut repo = MockRepository::new();
        repo.expect_get_user_credentials().returning(|_| Ok(None));

        let result = login(&repo, &keys, login_form("whatever"));
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn directory_is_filtered_by_role() {
        let mut repo = MockRepository::new();
        repo.expect_list_users()
            .withf(|role| *role == Some(Role::Accountant))
            .returning(|_| Ok(vec![account(5, Role::Accountant, true)]));

        let users = list_directory(
            &repo,
            &actor(Role::Csr),
            RoleQuery {
                role: Some(Role::Accountant),
            },
        )
        .expect("directory");

        assert_eq!(users.len(), 1);
        assert_eq!(users[0].role, Role::Accountant);
    }

    #[test]
    fn only_super_admin_manages_accounts() {
        let mut repo = MockRepository::new();
        repo.expect_set_user_active().never();

        let result = set_active(&repo, &actor(Role::InventoryManager), 3, false);
        assert!(matches!(result, Err(ServiceError::Forbidden(_))));
    }

    #[test]
    fn admins_cannot_lock_themselves_out() {
        let mut repo = MockRepository::new();
        repo.expect_set_user_active().never();
        repo.expect_delete_user().never();

        let admin = actor(Role::SuperAdmin);
        assert!(matches!(
            set_active(&repo, &admin, admin.id, false),
            Err(ServiceError::InvalidInput(_))
        ));
        assert!(matches!(
            delete_account(&repo, &admin, admin.id),
            Err(ServiceError::InvalidInput(_))
        ));
    }

    #[test]
    fn created_accounts_store_an_argon2_hash() {
        let mut repo = MockRepository::new();
        repo.expect_create_user()
            .withf(|new_user| {
                new_user.password_hash.starts_with("$argon2")
                    && verify_password("long-enough-pw", &new_user.password_hash)
            })
            .returning(|new_user| {
                let mut user = account(8, new_user.role, true);
                user.email = new_user.email.clone();
                Ok(user)
            });

        let form = CreateUserForm {
            name: "Rita".into(),
            email: "Rita@Example.com".into(),
            password: "long-enough-pw".into(),
            role: Role::Csr,
        };

        let created = create_account(&repo, &actor(Role::SuperAdmin), form).expect("created");
        assert_eq!(created.email, "rita@example.com");
        assert_eq!(created.role, Role::Csr);
    }
}
