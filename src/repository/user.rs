use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::{
    domain::user::{
        NewUser as DomainNewUser, Role, UpdateUser as DomainUpdateUser, User as DomainUser,
        UserCredentials,
    },
    models::user::{NewUser as DbNewUser, UpdateUser as DbUpdateUser, User as DbUser},
    repository::{DieselRepository, RepositoryError, RepositoryResult, UserReader, UserWriter},
};

impl UserReader for DieselRepository {
    fn get_user_by_id(&self, id: i32) -> RepositoryResult<Option<DomainUser>> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let user = users::table
            .filter(users::id.eq(id))
            .first::<DbUser>(&mut conn)
            .optional()?;

        user.map(TryInto::try_into).transpose()
    }

    fn get_user_credentials(&self, email: &str) -> RepositoryResult<Option<UserCredentials>> {
        use crate::schema::users;

        let normalized_email = email.trim().to_lowercase();

        let mut conn = self.conn()?;
        let user = users::table
            .filter(users::email.eq(normalized_email))
            .first::<DbUser>(&mut conn)
            .optional()?;

        user.map(TryInto::try_into).transpose()
    }

    fn list_users(&self, role: Option<Role>) -> RepositoryResult<Vec<DomainUser>> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let mut items = users::table.into_boxed::<diesel::sqlite::Sqlite>();
        if let Some(role) = role {
            items = items.filter(users::role.eq(role.as_str()));
        }

        items
            .order((users::name.asc(), users::id.asc()))
            .load::<DbUser>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect()
    }
}

impl UserWriter for DieselRepository {
    fn create_user(&self, new_user: &DomainNewUser) -> RepositoryResult<DomainUser> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let db_new = DbNewUser::from(new_user);

        let created = diesel::insert_into(users::table)
            .values(&db_new)
            .get_result::<DbUser>(&mut conn)?;

        created.try_into()
    }

    fn update_user(
        &self,
        user_id: i32,
        updates: &DomainUpdateUser,
    ) -> RepositoryResult<DomainUser> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let db_updates = DbUpdateUser::from(updates);

        let updated = diesel::update(users::table.filter(users::id.eq(user_id)))
            .set(&db_updates)
            .get_result::<DbUser>(&mut conn)?;

        updated.try_into()
    }

    fn delete_user(&self, user_id: i32) -> RepositoryResult<()> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let affected =
            diesel::delete(users::table.filter(users::id.eq(user_id))).execute(&mut conn)?;

        if affected == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    fn set_password_hash(&self, user_id: i32, password_hash: &str) -> RepositoryResult<()> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let affected = diesel::update(users::table.filter(users::id.eq(user_id)))
            .set((
                users::password_hash.eq(password_hash),
                users::updated_at.eq(chrono::Local::now().naive_utc()),
            ))
            .execute(&mut conn)?;

        if affected == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    fn set_user_active(&self, user_id: i32, active: bool) -> RepositoryResult<DomainUser> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let updated = diesel::update(users::table.filter(users::id.eq(user_id)))
            .set((
                users::active.eq(active),
                users::updated_at.eq(chrono::Local::now().naive_utc()),
            ))
            .get_result::<DbUser>(&mut conn)?;

        updated.try_into()
    }

    fn record_login(&self, user_id: i32, at: NaiveDateTime) -> RepositoryResult<()> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        diesel::update(users::table.filter(users::id.eq(user_id)))
            .set(users::last_login.eq(Some(at)))
            .execute(&mut conn)?;

        Ok(())
    }
}
