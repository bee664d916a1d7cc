//! Helpers for integration tests.
#![allow(dead_code)]

use bizdesk::db::{DbPool, establish_connection_pool, run_migrations};
use bizdesk::domain::customer::NewCustomer;
use bizdesk::domain::user::{NewUser, Role, User};
use bizdesk::repository::{CustomerWriter, DieselRepository, UserWriter};

/// Temporary database used in integration tests.
pub struct TestDb {
    filename: String,
    pool: DbPool,
}

impl TestDb {
    pub fn new(filename: &str) -> Self {
        std::fs::remove_file(filename).ok(); // Clean up old DB

        let pool =
            establish_connection_pool(filename).expect("Failed to establish SQLite connection.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        run_migrations(&mut conn).expect("Migrations failed");
        TestDb {
            filename: filename.to_string(),
            pool,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn repo(&self) -> DieselRepository {
        DieselRepository::new(self.pool())
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        std::fs::remove_file(&self.filename).ok();
        std::fs::remove_file(format!("{}-shm", &self.filename)).ok();
        std::fs::remove_file(format!("{}-wal", &self.filename)).ok();
    }
}

/// Insert a user with a throwaway password hash.
pub fn seed_user(repo: &DieselRepository, name: &str, role: Role) -> User {
    let email = format!("{}@example.com", name.to_lowercase());
    repo.create_user(&NewUser::new(name, email, "not-a-real-hash", role))
        .expect("seed user")
}

/// Insert a customer created by (and therefore assigned to) `owner`.
pub fn seed_customer(repo: &DieselRepository, name: &str, owner: &User) -> i32 {
    repo.create_customer(&NewCustomer::new(name, owner.id).with_email("buyer@acme.test"))
        .expect("seed customer")
        .customer
        .id
}
