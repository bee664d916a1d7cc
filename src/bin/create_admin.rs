//! Create a `super_admin` account from the command line.
//!
//! Usage: `create_admin <name> <email> <password>`

use std::env;

use dotenvy::dotenv;

use bizdesk::auth::hash_password;
use bizdesk::db::{establish_connection_pool, run_migrations};
use bizdesk::domain::user::{NewUser, Role};
use bizdesk::repository::{DieselRepository, UserWriter};

fn main() {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok();

    let args: Vec<String> = env::args().skip(1).collect();
    let [name, email, password] = args.as_slice() else {
        eprintln!("usage: create_admin <name> <email> <password>");
        std::process::exit(2);
    };

    let database_url = env::var("DATABASE_URL").unwrap_or("app.db".to_string());
    let pool = match establish_connection_pool(&database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    let migrated = pool
        .get()
        .map_err(|e| e.to_string())
        .and_then(|mut conn| run_migrations(&mut conn).map_err(|e| e.to_string()));
    if let Err(e) = migrated {
        log::error!("Failed to run migrations: {e}");
        std::process::exit(1);
    }

    let password_hash = match hash_password(password) {
        Ok(hash) => hash,
        Err(e) => {
            log::error!("Failed to hash password: {e}");
            std::process::exit(1);
        }
    };

    let repo = DieselRepository::new(pool);
    match repo.create_user(&NewUser::new(
        name.as_str(),
        email.as_str(),
        password_hash,
        Role::SuperAdmin,
    )) {
        Ok(user) => log::info!("Created super_admin {} ({})", user.email, user.id),
        Err(e) => {
            log::error!("Failed to create user: {e}");
            std::process::exit(1);
        }
    }
}
