use std::sync::Arc;

use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use dotenvy::dotenv;

use bizdesk::auth::TokenKeys;
use bizdesk::config::ServerConfig;
use bizdesk::db::{establish_connection_pool, run_migrations};
use bizdesk::mailer::{LogMailer, QuoteEmailRenderer, SharedMailer};
use bizdesk::repository::DieselRepository;
use bizdesk::routes;
use bizdesk::storage::{FsAttachmentStore, UPLOADS_URL_PREFIX};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok(); // Load .env file

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let pool = match establish_connection_pool(&config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    match pool.get() {
        Ok(mut conn) => {
            if let Err(e) = run_migrations(&mut conn) {
                log::error!("Failed to run migrations: {e}");
                std::process::exit(1);
            }
        }
        Err(e) => {
            log::error!("Failed to get a connection for migrations: {e}");
            std::process::exit(1);
        }
    }
    let repo = DieselRepository::new(pool);

    let store = match FsAttachmentStore::new(config.upload_dir.clone()) {
        Ok(store) => store,
        Err(e) => {
            log::error!(
                "Failed to prepare upload directory {}: {e}",
                config.upload_dir.display()
            );
            std::process::exit(1);
        }
    };

    let renderer = match QuoteEmailRenderer::new(config.mail_from.clone()) {
        Ok(renderer) => renderer,
        Err(e) => {
            log::error!("Failed to build quote email template: {e}");
            std::process::exit(1);
        }
    };

    let keys = web::Data::new(TokenKeys::new(&config.secret, config.token_ttl_hours));
    let mailer: web::Data<SharedMailer> = web::Data::from(Arc::new(LogMailer) as Arc<SharedMailer>);
    let repo = web::Data::new(repo);
    let store = web::Data::new(store);
    let renderer = web::Data::new(renderer);

    let address = config.address.clone();
    let port = config.port;
    let config = web::Data::new(config);

    log::info!("Listening on {address}:{port}");

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(Files::new(UPLOADS_URL_PREFIX, config.upload_dir.clone()))
            .service(web::scope("/api").configure(routes::configure))
            .app_data(repo.clone())
            .app_data(keys.clone())
            .app_data(mailer.clone())
            .app_data(store.clone())
            .app_data(renderer.clone())
            .app_data(config.clone())
    })
    .bind((address, port))?
    .run()
    .await
}
