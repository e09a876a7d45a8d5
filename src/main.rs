mod auth;
mod db;
mod error;
mod middleware;
mod notification;
mod push;
mod routes;
mod state;

use db::{create_pool, run_migrations};
use push::{FcmClient, PushClient};
use routes::create_router;
use state::{AppState, Config};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,notification_system=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Arc::new(Config::from_env());

    // Create database connection pool
    let database_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set");

    tracing::info!("Connecting to database...");
    let db = create_pool(&database_url).await?;

    // Run migrations
    tracing::info!("Running migrations...");
    run_migrations(&db).await?;

    // Build the push client once; bad provider credentials should stop the
    // process here instead of failing every send later.
    let push_client: Arc<dyn PushClient> = Arc::new(FcmClient::from_env()?);

    // Create repositories
    let user_repository = crate::auth::auth_repository::UserRepository::new(db.clone());
    let notification_repository =
        crate::notification::notification_repository::NotificationRepository::new(db);

    // Create services
    let auth_service = crate::auth::auth_service::AuthService::new(
        user_repository,
        config.jwt_secret.clone(),
        config.jwt_expiration_hours,
    );
    let notification_service = crate::notification::notification_service::NotificationService::new(
        notification_repository.clone(),
        push_client,
    );

    // Seed the admin account when credentials are provided
    if let (Ok(username), Ok(password)) = (
        std::env::var("ADMIN_USERNAME"),
        std::env::var("ADMIN_PASSWORD"),
    ) {
        auth_service.ensure_seed_user(&username, &password).await?;
    }

    // Create application state
    let state = AppState {
        config,
        notification_repository,
        auth_service,
        notification_service,
    };

    // Create router
    let app = create_router(state);

    // Start server
    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("{}:{}", host, port);

    tracing::info!("Server starting on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
