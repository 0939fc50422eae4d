use std::net::SocketAddr;
use std::sync::Arc;

use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;

use gather_server::config::Config;
use gather_server::notify::{LogNotifier, Notifier, SmtpNotifier};
use gather_server::routes::create_routes;
use gather_server::state::AppState;
use gather_server::store::PgEventStore;

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env();

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Successfully connected to database");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    tracing::info!("Migrations run successfully");

    let store = Arc::new(PgEventStore::new(pool));
    let notifier = build_notifier(&config);
    let app = create_routes(AppState::new(store, notifier));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server running at http://{}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app).await.expect("Server failed");
}

fn build_notifier(config: &Config) -> Arc<dyn Notifier> {
    if config.mail.smtp_host.is_some() {
        let notifier =
            SmtpNotifier::from_config(&config.mail).expect("Invalid SMTP configuration");
        tracing::info!("Registration confirmations will be delivered over SMTP");
        Arc::new(notifier)
    } else {
        tracing::info!("SMTP not configured; registration confirmations will be logged only");
        Arc::new(LogNotifier)
    }
}
