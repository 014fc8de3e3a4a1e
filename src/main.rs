//! Portfolio Backend
//! Mission: Serve the portfolio REST API from a single SQLite file

use anyhow::{Context, Result};
use clap::Parser;
use portfolio_backend::{
    auth::{JwtHandler, UserStore},
    config::{self, Cli, Command},
    create_router,
    db::Database,
    github::GithubClient,
    resources::{ProjectStore, QualificationStore},
    seed, AppState,
};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    config::load_env();
    init_tracing();

    let cli = Cli::parse();
    let db_path = cli.database_path();
    let db = Database::open(&db_path)?;

    match cli.command() {
        Command::Seed => run_seed(&cli, db),
        Command::Serve => serve(&cli, db).await,
    }
}

async fn serve(cli: &Cli, db: Database) -> Result<()> {
    info!("🚀 Portfolio backend starting");

    let user_store = UserStore::new(db.clone());
    seed::seed_admin(&user_store, &cli.admin_account()).context("Failed to seed admin account")?;

    let jwt_handler = JwtHandler::new(&cli.jwt_secret());
    let github = GithubClient::new(
        &cli.github_api_base,
        &cli.github_username,
        cli.github_token.as_deref(),
    )?;

    let state = AppState::new(db, user_store, jwt_handler, github);
    let app = create_router(state);

    let addr = cli.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("🎯 API server listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn run_seed(cli: &Cli, db: Database) -> Result<()> {
    let user_store = UserStore::new(db.clone());
    seed::seed_admin(&user_store, &cli.admin_account()).context("Failed to seed admin account")?;

    let projects = ProjectStore::new(db.clone());
    let qualifications = QualificationStore::new(db);
    seed::seed_portfolio_data(&projects, &qualifications)
        .context("Failed to seed portfolio data")?;

    info!("🌱 Seeding complete");
    Ok(())
}

/// Initialize tracing with env-driven filtering
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "portfolio_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
