use database::DbRepository;
use tracing_subscriber::EnvFilter;

// This main function is the entry point when running `cargo run -p web-server`.
// It serves the Postgres-backed API with settings from `config.toml` and the environment.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = configuration::load_config()?;
    let pool = database::connect(&settings.database).await?;
    database::run_migrations(&pool).await?;

    web_server::run_server(&settings, DbRepository::new(pool)).await
}
