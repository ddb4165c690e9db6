use std::time::Duration;

use confbind::{Configuration, EnvSource, Loader, TomlSource};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default, Configuration)]
struct AppConfig {
    #[config(key = "name", required)]
    name: String,
    #[config(key = "debug")]
    debug: bool,
    #[config(key = "database")]
    database: DatabaseSection,
}

#[derive(Debug, Default, Configuration)]
struct DatabaseSection {
    #[config(key = "host", default = "localhost")]
    host: String,
    #[config(key = "port", default = 5432)]
    port: u16,
    #[config(key = "pool_timeout", default = "5s")]
    pool_timeout: Duration,
    #[config(env = "DATABASE_PASSWORD", key = "password")]
    password: Option<String>,
}

fn main() -> Result<(), confbind::Error> {
    // RUST_LOG=confbind=trace shows every key lookup
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // File first, then APP_* variables on top (e.g. APP_DATABASE_PORT=6543)
    let config: AppConfig = Loader::new()
        .add(TomlSource::new("demos/default.toml").must())
        .add(TomlSource::new("demos/local.toml"))
        .add(EnvSource::new().prefix("APP"))
        .allow_override()
        .load()?;

    println!("App: {} (debug={})", config.name, config.debug);
    println!(
        "Database: {}:{} (pool timeout {:?}, password {})",
        config.database.host,
        config.database.port,
        config.database.pool_timeout,
        if config.database.password.is_some() { "set" } else { "unset" },
    );

    Ok(())
}
