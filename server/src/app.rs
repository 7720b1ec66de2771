//! Core application

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::api::ApiServer;
use crate::core::cli::{self, CliConfig, Commands};
use crate::core::config::AppConfig;
use crate::core::constants::{
    APP_NAME, APP_NAME_LOWER, ENV_LOG, SEED_DEFAULT_COUNT, SEED_MAX_COUNT,
};
use crate::core::shutdown::ShutdownService;
use crate::data::cache::CacheService;
use crate::data::sqlite::{SqliteService, repositories};
use crate::domain::tasks::generate_tasks;
use crate::utils::time::now_millis;

pub struct CoreApp {
    pub shutdown: ShutdownService,
    pub config: AppConfig,
    pub database: Arc<SqliteService>,
    pub cache: Arc<CacheService>,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!("Application starting");

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        let app = Self::init(&cli_config).await?;
        match command {
            Some(Commands::Seed { count }) => app.seed(count).await,
            Some(Commands::Start) | None => Self::start_server(app).await,
        }
    }

    async fn init(cli: &CliConfig) -> Result<Self> {
        let config = AppConfig::load(cli)?;

        let database = Arc::new(
            SqliteService::init(&config.database)
                .await
                .context("Failed to initialize database")?,
        );

        let cache = Arc::new(CacheService::new(&config.cache));
        tracing::debug!(
            backend = cache.backend_name(),
            max_entries = config.cache.max_entries,
            ttl_secs = config.cache.ttl_secs,
            "Cache initialized"
        );

        let shutdown = ShutdownService::new(database.clone());

        Ok(Self {
            shutdown,
            config,
            database,
            cache,
        })
    }

    /// Replace all tasks with generated data, then exit
    async fn seed(self, count: Option<u32>) -> Result<()> {
        let count = count
            .unwrap_or(SEED_DEFAULT_COUNT)
            .clamp(1, SEED_MAX_COUNT);
        let rows = generate_tasks(&mut rand::thread_rng(), count, now_millis());

        let inserted =
            repositories::replace_tasks(self.database.pool(), Some(&self.cache), &rows)
                .await
                .context("Failed to seed tasks")?;

        println!("Seeded {} tasks into {}", inserted, self.config.database.url);
        self.database.close().await;
        Ok(())
    }

    fn init_logging() {
        let default_filter = format!("info,{}=info", APP_NAME_LOWER);

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .init();
    }

    async fn start_server(app: Self) -> Result<()> {
        // Install signal handlers FIRST (before any blocking calls)
        app.shutdown.install_signal_handlers();

        app.shutdown
            .register(
                app.database
                    .start_checkpoint_task(app.shutdown.subscribe()),
            )
            .await;
        tracing::debug!("Background tasks started");

        tracing::info!(
            "{} listening on http://{}:{}",
            APP_NAME,
            app.config.server.host,
            app.config.server.port
        );

        let server = ApiServer::new(app);
        let app = server.start().await?;
        app.shutdown.shutdown().await;

        Ok(())
    }
}
