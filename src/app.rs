use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;

use crate::configuration::Configuration;
use crate::store::JsonFileStore;
use crate::{cli, rest};

pub struct App {
    pub config: Configuration,
    pub store: JsonFileStore,
}

impl App {
    pub fn from_cli() -> Result<Self> {
        let cli = cli::parse();
        let config = Configuration::from_cli(&cli);

        crate::tracing::init(config.log_file.as_deref());
        log::info!("🚀 Starting activityd");
        log::info!("📂 Data file: {}", config.data_file.display());
        log::info!("🖼️ Upload dir: {}", config.upload_dir.display());
        if let Some(path) = config.log_file.as_deref() {
            log::info!("📝 Log file: {}", path.display());
        }

        std::fs::create_dir_all(&config.upload_dir).context("creating upload directory")?;
        let store = JsonFileStore::new(&config.data_file, &config.upload_dir);

        Ok(Self { config, store })
    }

    pub async fn run(self) -> Result<()> {
        let shutdown = CancellationToken::new();

        let mut server = tokio::spawn(rest::serve(
            self.config.listen,
            self.store,
            self.config.upload_dir.clone(),
            shutdown.clone(),
        ));

        tokio::select! {
            res = &mut server => {
                res.context("joining REST server task")??;
            }
            _ = tokio::signal::ctrl_c() => {
                log::info!("🛑 Shutdown signal received");
                shutdown.cancel();
                server.await.context("joining REST server task")??;
            }
        }

        Ok(())
    }
}
