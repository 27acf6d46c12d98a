use std::net::SocketAddr;
use std::path::PathBuf;

use crate::cli::Cli;

#[derive(Clone)]
pub struct Configuration {
    pub listen: SocketAddr,
    pub data_file: PathBuf,
    pub upload_dir: PathBuf,
    pub log_file: Option<PathBuf>,
}

impl Configuration {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            listen: cli.listen,
            data_file: cli.data_file.clone(),
            upload_dir: cli.upload_dir.clone(),
            log_file: cli.log_file.clone(),
        }
    }
}
