use clap::Parser;
use std::env;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Manage activity records over a REST API, backed by a flat JSON file"
)]
pub struct Cli {
    #[arg(
        long,
        env = "ACTIVITYD_LISTEN",
        default_value = "127.0.0.1:8080",
        value_name = "ADDR",
        help = "REST API listen address (host:port)"
    )]
    pub listen: std::net::SocketAddr,

    #[arg(
        long = "data-file",
        env = "ACTIVITYD_DATA_FILE",
        default_value = "activities.json",
        value_name = "PATH",
        help = "JSON document holding the activity collection"
    )]
    pub data_file: PathBuf,

    #[arg(
        long = "upload-dir",
        env = "ACTIVITYD_UPLOAD_DIR",
        default_value = "uploads",
        value_name = "DIR",
        help = "Directory for uploaded activity images"
    )]
    pub upload_dir: PathBuf,

    #[arg(
        long = "log-file",
        env = "ACTIVITYD_LOG_FILE",
        value_name = "PATH",
        help = "Write logs to PATH (in addition to stderr)"
    )]
    pub log_file: Option<PathBuf>,
}

pub fn parse() -> Cli {
    let dotenv_path = env::var("DOTENV_PATH").unwrap_or(".env".into());
    if dotenvy::from_filename(&dotenv_path).is_ok() {
        println!("Loaded env from {}", dotenv_path);
    }
    Cli::parse()
}
