use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use folio::config::read_config;
use folio::logger::configure_logger;
use folio::server::server_run;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file. Defaults to folio.toml next to
    /// the executable, then to the user configuration directory
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn config_path(args: &Args) -> Result<PathBuf> {
    if let Some(ref path) = args.config {
        return Ok(path.clone());
    }

    let exe_path = env::current_exe()?;
    if let Some(exe_dir) = exe_path.parent() {
        let candidate = exe_dir.join("folio.toml");
        if candidate.is_file() {
            return Ok(candidate);
        }
    }

    let config_dir = dirs::config_dir().context("Could not locate a configuration directory")?;
    Ok(config_dir.join("folio").join("folio.toml"))
}

#[ntex::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let cfg_path = config_path(&args)?;
    let config = read_config(&cfg_path)?;
    configure_logger(&config)?;

    server_run(config).await?;
    Ok(())
}
