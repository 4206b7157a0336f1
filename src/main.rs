use anyhow::Result;
use clap::{Parser, Subcommand};
use healthdialog::config::{BACKEND_URL_ENV, Config};
use healthdialog::{app, logging};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "healthdialog")]
#[command(version)]
#[command(about = "Clinically grounded health triage chat in your terminal", long_about = None)]
struct Cli {
    /// Config file (defaults to ~/.healthdialog/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Triage backend base address, e.g. http://localhost:8000
    #[arg(long, global = true)]
    backend_url: Option<String>,

    /// Log filter, e.g. info or healthdialog=debug
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the chat interface (default)
    Chat,
    /// Print the resolved configuration
    Config {
        /// Also write it to the config file
        #[arg(long)]
        write: bool,
    },
}

fn load_config(cli: &Cli) -> Result<(Config, PathBuf)> {
    let path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::default_path()?,
    };

    let mut config = Config::load_from(&path)?;
    config.apply_env(std::env::var(BACKEND_URL_ENV).ok());
    config.apply_overrides(cli.backend_url.clone(), cli.log_level.clone());

    Ok((config, path))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let (config, path) = load_config(&cli)?;

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => {
            let _guard = logging::init(&config)?;
            app::run(&config)?;
        }
        Commands::Config { write } => {
            print!("{}", config.to_toml()?);
            if write {
                config.save_to(&path)?;
                println!("\n✅ Wrote {}", path.display());
            }
        }
    }

    Ok(())
}
