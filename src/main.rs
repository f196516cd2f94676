use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser;

use artframe::application::{ArtworkResolver, ConsoleAdapter};
use artframe::domain::Environment;
use artframe::infrastructure::{ConfigManager, init_logging_with_config, scoped_console_logging};

/// Resolve the artwork shown by a storefront page.
#[derive(Parser, Debug)]
#[command(name = "artframe", version)]
struct Cli {
    /// URL of the page the widget is embedded in.
    #[arg(long)]
    url: String,

    /// Referrer of that page, if any.
    #[arg(long)]
    referrer: Option<String>,

    /// Site root (http(s) base URL or local directory); overrides the config.
    #[arg(long)]
    root: Option<String>,

    /// Configuration file; defaults to the user config directory.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print outcomes as JSON lines.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let manager = match &cli.config {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new()?,
    };
    // Config problems (parse errors, resets) reach stderr before the
    // configured subscriber exists
    let bootstrap = scoped_console_logging("warn", std::io::stderr)?;
    let mut config = manager.load_config().await?;
    drop(bootstrap);
    if let Some(root) = cli.root {
        config.site.root = root;
    }

    init_logging_with_config(&config.logging)?;

    let env = Environment::parse(&cli.url, cli.referrer.as_deref())
        .with_context(|| format!("Invalid page URL: {}", cli.url))?;
    let resolver = ArtworkResolver::from_config(&config)?;
    let adapter = ConsoleAdapter::new(cli.json);

    match resolver.run(&env, &adapter).await {
        Ok(view) if view.image.is_some() => Ok(ExitCode::SUCCESS),
        Ok(_) | Err(_) => Ok(ExitCode::FAILURE),
    }
}
