use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use arxiv_digest::channel::{
    ConsoleChannel, EmailChannel, SmtpMailer, TelegramChannel, TelegramClient,
};
use arxiv_digest::{
    Channel, ChannelKind, Config, FeedFetcher, HtmlRenderer, MessageRenderer, Renderer, Result,
    Runner,
};

/// Scrape the arXiv RSS feeds and send the interesting entries.
#[derive(Parser)]
#[command(name = "arxiv-digest")]
#[command(version)]
struct Cli {
    /// Path of the configuration file
    #[arg(short, long, default_value = "config.toml", env = "ARXIV_DIGEST_CONFIG")]
    config: PathBuf,

    /// Delivery channel
    #[arg(long, value_enum, default_value_t = ChannelKind::Telegram)]
    channel: ChannelKind,

    /// Print what would be sent instead of sending it
    #[arg(long)]
    dry_run: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load_with_env(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {}: {e}", cli.config.display());
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = arxiv_digest::logging::init(&config.logging, cli.verbose) {
        eprintln!("Failed to initialize logging: {e}");
        arxiv_digest::logging::init_console_fallback(&config.logging.level);
    }

    match run(&cli, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli, config: &Config) -> Result<()> {
    if cli.dry_run {
        config.validate_categories()?;
    } else {
        config.validate(cli.channel)?;
    }

    let renderer: Box<dyn Renderer> = match cli.channel {
        ChannelKind::Telegram => Box::new(MessageRenderer::new()),
        ChannelKind::Email => Box::new(HtmlRenderer::new()),
    };

    let channel: Box<dyn Channel> = if cli.dry_run {
        Box::new(ConsoleChannel::stdout())
    } else {
        match cli.channel {
            ChannelKind::Telegram => Box::new(TelegramChannel::new(
                TelegramClient::new(&config.telegram)?,
                config.telegram.chat_id.clone(),
            )),
            ChannelKind::Email => Box::new(EmailChannel::new(
                SmtpMailer::new(&config.email)?,
                &config.email,
                chrono::Local::now().date_naive(),
            )),
        }
    };

    let source = FeedFetcher::new(&config.feed)?;
    let mut runner = Runner::new(config, Box::new(source), renderer, channel);

    let summary = runner.run().await?;
    info!(
        categories = summary.categories,
        failed = summary.failed_categories.len(),
        "Done"
    );
    Ok(())
}
