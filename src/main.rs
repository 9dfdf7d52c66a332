use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use daycache::config::{self, Config, SuggestMode};
use daycache::{Composer, ControllerPhase, HttpSuggestionFetcher, SuggestionFetcher, SuggestionResult};

/// Feed journal text from stdin through the suggestion controller
///
/// Each input line replaces the composer text, as if typed. Delivered
/// suggestions are printed as the text followed by the suggested suffix.
#[derive(Debug, Parser)]
#[command(name = "daycache-suggest", version, about)]
struct Cli {
    /// Config file (default: ~/.config/daycache/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Backend base URL, e.g. http://localhost:8000
    #[arg(long)]
    base_url: Option<String>,

    /// Debounce/throttle window in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// debounce or throttle
    #[arg(long)]
    mode: Option<SuggestMode>,
}

impl Cli {
    fn resolve_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => config::load_config_from_path(path)?,
            None => config::load_config()?,
        };

        if let Some(base_url) = &self.base_url {
            config.api.base_url = base_url.clone();
        }
        if let Some(delay_ms) = self.delay_ms {
            config.suggestions.delay_ms = delay_ms;
        }
        if let Some(mode) = self.mode {
            config.suggestions.mode = mode;
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::init();

    let cli = Cli::parse();
    let config = cli.resolve_config()?;
    log::debug!("Using config: {:?}", config);

    let fetcher = HttpSuggestionFetcher::from_config(&config.api)?;
    let mut composer = Composer::new(&config.suggestions, fetcher)?;

    run(&mut composer).await?;

    // Give the last input time to settle before exiting
    let settle = config.suggestions.delay() + config.api.timeout() + Duration::from_millis(100);
    drain(&mut composer, settle).await;

    Ok(())
}

async fn run<F: SuggestionFetcher>(composer: &mut Composer<F>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            biased;
            Some(result) = composer.next_result() => print_result(composer, &result),
            line = lines.next_line() => match line? {
                Some(text) => composer.input(text)?,
                None => return Ok(()),
            },
        }
    }
}

async fn drain<F: SuggestionFetcher>(composer: &mut Composer<F>, settle: Duration) {
    let deadline = tokio::time::Instant::now() + settle;

    loop {
        while let Some(result) = composer.try_next_result() {
            print_result(composer, &result);
        }
        if matches!(composer.phase(), ControllerPhase::Idle | ControllerPhase::Disposed) {
            return;
        }
        match tokio::time::timeout_at(deadline, composer.next_result()).await {
            Ok(Some(result)) => print_result(composer, &result),
            Ok(None) => return,
            Err(_) => {
                log::warn!("Gave up waiting for the last suggestion");
                return;
            }
        }
    }
}

fn print_result<F: SuggestionFetcher>(composer: &Composer<F>, result: &SuggestionResult) {
    match result {
        Some(suffix) => println!("{}{}", composer.text(), suffix),
        None => println!("(no suggestion)"),
    }
}
