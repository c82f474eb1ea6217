use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};
use tracing_subscriber::EnvFilter;

use genredetector::{
    cli::{self, LookupTarget, SearchTarget},
    config::{self, Config},
    error, warning,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the search proxy
    Serve(ServeOptions),

    /// Run a single search and print the results
    Search(SearchOptions),

    /// Fetch one artist or track by id
    Lookup(LookupOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct ServeOptions {
    /// Address to bind, overrides SERVER_ADDRESS
    #[clap(long)]
    pub address: Option<String>,

    /// Answer CORS preflight (OPTIONS) requests
    #[clap(long)]
    pub dev: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct SearchOptions {
    /// What to search for
    #[clap(value_enum)]
    pub target: SearchTarget,

    /// Search term, e.g. "soft rock"
    pub query: String,

    /// Keep artists whose genres only partially match (genre search)
    #[clap(long)]
    pub partial: bool,

    /// Number of rows to print
    #[clap(long, default_value_t = 25)]
    pub top: usize,
}

#[derive(Parser, Debug, Clone)]
pub struct LookupOptions {
    #[clap(value_enum)]
    pub target: LookupTarget,

    /// Spotify id
    pub id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    // before the subscriber, so RUST_LOG may come from the .env file
    let env_loaded = config::load_env().await;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = env_loaded {
        warning!("Cannot load .env file, using process environment. Err: {}", e);
    }

    let cli = Cli::parse();

    if let Command::Completions(opt) = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    let mut config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => error!("Cannot load configuration. Err: {}", e),
    };

    match cli.command {
        Command::Serve(opt) => {
            if let Some(address) = opt.address {
                config.server_address = address;
            }
            cli::serve(&config, opt.dev).await
        }
        Command::Search(opt) => {
            cli::search(&config, opt.target, &opt.query, opt.partial, opt.top).await
        }
        Command::Lookup(opt) => cli::lookup(&config, opt.target, &opt.id).await,
        Command::Completions(_) => {}
    }
}
