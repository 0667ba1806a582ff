use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use commands::{auth, catalog, config, reels, watchlist};
use moviephile_models::{ListCategory, MediaType, WatchStatus};

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "moviephile")]
#[command(about = "Moviephile - discover movies and TV through trailers and keep a watchlist")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Write logs to the rolling log file instead of stderr
    #[arg(long, global = true, action = ArgAction::SetTrue)]
    log_to_file: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Media type flag shared by catalog commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MediaArg {
    Movie,
    Tv,
}

impl From<MediaArg> for MediaType {
    fn from(arg: MediaArg) -> Self {
        match arg {
            MediaArg::Movie => MediaType::Movie,
            MediaArg::Tv => MediaType::Tv,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in (any non-empty email and password are accepted)
    Login {
        #[arg(long)]
        email: Option<String>,
    },
    /// Sign out and forget the cached session
    Logout,
    /// Show the signed-in profile
    Whoami,
    /// Browse a curated list
    #[command(long_about = "Browse a curated list: trending, popular, top_rated, now_playing, upcoming (movies) or on_the_air, airing_today (TV). Use --genre to discover by genre id instead.")]
    List {
        #[arg(default_value = "popular")]
        category: ListCategory,

        #[arg(long, value_enum, default_value = "movie")]
        media: MediaArg,

        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Discover by genre id instead of a curated list
        #[arg(long)]
        genre: Option<u32>,
    },
    /// Search movies by title
    Search {
        query: String,

        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Show details, trailers, similar titles and reviews
    Detail {
        id: u64,

        #[arg(long, value_enum, default_value = "movie")]
        media: MediaArg,
    },
    /// Show the episodes of a TV season
    Season {
        show_id: u64,

        #[arg(default_value_t = 1)]
        season: u32,
    },
    /// Scroll through trailers one reel at a time
    #[command(long_about = "Interactive trailer feed. Each reel starts playing once it settles on screen; move between reels, pause, save to your watchlist or switch category. Pages load as you reach the end of the feed.")]
    Reels {
        /// Starting category (defaults to the configured feed category)
        #[arg(long)]
        category: Option<ListCategory>,

        #[arg(long, value_enum)]
        media: Option<MediaArg>,
    },
    /// Manage your watchlist
    Watchlist {
        #[command(subcommand)]
        cmd: Option<WatchlistCommands>,
    },
    /// Show or create the configuration file
    Config {
        #[command(subcommand)]
        cmd: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
pub enum WatchlistCommands {
    /// List saved titles
    List {
        /// Only show titles with this status
        #[arg(long)]
        status: Option<WatchStatus>,
    },
    /// Save a title
    Add {
        id: u64,

        #[arg(long, value_enum, default_value = "movie")]
        media: MediaArg,

        #[arg(long, default_value = "plan")]
        status: WatchStatus,
    },
    /// Remove a title
    Remove { id: u64 },
    /// Save the title if missing, remove it otherwise
    Toggle {
        id: u64,

        #[arg(long, value_enum, default_value = "movie")]
        media: MediaArg,
    },
    /// Set the status (plan, watching, watched); without one, advance to the next status
    Status {
        id: u64,

        status: Option<WatchStatus>,
    },
    /// Set progress in percent (clamped to 0-100)
    Progress {
        id: u64,

        #[arg(allow_hyphen_values = true)]
        percent: i64,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration (masks keys)
    Show {
        /// Show keys unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
    /// Create the configuration file interactively
    Init {
        /// TMDB API key (prompted for when omitted)
        #[arg(long)]
        tmdb_api_key: Option<String>,

        /// Supabase project URL
        #[arg(long)]
        supabase_url: Option<String>,

        /// Supabase anon key
        #[arg(long)]
        supabase_anon_key: Option<String>,
    },
    /// Print the config file location
    Path,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let log_file = if cli.log_to_file {
        Some(moviephile_config::PathManager::default().log_file())
    } else {
        None
    };
    logging::init_logging_with_file(cli.verbose, cli.quiet, log_file)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Login { email } => auth::login(email, &output),
        Commands::Logout => auth::logout(&output),
        Commands::Whoami => auth::whoami(&output),
        Commands::List {
            category,
            media,
            page,
            genre,
        } => catalog::run_list(category, media.into(), page, genre, &output).await,
        Commands::Search { query, page } => catalog::run_search(&query, page, &output).await,
        Commands::Detail { id, media } => catalog::run_detail(media.into(), id, &output).await,
        Commands::Season { show_id, season } => catalog::run_season(show_id, season, &output).await,
        Commands::Reels { category, media } => {
            reels::run_reels(category, media.map(Into::into), &output).await
        }
        Commands::Watchlist { cmd } => {
            let cmd = cmd.unwrap_or(WatchlistCommands::List { status: None });
            watchlist::run_watchlist(cmd, &output).await
        }
        Commands::Config { cmd } => {
            let cmd = cmd.unwrap_or(ConfigCommands::Show { full: false });
            config::run_config(cmd, &output)
        }
    }
}
