mod draws;
mod stores;

use clap::{Parser, Subcommand};

use lottodb_scraper::harvest::{DEFAULT_BATCH_SIZE, DEFAULT_START_ROUND};

#[derive(Debug, Parser)]
#[command(name = "lottodb-cli")]
#[command(about = "Lotto 6/45 result and winning-store collector")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Crawl historical first-prize store listings over a round range and
    /// rebuild the ranked leaderboard.
    Stores {
        /// First round of the range (inclusive).
        #[arg(long, default_value_t = DEFAULT_START_ROUND)]
        start: u32,
        /// Last round of the range (inclusive); resolved from the site when
        /// omitted.
        #[arg(long)]
        end: Option<u32>,
        /// Rounds per progress checkpoint.
        #[arg(long = "batch-size", default_value_t = DEFAULT_BATCH_SIZE)]
        batch_size: u32,
        /// Crawl and rank without writing to the database.
        #[arg(long)]
        dry_run: bool,
    },
    /// Collect the winning numbers for one round (latest when omitted).
    Draw {
        #[arg(long)]
        round: Option<u32>,
    },
    /// Print the persisted store leaderboard.
    Top {
        #[arg(long, default_value_t = 20)]
        limit: i64,
        /// Restrict the listing to one region (e.g. 서울, 경기도).
        #[arg(long)]
        region: Option<String>,
    },
    /// Print the most recently collected draws.
    Recent {
        #[arg(long, default_value_t = 10)]
        limit: i64,
    },
    /// Apply pending database migrations.
    Migrate,
}

async fn run_migrate() -> anyhow::Result<()> {
    lottodb_core::load_app_config()?;
    let pool = lottodb_db::connect_pool_from_env().await?;
    lottodb_db::ping(&pool).await?;
    let applied = lottodb_db::run_migrations(&pool).await?;
    println!("✓ database up to date ({applied} migration(s) applied)");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Stores {
            start,
            end,
            batch_size,
            dry_run,
        } => stores::run_stores(start, end, batch_size, dry_run).await,
        Commands::Draw { round } => draws::run_draw(round).await,
        Commands::Top { limit, region } => stores::run_top(limit, region.as_deref()).await,
        Commands::Recent { limit } => draws::run_recent(limit).await,
        Commands::Migrate => run_migrate().await,
    }
}
