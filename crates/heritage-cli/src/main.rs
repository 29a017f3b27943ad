mod query;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "heritage-cli")]
#[command(about = "Heritage GIS command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve a clicked heritage feature to its best KHS detail record
    Resolve {
        /// Feature name as shown on the map; omit for unnamed features
        #[arg(long, default_value = "")]
        name: String,
        /// Click longitude (WGS84)
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        /// Click latitude (WGS84)
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        /// KHS kind code (e.g. 11 for 국보)
        #[arg(long)]
        kdcd: Option<String>,
        /// KHS region code; wins over --sido
        #[arg(long)]
        ctcd: Option<String>,
        /// Province name, mapped to a region code (e.g. 서울특별시)
        #[arg(long)]
        sido: Option<String>,
        /// Print the winning record as JSON
        #[arg(long)]
        json: bool,
    },
    /// Search heritage tables by name
    Search {
        keyword: String,
        /// Maximum rows per table (defaults to the configured limit)
        #[arg(long)]
        limit: Option<i64>,
    },
    /// List region layer groups advertised by GeoServer
    Layers,
    /// List province names from the admin1 layer
    Admin1,
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check database connectivity
    Ping,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("heritage-cli ready; run with --help for commands");
        return Ok(());
    };

    let config = heritage_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match command {
        Commands::Resolve {
            name,
            lon,
            lat,
            kdcd,
            ctcd,
            sido,
            json,
        } => {
            let args = query::ResolveArgs {
                name,
                lon,
                lat,
                kind_code: kdcd,
                region_code: ctcd,
                sido,
                json,
            };
            query::run_resolve(&config, args).await?;
        }
        Commands::Search { keyword, limit } => {
            let pool = connect(&config).await?;
            let row_limit = limit.unwrap_or(config.search_row_limit);
            query::run_search(&pool, &config.search_schema, &keyword, row_limit).await?;
        }
        Commands::Layers => query::run_layers(&config).await?,
        Commands::Admin1 => query::run_admin1(&config).await?,
        Commands::Db {
            command: DbCommands::Ping,
        } => {
            let pool = connect(&config).await?;
            let health = heritage_db::health_check(&pool).await?;
            match health.postgis_version {
                Some(version) => println!("database ok (postgis {version})"),
                None => println!("database ok (postgis not installed)"),
            }
        }
    }

    Ok(())
}

async fn connect(config: &heritage_core::AppConfig) -> anyhow::Result<sqlx::PgPool> {
    let pool_config = heritage_db::PoolConfig::from_app_config(config);
    Ok(heritage_db::connect_pool(&config.database_url, pool_config).await?)
}
