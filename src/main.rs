mod client;
mod config;
mod database;
mod entities;
mod error;
mod http_server;
mod logging;
mod ports;
mod services;
#[cfg(test)]
mod test_utils;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::{Result, eyre::Context};
use url::Url;

use crate::{
    client::{CatalogClient, render_movie},
    config::Config,
    database::Database,
    http_server::{
        app::HttpServerConfig,
        http_routes::movies::{NewActor, NewMovie},
    },
    logging::init_tracing,
    services::llm::build_text_generator,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The config file to use
    #[arg(short, long, env = "MOVIE_CATALOG_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. `info` or `movie_catalog=debug,tower_http=debug`
    #[arg(long, default_value = "info", global = true, env = "LOG_LEVEL")]
    log_level: String,

    /// OTLP gRPC endpoint to export traces to
    #[arg(long, env = "OTLP_ENDPOINT", global = true)]
    otlp_endpoint: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the HTTP API
    Serve {
        /// The port to run the server on (overrides the config file)
        #[arg(short, long, env = "MOVIE_CATALOG_PORT")]
        port: Option<u16>,

        /// SQLite database file (overrides the config file)
        #[arg(long, env = "MOVIE_CATALOG_DATABASE")]
        database: Option<String>,

        /// Groq API key used for summaries
        #[arg(long = "groq-api-key", env = "GROQ_API_KEY", hide_env_values = true)]
        groq_api_key: Option<String>,
    },
    /// Show a random movie from a running server
    Random {
        #[arg(long, default_value = "http://localhost:8000/", env = "MOVIE_CATALOG_API_URL")]
        api_url: Url,
    },
    /// Ask a running server for a movie summary
    Summarize {
        #[arg(short, long)]
        movie_id: i64,

        #[arg(long, default_value = "http://localhost:8000/", env = "MOVIE_CATALOG_API_URL")]
        api_url: Url,
    },
    /// Add a movie through a running server
    Add {
        #[arg(short, long)]
        title: String,

        #[arg(short, long)]
        year: i32,

        #[arg(short, long)]
        director: String,

        /// Actor name, repeat for each cast member
        #[arg(short, long = "actor")]
        actors: Vec<String>,

        #[arg(long, default_value = "http://localhost:8000/", env = "MOVIE_CATALOG_API_URL")]
        api_url: Url,
    },
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Create a default config file, if it doesn't exist
    CreateDefault,
    /// Print the path to the config file
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let tracer_provider = init_tracing(
        "movie-catalog",
        args.otlp_endpoint.as_deref(),
        &args.log_level,
    )?;

    let result = run(args).await;

    if let Some(provider) = tracer_provider {
        if let Err(e) = provider.shutdown() {
            log::warn!("Failed to flush traces: {}", e);
        }
    }

    result
}

async fn run(args: Args) -> Result<()> {
    log::debug!("Movie catalog starting");

    match args.command {
        Commands::Serve {
            port,
            database,
            groq_api_key,
        } => {
            let mut config = {
                if let Some(config) = args.config {
                    Config::from_file(&config)
                } else {
                    Config::load()
                }
            }
            .with_context(|| "Failed to load movie-catalog config")?;

            if let Some(database) = database {
                config.set_database(database);
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            config.llm.api_key = groq_api_key;

            let database = Arc::new(Database::open(&config.database_path()).await?);
            let text_generator = build_text_generator(&config.llm)?;

            log::info!("Starting HTTP server on port: {}", config.server.port);
            http_server::app::start(HttpServerConfig {
                port: config.server.port,
                database,
                text_generator,
            })
            .await?;
        }
        Commands::Random { api_url } => {
            let client = CatalogClient::new(api_url);
            let movie = client.random_movie().await?;
            print!("{}", render_movie(&movie));
        }
        Commands::Summarize { movie_id, api_url } => {
            let client = CatalogClient::new(api_url);
            let summary = client.generate_summary(movie_id).await?;
            println!("{summary}");
        }
        Commands::Add {
            title,
            year,
            director,
            actors,
            api_url,
        } => {
            let client = CatalogClient::new(api_url);
            let movie = client
                .create_movie(&NewMovie {
                    title,
                    year,
                    director,
                    actors: actors
                        .into_iter()
                        .map(|actor_name| NewActor { actor_name })
                        .collect(),
                })
                .await?;
            print!("{}", render_movie(&movie));
        }
        Commands::Config(config_commands) => match config_commands {
            ConfigCommands::CreateDefault => {
                log::debug!("Creating default config");
                let path = Config::create_default()?;
                println!("{}", path.display());
            }
            ConfigCommands::Path => match Config::config_path() {
                Some(path) => println!("{}", path.display()),
                None => println!("No default config path found"),
            },
        },
    }

    Ok(())
}
