// admin/main.rs - maintains the per-domain allow-lists of users

use allowlist_database::{
    store::{
        firestore::{FirestoreConfig, DEFAULT_DATABASE},
        FirestoreStore, MongoStore,
    },
    CredentialsError, DomainStore,
};
use clap::{Parser, Subcommand, ValueEnum};
use dotenvy::dotenv;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::subscriber::set_global_default;
use tracing::{debug, info};
use tracing_log::LogTracer;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

mod commands;
mod config;
mod error;

use config::{load_config, EnvironmentConfig};
use error::AdminError;

#[derive(Parser, Debug)]
#[clap(name = "allowlist")]
struct Args {
    #[clap(subcommand)]
    subcommand: Subcommands,
    #[arg(short, long, env = "ENVIRONMENT", default_value = "local")]
    environment: String,
    /// Per-environment settings file
    #[arg(long, env = "ALLOWLIST_CONFIG", default_value = "./crates/admin/config.toml")]
    config: PathBuf,
    #[arg(long, env = "ALLOWLIST_STORE", value_enum, default_value_t = StoreKind::Firestore)]
    store: StoreKind,
    /// Firestore service account key
    #[arg(
        long,
        env = "GOOGLE_APPLICATION_CREDENTIALS",
        default_value = "serviceAccountKey.json"
    )]
    credentials: PathBuf,
    #[arg(long, env = "FIRESTORE_PROJECT_ID")]
    project_id: Option<String>,
    #[arg(long, env = "FIRESTORE_DATABASE")]
    firestore_database: Option<String>,
    #[arg(long, env = "FIRESTORE_EMULATOR_HOST")]
    emulator_host: Option<String>,
    /// Database URI and Name, used with --store mongodb
    #[arg(
        long,
        env = "DATABASE_URI",
        default_value = "mongodb://localhost:27017"
    )]
    database_uri: String,
    #[arg(long, env = "DATABASE_NAME")]
    database_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StoreKind {
    Firestore,
    Mongodb,
}

#[derive(Debug, Subcommand)]
enum Subcommands {
    /// Add users given as email/name pairs
    #[clap(name = "add")]
    Add {
        domain_id: String,
        // email1 name1 [email2 name2 ...]; a trailing email uses itself as the name
        #[arg(required = true, num_args = 2.., value_name = "EMAIL NAME")]
        users: Vec<String>,
    },
    /// Add users from a CSV file with an `email,name` header
    #[clap(name = "add-csv")]
    AddCsv { domain_id: String, csv_path: PathBuf },
    /// List the allowed users of a domain
    #[clap(name = "list")]
    List { domain_id: String },
    /// Remove users by email
    #[clap(name = "remove")]
    Remove {
        domain_id: String,
        #[arg(required = true, value_name = "EMAIL")]
        emails: Vec<String>,
    },
    /// Check whether an email is allowed on a domain
    #[clap(name = "check")]
    Check { domain_id: String, email: String },
}

fn init_tracing() -> Result<(), AdminError> {
    // Adds log tracer as the default tracer for the log crate
    LogTracer::init().map_err(|e| AdminError::Tracing(e.to_string()))?;

    // Console output is for command results, so only warnings are logged by default
    let env_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .map_err(|e| AdminError::Tracing(e.to_string()))?;
    let fmt_layer = fmt::layer().with_target(true).with_writer(io::stderr);
    let subscriber = Registry::default().with(env_layer).with(fmt_layer);

    set_global_default(subscriber).map_err(|e| AdminError::Tracing(e.to_string()))
}

fn console_url(project_id: Option<&str>) -> String {
    format!(
        "https://console.firebase.google.com/project/{}/settings/serviceaccounts/adminsdk",
        project_id.unwrap_or("_")
    )
}

// Runs before any command: checks credentials and opens the store handle
async fn open_store(
    args: &Args,
    environment: &EnvironmentConfig,
) -> Result<Box<dyn DomainStore>, AdminError> {
    match args.store {
        StoreKind::Firestore => {
            let config = FirestoreConfig {
                credentials_path: args.credentials.clone(),
                project_id: args
                    .project_id
                    .clone()
                    .or_else(|| environment.project_id.clone()),
                database: args
                    .firestore_database
                    .clone()
                    .or_else(|| environment.database.clone())
                    .unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
                emulator_host: args.emulator_host.clone(),
            };

            let store = match FirestoreStore::connect(&config).await {
                Ok(store) => store,
                Err(CredentialsError::NotFound(path)) => {
                    return Err(AdminError::MissingCredentials {
                        path,
                        console_url: console_url(config.project_id.as_deref()),
                    })
                }
                Err(e) => return Err(e.into()),
            };

            println!("Connected to Firestore project {}", store.project_id());
            Ok(Box::new(store))
        }
        StoreKind::Mongodb => {
            let database_name = args
                .database_name
                .clone()
                .or_else(|| environment.database_name.clone())
                .unwrap_or_else(|| "allowlist".to_string());

            // Create database client
            let store = MongoStore::connect(&args.database_uri, &database_name).await?;
            info!("Using MongoDB database {}", database_name);
            Ok(Box::new(store))
        }
    }
}

async fn run(args: Args) -> Result<ExitCode, AdminError> {
    // Load the config file
    let config = load_config(&args.config)?;
    let environment = config.environment(&args.environment);
    debug!("Environment {}: {:?}", args.environment, environment);

    let store = open_store(&args, &environment).await?;
    let store = store.as_ref();
    let mut out = io::stdout().lock();

    // Perform subcommand logic
    match &args.subcommand {
        Subcommands::Add { domain_id, users } => {
            commands::add(store, &mut out, domain_id, users).await?;
        }
        Subcommands::AddCsv {
            domain_id,
            csv_path,
        } => {
            commands::add_csv(store, &mut out, domain_id, csv_path).await?;
        }
        Subcommands::List { domain_id } => {
            commands::list(store, &mut out, domain_id).await?;
        }
        Subcommands::Remove { domain_id, emails } => {
            commands::remove(store, &mut out, domain_id, emails).await?;
        }
        Subcommands::Check { domain_id, email } => {
            if !commands::check(store, &mut out, domain_id, email).await? {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables from .env file
    dotenv().ok();

    // Parse CLI args, using ENV vars if not provided
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // Usage goes to stdout; --help and --version are not failures
            print!("{}", e.render());
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    if let Err(e) = init_tracing() {
        eprintln!("{}", e);
    }

    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            println!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
