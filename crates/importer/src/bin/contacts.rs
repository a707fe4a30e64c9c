use clap::{Parser, Subcommand};
use importer::{import_contacts, parse_contacts, write_contacts_csv};
use serde_json::json;
use std::{fs::File, io, path::PathBuf};
use storage::{Database, dto::contact::ImportResultData, repository::contact::ContactRepository};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "contacts-cli")]
#[command(about = "Import and export contacts as CSV", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Needed by every command except `import --validate-only`
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a CSV file (header row required, `email` column mandatory)
    Import {
        file: PathBuf,

        #[arg(long)]
        owner: Uuid,

        /// Parse and validate rows without writing anything
        #[arg(long)]
        validate_only: bool,
    },
    /// Write an owner's contacts as CSV
    Export {
        #[arg(long)]
        owner: Uuid,

        /// Defaults to stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("contacts_cli={},importer={},storage={}", log_level, log_level, log_level)
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match cli.command {
        Commands::Import {
            file,
            owner,
            validate_only,
        } => {
            handle_import(file, owner, validate_only, cli.database_url.as_deref()).await?;
        }
        Commands::Export { owner, output } => {
            handle_export(owner, output, cli.database_url.as_deref()).await?;
        }
    }

    Ok(())
}

async fn handle_import(
    file: PathBuf,
    owner: Uuid,
    validate_only: bool,
    database_url: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Reading {}", file.display());
    let bytes = tokio::fs::read(&file).await?;

    if validate_only {
        let collected = parse_contacts(&bytes)?;
        tracing::info!(
            "Validation only: {} valid row(s), {} error(s)",
            collected.accepted.len(),
            collected.errors.len()
        );
        let summary = json!({
            "valid": collected.accepted.len(),
            "errors": collected.errors,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let db = connect(database_url).await?;
    let report = import_contacts(&db, owner, Some(bytes.as_slice())).await?;

    tracing::info!(
        "Imported {} contact(s) with {} error(s)",
        report.imported,
        report.errors.len()
    );
    println!(
        "{}",
        serde_json::to_string_pretty(&ImportResultData::from(report))?
    );

    Ok(())
}

async fn handle_export(
    owner: Uuid,
    output: Option<PathBuf>,
    database_url: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = connect(database_url).await?;
    let contacts = ContactRepository::new(db.pool()).list(owner).await?;

    match output {
        Some(path) => {
            write_contacts_csv(&contacts, File::create(&path)?)?;
            tracing::info!("Exported {} contact(s) to {}", contacts.len(), path.display());
        }
        None => write_contacts_csv(&contacts, io::stdout().lock())?,
    }

    Ok(())
}

fn require_database_url(database_url: Option<&str>) -> Result<&str, &'static str> {
    database_url.ok_or("--database-url or DATABASE_URL is required for this command")
}

async fn connect(database_url: Option<&str>) -> Result<Database, Box<dyn std::error::Error>> {
    let db = Database::new(require_database_url(database_url)?).await?;
    db.run_migrations().await?;
    tracing::info!("Connected to database");
    Ok(db)
}
