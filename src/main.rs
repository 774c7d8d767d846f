use crate::config::Settings;
use crate::errors::{AppError, AppResult};
use crate::geo::{CoordinateResolver, NominatimGeocoder};
use crate::lifecycle::OfferManager;
use crate::store::RecordStore;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

mod config;
mod domain;
mod errors;
mod geo;
mod lifecycle;
mod parsing;
mod purchases;
mod replies;
mod spreadsheets;
mod store;

#[cfg(test)]
mod tests;

/// Match surplus school food to nearby receiving entities and track pickups.
#[derive(Debug, Parser)]
#[command(name = "surplus-match", version)]
struct Cli {
    /// TOML settings file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Overrides `store.data_dir`
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Never call the geocoder; only stored coordinates are used
    #[arg(long, global = true)]
    offline: bool,

    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create an offer from an issue title and body
    Publish {
        #[arg(long)]
        offer_id: String,
        #[arg(long, default_value = "")]
        title: String,
        #[command(flatten)]
        body: TextInput,
    },
    /// Apply a `/reserve` or `/collect` comment to an offer
    Update {
        #[arg(long)]
        offer_id: String,
        #[command(flatten)]
        comment: TextInput,
    },
    /// Write the collection history as an .xlsx workbook
    ExportHistory {
        #[arg(long)]
        output: PathBuf,
    },
    /// Refresh the list of purchased lots that may expire, from the SIGPC feed
    ImportSigpc {
        /// Read a saved XML export instead of downloading the feed
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

/// Inline text or a file to read it from.
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
struct TextInput {
    #[arg(long)]
    text: Option<String>,
    #[arg(long)]
    file: Option<PathBuf>,
}

impl TextInput {
    fn read(&self) -> AppResult<String> {
        match (&self.text, &self.file) {
            (Some(text), _) => Ok(text.clone()),
            (None, Some(path)) => read_input(path),
            (None, None) => Ok(String::new()),
        }
    }
}

fn read_input(path: &Path) -> AppResult<String> {
    std::fs::read_to_string(path).map_err(|source| AppError::Input {
        path: path.to_path_buf(),
        source,
    })
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn build_resolver(settings: &Settings) -> AppResult<CoordinateResolver> {
    if !settings.geocoder.enabled {
        info!("Geocoder disabled; only stored coordinates will be used");
        return Ok(CoordinateResolver::offline());
    }
    let geocoder = NominatimGeocoder::new(&settings.geocoder)?;
    debug!("Geocoding via {}", geocoder.search_url());
    Ok(CoordinateResolver::new(
        Box::new(geocoder),
        settings.geocoder.rate_limit(),
    ))
}

fn run(cli: Cli) -> AppResult<()> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(dir) = cli.data_dir {
        settings.store.data_dir = dir;
    }
    if cli.offline {
        settings.geocoder.enabled = false;
    }

    let store = RecordStore::new(&settings.store);

    match cli.command {
        Command::Publish {
            offer_id,
            title,
            body,
        } => {
            let body = body.read()?;
            let resolver = build_resolver(&settings)?;
            let manager = OfferManager::new(&store, &resolver, &settings.matching);

            let outcome = manager.publish(&offer_id, &title, &body)?;
            println!("{}", replies::render_publish_reply(&outcome));
        }
        Command::Update { offer_id, comment } => {
            let comment = comment.read()?;
            // status updates never geocode
            let resolver = CoordinateResolver::offline();
            let manager = OfferManager::new(&store, &resolver, &settings.matching);

            let outcome = manager.apply_comment(&offer_id, &comment)?;
            if let Some(reply) = replies::render_status_reply(&offer_id, &outcome) {
                println!("{reply}");
            }
        }
        Command::ExportHistory { output } => {
            let records = store.history().read_all()?;
            spreadsheets::export_history_xlsx(&records, &output)?;
            info!(
                "Exported {} history row(s) to {}",
                records.len(),
                output.display()
            );
        }
        Command::ImportSigpc { file } => {
            let xml = match file {
                Some(path) => read_input(&path)?,
                None => purchases::fetch_feed(&settings.sigpc)?,
            };
            let lots = purchases::parse_purchases(&xml)?;
            let collection = store.expiring_stock();
            collection.save(&lots)?;
            info!(
                "Saved {} purchase lot(s) to {}",
                lots.len(),
                collection.path().display()
            );
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
