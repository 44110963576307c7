mod cli;
mod config;

use bomtrace::adapters::outbound::console::StderrTaskObserver;
use bomtrace::adapters::outbound::resolvers::DirectoryResolver;
use bomtrace::adapters::outbound::workers::all_workers;
use bomtrace::application::dto::CatalogRequest;
use bomtrace::application::factories::{FormatFactory, PresenterFactory, PresenterType};
use bomtrace::application::use_cases::{CatalogPackagesUseCase, ConvertInventoryUseCase};
use bomtrace::ports::outbound::{NoopTaskObserver, TaskObserver};
use bomtrace::shared::error::{CatalogError, ExitCode};
use bomtrace::shared::security::{validate_file_size, validate_regular_file, MAX_FILE_SIZE};
use bomtrace::shared::Result;
use cli::{Args, Command, ConvertArgs, ScanArgs};
use config::{discover_config, load_config_from_path};
use std::path::Path;
use std::process;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let args = Args::parse_args();
    init_tracing(args.verbose);

    match run(args).await {
        Ok(code) => process::exit(code.as_i32()),
        Err(e) => {
            eprintln!("\n❌ An error occurred:\n");
            eprintln!("{}", e);

            // Display error chain
            for cause in e.chain().skip(1) {
                eprintln!("\nCaused by: {}", cause);
            }

            eprintln!();
            let code = match e.downcast_ref::<CatalogError>() {
                Some(err) => err.exit_code(),
                None => ExitCode::ApplicationError,
            };
            process::exit(code.as_i32());
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(args: Args) -> Result<ExitCode> {
    match args.command {
        Command::Scan(scan) => run_scan(scan, args.quiet).await,
        Command::Convert(convert) => run_convert(convert),
    }
}

async fn run_scan(args: ScanArgs, quiet: bool) -> Result<ExitCode> {
    // Config file: explicit path, or discovered in the working directory
    let config_file = match &args.config {
        Some(path) => Some(load_config_from_path(path)?),
        None => discover_config(&std::env::current_dir()?)?,
    };
    let (cataloger_config, output) = args.resolve(config_file.as_ref());
    let format = FormatFactory::create(output.format_id())?;

    let resolver = DirectoryResolver::new(&args.path)?;
    let observer: Arc<dyn TaskObserver> = if quiet {
        Arc::new(NoopTaskObserver)
    } else {
        Arc::new(StderrTaskObserver::new())
    };

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, cancelling");
            trigger.cancel();
        }
    });

    let use_case = CatalogPackagesUseCase::new(all_workers(), observer);
    let request = CatalogRequest::new(&args.path, Arc::new(resolver), cataloger_config);
    let response = use_case.execute(request, cancel).await?;

    for conflict in &response.ownership_conflicts {
        tracing::info!(
            owned = %conflict.owned,
            candidates = conflict.candidates.len(),
            "ownership conflict"
        );
    }

    let encoded = format.encode(&response.inventory)?;
    PresenterFactory::create(PresenterType::from(args.file.clone())).present(&encoded)?;

    if let Some(error) = response.error() {
        eprintln!("⚠️  Warning: {}", error);
        return Ok(error.exit_code());
    }
    Ok(ExitCode::Success)
}

fn run_convert(args: ConvertArgs) -> Result<ExitCode> {
    let content = read_document(&args.input)?;
    let converted = ConvertInventoryUseCase::new().execute(&content, args.output.format_id())?;
    PresenterFactory::create(PresenterType::from(args.file)).present(&converted)?;
    Ok(ExitCode::Success)
}

fn read_document(path: &Path) -> Result<String> {
    let display = path.display().to_string();
    let metadata = validate_regular_file(path, &display)?;
    validate_file_size(metadata.len(), path, MAX_FILE_SIZE)?;
    std::fs::read_to_string(path).map_err(|e| {
        CatalogError::LocationRead {
            path: display,
            details: e.to_string(),
        }
        .into()
    })
}
