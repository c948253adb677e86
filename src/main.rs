// ==========================================
// Trade Import - CLI Entry Point
// ==========================================
// Runs one import job end to end against a local object-storage root
// and a SQLite database, printing the job summary as JSON.
// ==========================================

use trade_import::api::{ErrorPayload, ImportApi, ImportJobRequest};
use trade_import::config::ImportConfig;
use trade_import::importer::CancellationToken;
use trade_import::storage::LocalFileStorage;

struct CliArgs {
    db_path: String,
    org_id: String,
    storage_root: String,
    bucket: String,
    object_path: String,
}

fn usage() -> ! {
    eprintln!(
        "usage: trade-import <db-path> <org-id> <storage-root> <bucket> <object-path>\n\
         \n\
         Imports <storage-root>/<bucket>/<object-path> (.csv/.xlsx/.xls)\n\
         into the shipments table of <db-path>, scoped to <org-id>."
    );
    std::process::exit(2);
}

fn parse_args() -> CliArgs {
    let mut args = std::env::args().skip(1);
    let mut next = || args.next().unwrap_or_else(|| usage());
    let parsed = CliArgs {
        db_path: next(),
        org_id: next(),
        storage_root: next(),
        bucket: next(),
        object_path: next(),
    };
    if args.next().is_some() {
        usage();
    }
    parsed
}

#[tokio::main]
async fn main() {
    trade_import::logging::init();

    tracing::info!("trade-import v{}", trade_import::VERSION);

    let args = parse_args();
    let api = ImportApi::new(
        args.db_path,
        LocalFileStorage::new(args.storage_root),
        ImportConfig::default(),
    );

    let request = ImportJobRequest {
        job_id: None,
        org_id: args.org_id,
        bucket: args.bucket,
        object_path: args.object_path,
    };

    match api.run_import(request, &CancellationToken::new()).await {
        Ok(summary) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&summary)
                    .unwrap_or_else(|_| "{}".to_string())
            );
        }
        Err(err) => {
            let payload = ErrorPayload::from_error(&err);
            eprintln!(
                "{}",
                serde_json::to_string_pretty(&payload)
                    .unwrap_or_else(|_| err.to_string())
            );
            std::process::exit(1);
        }
    }
}
