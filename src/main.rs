use aws_topology_audit::config::{AuditConfig, OutputFormat, LOG_CONFIG_FILE};
use aws_topology_audit::logging::init_logging;
use aws_topology_audit::output::print_summary;
use aws_topology_audit::processing::build_report;
use aws_topology_audit::{check_for_duplicate_ids, get_scan_snapshot, write_report};
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    dotenv::dotenv().ok();
    init_logging(LOG_CONFIG_FILE)?;
    log::info!("#Start main()");

    let config = AuditConfig::from_env()?;

    // The scan shells out hundreds of times; keep it off the runtime threads.
    let scan_config = config.clone();
    let snapshot = tokio::task::spawn_blocking(move || {
        get_scan_snapshot(&scan_config).map_err(|e| e.to_string())
    })
    .await??;

    if let Err(e) = check_for_duplicate_ids(&snapshot) {
        log::warn!("{e}");
    }

    let report = build_report(&snapshot);
    write_report(&report, &config)?;

    // CSV goes to stdout; keep the summary out of it.
    if config.output_format == OutputFormat::Xlsx {
        print_summary(&report);
    }

    log::info!("#End main()");
    Ok(())
}
