use std::path::Path;

use crate::commands::common::build_orchestrator;
use crate::error::CliError;

pub async fn run_sync(data_dir: &Path) -> Result<(), CliError> {
    let (orchestrator, _ledger) = build_orchestrator(data_dir)?;
    let report = orchestrator.sync_pending().await;
    tracing::debug!(
        attempted = report.attempted,
        succeeded = report.succeeded,
        "sync finished"
    );
    println!("{}", report.summary());
    Ok(())
}
