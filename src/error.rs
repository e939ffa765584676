use std::path::PathBuf;
use thiserror::Error;

/// Failures of a report run after configuration has been loaded.
///
/// `SecondaryQuery` is logged and swallowed by the pipeline; every other
/// variant ends the run.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("tracking service request failed: {0:#}")]
    Upstream(anyhow::Error),
    #[error("pairing-partner query failed, continuing with owned stories only: {0:#}")]
    SecondaryQuery(anyhow::Error),
    #[error("failed to send report email: {0:#}")]
    Delivery(anyhow::Error),
    #[error("failed to write report to {}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
