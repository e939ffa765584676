pub mod smtp;

use anyhow::Result;
use async_trait::async_trait;

use crate::render::REPORT_NAME;

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one HTML message to the configured recipient. No retries.
    async fn send(&self, subject: &str, html: String) -> Result<()>;
    fn recipient(&self) -> &str;
}

pub fn subject_line(count: usize) -> String {
    format!("{REPORT_NAME} - {count} Story(ies)")
}
