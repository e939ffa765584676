use std::path::PathBuf;

use chrono::NaiveDateTime;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::digest::{self, LookbackWindow};
use crate::error::ReportError;
use crate::model::report::Report;
use crate::model::work_item::WorkItem;
use crate::notify::{subject_line, Notifier};
use crate::providers::{OwnerRole, Tracker, UserRef};
use crate::render::render_html;

const PREVIEW_LIMIT: usize = 10;
const PREVIEW_TITLE_CHARS: usize = 60;

#[derive(Debug, Default, Clone)]
pub struct RunOptions {
    pub dry_run: bool,
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub count: usize,
    pub total_effort: f64,
    pub delivered: bool,
}

/// Raw results of the two ownership queries.
pub struct Candidates {
    pub owned: Vec<WorkItem>,
    pub paired: Vec<WorkItem>,
}

/// One full report run: resolve, fetch, merge, render, send.
pub async fn run(
    config: &AppConfig,
    tracker: &dyn Tracker,
    notifier: &dyn Notifier,
    now: NaiveDateTime,
    options: &RunOptions,
) -> Result<RunSummary, ReportError> {
    info!(
        tracker = tracker.name(),
        user = %config.rally.username,
        days = config.days_back,
        "starting accepted story report"
    );

    let user = tracker
        .resolve_user()
        .await
        .map_err(ReportError::Upstream)?;
    info!(
        object_id = %user.object_id,
        display_name = user.display_name.as_deref().unwrap_or("unknown"),
        "resolved tracker account"
    );

    let candidates = fetch_candidates(tracker, &user).await?;

    let window = LookbackWindow::new(now, config.days_back);
    let report = digest::build_report(
        candidates.owned,
        candidates.paired,
        &config.rally.username,
        &window,
    );
    info!(
        cutoff = %window.cutoff(),
        count = report.count(),
        "accepted stories in the last {} days",
        config.days_back
    );
    log_preview(&report);

    let html = render_html(&report);

    if let Some(path) = &options.output {
        std::fs::write(path, &html).map_err(|source| ReportError::Output {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), "wrote report");
    }

    let summary = RunSummary {
        count: report.count(),
        total_effort: report.total_effort,
        delivered: false,
    };

    if options.dry_run {
        info!("dry run, not sending email");
        return Ok(summary);
    }

    let subject = subject_line(report.count());
    notifier
        .send(&subject, html)
        .await
        .map_err(ReportError::Delivery)?;
    info!(
        recipient = notifier.recipient(),
        count = report.count(),
        "email sent"
    );

    Ok(RunSummary {
        delivered: true,
        ..summary
    })
}

/// Issue both ownership queries. The owned query is required; the pairing
/// query targets a custom field that may not exist, so its failure degrades
/// to an empty set.
pub async fn fetch_candidates(
    tracker: &dyn Tracker,
    user: &UserRef,
) -> Result<Candidates, ReportError> {
    let owned = tracker
        .fetch_items(user, OwnerRole::Primary)
        .await
        .map_err(ReportError::Upstream)?;
    info!(count = owned.len(), "fetched owned stories");

    let paired = match tracker.fetch_items(user, OwnerRole::Pairing).await {
        Ok(items) => {
            info!(count = items.len(), "fetched pairing-partner stories");
            items
        }
        Err(err) => {
            warn!("{}", ReportError::SecondaryQuery(err));
            Vec::new()
        }
    };

    Ok(Candidates { owned, paired })
}

fn log_preview(report: &Report) {
    for entry in report.entries.iter().take(PREVIEW_LIMIT) {
        let title: String = entry.item.title.chars().take(PREVIEW_TITLE_CHARS).collect();
        match &entry.item.project {
            Some(project) => info!("  - {}: {title} [{project}]", entry.item.id),
            None => info!("  - {}: {title}", entry.item.id),
        }
    }
    if report.count() > PREVIEW_LIMIT {
        info!("  ... and {} more", report.count() - PREVIEW_LIMIT);
    }
}
