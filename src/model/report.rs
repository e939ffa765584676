use std::fmt;

use crate::model::work_item::WorkItem;
use crate::util::date::CompletionDate;

/// Which of the caller's roles a story was attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoleSet {
    pub primary: bool,
    pub pairing: bool,
}

impl RoleSet {
    pub fn new(primary: bool, pairing: bool) -> Self {
        Self { primary, pairing }
    }
}

impl fmt::Display for RoleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.primary, self.pairing) {
            (true, true) => f.write_str("Primary & Pairing Partner"),
            (false, true) => f.write_str("Pairing Partner"),
            // An unattributed story still came from one of our queries.
            _ => f.write_str("Primary"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportEntry {
    pub item: WorkItem,
    pub completed: CompletionDate,
    pub role: RoleSet,
}

/// Final, ordered view handed to the renderer and the notifier.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Report {
    pub entries: Vec<ReportEntry>,
    pub total_effort: f64,
}

impl Report {
    pub fn new(entries: Vec<ReportEntry>) -> Self {
        let total_effort = entries.iter().map(|e| e.item.effort_points()).sum();
        Self {
            entries,
            total_effort,
        }
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
