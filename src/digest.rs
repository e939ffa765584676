//! Merges the owned and paired story sets into the final report.
//!
//! The tracker cannot OR the owner and pairing-partner fields in a single
//! query, so the two result sets arrive separately and may overlap. Each is
//! run through the acceptance filter, then unioned by story id with the owned
//! copy taking precedence.

use std::collections::HashSet;

use chrono::{Duration, NaiveDateTime};

use crate::model::report::{Report, ReportEntry, RoleSet};
use crate::model::work_item::WorkItem;
use crate::util::date::CompletionDate;

pub const ACCEPTED_STATE: &str = "Accepted";

/// Lower bound on completion time, inclusive. A window reaching past the
/// earliest representable time admits everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookbackWindow {
    cutoff: NaiveDateTime,
}

impl LookbackWindow {
    pub fn new(now: NaiveDateTime, days: u32) -> Self {
        Self {
            cutoff: now
                .checked_sub_signed(Duration::days(i64::from(days)))
                .unwrap_or(NaiveDateTime::MIN),
        }
    }

    pub fn cutoff(&self) -> NaiveDateTime {
        self.cutoff
    }

    pub fn admits(&self, at: NaiveDateTime) -> bool {
        at >= self.cutoff
    }
}

/// An item that passed the acceptance filter, with its parsed completion time.
#[derive(Debug, Clone, PartialEq)]
pub struct Admitted {
    pub item: WorkItem,
    pub completed_at: NaiveDateTime,
}

/// Returns the parsed completion time if `item` is accepted and recent.
///
/// A missing or unparseable completion date is "not recent", never an error.
pub fn acceptance(item: &WorkItem, window: &LookbackWindow) -> Option<NaiveDateTime> {
    if item.status.as_deref() != Some(ACCEPTED_STATE) {
        return None;
    }
    CompletionDate::parse(item.completed_at.as_deref())
        .instant()
        .filter(|at| window.admits(*at))
}

pub fn acceptance_filter(items: Vec<WorkItem>, window: &LookbackWindow) -> Vec<Admitted> {
    items
        .into_iter()
        .filter_map(|item| {
            acceptance(&item, window).map(|completed_at| Admitted { item, completed_at })
        })
        .collect()
}

/// Union of two admitted sets keyed by id; the first occurrence wins.
pub fn merge_unique(owned: Vec<Admitted>, paired: Vec<Admitted>) -> Vec<Admitted> {
    let mut seen: HashSet<String> = HashSet::with_capacity(owned.len() + paired.len());
    owned
        .into_iter()
        .chain(paired)
        .filter(|admitted| seen.insert(admitted.item.id.clone()))
        .collect()
}

/// Heuristic role attribution by display-name substring.
///
/// Substring matching can misfire when one name is contained in another
/// ("Al" inside "Alice"); exact matching on account ids would need the
/// tracker to return them for the pairing field.
pub fn attribute_role(caller: &str, primary: Option<&str>, secondary: Option<&str>) -> RoleSet {
    let matches =
        |name: Option<&str>| !caller.is_empty() && name.is_some_and(|n| n.contains(caller));
    let role = RoleSet::new(matches(primary), matches(secondary));
    if role.primary || role.pairing {
        role
    } else {
        RoleSet::new(true, false)
    }
}

pub fn build_report(
    owned: Vec<WorkItem>,
    paired: Vec<WorkItem>,
    caller: &str,
    window: &LookbackWindow,
) -> Report {
    let owned = acceptance_filter(owned, window);
    let paired = acceptance_filter(paired, window);

    let mut merged = merge_unique(owned, paired);
    merged.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));

    let entries = merged
        .into_iter()
        .map(|Admitted { item, completed_at }| {
            let role = attribute_role(
                caller,
                item.primary_owner.as_deref(),
                item.secondary_owner.as_deref(),
            );
            ReportEntry {
                item,
                completed: CompletionDate::At(completed_at),
                role,
            }
        })
        .collect();

    Report::new(entries)
}
