/// A story as returned by the tracker, before any filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkItem {
    /// Human-readable id (e.g. `US1234`), used as the dedup key.
    pub id: String,
    pub title: String,
    /// Raw completion timestamp as delivered upstream.
    pub completed_at: Option<String>,
    pub effort: Option<f64>,
    pub status: Option<String>,
    pub primary_owner: Option<String>,
    pub secondary_owner: Option<String>,
    pub project: Option<String>,
}

impl WorkItem {
    /// Story points, with absent, negative or non-finite values counted as zero.
    pub fn effort_points(&self) -> f64 {
        self.effort
            .filter(|points| points.is_finite() && *points > 0.0)
            .unwrap_or(0.0)
    }
}
