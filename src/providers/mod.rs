pub mod rally;

use anyhow::Result;
use async_trait::async_trait;

use crate::model::work_item::WorkItem;

/// The account the report is generated for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRef {
    /// Opaque id used to scope story queries.
    pub object_id: String,
    pub display_name: Option<String>,
}

/// Which ownership field a story query filters on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerRole {
    Primary,
    Pairing,
}

#[async_trait]
pub trait Tracker: Send + Sync {
    fn name(&self) -> &str;
    async fn resolve_user(&self) -> Result<UserRef>;
    /// Stories where `user` holds `role`. Only the first page is returned.
    async fn fetch_items(&self, user: &UserRef, role: OwnerRole) -> Result<Vec<WorkItem>>;
}

#[cfg(test)]
pub mod tests;
