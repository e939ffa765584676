use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::warn;

use super::{OwnerRole, Tracker, UserRef};
use crate::config::RallyConfig;
use crate::model::work_item::WorkItem;

const API_ROOT: &str = "slm/webservice/v2.0";
const PAGE_SIZE: u32 = 200;
const ORDER: &str = "AcceptedDate DESC";
const BASE_FIELDS: &str = "FormattedID,Name,AcceptedDate,PlanEstimate,Owner,Project,ScheduleState";

pub struct RallyProvider {
    base_url: String,
    api_key: String,
    pairing_field: String,
    client: reqwest::Client,
}

impl RallyProvider {
    pub fn new(config: &RallyConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            pairing_field: config.pairing_field.clone(),
            client: reqwest::Client::new(),
        }
    }

    fn get(&self, resource: &str) -> reqwest::RequestBuilder {
        self.client
            .get(format!("{}/{API_ROOT}/{resource}", self.base_url))
            .header("ZSESSIONID", &self.api_key)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
    }

    /// Query parameters for one ownership field. The WSAPI rejects an OR
    /// across `Owner` and a custom field, hence one query per role.
    pub(crate) fn story_query(
        &self,
        user: &UserRef,
        role: OwnerRole,
    ) -> Vec<(&'static str, String)> {
        let field = match role {
            OwnerRole::Primary => "Owner",
            OwnerRole::Pairing => self.pairing_field.as_str(),
        };
        vec![
            ("query", format!("({field}.ObjectID = {})", user.object_id)),
            ("fetch", format!("{BASE_FIELDS},{}", self.pairing_field)),
            ("pagesize", PAGE_SIZE.to_string()),
            ("order", ORDER.to_string()),
        ]
    }
}

#[derive(Deserialize)]
pub(crate) struct UserEnvelope {
    #[serde(rename = "User")]
    user: Option<RallyUser>,
}

#[derive(Deserialize)]
struct RallyUser {
    #[serde(rename = "ObjectID")]
    object_id: Option<ObjectId>,
    #[serde(rename = "DisplayName")]
    display_name: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ObjectId {
    Number(u64),
    Text(String),
}

impl ObjectId {
    fn into_string(self) -> String {
        match self {
            ObjectId::Number(n) => n.to_string(),
            ObjectId::Text(s) => s,
        }
    }
}

#[derive(Deserialize)]
pub(crate) struct QueryEnvelope {
    #[serde(rename = "QueryResult")]
    query_result: Option<QueryResult>,
}

#[derive(Deserialize)]
struct QueryResult {
    #[serde(rename = "Results", default)]
    results: Vec<Story>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Story {
    #[serde(rename = "FormattedID")]
    formatted_id: Option<String>,
    name: Option<String>,
    accepted_date: Option<String>,
    plan_estimate: Option<f64>,
    schedule_state: Option<String>,
    owner: Option<RefObject>,
    project: Option<RefObject>,
    /// Custom fields, including the pairing partner, land here.
    #[serde(flatten)]
    extra: HashMap<String, Value>,
}

#[derive(Deserialize)]
struct RefObject {
    #[serde(rename = "_refObjectName")]
    name: Option<String>,
}

pub(crate) fn decode_user(envelope: UserEnvelope) -> Result<UserRef> {
    let user = envelope.user.context("Rally user response has no User object")?;
    let object_id = user
        .object_id
        .context("Rally user response has no ObjectID")?
        .into_string();
    Ok(UserRef {
        object_id,
        display_name: user.display_name,
    })
}

/// Map a result page into work items. Records without a `FormattedID`
/// cannot be deduplicated and are dropped.
pub(crate) fn decode_stories(envelope: QueryEnvelope, pairing_field: &str) -> Vec<WorkItem> {
    let stories = envelope
        .query_result
        .map(|qr| qr.results)
        .unwrap_or_default();

    stories
        .into_iter()
        .filter_map(|story| {
            let Some(id) = story.formatted_id.filter(|id| !id.trim().is_empty()) else {
                warn!(
                    name = story.name.as_deref().unwrap_or(""),
                    "skipping Rally record without FormattedID"
                );
                return None;
            };

            let secondary_owner = story
                .extra
                .get(pairing_field)
                .and_then(|v| v.get("_refObjectName"))
                .and_then(Value::as_str)
                .map(String::from);

            Some(WorkItem {
                id,
                title: story.name.unwrap_or_default(),
                completed_at: story.accepted_date,
                effort: story.plan_estimate,
                status: story.schedule_state,
                primary_owner: story.owner.and_then(|o| o.name),
                secondary_owner,
                project: story.project.and_then(|p| p.name),
            })
        })
        .collect()
}

#[async_trait]
impl Tracker for RallyProvider {
    fn name(&self) -> &str {
        "Rally"
    }

    async fn resolve_user(&self) -> Result<UserRef> {
        let envelope: UserEnvelope = self
            .get("user")
            .query(&[("fetch", "ObjectID,DisplayName")])
            .send()
            .await
            .context("Rally user request failed")?
            .error_for_status()
            .context("Rally rejected the user request")?
            .json()
            .await
            .context("Failed to parse Rally user response")?;

        decode_user(envelope)
    }

    async fn fetch_items(&self, user: &UserRef, role: OwnerRole) -> Result<Vec<WorkItem>> {
        let envelope: QueryEnvelope = self
            .get("hierarchicalrequirement")
            .query(&self.story_query(user, role))
            .send()
            .await
            .context("Rally story query failed")?
            .error_for_status()
            .context("Rally rejected the story query")?
            .json()
            .await
            .context("Failed to parse Rally story response")?;

        Ok(decode_stories(envelope, &self.pairing_field))
    }
}
