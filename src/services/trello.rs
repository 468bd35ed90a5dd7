//! Trello board client.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::config::BoardConfig;
use crate::error::{Result, ServiceError};
use crate::tasks::{ListMapping, MemberRef, TaskRecord};

use super::{check_status, http_client, present, MemberDirectory, NewTask, TaskSource};

const SERVICE: &str = "Trello";

/// Trello REST client.
pub struct TrelloClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    token: Option<String>,
    board_id: Option<String>,
    lists: ListMapping,
}

/// Card as returned by the Trello API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCard {
    id: String,
    name: String,
    #[serde(default)]
    desc: String,
    due: Option<String>,
    id_list: String,
    #[serde(default)]
    id_members: Vec<String>,
    date_last_activity: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMember {
    id: String,
    full_name: String,
    #[serde(default)]
    initials: String,
    #[serde(default)]
    username: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateCard<'a> {
    name: &'a str,
    desc: String,
    id_list: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    due: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    id_members: Vec<&'a str>,
}

impl RawCard {
    /// Convert to a record. An unreadable due date is logged and left unset.
    fn into_record(self, lists: &ListMapping) -> TaskRecord {
        let due = self.due.as_deref().and_then(|raw| match DateTime::parse_from_rfc3339(raw) {
            Ok(due) => Some(due.with_timezone(&Utc)),
            Err(e) => {
                tracing::warn!(card_id = %self.id, due = raw, error = %e, "Ignoring malformed due date");
                None
            }
        });

        let mut record = TaskRecord::new(&self.id, self.name, self.id_list, lists)
            .with_description(self.desc);
        if let Some(due) = due {
            record = record.with_due(due);
        }
        if let Some(owner) = self.id_members.into_iter().next() {
            record = record.with_owner(owner);
        }
        if let Some(created_at) = card_created_at(&self.id) {
            record = record.with_created_at(created_at);
        }
        if let Some(activity) = self
            .date_last_activity
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        {
            record = record.with_last_activity(activity.with_timezone(&Utc));
        }
        record
    }
}

/// Decode cards one at a time. A card that does not match the expected
/// shape is logged and skipped.
fn cards_to_records(cards: Vec<serde_json::Value>, lists: &ListMapping) -> Vec<TaskRecord> {
    cards
        .into_iter()
        .filter_map(|value| {
            let card_id = value.get("id").and_then(|id| id.as_str()).map(str::to_string);
            match serde_json::from_value::<RawCard>(value) {
                Ok(card) => Some(card.into_record(lists)),
                Err(e) => {
                    tracing::warn!(card_id = ?card_id, error = %e, "Skipping malformed card");
                    None
                }
            }
        })
        .collect()
}

impl From<RawMember> for MemberRef {
    fn from(member: RawMember) -> Self {
        Self {
            id: member.id,
            name: member.full_name,
            initials: member.initials,
            username: member.username,
        }
    }
}

/// Creation time encoded in a Trello object id.
///
/// The first eight hex digits of the id are a Unix timestamp in seconds.
pub fn card_created_at(id: &str) -> Option<DateTime<Utc>> {
    let prefix = id.get(..8)?;
    let seconds = i64::from_str_radix(prefix, 16).ok()?;
    DateTime::from_timestamp(seconds, 0)
}

impl TrelloClient {
    pub fn from_config(config: &BoardConfig) -> Result<Self> {
        Ok(Self {
            client: http_client(SERVICE, config.timeout_secs)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            token: config.token.clone(),
            board_id: config.board_id.clone(),
            lists: ListMapping::from_config(config),
        })
    }

    fn auth(&self) -> Result<[(&'static str, &str); 2]> {
        match (present(&self.api_key), present(&self.token)) {
            (Some(key), Some(token)) => Ok([("key", key), ("token", token)]),
            _ => Err(ServiceError::not_configured(SERVICE, "API credentials not configured").into()),
        }
    }

    fn board_id(&self) -> Result<&str> {
        present(&self.board_id)
            .ok_or_else(|| ServiceError::not_configured(SERVICE, "board id not configured").into())
    }

    async fn decode<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        response
            .json()
            .await
            .map_err(|e| ServiceError::from_reqwest(SERVICE, e).into())
    }
}

#[async_trait]
impl MemberDirectory for TrelloClient {
    async fn resolve_member(&self, member_id: &str) -> Result<Option<MemberRef>> {
        let auth = self.auth()?;
        let url = format!("{}/members/{}", self.base_url, member_id);

        let response = self
            .client
            .get(&url)
            .query(&auth)
            .send()
            .await
            .map_err(|e| ServiceError::from_reqwest(SERVICE, e))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = check_status(SERVICE, response).await?;
        let member: RawMember = Self::decode(response).await?;
        Ok(Some(member.into()))
    }
}

#[async_trait]
impl TaskSource for TrelloClient {
    async fn fetch_tasks(&self) -> Result<Vec<TaskRecord>> {
        let auth = self.auth()?;
        let url = format!("{}/boards/{}/cards", self.base_url, self.board_id()?);

        let response = self
            .client
            .get(&url)
            .query(&auth)
            .send()
            .await
            .map_err(|e| ServiceError::from_reqwest(SERVICE, e))?;
        let response = check_status(SERVICE, response).await?;
        let cards: Vec<serde_json::Value> = Self::decode(response).await?;

        let total = cards.len();
        let records = cards_to_records(cards, &self.lists);
        tracing::debug!(total, kept = records.len(), "Fetched board cards");

        Ok(records)
    }

    async fn create_task(&self, task: NewTask) -> Result<TaskRecord> {
        let auth = self.auth()?;
        let list_id = self
            .lists
            .todo_list()
            .ok_or_else(|| ServiceError::not_configured(SERVICE, "to-do list id not configured"))?;

        let body = CreateCard {
            name: &task.title,
            desc: task.card_description(),
            id_list: list_id,
            due: task.due.map(|d| d.to_rfc3339()),
            id_members: task.owner_id.as_deref().into_iter().collect(),
        };

        let response = self
            .client
            .post(format!("{}/cards", self.base_url))
            .query(&auth)
            .json(&body)
            .send()
            .await
            .map_err(|e| ServiceError::from_reqwest(SERVICE, e))?;
        let response = check_status(SERVICE, response).await?;
        let card: RawCard = Self::decode(response).await?;
        let card_id = card.id.clone();

        let record = card.into_record(&self.lists).ok_or_else(|| ServiceError::Decode {
            service: SERVICE,
            detail: format!("created card {} has an unreadable due date", card_id),
        })?;
        tracing::info!(card_id = %record.id, title = %record.title, "Created card");
        Ok(record)
    }

    async fn add_comment(&self, task_id: &str, text: &str) -> Result<()> {
        let auth = self.auth()?;
        let url = format!("{}/cards/{}/actions/comments", self.base_url, task_id);

        let response = self
            .client
            .post(&url)
            .query(&auth)
            .query(&[("text", text)])
            .send()
            .await
            .map_err(|e| ServiceError::from_reqwest(SERVICE, e))?;
        check_status(SERVICE, response).await?;
        Ok(())
    }
}
