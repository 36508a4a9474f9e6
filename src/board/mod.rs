//! Board API client
//!
//! Thin HTTP client for the handful of board endpoints the importer needs:
//! listing existing cards on a list, creating cards, and fetching board
//! members/labels/lists for setup mode. No retries and no rate-limit
//! handling; failures surface to the caller.

use anyhow::{anyhow, Context, Result};
use serde_json::Value;

use crate::domain::dedup::ExistingCard;
use crate::domain::resolve::ResolvedTask;

const DEFAULT_BASE_URL: &str = "https://api.trello.com/1";

/// Marker written into the description of every imported card
pub const CARD_DESC: &str = "Imported from the project plan";

/// Client bound to one set of API credentials
#[derive(Clone)]
pub struct BoardClient {
    http: reqwest::Client,
    base_url: String,
    key: String,
    token: String,
}

impl BoardClient {
    pub fn new(key: impl Into<String>, token: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, key, token)
    }

    /// Creates a client against a non-default API base URL (tests)
    pub fn with_base_url(
        base_url: impl Into<String>,
        key: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            key: key.into(),
            token: token.into(),
        }
    }

    /// Fetches the cards currently on a list
    pub async fn list_cards(&self, list_id: &str) -> Result<Vec<ExistingCard>> {
        let url = format!("{}/lists/{}/cards", self.base_url, list_id);
        let response = self
            .http
            .get(&url)
            .query(&[("key", &self.key), ("token", &self.token)])
            .send()
            .await
            .with_context(|| format!("Failed to fetch existing cards from {}", url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!(
                "Fetching existing cards failed (status {}): {}",
                status,
                body
            ));
        }

        response
            .json()
            .await
            .context("Failed to parse existing cards")
    }

    /// Creates one card at the top of the target list
    ///
    /// A non-success response becomes an error carrying the attempted
    /// payload and the response status/body, so a failed creation can be
    /// diagnosed from the log line alone.
    pub async fn create_card(&self, list_id: &str, task: &ResolvedTask) -> Result<()> {
        let id_members = task.member_ids.join(",");
        let id_labels = task
            .label_ids
            .iter()
            .cloned()
            .collect::<Vec<_>>()
            .join(",");

        let params = [
            ("key", self.key.as_str()),
            ("token", self.token.as_str()),
            ("name", task.name.as_str()),
            ("desc", CARD_DESC),
            ("pos", "top"),
            ("idList", list_id),
            ("idMembers", id_members.as_str()),
            ("idLabels", id_labels.as_str()),
        ];

        let url = format!("{}/cards", self.base_url);
        let response = self
            .http
            .post(&url)
            .form(&params)
            .send()
            .await
            .with_context(|| format!("Card creation request failed for \"{}\"", task.name))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!(
                "Card creation failed for \"{}\" (status {}): {} \
                 [idList={}, idMembers={}, idLabels={}]",
                task.name,
                status,
                body,
                list_id,
                id_members,
                id_labels
            ));
        }

        Ok(())
    }

    /// Fetches the board's members, verbatim
    pub async fn board_members(&self, board_id: &str) -> Result<Value> {
        self.fetch_board_resource(board_id, "members").await
    }

    /// Fetches the board's labels, verbatim
    pub async fn board_labels(&self, board_id: &str) -> Result<Value> {
        self.fetch_board_resource(board_id, "labels").await
    }

    /// Fetches the board's lists, verbatim
    pub async fn board_lists(&self, board_id: &str) -> Result<Value> {
        self.fetch_board_resource(board_id, "lists").await
    }

    async fn fetch_board_resource(&self, board_id: &str, resource: &str) -> Result<Value> {
        let url = format!("{}/boards/{}/{}", self.base_url, board_id, resource);
        let response = self
            .http
            .get(&url)
            .query(&[("key", &self.key), ("token", &self.token)])
            .send()
            .await
            .with_context(|| format!("Failed to fetch board {}", resource))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!(
                "Fetching board {} failed (status {}): {}",
                resource,
                status,
                body
            ));
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse board {}", resource))
    }
}
