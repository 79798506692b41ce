use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::error;

/// Patron status as reported by the circulation API. Transient, fetched
/// fresh per request; fields the upstream omits default to empty.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PatronStatus {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub nick_name: Option<String>,
    pub items_out: Vec<ItemOut>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemOut {
    pub date_due: Option<String>,
}

impl ItemOut {
    /// Due date, if the upstream value starts with a YYYY-MM-DD date.
    /// Unparseable values are treated as not overdue.
    pub fn due_date(&self) -> Option<NaiveDate> {
        let raw = self.date_due.as_deref()?;
        NaiveDate::parse_from_str(raw.get(..10)?, "%Y-%m-%d").ok()
    }
}

/// One per-student upstream read. `Failed` marks the fallback case
/// explicitly so shaping layers can tell real data from a failed fetch.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    Fetched(PatronFetched),
    Failed { district_id: String },
}

#[derive(Debug, Clone)]
pub struct PatronFetched {
    pub district_id: String,
    pub status: PatronStatus,
    /// Verbatim upstream body, kept for passthrough responses.
    pub raw: Value,
}

/// Reads patron status from the upstream circulation API.
#[derive(Debug, Clone)]
pub struct PatronFetcher {
    client: Client,
    base_url: String,
}

impl PatronFetcher {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch one student's status. Never errors out to the aggregator:
    /// any failure (connect error, timeout, non-2xx, bad body) is absorbed
    /// into `FetchOutcome::Failed` so one student cannot fail the homeroom.
    pub async fn fetch_patron(&self, token: &str, district_id: &str) -> FetchOutcome {
        match self.try_fetch(token, district_id).await {
            Ok(fetched) => FetchOutcome::Fetched(fetched),
            Err(e) => {
                error!(district_id, "patron status fetch failed: {e:#}");
                FetchOutcome::Failed {
                    district_id: district_id.to_string(),
                }
            }
        }
    }

    async fn try_fetch(&self, token: &str, district_id: &str) -> Result<PatronFetched> {
        let url = format!(
            "{}/circulation/patrons/{}/status",
            self.base_url, district_id
        );
        let response = self.client.get(&url).bearer_auth(token).send().await?;
        if !response.status().is_success() {
            return Err(anyhow!("upstream returned {}", response.status()));
        }

        let raw: Value = response.json().await?;
        let status: PatronStatus = serde_json::from_value(raw.clone())?;
        Ok(PatronFetched {
            district_id: district_id.to_string(),
            status,
            raw,
        })
    }
}
