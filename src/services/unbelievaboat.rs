//! Thin client for the UnbelievaBoat economy API. Lookups decorate the
//! profile embed and the topic-photo reward; callers treat failures as
//! best-effort.

use serde::Deserialize;
use serde_json::json;

use crate::Error;

const API_BASE: &str = "https://unbelievaboat.com/api/v1";

#[derive(Debug, Deserialize)]
pub struct UnbBalance {
    #[serde(default)]
    pub cash: i64,
    #[serde(default)]
    pub bank: i64,
    #[serde(default)]
    pub total: i64,
    /// The API reports the rank as a string.
    pub rank: Option<String>,
}

pub struct UnbClient {
    http: reqwest::Client,
    token: String,
    guild_id: u64,
}

impl UnbClient {
    pub fn new(http: reqwest::Client, token: &str, guild_id: u64) -> Self {
        UnbClient {
            http,
            token: token.to_string(),
            guild_id,
        }
    }

    pub async fn balance(&self, user_id: u64) -> Result<UnbBalance, Error> {
        let url = format!("{API_BASE}/guilds/{}/users/{user_id}", self.guild_id);

        let balance = self
            .http
            .get(url)
            .header("Authorization", &self.token)
            .send()
            .await?
            .error_for_status()?
            .json::<UnbBalance>()
            .await?;

        Ok(balance)
    }

    pub async fn add_cash(&self, user_id: u64, amount: i64, reason: &str) -> Result<(), Error> {
        let url = format!("{API_BASE}/guilds/{}/users/{user_id}", self.guild_id);

        self.http
            .patch(url)
            .header("Authorization", &self.token)
            .json(&json!({ "cash": amount, "reason": reason }))
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}
