use std::time::Duration;

use chrono::{Duration as ChronoDuration, NaiveDate};
use serde_json::{json, Value};

use chat_core::Config;

use crate::error::{LunchMoneyError, Result};
use crate::query::TransactionQuery;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Days either side of an anchor transaction searched when reconstructing
/// a transaction group without an explicit group key.
const GROUP_WINDOW_DAYS: i64 = 7;

pub struct LunchMoneyClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl LunchMoneyClient {
    /// Fails before any network activity when the bearer token is absent.
    pub fn new(config: &Config) -> Result<Self> {
        let token = config
            .lunchmoney_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(LunchMoneyError::MissingToken)?
            .to_string();

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent("ledger-chat/0.1.0")
            .build()?;

        Ok(Self {
            http,
            base_url: config.lunchmoney_base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    async fn get(&self, path: &str, params: &[(String, String)]) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        log::debug!("GET {url} ({} params)", params.len());

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .header("Accept", "application/json")
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|parsed| {
                    parsed
                        .get("message")
                        .or_else(|| parsed.get("error"))
                        .and_then(Value::as_str)
                        .map(str::to_string)
                })
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_string()
                });
            return Err(LunchMoneyError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }

    /// Transactions within `[start_date, end_date]`, with optional filters.
    pub async fn transactions(
        &self,
        start_date: &str,
        end_date: &str,
        query: &TransactionQuery,
    ) -> Result<Vec<Value>> {
        let params = query.to_params(start_date, end_date);
        let body = self.get("/transactions", &params).await?;
        Ok(unwrap_array(body, "transactions"))
    }

    /// Detail for a single transaction.
    pub async fn transaction(&self, id: i64) -> Result<Value> {
        let body = self.get(&format!("/transactions/{id}"), &[]).await?;
        Ok(unwrap_object(body, "transaction"))
    }

    /// Best-effort reconstruction of the group around an anchor
    /// transaction: fetch the anchor, widen to a date window around it,
    /// then prefer an explicit group key; otherwise match siblings by
    /// date + payee, excluding the anchor itself.
    pub async fn transaction_group(&self, anchor_id: i64) -> Result<Value> {
        let anchor = self.transaction(anchor_id).await?;

        let group_id = anchor
            .get("group_id")
            .or_else(|| anchor.get("parent_id"))
            .or_else(|| anchor.get("external_group_id"))
            .filter(|value| !value.is_null())
            .cloned();
        let anchor_date = anchor
            .get("date")
            .and_then(Value::as_str)
            .map(str::to_string);
        let payee = anchor
            .get("payee")
            .and_then(Value::as_str)
            .map(str::to_string);

        let Some(anchor_date) = anchor_date else {
            return Ok(json!({ "anchor": anchor, "siblings": [] }));
        };
        let Ok(day) = NaiveDate::parse_from_str(&anchor_date, "%Y-%m-%d") else {
            return Ok(json!({ "anchor": anchor, "siblings": [] }));
        };

        let start = (day - ChronoDuration::days(GROUP_WINDOW_DAYS)).to_string();
        let end = (day + ChronoDuration::days(GROUP_WINDOW_DAYS)).to_string();
        let window_query = TransactionQuery {
            payee: payee.clone(),
            ..Default::default()
        };
        let window = self.transactions(&start, &end, &window_query).await?;

        let siblings: Vec<Value> = match &group_id {
            Some(group_id) => window
                .into_iter()
                .filter(|txn| {
                    txn.get("group_id") == Some(group_id)
                        || txn.get("parent_id") == Some(group_id)
                })
                .collect(),
            None => window
                .into_iter()
                .filter(|txn| {
                    txn.get("date").and_then(Value::as_str) == Some(anchor_date.as_str())
                        && txn.get("payee").and_then(Value::as_str) == payee.as_deref()
                        && txn.get("id").and_then(Value::as_i64) != Some(anchor_id)
                })
                .collect(),
        };

        Ok(json!({ "anchor": anchor, "siblings": siblings }))
    }

    pub async fn categories(&self) -> Result<Vec<Value>> {
        let body = self.get("/categories", &[]).await?;
        Ok(unwrap_array(body, "categories"))
    }

    pub async fn category(&self, category_id: i64) -> Result<Value> {
        let body = self.get(&format!("/categories/{category_id}"), &[]).await?;
        Ok(unwrap_object(body, "category"))
    }

    pub async fn tags(&self) -> Result<Vec<Value>> {
        let body = self.get("/tags", &[]).await?;
        Ok(unwrap_array(body, "tags"))
    }

    pub async fn plaid_accounts(&self) -> Result<Vec<Value>> {
        let body = self.get("/plaid_accounts", &[]).await?;
        Ok(unwrap_array(body, "plaid_accounts"))
    }

    /// Budget rows for a date range. Returned as-is: the envelope differs
    /// between budget configurations.
    pub async fn budgets(&self, start_date: &str, end_date: &str) -> Result<Value> {
        let params = vec![
            ("start_date".to_string(), start_date.to_string()),
            ("end_date".to_string(), end_date.to_string()),
        ];
        self.get("/budgets", &params).await
    }
}

/// `{"transactions": [...]}` → the array; a bare array passes through.
fn unwrap_array(body: Value, key: &str) -> Vec<Value> {
    match body {
        Value::Object(mut map) => match map.remove(key) {
            Some(Value::Array(items)) => items,
            _ => {
                log::debug!("response missing {key:?} envelope");
                Vec::new()
            }
        },
        Value::Array(items) => items,
        _ => Vec::new(),
    }
}

/// `{"transaction": {...}}` → the inner object; anything else passes through.
fn unwrap_object(body: Value, key: &str) -> Value {
    match body {
        Value::Object(mut map) => map.remove(key).unwrap_or(Value::Object(map)),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_requires_token() {
        let config = Config::default();
        assert!(matches!(
            LunchMoneyClient::new(&config),
            Err(LunchMoneyError::MissingToken)
        ));

        let blank = Config {
            lunchmoney_token: Some("   ".to_string()),
            ..Config::default()
        };
        assert!(matches!(
            LunchMoneyClient::new(&blank),
            Err(LunchMoneyError::MissingToken)
        ));
    }

    #[test]
    fn unwrap_array_handles_envelope_and_bare_forms() {
        let enveloped = json!({"transactions": [{"id": 1}]});
        assert_eq!(unwrap_array(enveloped, "transactions").len(), 1);

        let bare = json!([{"id": 2}]);
        assert_eq!(unwrap_array(bare, "transactions").len(), 1);

        let missing = json!({"other": 3});
        assert!(unwrap_array(missing, "transactions").is_empty());
    }

    #[test]
    fn unwrap_object_falls_back_to_body() {
        let enveloped = json!({"transaction": {"id": 9}});
        assert_eq!(unwrap_object(enveloped, "transaction")["id"], 9);

        let bare = json!({"id": 10, "payee": "Shell"});
        assert_eq!(unwrap_object(bare, "transaction")["id"], 10);
    }
}
