use serde::{Deserialize, Serialize};

pub const DEFAULT_TRANSACTION_LIMIT: u32 = 500;

/// Optional filters for the `/transactions` endpoint. Mirrors the common
/// filters of the upstream "Get all transactions" operation; every field
/// is independently optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionQuery {
    pub status: Option<String>,
    pub tag_ids: Option<Vec<i64>>,
    pub category_id: Option<i64>,
    pub plaid_account_id: Option<i64>,
    pub asset_id: Option<i64>,
    pub payee: Option<String>,
    pub amount_min: Option<f64>,
    pub amount_max: Option<f64>,
    pub is_pending: Option<bool>,
    pub limit: Option<u32>,
}

impl TransactionQuery {
    /// Renders the query string parameters for a date-bounded transaction
    /// fetch. The upstream API takes tag ids as one comma-joined `tag_id`
    /// parameter and booleans in lowercase.
    pub fn to_params(&self, start_date: &str, end_date: &str) -> Vec<(String, String)> {
        let mut params = vec![
            ("start_date".to_string(), start_date.to_string()),
            ("end_date".to_string(), end_date.to_string()),
            (
                "limit".to_string(),
                self.limit.unwrap_or(DEFAULT_TRANSACTION_LIMIT).to_string(),
            ),
        ];

        if let Some(status) = &self.status {
            params.push(("status".to_string(), status.clone()));
        }
        if let Some(tag_ids) = &self.tag_ids {
            if !tag_ids.is_empty() {
                let joined = tag_ids
                    .iter()
                    .map(|id| id.to_string())
                    .collect::<Vec<_>>()
                    .join(",");
                params.push(("tag_id".to_string(), joined));
            }
        }
        if let Some(category_id) = self.category_id {
            params.push(("category_id".to_string(), category_id.to_string()));
        }
        if let Some(plaid_account_id) = self.plaid_account_id {
            params.push(("plaid_account_id".to_string(), plaid_account_id.to_string()));
        }
        if let Some(asset_id) = self.asset_id {
            params.push(("asset_id".to_string(), asset_id.to_string()));
        }
        if let Some(payee) = &self.payee {
            if !payee.is_empty() {
                params.push(("payee".to_string(), payee.clone()));
            }
        }
        if let Some(amount_min) = self.amount_min {
            params.push(("amount_min".to_string(), amount_min.to_string()));
        }
        if let Some(amount_max) = self.amount_max {
            params.push(("amount_max".to_string(), amount_max.to_string()));
        }
        if let Some(is_pending) = self.is_pending {
            params.push(("is_pending".to_string(), is_pending.to_string()));
        }

        params
    }

    /// Builds a filter from the loose argument map a tool request carries.
    /// Unknown keys are ignored; recognized keys with the wrong JSON type
    /// are ignored rather than failing the whole request.
    pub fn from_args(args: &serde_json::Map<String, serde_json::Value>) -> Self {
        let as_i64 = |key: &str| args.get(key).and_then(serde_json::Value::as_i64);
        let as_f64 = |key: &str| args.get(key).and_then(serde_json::Value::as_f64);
        let as_str = |key: &str| {
            args.get(key)
                .and_then(serde_json::Value::as_str)
                .map(str::to_string)
        };

        Self {
            status: as_str("status"),
            tag_ids: args.get("tag_ids").and_then(|value| {
                let items = value.as_array()?;
                Some(
                    items
                        .iter()
                        .filter_map(serde_json::Value::as_i64)
                        .collect::<Vec<_>>(),
                )
            }),
            category_id: as_i64("category_id"),
            plaid_account_id: as_i64("plaid_account_id"),
            asset_id: as_i64("asset_id"),
            payee: as_str("payee"),
            amount_min: as_f64("amount_min"),
            amount_max: as_f64("amount_max"),
            is_pending: args.get("is_pending").and_then(serde_json::Value::as_bool),
            limit: as_i64("limit").and_then(|limit| u32::try_from(limit).ok()),
        }
    }
}
