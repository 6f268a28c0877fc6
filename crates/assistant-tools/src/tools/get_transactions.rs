use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use lunchmoney_client::{LunchMoneyClient, TransactionQuery};

use crate::dispatch::Result;
use crate::registry::Tool;
use crate::tools::support::require_str;

pub struct GetTransactionsTool {
    client: Arc<LunchMoneyClient>,
}

impl GetTransactionsTool {
    pub fn new(client: Arc<LunchMoneyClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for GetTransactionsTool {
    fn name(&self) -> &str {
        "get_transactions"
    }

    fn description(&self) -> &str {
        "List transactions within a date range, with optional filters"
    }

    fn args_schema(&self) -> Value {
        json!({
            "start_date": "YYYY-MM-DD",
            "end_date": "YYYY-MM-DD",
            "status": "string?",
            "tag_ids": "int[]?",
            "category_id": "int?",
            "plaid_account_id": "int?",
            "asset_id": "int?",
            "payee": "string?",
            "amount_min": "float?",
            "amount_max": "float?",
            "is_pending": "bool?",
            "limit": "int? (default 500)"
        })
    }

    async fn execute(&self, args: Map<String, Value>) -> Result<Value> {
        let start_date = require_str(&args, "start_date")?;
        let end_date = require_str(&args, "end_date")?;
        let query = TransactionQuery::from_args(&args);

        let transactions = self
            .client
            .transactions(&start_date, &end_date, &query)
            .await?;
        Ok(json!({ "transactions": transactions }))
    }
}
