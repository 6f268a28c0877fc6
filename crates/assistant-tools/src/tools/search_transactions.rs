use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use lunchmoney_client::{LunchMoneyClient, TransactionQuery};

use crate::dispatch::Result;
use crate::registry::Tool;
use crate::tools::support::require_str;

/// Convenience alias over the transaction listing; same filters, kept as
/// a separate name because the model reaches for "search" when the user
/// asks about a payee substring.
pub struct SearchTransactionsTool {
    client: Arc<LunchMoneyClient>,
}

impl SearchTransactionsTool {
    pub fn new(client: Arc<LunchMoneyClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for SearchTransactionsTool {
    fn name(&self) -> &str {
        "search_transactions"
    }

    fn description(&self) -> &str {
        "Search transactions; same filters as get_transactions, including partial payee matches"
    }

    fn args_schema(&self) -> Value {
        json!("same as get_transactions")
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
