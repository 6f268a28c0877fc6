use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use lunchmoney_client::LunchMoneyClient;

use crate::dispatch::Result;
use crate::registry::Tool;
use crate::tools::support::require_i64;

/// Best-effort group reconstruction around an anchor transaction. The
/// sibling matching lives in the provider client; false positives and
/// negatives are possible when no explicit group key exists.
pub struct GetTransactionGroupTool {
    client: Arc<LunchMoneyClient>,
}

impl GetTransactionGroupTool {
    pub fn new(client: Arc<LunchMoneyClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for GetTransactionGroupTool {
    fn name(&self) -> &str {
        "get_transaction_group"
    }

    fn description(&self) -> &str {
        "Anchor transaction plus its likely siblings (split/group members)"
    }

    fn args_schema(&self) -> Value {
        json!({ "transaction_id": "int" })
    }

    async fn execute(&self, args: Map<String, Value>) -> Result<Value> {
        let transaction_id = require_i64(&args, "transaction_id")?;
        Ok(self.client.transaction_group(transaction_id).await?)
    }
}
