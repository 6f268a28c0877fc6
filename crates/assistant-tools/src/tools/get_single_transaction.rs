use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use lunchmoney_client::LunchMoneyClient;

use crate::dispatch::Result;
use crate::registry::Tool;
use crate::tools::support::require_i64;

pub struct GetSingleTransactionTool {
    client: Arc<LunchMoneyClient>,
}

impl GetSingleTransactionTool {
    pub fn new(client: Arc<LunchMoneyClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for GetSingleTransactionTool {
    fn name(&self) -> &str {
        "get_single_transaction"
    }

    fn description(&self) -> &str {
        "Detailed information for one transaction by id"
    }

    fn args_schema(&self) -> Value {
        json!({ "id": "int" })
    }

    async fn execute(&self, args: Map<String, Value>) -> Result<Value> {
        let id = require_i64(&args, "id")?;
        let transaction = self.client.transaction(id).await?;
        Ok(json!({ "transaction": transaction }))
    }
}
