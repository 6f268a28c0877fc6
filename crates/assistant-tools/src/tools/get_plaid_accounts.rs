use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use lunchmoney_client::LunchMoneyClient;

use crate::dispatch::Result;
use crate::registry::Tool;

pub struct GetPlaidAccountsTool {
    client: Arc<LunchMoneyClient>,
}

impl GetPlaidAccountsTool {
    pub fn new(client: Arc<LunchMoneyClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for GetPlaidAccountsTool {
    fn name(&self) -> &str {
        "get_plaid_accounts"
    }

    fn description(&self) -> &str {
        "Linked bank accounts"
    }

    fn args_schema(&self) -> Value {
        json!({})
    }

    async fn execute(&self, _args: Map<String, Value>) -> Result<Value> {
        let accounts = self.client.plaid_accounts().await?;
        Ok(json!({ "plaid_accounts": accounts }))
    }
}
