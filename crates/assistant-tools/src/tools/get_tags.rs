use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use lunchmoney_client::LunchMoneyClient;

use crate::dispatch::Result;
use crate::registry::Tool;

pub struct GetTagsTool {
    client: Arc<LunchMoneyClient>,
}

impl GetTagsTool {
    pub fn new(client: Arc<LunchMoneyClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for GetTagsTool {
    fn name(&self) -> &str {
        "get_tags"
    }

    fn description(&self) -> &str {
        "All transaction tags"
    }

    fn args_schema(&self) -> Value {
        json!({})
    }

    async fn execute(&self, _args: Map<String, Value>) -> Result<Value> {
        let tags = self.client.tags().await?;
        Ok(json!({ "tags": tags }))
    }
}
