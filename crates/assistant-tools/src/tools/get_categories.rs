use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use lunchmoney_client::LunchMoneyClient;

use crate::dispatch::Result;
use crate::registry::Tool;

pub struct GetCategoriesTool {
    client: Arc<LunchMoneyClient>,
}

impl GetCategoriesTool {
    pub fn new(client: Arc<LunchMoneyClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for GetCategoriesTool {
    fn name(&self) -> &str {
        "get_categories"
    }

    fn description(&self) -> &str {
        "All expense categories"
    }

    fn args_schema(&self) -> Value {
        json!({})
    }

    async fn execute(&self, _args: Map<String, Value>) -> Result<Value> {
        let categories = self.client.categories().await?;
        Ok(json!({ "categories": categories }))
    }
}
