use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use lunchmoney_client::LunchMoneyClient;

use crate::dispatch::Result;
use crate::registry::Tool;
use crate::tools::support::require_i64;

pub struct GetCategoryTool {
    client: Arc<LunchMoneyClient>,
}

impl GetCategoryTool {
    pub fn new(client: Arc<LunchMoneyClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for GetCategoryTool {
    fn name(&self) -> &str {
        "get_category"
    }

    fn description(&self) -> &str {
        "One category by id"
    }

    fn args_schema(&self) -> Value {
        json!({ "category_id": "int" })
    }

    async fn execute(&self, args: Map<String, Value>) -> Result<Value> {
        let category_id = require_i64(&args, "category_id")?;
        let category = self.client.category(category_id).await?;
        Ok(json!({ "category": category }))
    }
}
