use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use lunchmoney_client::{LunchMoneyClient, TransactionQuery};

use crate::dates::month_buckets;
use crate::dispatch::Result;
use crate::registry::Tool;
use crate::tools::support::{amount_of, opt_u32, require_str};

const DEFAULT_MONTHS: u32 = 6;

/// Total spending per month for the months ending at `start_month`. One
/// provider query per bucket, issued sequentially; the output series is
/// always chronological.
pub struct MonthOverMonthTool {
    client: Arc<LunchMoneyClient>,
}

impl MonthOverMonthTool {
    pub fn new(client: Arc<LunchMoneyClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for MonthOverMonthTool {
    fn name(&self) -> &str {
        "month_over_month"
    }

    fn description(&self) -> &str {
        "Total spending per month for the last N months"
    }

    fn args_schema(&self) -> Value {
        json!({
            "start_month": "YYYY-MM",
            "months": "int (default 6)"
        })
    }

    async fn execute(&self, args: Map<String, Value>) -> Result<Value> {
        let start_month = require_str(&args, "start_month")?;
        let months = opt_u32(&args, "months", DEFAULT_MONTHS);

        let mut series = Vec::with_capacity(months as usize);
        for (start, end) in month_buckets(&start_month, months)? {
            let transactions = self
                .client
                .transactions(
                    &start.to_string(),
                    &end.to_string(),
                    &TransactionQuery::default(),
                )
                .await?;
            let total: f64 = transactions.iter().map(amount_of).sum();
            series.push(json!({
                "month": start.format("%Y-%m").to_string(),
                "total": total,
            }));
        }

        Ok(json!({ "mom": series }))
    }
}
