use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use lunchmoney_client::{LunchMoneyClient, TransactionQuery};

use crate::dispatch::Result;
use crate::registry::Tool;
use crate::tools::support::{amount_of, opt_bool, require_str, str_field};

pub struct SumByCategoryTool {
    client: Arc<LunchMoneyClient>,
}

impl SumByCategoryTool {
    pub fn new(client: Arc<LunchMoneyClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for SumByCategoryTool {
    fn name(&self) -> &str {
        "sum_by_category"
    }

    fn description(&self) -> &str {
        "Spending totals grouped by category for a date range"
    }

    fn args_schema(&self) -> Value {
        json!({
            "start_date": "YYYY-MM-DD",
            "end_date": "YYYY-MM-DD",
            "include_transfers": "bool? (default true)"
        })
    }

    async fn execute(&self, args: Map<String, Value>) -> Result<Value> {
        let start_date = require_str(&args, "start_date")?;
        let end_date = require_str(&args, "end_date")?;
        let include_transfers = opt_bool(&args, "include_transfers", true);

        let transactions = self
            .client
            .transactions(&start_date, &end_date, &TransactionQuery::default())
            .await?;
        Ok(json!({
            "by_category": sum_by_category(&transactions, include_transfers)
        }))
    }
}

/// Totals per category name, sorted by absolute spend descending.
/// Transfers are detected heuristically (an `is_transfer` flag or a
/// category literally named "Transfers").
fn sum_by_category(transactions: &[Value], include_transfers: bool) -> Vec<Value> {
    let mut totals: Vec<(String, f64)> = Vec::new();

    for txn in transactions {
        if !include_transfers && is_transfer(txn) {
            continue;
        }
        let category = str_field(txn, "category_name")
            .filter(|name| !name.is_empty())
            .unwrap_or("Uncategorized");
        let amount = amount_of(txn);

        match totals.iter_mut().find(|(name, _)| name == category) {
            Some((_, total)) => *total += amount,
            None => totals.push((category.to_string(), amount)),
        }
    }

    totals.sort_by(|left, right| {
        right
            .1
            .abs()
            .partial_cmp(&left.1.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    totals
        .into_iter()
        .map(|(category, total)| json!({ "category": category, "total": total }))
        .collect()
}

fn is_transfer(txn: &Value) -> bool {
    txn.get("is_transfer")
        .and_then(Value::as_bool)
        .unwrap_or(false)
        || str_field(txn, "category_name") == Some("Transfers")
}
