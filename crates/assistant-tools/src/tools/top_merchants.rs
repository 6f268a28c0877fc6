use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use lunchmoney_client::{LunchMoneyClient, TransactionQuery};

use crate::dispatch::Result;
use crate::registry::Tool;
use crate::tools::support::{amount_of, opt_u32, require_str, str_field};

const DEFAULT_TOP_N: u32 = 10;

pub struct TopMerchantsTool {
    client: Arc<LunchMoneyClient>,
}

impl TopMerchantsTool {
    pub fn new(client: Arc<LunchMoneyClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for TopMerchantsTool {
    fn name(&self) -> &str {
        "top_merchants"
    }

    fn description(&self) -> &str {
        "Top merchants/payees by absolute spend within a date range"
    }

    fn args_schema(&self) -> Value {
        json!({
            "start_date": "YYYY-MM-DD",
            "end_date": "YYYY-MM-DD",
            "n": "int? (default 10)"
        })
    }

    async fn execute(&self, args: Map<String, Value>) -> Result<Value> {
        let start_date = require_str(&args, "start_date")?;
        let end_date = require_str(&args, "end_date")?;
        let n = opt_u32(&args, "n", DEFAULT_TOP_N) as usize;

        let transactions = self
            .client
            .transactions(&start_date, &end_date, &TransactionQuery::default())
            .await?;
        Ok(json!({ "top_merchants": top_merchants(&transactions, n) }))
    }
}

/// Per-payee totals and counts, ranked by absolute total descending,
/// truncated to the requested count.
fn top_merchants(transactions: &[Value], n: usize) -> Vec<Value> {
    let mut merchants: Vec<(String, f64, u64)> = Vec::new();

    for txn in transactions {
        let payee = str_field(txn, "payee")
            .filter(|payee| !payee.is_empty())
            .unwrap_or("(no payee)");
        let amount = amount_of(txn);

        match merchants.iter_mut().find(|(name, _, _)| name == payee) {
            Some((_, total, count)) => {
                *total += amount;
                *count += 1;
            }
            None => merchants.push((payee.to_string(), amount, 1)),
        }
    }

    merchants.sort_by(|left, right| {
        right
            .1
            .abs()
            .partial_cmp(&left.1.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    merchants
        .into_iter()
        .take(n)
        .map(|(payee, total, tx_count)| {
            json!({ "payee": payee, "total": total, "tx_count": tx_count })
        })
        .collect()
}
