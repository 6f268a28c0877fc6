use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use lunchmoney_client::{LunchMoneyClient, TransactionQuery};

use crate::dates::month_buckets;
use crate::dispatch::Result;
use crate::registry::Tool;
use crate::tools::support::{amount_of, opt_u32, require_str};

const DEFAULT_MONTHS: u32 = 6;

/// Income vs. expenses per month. Signs are a heuristic: positive
/// amounts count as income, negative as expenses.
pub struct MonthlyCashflowTool {
    client: Arc<LunchMoneyClient>,
}

impl MonthlyCashflowTool {
    pub fn new(client: Arc<LunchMoneyClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for MonthlyCashflowTool {
    fn name(&self) -> &str {
        "monthly_cashflow"
    }

    fn description(&self) -> &str {
        "Income, expenses, and net per month over a span"
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
            let (income, expenses) = split_cashflow(&transactions);
            series.push(json!({
                "month": start.format("%Y-%m").to_string(),
                "income": income,
                "expenses": expenses,
                "net": income - expenses,
            }));
        }

        Ok(json!({ "cashflow": series }))
    }
}

/// (income, expenses): income sums positive amounts, expenses is the
/// positive magnitude of negative amounts.
fn split_cashflow(transactions: &[Value]) -> (f64, f64) {
    let mut income = 0.0;
    let mut expenses = 0.0;
    for txn in transactions {
        let amount = amount_of(txn);
        if amount > 0.0 {
            income += amount;
        } else if amount < 0.0 {
            expenses -= amount;
        }
    }
    (income, expenses)
}
