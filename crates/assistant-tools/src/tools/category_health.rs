use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use lunchmoney_client::{LunchMoneyClient, TransactionQuery};

use crate::dates::month_bounds;
use crate::dispatch::Result;
use crate::registry::Tool;
use crate::tools::support::{amount_of, opt_i64, require_str, str_field};

/// Budget vs. actual per category for one month, optionally narrowed to
/// a single category. When the requested category has spend but no
/// budget row, a zero-budget row is synthesized so the answer is never
/// silently empty.
pub struct CategoryHealthTool {
    client: Arc<LunchMoneyClient>,
}

impl CategoryHealthTool {
    pub fn new(client: Arc<LunchMoneyClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for CategoryHealthTool {
    fn name(&self) -> &str {
        "category_health"
    }

    fn description(&self) -> &str {
        "Budget vs. actual spending by category for a month"
    }

    fn args_schema(&self) -> Value {
        json!({
            "month": "YYYY-MM",
            "category_id": "int?"
        })
    }

    async fn execute(&self, args: Map<String, Value>) -> Result<Value> {
        let month = require_str(&args, "month")?;
        let category_filter = opt_i64(&args, "category_id");
        let (start, end) = month_bounds(&month)?;

        let budget = self
            .client
            .budgets(&start.to_string(), &end.to_string())
            .await?;
        let transactions = self
            .client
            .transactions(
                &start.to_string(),
                &end.to_string(),
                &TransactionQuery::default(),
            )
            .await?;

        let (spend, names) = spend_per_category(&transactions);
        let budget_rows = budget
            .get("budgets")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        Ok(json!({
            "category_health": health_rows(&budget_rows, &spend, &names, category_filter)
        }))
    }
}

fn spend_per_category(transactions: &[Value]) -> (HashMap<i64, f64>, HashMap<i64, String>) {
    let mut spend: HashMap<i64, f64> = HashMap::new();
    let mut names: HashMap<i64, String> = HashMap::new();

    for txn in transactions {
        let Some(category_id) = txn.get("category_id").and_then(Value::as_i64) else {
            continue;
        };
        *spend.entry(category_id).or_insert(0.0) += amount_of(txn);
        if let Some(name) = str_field(txn, "category_name") {
            names.insert(category_id, name.to_string());
        }
    }

    (spend, names)
}

fn health_rows(
    budget_rows: &[Value],
    spend: &HashMap<i64, f64>,
    names: &HashMap<i64, String>,
    category_filter: Option<i64>,
) -> Vec<Value> {
    let mut rows = Vec::new();

    for row in budget_rows {
        let Some(category_id) = row.get("category_id").and_then(Value::as_i64) else {
            continue;
        };
        if matches!(category_filter, Some(filter) if filter != category_id) {
            continue;
        }
        let budgeted = row
            .get("budget_amount")
            .map(|value| match value {
                Value::Number(number) => number.as_f64().unwrap_or(0.0),
                Value::String(text) => text.trim().parse().unwrap_or(0.0),
                _ => 0.0,
            })
            .unwrap_or(0.0);
        let spent = spend.get(&category_id).copied().unwrap_or(0.0);
        let category = str_field(row, "category_name")
            .map(str::to_string)
            .or_else(|| names.get(&category_id).cloned())
            .unwrap_or_else(|| "Unknown".to_string());

        rows.push(json!({
            "category_id": category_id,
            "category": category,
            "budgeted": budgeted,
            "spent": spent,
            "remaining": budgeted - spent,
            "status": if spent <= budgeted { "OK" } else { "Over" },
        }));
    }

    // A requested category missing from the budget still gets an answer.
    if let Some(category_id) = category_filter {
        if rows.is_empty() {
            let spent = spend.get(&category_id).copied().unwrap_or(0.0);
            rows.push(json!({
                "category_id": category_id,
                "category": names
                    .get(&category_id)
                    .cloned()
                    .unwrap_or_else(|| "Unknown".to_string()),
                "budgeted": 0.0,
                "spent": spent,
                "remaining": -spent,
                "status": if spent > 0.0 { "Over" } else { "OK" },
            }));
        }
    }

    rows
}
