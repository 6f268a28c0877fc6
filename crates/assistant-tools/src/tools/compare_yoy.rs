use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{json, Map, Value};

use lunchmoney_client::{LunchMoneyClient, TransactionQuery};

use crate::dates::{month_bounds, shift_year_back};
use crate::dispatch::{Result, ToolError};
use crate::registry::Tool;
use crate::tools::support::{amount_of, require_str};

/// Compares a month or date range against the same period one year
/// earlier, with optional category/tag/payee filters applied to both
/// periods. Two sequential provider queries.
pub struct CompareYoyTool {
    client: Arc<LunchMoneyClient>,
}

impl CompareYoyTool {
    pub fn new(client: Arc<LunchMoneyClient>) -> Self {
        Self { client }
    }

    async fn sum_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        query: &TransactionQuery,
    ) -> Result<f64> {
        let transactions = self
            .client
            .transactions(&start.to_string(), &end.to_string(), query)
            .await?;
        Ok(transactions.iter().map(amount_of).sum())
    }
}

#[async_trait]
impl Tool for CompareYoyTool {
    fn name(&self) -> &str {
        "compare_yoy"
    }

    fn description(&self) -> &str {
        "Compare spending for a month or date range with the same period last year"
    }

    fn args_schema(&self) -> Value {
        json!({
            "month": "YYYY-MM?",
            "start_date": "YYYY-MM-DD?",
            "end_date": "YYYY-MM-DD?",
            "category_id": "int?",
            "tag_ids": "int[]?",
            "payee": "string?"
        })
    }

    async fn execute(&self, args: Map<String, Value>) -> Result<Value> {
        let (start, end) = current_period(&args)?;
        let prior_start = shift_year_back(start);
        let prior_end = shift_year_back(end);

        let query = TransactionQuery::from_args(&args);
        let current_total = self.sum_range(start, end, &query).await?;
        let prior_total = self.sum_range(prior_start, prior_end, &query).await?;

        let delta = current_total - prior_total;
        let pct_change = if prior_total != 0.0 {
            json!(delta / prior_total.abs())
        } else {
            Value::Null
        };

        Ok(json!({
            "current": {
                "start_date": start.to_string(),
                "end_date": end.to_string(),
                "total": current_total,
            },
            "prior": {
                "start_date": prior_start.to_string(),
                "end_date": prior_end.to_string(),
                "total": prior_total,
            },
            "delta": delta,
            "pct_change": pct_change,
        }))
    }
}

/// The comparison period: a whole month when `month` is given, otherwise
/// an explicit `start_date`..`end_date` pair.
fn current_period(args: &Map<String, Value>) -> Result<(NaiveDate, NaiveDate)> {
    if let Some(month) = args.get("month").and_then(Value::as_str) {
        return month_bounds(month);
    }

    if !args.contains_key("start_date") || !args.contains_key("end_date") {
        return Err(ToolError::InvalidArguments(
            "provide either month=YYYY-MM or start_date & end_date".to_string(),
        ));
    }

    let start = parse_date(&require_str(args, "start_date")?)?;
    let end = parse_date(&require_str(args, "end_date")?)?;
    Ok((start, end))
}

fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|_| ToolError::InvalidArguments(format!("dates must be YYYY-MM-DD, got {text:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn month_expands_to_full_month() {
        let (start, end) = current_period(&args(json!({"month": "2025-09"}))).unwrap();
        assert_eq!(start.to_string(), "2025-09-01");
        assert_eq!(end.to_string(), "2025-09-30");
    }

    #[test]
    fn leap_month_prior_period_clamps_to_feb_28() {
        let (start, end) = current_period(&args(json!({"month": "2024-02"}))).unwrap();
        assert_eq!(shift_year_back(start).to_string(), "2023-02-01");
        assert_eq!(shift_year_back(end).to_string(), "2023-02-28");
    }

    #[test]
    fn explicit_range_passes_through() {
        let (start, end) = current_period(&args(json!({
            "start_date": "2025-01-15",
            "end_date": "2025-03-15"
        })))
        .unwrap();
        assert_eq!(start.to_string(), "2025-01-15");
        assert_eq!(end.to_string(), "2025-03-15");
    }

    #[test]
    fn missing_bounds_is_an_argument_error() {
        let error = current_period(&args(json!({"start_date": "2025-01-15"}))).unwrap_err();
        assert!(error
            .to_string()
            .contains("provide either month=YYYY-MM or start_date & end_date"));
    }
}
