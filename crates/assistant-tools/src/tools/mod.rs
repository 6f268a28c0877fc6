//! The fixed, read-only tool set. Write or mutate operations must not
//! exist here; anything the model asks for beyond these names comes back
//! as an unknown-tool error.

pub mod category_health;
pub mod compare_yoy;
pub mod get_categories;
pub mod get_category;
pub mod get_plaid_accounts;
pub mod get_single_transaction;
pub mod get_tags;
pub mod get_transaction_group;
pub mod get_transactions;
pub mod month_over_month;
pub mod monthly_cashflow;
pub mod search_transactions;
pub mod sum_by_category;
pub mod top_merchants;

mod support;

use std::sync::Arc;

use lunchmoney_client::LunchMoneyClient;

use crate::registry::ToolRegistry;

pub use category_health::CategoryHealthTool;
pub use compare_yoy::CompareYoyTool;
pub use get_categories::GetCategoriesTool;
pub use get_category::GetCategoryTool;
pub use get_plaid_accounts::GetPlaidAccountsTool;
pub use get_single_transaction::GetSingleTransactionTool;
pub use get_tags::GetTagsTool;
pub use get_transaction_group::GetTransactionGroupTool;
pub use get_transactions::GetTransactionsTool;
pub use month_over_month::MonthOverMonthTool;
pub use monthly_cashflow::MonthlyCashflowTool;
pub use search_transactions::SearchTransactionsTool;
pub use sum_by_category::SumByCategoryTool;
pub use top_merchants::TopMerchantsTool;

/// Every tool the assistant can dispatch, all read-only.
pub const BUILTIN_TOOL_NAMES: [&str; 14] = [
    "get_transactions",
    "search_transactions",
    "get_single_transaction",
    "get_transaction_group",
    "get_categories",
    "get_category",
    "get_tags",
    "get_plaid_accounts",
    "sum_by_category",
    "month_over_month",
    "top_merchants",
    "monthly_cashflow",
    "compare_yoy",
    "category_health",
];

/// Builds the process-wide registry over one shared provider client.
/// Registration happens once at startup; names are statically unique so
/// the duplicate arm is unreachable.
pub fn builtin_registry(client: Arc<LunchMoneyClient>) -> ToolRegistry {
    let registry = ToolRegistry::new();

    let _ = registry.register(GetTransactionsTool::new(client.clone()));
    let _ = registry.register(SearchTransactionsTool::new(client.clone()));
    let _ = registry.register(GetSingleTransactionTool::new(client.clone()));
    let _ = registry.register(GetTransactionGroupTool::new(client.clone()));
    let _ = registry.register(GetCategoriesTool::new(client.clone()));
    let _ = registry.register(GetCategoryTool::new(client.clone()));
    let _ = registry.register(GetTagsTool::new(client.clone()));
    let _ = registry.register(GetPlaidAccountsTool::new(client.clone()));
    let _ = registry.register(SumByCategoryTool::new(client.clone()));
    let _ = registry.register(MonthOverMonthTool::new(client.clone()));
    let _ = registry.register(TopMerchantsTool::new(client.clone()));
    let _ = registry.register(MonthlyCashflowTool::new(client.clone()));
    let _ = registry.register(CompareYoyTool::new(client.clone()));
    let _ = registry.register(CategoryHealthTool::new(client));

    registry
}

#[cfg(test)]
mod tests {
    use chat_core::Config;

    use super::*;

    fn test_client() -> Arc<LunchMoneyClient> {
        let config = Config {
            lunchmoney_token: Some("test-token".to_string()),
            ..Config::default()
        };
        Arc::new(LunchMoneyClient::new(&config).unwrap())
    }

    #[test]
    fn builtin_registry_contains_the_fixed_set() {
        let registry = builtin_registry(test_client());
        assert_eq!(registry.len(), BUILTIN_TOOL_NAMES.len());
        for name in BUILTIN_TOOL_NAMES {
            assert!(registry.contains(name), "missing tool {name}");
        }
    }

    #[test]
    fn no_write_operations_are_registered() {
        let registry = builtin_registry(test_client());
        for name in registry.list_tool_names() {
            for verb in ["create", "update", "delete", "split", "unsplit", "insert"] {
                assert!(
                    !name.contains(verb),
                    "tool {name} looks like a write operation"
                );
            }
        }
    }
}
