use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::single_row;
use crate::constants::{DEFAULT_LIST_LIMIT, TOOL_GET_ACCOUNT_INFO, TOOL_LIST_ACCOUNTS};
use crate::error::Result;
use crate::support::query::{Query, SortOrder};
use crate::support::rows::{Row, rows};
use crate::tool_definitions::{ParamDef, ToolDef};
use crate::tool_generator::{AdsRequest, AdsResponse, AdsTool, BuildContext};

const CLIENT_FIELDS: &[&str] = &[
    "customer_client.id",
    "customer_client.descriptive_name",
    "customer_client.currency_code",
    "customer_client.time_zone",
    "customer_client.manager",
    "customer_client.level",
    "customer_client.status",
];

const CUSTOMER_FIELDS: &[&str] = &[
    "customer.id",
    "customer.descriptive_name",
    "customer.currency_code",
    "customer.time_zone",
    "customer.auto_tagging_enabled",
    "customer.manager",
    "customer.test_account",
];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AccountSummary {
    id:            String,
    name:          String,
    currency_code: String,
    time_zone:     String,
    is_manager:    bool,
    level:         i64,
    status:        String,
}

impl AccountSummary {
    fn from_row(row: &Row<'_>) -> Self {
        Self {
            id:            row.text("customerClient.id"),
            name:          row.text("customerClient.descriptiveName"),
            currency_code: row.text("customerClient.currencyCode"),
            time_zone:     row.text("customerClient.timeZone"),
            is_manager:    row.flag("customerClient.manager"),
            level:         row.int("customerClient.level"),
            status:        row.text("customerClient.status"),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    id:                   String,
    name:                 String,
    currency_code:        String,
    time_zone:            String,
    auto_tagging_enabled: bool,
    is_manager:           bool,
    test_account:         bool,
}

#[derive(Debug, Deserialize)]
pub struct ListAccountsArgs {
    limit: i64,
}

/// Accessible client accounts: the configured account and its direct children
pub struct ListAccounts;

impl AdsTool for ListAccounts {
    type Args = ListAccountsArgs;
    type Output = Value;

    fn definition(&self) -> ToolDef {
        ToolDef {
            name:        TOOL_LIST_ACCOUNTS,
            description: "List the configured account and the client accounts directly below it, \
                          with currency, time zone and manager flag.",
            action:      "list accounts",
            params:      vec![ParamDef::limit(DEFAULT_LIST_LIMIT)],
        }
    }

    fn build(&self, args: &ListAccountsArgs, _ctx: &BuildContext<'_>) -> Result<AdsRequest> {
        let query = Query::select(CLIENT_FIELDS)
            .from("customer_client")
            .filter("customer_client.level <= 1")
            .order_by("customer_client.level", SortOrder::Asc)
            .limit(args.limit);
        Ok(AdsRequest::Query(query.build()))
    }

    fn normalize(&self, _args: &ListAccountsArgs, response: AdsResponse) -> Result<Value> {
        let values = response.into_rows()?;
        let accounts: Vec<AccountSummary> = rows(&values)
            .map(|row| AccountSummary::from_row(&row))
            .collect();
        Ok(json!({ "count": accounts.len(), "accounts": accounts }))
    }
}

#[derive(Debug, Deserialize)]
pub struct NoArgs {}

/// Settings of the configured account
pub struct GetAccountInfo;

impl AdsTool for GetAccountInfo {
    type Args = NoArgs;
    type Output = AccountInfo;

    fn definition(&self) -> ToolDef {
        ToolDef {
            name:        TOOL_GET_ACCOUNT_INFO,
            description: "Get name, currency, time zone, auto-tagging and manager status of the \
                          configured account.",
            action:      "get account info",
            params:      vec![],
        }
    }

    fn build(&self, _args: &NoArgs, _ctx: &BuildContext<'_>) -> Result<AdsRequest> {
        let query = Query::select(CUSTOMER_FIELDS).from("customer").limit(1);
        Ok(AdsRequest::Query(query.build()))
    }

    fn normalize(&self, _args: &NoArgs, response: AdsResponse) -> Result<AccountInfo> {
        let value = single_row(response.into_rows()?, "Account", "configured customer")?;
        let row = Row::new(&value);
        Ok(AccountInfo {
            id:                   row.text("customer.id"),
            name:                 row.text("customer.descriptiveName"),
            currency_code:        row.text("customer.currencyCode"),
            time_zone:            row.text("customer.timeZone"),
            auto_tagging_enabled: row.flag("customer.autoTaggingEnabled"),
            is_manager:           row.flag("customer.manager"),
            test_account:         row.flag("customer.testAccount"),
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::error::Error;
    use crate::test_support::{MockAdsApi, invoke};

    #[tokio::test]
    async fn test_list_accounts_query_and_shape() {
        let api = MockAdsApi::new().with_rows(vec![json!({
            "customerClient": {
                "id": "1234567890",
                "descriptiveName": "Main",
                "currencyCode": "EUR",
                "timeZone": "Europe/Berlin",
                "manager": true,
                "level": "0",
                "status": "ENABLED"
            }
        })]);

        let result = invoke(ListAccounts, &api, json!({})).await.unwrap();

        assert_eq!(
            api.queries()[0],
            "SELECT customer_client.id, customer_client.descriptive_name, \
             customer_client.currency_code, customer_client.time_zone, customer_client.manager, \
             customer_client.level, customer_client.status FROM customer_client \
             WHERE customer_client.level <= 1 ORDER BY customer_client.level ASC LIMIT 50"
        );
        assert_eq!(result["count"], 1);
        assert_eq!(result["accounts"][0]["isManager"], true);
        assert_eq!(result["accounts"][0]["level"], 0);
        assert_eq!(result["accounts"][0]["currencyCode"], "EUR");
    }

    #[tokio::test]
    async fn test_get_account_info_flags() {
        let api = MockAdsApi::new().with_rows(vec![json!({
            "customer": {
                "id": "1234567890",
                "descriptiveName": "Shop",
                "autoTaggingEnabled": true
            }
        })]);

        let result = invoke(GetAccountInfo, &api, json!({})).await.unwrap();

        assert_eq!(result["name"], "Shop");
        assert_eq!(result["autoTaggingEnabled"], true);
        assert_eq!(result["testAccount"], false);
    }

    #[tokio::test]
    async fn test_get_account_info_without_rows_is_not_found() {
        let api = MockAdsApi::new();
        let err = invoke(GetAccountInfo, &api, json!({})).await.unwrap_err();
        assert!(matches!(err, Error::NotFound { resource: "Account", .. }));
    }
}
