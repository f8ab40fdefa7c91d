use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::created;
use crate::ads_api::{MutateOperation, ResourceKind};
use crate::constants::{
    CONVERSION_CATEGORIES, CONVERSION_COUNTING_TYPES, CONVERSION_STATUSES, CONVERSION_TYPES,
    DEFAULT_LIST_LIMIT, PARAM_ALWAYS_USE_DEFAULT_VALUE, PARAM_CATEGORY, PARAM_COUNTING_TYPE,
    PARAM_DEFAULT_CURRENCY_CODE, PARAM_DEFAULT_VALUE, PARAM_NAME, PARAM_STATUS, PARAM_TYPE,
    PARAM_VALUE_SETTINGS, TOOL_CREATE_CONVERSION_ACTION, TOOL_GET_CONVERSION_STATS,
    TOOL_LIST_CONVERSION_ACTIONS,
};
use crate::error::Result;
use crate::support::date_range::{CustomDateRange, DateRange, DateWindow};
use crate::support::metrics::ratio;
use crate::support::query::{Query, SortOrder};
use crate::support::rows::{Row, rows};
use crate::tool_definitions::{ParamDef, ParamType, ToolDef};
use crate::tool_generator::{AdsRequest, AdsResponse, AdsTool, BuildContext};

const CONVERSION_ACTION_FIELDS: &[&str] = &[
    "conversion_action.id",
    "conversion_action.name",
    "conversion_action.type",
    "conversion_action.category",
    "conversion_action.status",
    "conversion_action.counting_type",
    "conversion_action.value_settings.default_value",
    "conversion_action.value_settings.always_use_default_value",
];

const CONVERSION_STATS_FIELDS: &[&str] = &[
    "segments.conversion_action",
    "segments.conversion_action_name",
    "segments.conversion_action_category",
    "metrics.conversions",
    "metrics.conversions_value",
    "metrics.all_conversions",
];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConversionActionSummary {
    id:                       String,
    name:                     String,
    #[serde(rename = "type")]
    action_type:              String,
    category:                 String,
    status:                   String,
    counting_type:            String,
    default_value:            Option<f64>,
    always_use_default_value: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListConversionActionsArgs {
    include_removed: bool,
    limit:           i64,
}

pub struct ListConversionActions;

impl AdsTool for ListConversionActions {
    type Args = ListConversionActionsArgs;
    type Output = Value;

    fn definition(&self) -> ToolDef {
        ToolDef {
            name:        TOOL_LIST_CONVERSION_ACTIONS,
            description: "List conversion actions with type, category, counting type and value \
                          settings. Removed actions are hidden unless includeRemoved is set.",
            action:      "list conversion actions",
            params:      vec![
                ParamDef::include_removed(),
                ParamDef::limit(DEFAULT_LIST_LIMIT),
            ],
        }
    }

    fn build(
        &self,
        args: &ListConversionActionsArgs,
        _ctx: &BuildContext<'_>,
    ) -> Result<AdsRequest> {
        let query = Query::select(CONVERSION_ACTION_FIELDS)
            .from("conversion_action")
            .status("conversion_action.status", None, args.include_removed)
            .order_by("conversion_action.name", SortOrder::Asc)
            .limit(args.limit);
        Ok(AdsRequest::Query(query.build()))
    }

    fn normalize(
        &self,
        _args: &ListConversionActionsArgs,
        response: AdsResponse,
    ) -> Result<Value> {
        let values = response.into_rows()?;
        let actions: Vec<ConversionActionSummary> = rows(&values)
            .map(|row| ConversionActionSummary {
                id:                       row.text("conversionAction.id"),
                name:                     row.text("conversionAction.name"),
                action_type:              row.text("conversionAction.type"),
                category:                 row.text("conversionAction.category"),
                status:                   row.text("conversionAction.status"),
                counting_type:            row.text("conversionAction.countingType"),
                default_value:            row
                    .opt_float("conversionAction.valueSettings.defaultValue"),
                always_use_default_value: row
                    .flag("conversionAction.valueSettings.alwaysUseDefaultValue"),
            })
            .collect();
        Ok(json!({ "count": actions.len(), "conversionActions": actions }))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueSettings {
    default_value:            f64,
    always_use_default_value: bool,
    default_currency_code:    Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConversionActionArgs {
    name:           String,
    #[serde(rename = "type")]
    action_type:    String,
    category:       String,
    counting_type:  String,
    status:         String,
    value_settings: Option<ValueSettings>,
}

pub struct CreateConversionAction;

impl AdsTool for CreateConversionAction {
    type Args = CreateConversionActionArgs;
    type Output = Value;

    fn definition(&self) -> ToolDef {
        ToolDef {
            name:        TOOL_CREATE_CONVERSION_ACTION,
            description: "Create a conversion action, enabled unless another status is given. \
                          Value settings are optional; the default value is a plain currency \
                          amount.",
            action:      "create conversion action",
            params:      vec![
                ParamDef::required(PARAM_NAME, "Conversion action name", ParamType::string()),
                ParamDef::optional(
                    PARAM_TYPE,
                    "Conversion source (default: WEBPAGE)",
                    ParamType::enumeration(CONVERSION_TYPES, Some("WEBPAGE")),
                ),
                ParamDef::optional(
                    PARAM_CATEGORY,
                    "Conversion category (default: DEFAULT)",
                    ParamType::enumeration(CONVERSION_CATEGORIES, Some("DEFAULT")),
                ),
                ParamDef::optional(
                    PARAM_COUNTING_TYPE,
                    "How conversions per click are counted (default: ONE_PER_CLICK)",
                    ParamType::enumeration(CONVERSION_COUNTING_TYPES, Some("ONE_PER_CLICK")),
                ),
                ParamDef::optional(
                    PARAM_STATUS,
                    "Initial status (default: ENABLED)",
                    ParamType::enumeration(CONVERSION_STATUSES, Some("ENABLED")),
                ),
                ParamDef::optional(
                    PARAM_VALUE_SETTINGS,
                    "Conversion value settings",
                    ParamType::Object {
                        fields: vec![
                            ParamDef::optional(
                                PARAM_DEFAULT_VALUE,
                                "Value used when none is reported (default: 0)",
                                ParamType::Number { default: Some(0.0) },
                            ),
                            ParamDef::optional(
                                PARAM_ALWAYS_USE_DEFAULT_VALUE,
                                "Ignore reported values (default: false)",
                                ParamType::boolean(false),
                            ),
                            ParamDef::optional(
                                PARAM_DEFAULT_CURRENCY_CODE,
                                "ISO 4217 currency code of the default value",
                                ParamType::String { max_len: Some(3) },
                            ),
                        ],
                    },
                ),
            ],
        }
    }

    fn build(
        &self,
        args: &CreateConversionActionArgs,
        _ctx: &BuildContext<'_>,
    ) -> Result<AdsRequest> {
        let mut action = json!({
            "name": args.name,
            "type": args.action_type,
            "category": args.category,
            "countingType": args.counting_type,
            "status": args.status,
        });
        if let Some(settings) = &args.value_settings {
            let mut value_settings = json!({
                "defaultValue": settings.default_value,
                "alwaysUseDefaultValue": settings.always_use_default_value,
            });
            if let Some(code) = &settings.default_currency_code {
                value_settings["defaultCurrencyCode"] = json!(code.to_uppercase());
            }
            action["valueSettings"] = value_settings;
        }
        Ok(AdsRequest::Mutate(vec![MutateOperation::create(
            ResourceKind::ConversionAction,
            action,
        )]))
    }

    fn normalize(
        &self,
        args: &CreateConversionActionArgs,
        response: AdsResponse,
    ) -> Result<Value> {
        let (id, resource_name) = created(&response.into_resource_names()?, 0)?;
        Ok(json!({
            "success": true,
            "conversionActionId": id,
            "resourceName": resource_name,
            "name": args.name,
            "type": args.action_type,
            "category": args.category,
            "status": args.status,
        }))
    }
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConversionTotals {
    conversions:          f64,
    conversion_value:     f64,
    all_conversions:      f64,
    value_per_conversion: f64,
}

impl ConversionTotals {
    fn add(&mut self, conversions: f64, value: f64, all_conversions: f64) {
        self.conversions += conversions;
        self.conversion_value += value;
        self.all_conversions += all_conversions;
        self.value_per_conversion = ratio(self.conversion_value, self.conversions);
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ActionStats {
    conversion_action_id: String,
    name:                 String,
    category:             String,
    #[serde(flatten)]
    totals:               ConversionTotals,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionStatsArgs {
    campaign_id:       Option<String>,
    date_range:        DateRange,
    custom_date_range: Option<CustomDateRange>,
    limit:             i64,
}

impl ConversionStatsArgs {
    fn window(&self) -> Result<DateWindow> {
        DateWindow::resolve(self.date_range, self.custom_date_range.as_ref())
    }
}

/// Conversions per action, aggregated across campaigns and days
pub struct GetConversionStats;

impl AdsTool for GetConversionStats {
    type Args = ConversionStatsArgs;
    type Output = Value;

    fn definition(&self) -> ToolDef {
        ToolDef {
            name:        TOOL_GET_CONVERSION_STATS,
            description: "Conversions and conversion value per conversion action over a date \
                          range, optionally for one campaign. Totals cover every action, \
                          including those past the limit.",
            action:      "get conversion stats",
            params:      vec![
                ParamDef::campaign_id(false),
                ParamDef::date_range(),
                ParamDef::custom_date_range(),
                ParamDef::limit(DEFAULT_LIST_LIMIT),
            ],
        }
    }

    fn build(&self, args: &ConversionStatsArgs, _ctx: &BuildContext<'_>) -> Result<AdsRequest> {
        let query = Query::select(CONVERSION_STATS_FIELDS)
            .from("campaign")
            .id_equals("campaign.id", args.campaign_id.as_deref())
            .during(&args.window()?)
            .order_by("metrics.conversions", SortOrder::Desc);
        Ok(AdsRequest::Query(query.build()))
    }

    fn normalize(&self, args: &ConversionStatsArgs, response: AdsResponse) -> Result<Value> {
        let values = response.into_rows()?;
        let mut actions: Vec<ActionStats> = Vec::new();
        let mut totals = ConversionTotals::default();

        for row in rows(&values) {
            let action_id = action_id(&row);
            let conversions = row.float("metrics.conversions");
            let value = row.float("metrics.conversionsValue");
            let all_conversions = row.float("metrics.allConversions");

            let index = match actions
                .iter()
                .position(|stats| stats.conversion_action_id == action_id)
            {
                Some(index) => index,
                None => {
                    actions.push(ActionStats {
                        conversion_action_id: action_id,
                        name:                 row.text("segments.conversionActionName"),
                        category:             row.text("segments.conversionActionCategory"),
                        totals:               ConversionTotals::default(),
                    });
                    actions.len() - 1
                }
            };
            actions[index].totals.add(conversions, value, all_conversions);
            totals.add(conversions, value, all_conversions);
        }
        // Segmented rows are summed first, so the limit applies to actions, not rows.
        actions.truncate(usize::try_from(args.limit).unwrap_or(usize::MAX));

        Ok(json!({
            "dateRange": args.window()?.label(),
            "campaignId": args.campaign_id,
            "count": actions.len(),
            "conversionActions": actions,
            "totals": totals,
        }))
    }
}

fn action_id(row: &Row<'_>) -> String {
    row.resource_id("segments.conversionAction")
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::error::Error;
    use crate::test_support::{MockAdsApi, invoke};

    #[tokio::test]
    async fn test_list_conversion_actions_hides_removed() {
        let api = MockAdsApi::new().with_rows(vec![json!({
            "conversionAction": {
                "id": "555",
                "name": "Purchase",
                "type": "WEBPAGE",
                "valueSettings": { "defaultValue": 25.0, "alwaysUseDefaultValue": false }
            }
        })]);

        let result = invoke(ListConversionActions, &api, json!({})).await.unwrap();

        assert!(api.queries()[0].contains("WHERE conversion_action.status != 'REMOVED'"));
        assert_eq!(result["conversionActions"][0]["type"], "WEBPAGE");
        assert_eq!(result["conversionActions"][0]["defaultValue"], 25.0);
    }

    #[tokio::test]
    async fn test_list_conversion_actions_can_include_removed() {
        let api = MockAdsApi::new().with_rows(vec![json!({
            "conversionAction": { "id": "556", "name": "Old purchase", "status": "REMOVED" }
        })]);

        let result = invoke(
            ListConversionActions,
            &api,
            json!({ "includeRemoved": true, "limit": 10 }),
        )
        .await
        .unwrap();

        let query = &api.queries()[0];
        assert!(!query.contains("WHERE"));
        assert!(query.ends_with("ORDER BY conversion_action.name ASC LIMIT 10"));
        assert_eq!(result["conversionActions"][0]["status"], "REMOVED");
    }

    #[tokio::test]
    async fn test_create_conversion_action_defaults_and_value_settings() {
        let api = MockAdsApi::new();

        let result = invoke(
            CreateConversionAction,
            &api,
            json!({
                "name": "Lead form",
                "category": "SUBMIT_LEAD_FORM",
                "valueSettings": { "defaultValue": 10, "defaultCurrencyCode": "eur" }
            }),
        )
        .await
        .unwrap();

        let ops = api.single_mutation();
        let payload = ops[0].payload().unwrap();
        assert_eq!(payload["type"], "WEBPAGE");
        assert_eq!(payload["countingType"], "ONE_PER_CLICK");
        assert_eq!(payload["status"], "ENABLED");
        assert_eq!(
            payload["valueSettings"],
            json!({ "defaultValue": 10.0, "alwaysUseDefaultValue": false, "defaultCurrencyCode": "EUR" })
        );
        assert_eq!(result["conversionActionId"], "101");
    }

    #[tokio::test]
    async fn test_create_conversion_action_rejects_unknown_category() {
        let api = MockAdsApi::new();

        let err = invoke(
            CreateConversionAction,
            &api,
            json!({ "name": "x", "category": "MAGIC" }),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, Error::Validation { ref field, .. } if field == "category"));
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn test_create_conversion_action_with_hidden_status() {
        let api = MockAdsApi::new();

        let result = invoke(
            CreateConversionAction,
            &api,
            json!({ "name": "Phone calls", "type": "AD_CALL", "status": "HIDDEN" }),
        )
        .await
        .unwrap();

        let ops = api.single_mutation();
        let payload = ops[0].payload().unwrap();
        assert_eq!(payload["status"], "HIDDEN");
        assert!(payload.get("valueSettings").is_none());
        assert_eq!(result["status"], "HIDDEN");
    }

    #[tokio::test]
    async fn test_conversion_stats_aggregate_by_action() {
        let purchase = "customers/1234567890/conversionActions/555";
        let lead = "customers/1234567890/conversionActions/777";
        let api = MockAdsApi::new().with_rows(vec![
            json!({
                "segments": { "conversionAction": purchase, "conversionActionName": "Purchase" },
                "metrics": { "conversions": 2.0, "conversionsValue": 100.0, "allConversions": 3.0 }
            }),
            json!({
                "segments": { "conversionAction": lead, "conversionActionName": "Lead" },
                "metrics": { "conversions": 5.0, "conversionsValue": 0.0, "allConversions": 5.0 }
            }),
            json!({
                "segments": { "conversionAction": purchase, "conversionActionName": "Purchase" },
                "metrics": { "conversions": 3.0, "conversionsValue": 150.0, "allConversions": 3.0 }
            }),
        ]);

        let result = invoke(
            GetConversionStats,
            &api,
            json!({ "campaignId": "42", "dateRange": "LAST_7_DAYS" }),
        )
        .await
        .unwrap();

        assert!(api.queries()[0].contains(
            "FROM campaign WHERE campaign.id = 42 AND segments.date DURING LAST_7_DAYS"
        ));
        assert_eq!(result["count"], 2);
        let first = &result["conversionActions"][0];
        assert_eq!(first["conversionActionId"], "555");
        assert_eq!(first["conversions"], 5.0);
        assert_eq!(first["conversionValue"], 250.0);
        assert_eq!(first["valuePerConversion"], 50.0);
        assert_eq!(result["totals"]["conversions"], 10.0);
        assert_eq!(result["totals"]["allConversions"], 11.0);
    }

    #[tokio::test]
    async fn test_conversion_stats_limit_keeps_full_totals() {
        let api = MockAdsApi::new().with_rows(vec![
            json!({
                "segments": { "conversionAction": "customers/1234567890/conversionActions/555" },
                "metrics": { "conversions": 4.0, "conversionsValue": 80.0, "allConversions": 4.0 }
            }),
            json!({
                "segments": { "conversionAction": "customers/1234567890/conversionActions/777" },
                "metrics": { "conversions": 1.0, "conversionsValue": 20.0, "allConversions": 2.0 }
            }),
        ]);

        let result = invoke(
            GetConversionStats,
            &api,
            json!({ "dateRange": "LAST_30_DAYS", "limit": 1 }),
        )
        .await
        .unwrap();

        assert!(!api.queries()[0].contains("LIMIT"));
        assert_eq!(result["count"], 1);
        assert_eq!(result["conversionActions"][0]["conversionActionId"], "555");
        assert_eq!(result["totals"]["conversions"], 5.0);
        assert_eq!(result["totals"]["conversionValue"], 100.0);
        assert_eq!(result["totals"]["valuePerConversion"], 20.0);
    }
}
