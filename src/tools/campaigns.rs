//! Campaign tools.
//!
//! `create_campaign` sends the budget and the campaign in one mutate request. The campaign
//! refers to its budget through the temporary resource name `campaignBudgets/-1`, so either both
//! are created or neither is.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use super::{UpdatedResource, created, single_row, updated};
use crate::ads_api::{MutateOperation, ResourceKind, UpdateBuilder};
use crate::constants::{
    CHANNEL_TYPES, DEFAULT_LIST_LIMIT, PARAM_AMOUNT, PARAM_BIDDING_STRATEGY,
    PARAM_BUDGET, PARAM_BUDGET_ID, PARAM_CAMPAIGN_ID, PARAM_CHANNEL_TYPE, PARAM_END_DATE,
    PARAM_MERCHANT_ID, PARAM_NAME, PARAM_START_DATE, PARAM_STATUS, PARAM_TARGET_CPA,
    PARAM_TARGET_ROAS, SETTABLE_STATUSES, TOOL_CREATE_CAMPAIGN, TOOL_GET_CAMPAIGN,
    TOOL_LIST_CAMPAIGNS, TOOL_UPDATE_CAMPAIGN, TOOL_UPDATE_CAMPAIGN_BUDGET,
};
use crate::error::{Error, Result};
use crate::support::money::to_micros;
use crate::support::query::{Query, SortOrder, quote};
use crate::support::rows::{Row, rows};
use crate::tool_definitions::{ParamDef, ParamType, ToolDef};
use crate::tool_generator::{AdsRequest, AdsResponse, AdsTool, BuildContext};

const CAMPAIGN_FIELDS: &[&str] = &[
    "campaign.id",
    "campaign.name",
    "campaign.status",
    "campaign.advertising_channel_type",
    "campaign.bidding_strategy_type",
    "campaign.campaign_budget",
    "campaign.start_date",
    "campaign.end_date",
    "campaign_budget.amount_micros",
];

const BIDDING_STRATEGIES: &[&str] = &[
    "MANUAL_CPC",
    "MAXIMIZE_CLICKS",
    "MAXIMIZE_CONVERSIONS",
    "MAXIMIZE_CONVERSION_VALUE",
    "TARGET_CPA",
    "TARGET_ROAS",
];

// Temporary id linking the new budget to the new campaign inside one request
const NEW_BUDGET_TEMP_ID: &str = "-1";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignSummary {
    id:               String,
    name:             String,
    status:           String,
    channel_type:     String,
    bidding_strategy: String,
    budget_id:        Option<String>,
    budget:           f64,
    start_date:       Option<String>,
    end_date:         Option<String>,
}

impl CampaignSummary {
    fn from_row(row: &Row<'_>) -> Self {
        Self {
            id:               row.text("campaign.id"),
            name:             row.text("campaign.name"),
            status:           row.text("campaign.status"),
            channel_type:     row.text("campaign.advertisingChannelType"),
            bidding_strategy: row.text("campaign.biddingStrategyType"),
            budget_id:        row.resource_id("campaign.campaignBudget"),
            budget:           row.money("campaignBudget.amountMicros"),
            start_date:       row.opt_text("campaign.startDate"),
            end_date:         row.opt_text("campaign.endDate"),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCampaignsArgs {
    status:          Option<String>,
    channel_type:    Option<String>,
    include_removed: bool,
    limit:           i64,
}

pub struct ListCampaigns;

impl AdsTool for ListCampaigns {
    type Args = ListCampaignsArgs;
    type Output = Value;

    fn definition(&self) -> ToolDef {
        ToolDef {
            name:        TOOL_LIST_CAMPAIGNS,
            description: "List campaigns ordered by name, with status, channel type, bidding \
                          strategy and daily budget. Removed campaigns are hidden unless \
                          includeRemoved is set.",
            action:      "list campaigns",
            params:      vec![
                ParamDef::status_filter(),
                ParamDef::optional(
                    PARAM_CHANNEL_TYPE,
                    "Only return campaigns of this advertising channel",
                    ParamType::enumeration(CHANNEL_TYPES, None),
                ),
                ParamDef::include_removed(),
                ParamDef::limit(DEFAULT_LIST_LIMIT),
            ],
        }
    }

    fn build(&self, args: &ListCampaignsArgs, _ctx: &BuildContext<'_>) -> Result<AdsRequest> {
        let mut query = Query::select(CAMPAIGN_FIELDS).from("campaign").status(
            "campaign.status",
            args.status.as_deref(),
            args.include_removed,
        );
        if let Some(channel_type) = &args.channel_type {
            query = query.filter(format!(
                "campaign.advertising_channel_type = {}",
                quote(channel_type)
            ));
        }
        let query = query
            .order_by("campaign.name", SortOrder::Asc)
            .limit(args.limit);
        Ok(AdsRequest::Query(query.build()))
    }

    fn normalize(&self, _args: &ListCampaignsArgs, response: AdsResponse) -> Result<Value> {
        let values = response.into_rows()?;
        let campaigns: Vec<CampaignSummary> = rows(&values)
            .map(|row| CampaignSummary::from_row(&row))
            .collect();
        Ok(json!({ "count": campaigns.len(), "campaigns": campaigns }))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignIdArgs {
    campaign_id: String,
}

pub struct GetCampaign;

impl AdsTool for GetCampaign {
    type Args = CampaignIdArgs;
    type Output = CampaignSummary;

    fn definition(&self) -> ToolDef {
        ToolDef {
            name:        TOOL_GET_CAMPAIGN,
            description: "Get one campaign by ID, including its budget ID for \
                          update_campaign_budget.",
            action:      "get campaign",
            params:      vec![ParamDef::campaign_id(true)],
        }
    }

    fn build(&self, args: &CampaignIdArgs, _ctx: &BuildContext<'_>) -> Result<AdsRequest> {
        let query = Query::select(CAMPAIGN_FIELDS)
            .from("campaign")
            .id_equals("campaign.id", Some(&args.campaign_id))
            .limit(1);
        Ok(AdsRequest::Query(query.build()))
    }

    fn normalize(&self, args: &CampaignIdArgs, response: AdsResponse) -> Result<CampaignSummary> {
        let value = single_row(response.into_rows()?, "Campaign", &args.campaign_id)?;
        Ok(CampaignSummary::from_row(&Row::new(&value)))
    }
}

/// Bidding strategy of a new campaign
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BiddingStrategy {
    ManualCpc,
    MaximizeClicks,
    MaximizeConversions,
    MaximizeConversionValue,
    TargetCpa,
    TargetRoas,
}

impl BiddingStrategy {
    /// Campaign field carrying the strategy and its settings
    fn campaign_field(
        self,
        target_cpa: Option<f64>,
        target_roas: Option<f64>,
    ) -> Result<(&'static str, Value)> {
        Ok(match self {
            Self::ManualCpc => ("manualCpc", json!({})),
            Self::MaximizeClicks => ("targetSpend", json!({})),
            Self::MaximizeConversions => ("maximizeConversions", json!({})),
            Self::MaximizeConversionValue => ("maximizeConversionValue", json!({})),
            Self::TargetCpa => {
                let target = target_cpa.ok_or_else(|| {
                    Error::validation(
                        PARAM_TARGET_CPA,
                        "is required when biddingStrategy is TARGET_CPA",
                    )
                })?;
                ("targetCpa", json!({ "targetCpaMicros": to_micros(target) }))
            }
            Self::TargetRoas => {
                let target = target_roas.ok_or_else(|| {
                    Error::validation(
                        PARAM_TARGET_ROAS,
                        "is required when biddingStrategy is TARGET_ROAS",
                    )
                })?;
                ("targetRoas", json!({ "targetRoas": target }))
            }
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCampaignArgs {
    name:             String,
    budget:           f64,
    channel_type:     String,
    status:           String,
    bidding_strategy: BiddingStrategy,
    target_cpa:       Option<f64>,
    target_roas:      Option<f64>,
    start_date:       Option<String>,
    end_date:         Option<String>,
    merchant_id:      Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedCampaign {
    success:                bool,
    campaign_id:            String,
    campaign_resource_name: String,
    budget_id:              String,
    budget_resource_name:   String,
    message:                String,
}

pub struct CreateCampaign;

impl AdsTool for CreateCampaign {
    type Args = CreateCampaignArgs;
    type Output = CreatedCampaign;

    fn definition(&self) -> ToolDef {
        ToolDef {
            name:        TOOL_CREATE_CAMPAIGN,
            description: "Create a campaign together with its daily budget. New campaigns start \
                          PAUSED unless another status is given. TARGET_CPA needs targetCpa, \
                          TARGET_ROAS needs targetRoas and SHOPPING campaigns need merchantId.",
            action:      "create campaign",
            params:      vec![
                ParamDef::required(PARAM_NAME, "Campaign name", ParamType::string()),
                ParamDef::money(PARAM_BUDGET, "Daily budget in account currency", true),
                ParamDef::required(
                    PARAM_CHANNEL_TYPE,
                    "Advertising channel",
                    ParamType::enumeration(CHANNEL_TYPES, None),
                ),
                ParamDef::optional(
                    PARAM_STATUS,
                    "Initial status (default: PAUSED)",
                    ParamType::enumeration(SETTABLE_STATUSES, Some("PAUSED")),
                ),
                ParamDef::optional(
                    PARAM_BIDDING_STRATEGY,
                    "Bidding strategy (default: MANUAL_CPC)",
                    ParamType::enumeration(BIDDING_STRATEGIES, Some("MANUAL_CPC")),
                ),
                ParamDef::money(
                    PARAM_TARGET_CPA,
                    "Target cost per acquisition for TARGET_CPA",
                    false,
                ),
                ParamDef::optional(
                    PARAM_TARGET_ROAS,
                    "Target return on ad spend for TARGET_ROAS (3.5 = 350%)",
                    ParamType::Number { default: None },
                ),
                ParamDef::optional(
                    PARAM_START_DATE,
                    "First serving day (YYYY-MM-DD)",
                    ParamType::Date,
                ),
                ParamDef::optional(
                    PARAM_END_DATE,
                    "Last serving day (YYYY-MM-DD)",
                    ParamType::Date,
                ),
                ParamDef::optional(
                    PARAM_MERCHANT_ID,
                    "Merchant Center account ID, required for SHOPPING",
                    ParamType::Id,
                ),
            ],
        }
    }

    fn build(&self, args: &CreateCampaignArgs, ctx: &BuildContext<'_>) -> Result<AdsRequest> {
        if let (Some(start), Some(end)) = (&args.start_date, &args.end_date) {
            if start > end {
                return Err(Error::validation(
                    PARAM_END_DATE,
                    format!("{end} is before startDate {start}"),
                ));
            }
        }

        let budget_name =
            ResourceKind::CampaignBudget.resource_name(ctx.customer_id, NEW_BUDGET_TEMP_ID);
        let budget = MutateOperation::create(
            ResourceKind::CampaignBudget,
            json!({
                "resourceName": budget_name,
                "name": format!("{} Budget", args.name),
                "amountMicros": to_micros(args.budget),
                "deliveryMethod": "STANDARD",
                "explicitlyShared": false,
            }),
        );

        let mut campaign = Map::new();
        campaign.insert("name".to_string(), json!(args.name));
        campaign.insert("status".to_string(), json!(args.status));
        campaign.insert("advertisingChannelType".to_string(), json!(args.channel_type));
        campaign.insert("campaignBudget".to_string(), json!(budget_name));

        let (bidding_field, bidding) = args
            .bidding_strategy
            .campaign_field(args.target_cpa, args.target_roas)?;
        campaign.insert(bidding_field.to_string(), bidding);

        match args.channel_type.as_str() {
            "SEARCH" => {
                campaign.insert(
                    "networkSettings".to_string(),
                    json!({
                        "targetGoogleSearch": true,
                        "targetSearchNetwork": true,
                        "targetContentNetwork": false,
                    }),
                );
            }
            "SHOPPING" => {
                let merchant_id = args.merchant_id.as_ref().ok_or_else(|| {
                    Error::validation(PARAM_MERCHANT_ID, "is required for SHOPPING campaigns")
                })?;
                campaign.insert(
                    "shoppingSetting".to_string(),
                    json!({ "merchantId": merchant_id }),
                );
            }
            _ => {}
        }

        if let Some(start_date) = &args.start_date {
            campaign.insert("startDate".to_string(), json!(start_date));
        }
        if let Some(end_date) = &args.end_date {
            campaign.insert("endDate".to_string(), json!(end_date));
        }

        let campaign = MutateOperation::create(ResourceKind::Campaign, Value::Object(campaign));
        Ok(AdsRequest::Mutate(vec![budget, campaign]))
    }

    fn normalize(
        &self,
        args: &CreateCampaignArgs,
        response: AdsResponse,
    ) -> Result<CreatedCampaign> {
        let names = response.into_resource_names()?;
        let (budget_id, budget_resource_name) = created(&names, 0)?;
        let (campaign_id, campaign_resource_name) = created(&names, 1)?;
        Ok(CreatedCampaign {
            success: true,
            message: format!(
                "Created campaign '{}' with status {} and a daily budget of {}",
                args.name, args.status, args.budget
            ),
            campaign_id,
            campaign_resource_name,
            budget_id,
            budget_resource_name,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCampaignArgs {
    campaign_id: String,
    name:        Option<String>,
    status:      Option<String>,
    end_date:    Option<String>,
    target_cpa:  Option<f64>,
    target_roas: Option<f64>,
}

fn campaign_update(args: &UpdateCampaignArgs, customer_id: &str) -> Option<MutateOperation> {
    let resource_name = ResourceKind::Campaign.resource_name(customer_id, &args.campaign_id);
    UpdateBuilder::new(ResourceKind::Campaign, resource_name)
        .set_opt("name", args.name.clone())
        .set_opt("status", args.status.clone())
        .set_opt("end_date", args.end_date.clone())
        .set_opt("target_cpa.target_cpa_micros", args.target_cpa.map(to_micros))
        .set_opt("target_roas.target_roas", args.target_roas)
        .build()
}

pub struct UpdateCampaign;

impl AdsTool for UpdateCampaign {
    type Args = UpdateCampaignArgs;
    type Output = UpdatedResource;

    fn definition(&self) -> ToolDef {
        ToolDef {
            name:        TOOL_UPDATE_CAMPAIGN,
            description: "Change a campaign's name, status, end date or bidding target. Only the \
                          supplied fields are changed; at least one is required.",
            action:      "update campaign",
            params:      vec![
                ParamDef::campaign_id(true),
                ParamDef::optional(PARAM_NAME, "New name", ParamType::string()),
                ParamDef::optional(
                    PARAM_STATUS,
                    "New status",
                    ParamType::enumeration(SETTABLE_STATUSES, None),
                ),
                ParamDef::optional(
                    PARAM_END_DATE,
                    "New last serving day (YYYY-MM-DD)",
                    ParamType::Date,
                ),
                ParamDef::money(PARAM_TARGET_CPA, "New target CPA for TARGET_CPA campaigns", false),
                ParamDef::optional(
                    PARAM_TARGET_ROAS,
                    "New target ROAS for TARGET_ROAS campaigns",
                    ParamType::Number { default: None },
                ),
            ],
        }
    }

    fn build(&self, args: &UpdateCampaignArgs, ctx: &BuildContext<'_>) -> Result<AdsRequest> {
        let operation = campaign_update(args, ctx.customer_id).ok_or_else(|| {
            Error::validation(
                PARAM_CAMPAIGN_ID,
                "nothing to update; supply name, status, endDate, targetCpa or targetRoas",
            )
        })?;
        Ok(AdsRequest::Mutate(vec![operation]))
    }

    fn normalize(
        &self,
        args: &UpdateCampaignArgs,
        response: AdsResponse,
    ) -> Result<UpdatedResource> {
        // Same builder as the request, so the echoed mask is the one that was sent
        let mask = campaign_update(args, "")
            .and_then(|op| op.update_mask().map(<[String]>::to_vec))
            .unwrap_or_default();
        updated(&response.into_resource_names()?, mask)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBudgetArgs {
    budget_id: String,
    amount:    f64,
}

pub struct UpdateCampaignBudget;

impl AdsTool for UpdateCampaignBudget {
    type Args = UpdateBudgetArgs;
    type Output = Value;

    fn definition(&self) -> ToolDef {
        ToolDef {
            name:        TOOL_UPDATE_CAMPAIGN_BUDGET,
            description: "Set the daily amount of a campaign budget. The budget ID is returned by \
                          list_campaigns and get_campaign.",
            action:      "update campaign budget",
            params:      vec![
                ParamDef::required(PARAM_BUDGET_ID, "Campaign budget ID", ParamType::Id),
                ParamDef::money(PARAM_AMOUNT, "New daily amount in account currency", true),
            ],
        }
    }

    fn build(&self, args: &UpdateBudgetArgs, ctx: &BuildContext<'_>) -> Result<AdsRequest> {
        let resource_name =
            ResourceKind::CampaignBudget.resource_name(ctx.customer_id, &args.budget_id);
        let operation = UpdateBuilder::new(ResourceKind::CampaignBudget, resource_name)
            .set("amount_micros", to_micros(args.amount))
            .build()
            .ok_or_else(|| Error::internal("budget update carried no fields"))?;
        Ok(AdsRequest::Mutate(vec![operation]))
    }

    fn normalize(&self, args: &UpdateBudgetArgs, response: AdsResponse) -> Result<Value> {
        let (budget_id, resource_name) = created(&response.into_resource_names()?, 0)?;
        Ok(json!({
            "success": true,
            "budgetId": budget_id,
            "resourceName": resource_name,
            "amount": args.amount,
        }))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use crate::ads_api::Operation;
    use crate::test_support::{MockAdsApi, invoke};

    fn create_args() -> Value {
        json!({ "name": "Spring Sale", "budget": 12.50, "channelType": "SEARCH" })
    }

    #[tokio::test]
    async fn test_list_campaigns_default_query() {
        let api = MockAdsApi::new().with_rows(vec![json!({
            "campaign": {
                "id": "42",
                "name": "Brand",
                "status": "ENABLED",
                "advertisingChannelType": "SEARCH",
                "biddingStrategyType": "MANUAL_CPC",
                "campaignBudget": "customers/1234567890/campaignBudgets/555"
            },
            "campaignBudget": { "amountMicros": "2500000" }
        })]);

        let result = invoke(ListCampaigns, &api, json!({ "channelType": "SEARCH" }))
            .await
            .unwrap();

        let query = &api.queries()[0];
        assert!(query.contains(
            "WHERE campaign.status != 'REMOVED' AND campaign.advertising_channel_type = 'SEARCH'"
        ));
        assert!(query.ends_with("ORDER BY campaign.name ASC LIMIT 50"));
        assert_eq!(result["campaigns"][0]["budgetId"], "555");
        assert_eq!(result["campaigns"][0]["budget"], 2.5);
        assert_eq!(result["campaigns"][0]["endDate"], Value::Null);
    }

    #[tokio::test]
    async fn test_get_campaign_not_found() {
        let api = MockAdsApi::new();
        let err = invoke(GetCampaign, &api, json!({ "campaignId": 42 }))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Campaign not found: 42");
    }

    #[tokio::test]
    async fn test_create_campaign_sends_budget_then_campaign_in_one_request() {
        let api = MockAdsApi::new();

        let result = invoke(CreateCampaign, &api, create_args()).await.unwrap();

        let ops = api.single_mutation();
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0].kind, ResourceKind::CampaignBudget);
        assert_eq!(ops[1].kind, ResourceKind::Campaign);

        let budget = ops[0].payload().unwrap();
        assert_eq!(budget["amountMicros"], json!(12_500_000));
        assert_eq!(
            budget["resourceName"],
            "customers/1234567890/campaignBudgets/-1"
        );

        let campaign = ops[1].payload().unwrap();
        assert_eq!(campaign["campaignBudget"], budget["resourceName"]);
        assert_eq!(campaign["status"], "PAUSED");
        assert_eq!(campaign["manualCpc"], json!({}));
        assert_eq!(campaign["networkSettings"]["targetGoogleSearch"], true);

        assert_eq!(result["budgetId"], "101");
        assert_eq!(result["campaignId"], "102");
    }

    #[tokio::test]
    async fn test_create_campaign_target_cpa_requires_target() {
        let api = MockAdsApi::new();
        let mut args = create_args();
        args["biddingStrategy"] = json!("TARGET_CPA");

        let err = invoke(CreateCampaign, &api, args.clone()).await.unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "targetCpa"));
        assert_eq!(api.calls(), 0);

        args["targetCpa"] = json!(4.2);
        invoke(CreateCampaign, &api, args).await.unwrap();
        let ops = api.single_mutation();
        assert_eq!(
            ops[1].payload().unwrap()["targetCpa"]["targetCpaMicros"],
            json!(4_200_000)
        );
    }

    #[tokio::test]
    async fn test_create_shopping_campaign_requires_merchant() {
        let api = MockAdsApi::new();
        let mut args = create_args();
        args["channelType"] = json!("SHOPPING");

        let err = invoke(CreateCampaign, &api, args).await.unwrap_err();

        assert!(matches!(err, Error::Validation { ref field, .. } if field == "merchantId"));
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn test_update_campaign_mask_matches_payload() {
        let api = MockAdsApi::new();

        let result = invoke(
            UpdateCampaign,
            &api,
            json!({ "campaignId": "42", "status": "ENABLED", "targetCpa": 3.0 }),
        )
        .await
        .unwrap();

        let ops = api.single_mutation();
        let Operation::Update {
            resource,
            update_mask,
        } = &ops[0].operation
        else {
            panic!("expected an update");
        };
        assert_eq!(update_mask, &["status", "target_cpa.target_cpa_micros"]);
        assert_eq!(resource["targetCpa"]["targetCpaMicros"], json!(3_000_000));
        assert!(resource.get("name").is_none());
        assert_eq!(
            result["updatedFields"],
            json!(["status", "target_cpa.target_cpa_micros"])
        );
    }

    #[tokio::test]
    async fn test_update_campaign_without_fields_is_rejected() {
        let api = MockAdsApi::new();
        let err = invoke(UpdateCampaign, &api, json!({ "campaignId": "42" }))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn test_update_budget_converts_amount() {
        let api = MockAdsApi::new();

        invoke(
            UpdateCampaignBudget,
            &api,
            json!({ "budgetId": "555", "amount": 0.29 }),
        )
        .await
        .unwrap();

        let ops = api.single_mutation();
        assert_eq!(ops[0].update_mask().unwrap(), ["amount_micros"]);
        assert_eq!(ops[0].payload().unwrap()["amountMicros"], json!(290_000));
        assert_eq!(
            ops[0].payload().unwrap()["resourceName"],
            "customers/1234567890/campaignBudgets/555"
        );
    }
}
