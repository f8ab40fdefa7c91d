use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::{UpdatedResource, created, single_row, updated};
use crate::ads_api::{MutateOperation, ResourceKind, UpdateBuilder};
use crate::constants::{
    AD_GROUP_TYPES, DEFAULT_LIST_LIMIT, PARAM_AD_GROUP_ID, PARAM_CPC_BID, PARAM_NAME,
    PARAM_STATUS, PARAM_TYPE, SETTABLE_STATUSES, TOOL_CREATE_AD_GROUP, TOOL_GET_AD_GROUP,
    TOOL_LIST_AD_GROUPS, TOOL_UPDATE_AD_GROUP,
};
use crate::error::{Error, Result};
use crate::support::money::to_micros;
use crate::support::query::{Query, SortOrder};
use crate::support::rows::{Row, rows};
use crate::tool_definitions::{ParamDef, ParamType, ToolDef};
use crate::tool_generator::{AdsRequest, AdsResponse, AdsTool, BuildContext};

const AD_GROUP_FIELDS: &[&str] = &[
    "ad_group.id",
    "ad_group.name",
    "ad_group.status",
    "ad_group.type",
    "ad_group.cpc_bid_micros",
    "campaign.id",
    "campaign.name",
];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdGroupSummary {
    id:            String,
    name:          String,
    status:        String,
    #[serde(rename = "type")]
    ad_group_type: String,
    cpc_bid:       Option<f64>,
    campaign_id:   String,
    campaign_name: String,
}

impl AdGroupSummary {
    fn from_row(row: &Row<'_>) -> Self {
        Self {
            id:            row.text("adGroup.id"),
            name:          row.text("adGroup.name"),
            status:        row.text("adGroup.status"),
            ad_group_type: row.text("adGroup.type"),
            cpc_bid:       row.opt_money("adGroup.cpcBidMicros"),
            campaign_id:   row.text("campaign.id"),
            campaign_name: row.text("campaign.name"),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAdGroupsArgs {
    campaign_id:     Option<String>,
    status:          Option<String>,
    include_removed: bool,
    limit:           i64,
}

pub struct ListAdGroups;

impl AdsTool for ListAdGroups {
    type Args = ListAdGroupsArgs;
    type Output = Value;

    fn definition(&self) -> ToolDef {
        ToolDef {
            name:        TOOL_LIST_AD_GROUPS,
            description: "List ad groups ordered by name, optionally within one campaign, with \
                          status, type and default CPC bid.",
            action:      "list ad groups",
            params:      vec![
                ParamDef::campaign_id(false),
                ParamDef::status_filter(),
                ParamDef::include_removed(),
                ParamDef::limit(DEFAULT_LIST_LIMIT),
            ],
        }
    }

    fn build(&self, args: &ListAdGroupsArgs, _ctx: &BuildContext<'_>) -> Result<AdsRequest> {
        let query = Query::select(AD_GROUP_FIELDS)
            .from("ad_group")
            .id_equals("campaign.id", args.campaign_id.as_deref())
            .status("ad_group.status", args.status.as_deref(), args.include_removed)
            .order_by("ad_group.name", SortOrder::Asc)
            .limit(args.limit);
        Ok(AdsRequest::Query(query.build()))
    }

    fn normalize(&self, _args: &ListAdGroupsArgs, response: AdsResponse) -> Result<Value> {
        let values = response.into_rows()?;
        let ad_groups: Vec<AdGroupSummary> = rows(&values)
            .map(|row| AdGroupSummary::from_row(&row))
            .collect();
        Ok(json!({ "count": ad_groups.len(), "adGroups": ad_groups }))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdGroupIdArgs {
    ad_group_id: String,
}

pub struct GetAdGroup;

impl AdsTool for GetAdGroup {
    type Args = AdGroupIdArgs;
    type Output = AdGroupSummary;

    fn definition(&self) -> ToolDef {
        ToolDef {
            name:        TOOL_GET_AD_GROUP,
            description: "Get one ad group by ID.",
            action:      "get ad group",
            params:      vec![ParamDef::ad_group_id(true)],
        }
    }

    fn build(&self, args: &AdGroupIdArgs, _ctx: &BuildContext<'_>) -> Result<AdsRequest> {
        let query = Query::select(AD_GROUP_FIELDS)
            .from("ad_group")
            .id_equals("ad_group.id", Some(&args.ad_group_id))
            .limit(1);
        Ok(AdsRequest::Query(query.build()))
    }

    fn normalize(&self, args: &AdGroupIdArgs, response: AdsResponse) -> Result<AdGroupSummary> {
        let value = single_row(response.into_rows()?, "Ad group", &args.ad_group_id)?;
        Ok(AdGroupSummary::from_row(&Row::new(&value)))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAdGroupArgs {
    campaign_id:   String,
    name:          String,
    cpc_bid:       Option<f64>,
    status:        String,
    #[serde(rename = "type")]
    ad_group_type: String,
}

pub struct CreateAdGroup;

impl AdsTool for CreateAdGroup {
    type Args = CreateAdGroupArgs;
    type Output = Value;

    fn definition(&self) -> ToolDef {
        ToolDef {
            name:        TOOL_CREATE_AD_GROUP,
            description: "Create an ad group in a campaign, optionally with a default CPC bid.",
            action:      "create ad group",
            params:      vec![
                ParamDef::campaign_id(true),
                ParamDef::required(PARAM_NAME, "Ad group name", ParamType::string()),
                ParamDef::money(PARAM_CPC_BID, "Default max CPC bid in account currency", false),
                ParamDef::optional(
                    PARAM_STATUS,
                    "Initial status (default: ENABLED)",
                    ParamType::enumeration(SETTABLE_STATUSES, Some("ENABLED")),
                ),
                ParamDef::optional(
                    PARAM_TYPE,
                    "Ad group type (default: SEARCH_STANDARD)",
                    ParamType::enumeration(AD_GROUP_TYPES, Some("SEARCH_STANDARD")),
                ),
            ],
        }
    }

    fn build(&self, args: &CreateAdGroupArgs, ctx: &BuildContext<'_>) -> Result<AdsRequest> {
        let mut ad_group = json!({
            "name": args.name,
            "campaign": ResourceKind::Campaign.resource_name(ctx.customer_id, &args.campaign_id),
            "status": args.status,
            "type": args.ad_group_type,
        });
        if let Some(cpc_bid) = args.cpc_bid {
            ad_group["cpcBidMicros"] = json!(to_micros(cpc_bid));
        }
        Ok(AdsRequest::Mutate(vec![MutateOperation::create(
            ResourceKind::AdGroup,
            ad_group,
        )]))
    }

    fn normalize(&self, args: &CreateAdGroupArgs, response: AdsResponse) -> Result<Value> {
        let (ad_group_id, resource_name) = created(&response.into_resource_names()?, 0)?;
        Ok(json!({
            "success": true,
            "adGroupId": ad_group_id,
            "resourceName": resource_name,
            "message": format!("Created ad group '{}' in campaign {}", args.name, args.campaign_id),
        }))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAdGroupArgs {
    ad_group_id: String,
    name:        Option<String>,
    status:      Option<String>,
    cpc_bid:     Option<f64>,
}

fn ad_group_update(args: &UpdateAdGroupArgs, customer_id: &str) -> Option<MutateOperation> {
    let resource_name = ResourceKind::AdGroup.resource_name(customer_id, &args.ad_group_id);
    UpdateBuilder::new(ResourceKind::AdGroup, resource_name)
        .set_opt("name", args.name.clone())
        .set_opt("status", args.status.clone())
        .set_opt("cpc_bid_micros", args.cpc_bid.map(to_micros))
        .build()
}

pub struct UpdateAdGroup;

impl AdsTool for UpdateAdGroup {
    type Args = UpdateAdGroupArgs;
    type Output = UpdatedResource;

    fn definition(&self) -> ToolDef {
        ToolDef {
            name:        TOOL_UPDATE_AD_GROUP,
            description: "Change an ad group's name, status or default CPC bid. Only the supplied \
                          fields are changed; at least one is required.",
            action:      "update ad group",
            params:      vec![
                ParamDef::ad_group_id(true),
                ParamDef::optional(PARAM_NAME, "New name", ParamType::string()),
                ParamDef::optional(
                    PARAM_STATUS,
                    "New status",
                    ParamType::enumeration(SETTABLE_STATUSES, None),
                ),
                ParamDef::money(PARAM_CPC_BID, "New default max CPC bid", false),
            ],
        }
    }

    fn build(&self, args: &UpdateAdGroupArgs, ctx: &BuildContext<'_>) -> Result<AdsRequest> {
        let operation = ad_group_update(args, ctx.customer_id).ok_or_else(|| {
            Error::validation(PARAM_AD_GROUP_ID, "nothing to update; supply name, status or cpcBid")
        })?;
        Ok(AdsRequest::Mutate(vec![operation]))
    }

    fn normalize(
        &self,
        args: &UpdateAdGroupArgs,
        response: AdsResponse,
    ) -> Result<UpdatedResource> {
        let mask = ad_group_update(args, "")
            .and_then(|op| op.update_mask().map(<[String]>::to_vec))
            .unwrap_or_default();
        updated(&response.into_resource_names()?, mask)
    }
}
