use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::{UpdatedResource, created, single_row, updated};
use crate::ads_api::{MutateOperation, ResourceKind, UpdateBuilder};
use crate::constants::{
    DEFAULT_LIST_LIMIT, PARAM_AD_ID, PARAM_DESCRIPTIONS, PARAM_FINAL_URL, PARAM_HEADLINES,
    PARAM_PATH1, PARAM_PATH2, PARAM_STATUS, RSA_DESCRIPTION_MAX_LEN, RSA_HEADLINE_MAX_LEN,
    RSA_MAX_DESCRIPTIONS, RSA_MAX_HEADLINES, RSA_MIN_DESCRIPTIONS, RSA_MIN_HEADLINES,
    RSA_PATH_MAX_LEN, SETTABLE_STATUSES, TOOL_CREATE_RESPONSIVE_SEARCH_AD, TOOL_GET_AD,
    TOOL_LIST_ADS, TOOL_UPDATE_AD_STATUS,
};
use crate::error::{Error, Result};
use crate::support::query::{Query, SortOrder};
use crate::support::rows::{Row, rows};
use crate::tool_definitions::{ParamDef, ParamType, ToolDef};
use crate::tool_generator::{AdsRequest, AdsResponse, AdsTool, BuildContext};

const AD_FIELDS: &[&str] = &[
    "ad_group_ad.ad.id",
    "ad_group_ad.ad.name",
    "ad_group_ad.ad.type",
    "ad_group_ad.status",
    "ad_group_ad.ad.final_urls",
    "ad_group_ad.ad.responsive_search_ad.headlines",
    "ad_group_ad.ad.responsive_search_ad.descriptions",
    "ad_group_ad.ad.responsive_search_ad.path1",
    "ad_group_ad.ad.responsive_search_ad.path2",
    "ad_group_ad.policy_summary.approval_status",
    "ad_group.id",
    "ad_group.name",
    "campaign.id",
    "campaign.name",
];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdSummary {
    id:              String,
    name:            Option<String>,
    #[serde(rename = "type")]
    ad_type:         String,
    status:          String,
    approval_status: Option<String>,
    final_urls:      Vec<String>,
    headlines:       Vec<String>,
    descriptions:    Vec<String>,
    path1:           Option<String>,
    path2:           Option<String>,
    ad_group_id:     String,
    ad_group_name:   String,
    campaign_id:     String,
    campaign_name:   String,
}

impl AdSummary {
    fn from_row(row: &Row<'_>) -> Self {
        Self {
            id:              row.text("adGroupAd.ad.id"),
            name:            row.opt_text("adGroupAd.ad.name"),
            ad_type:         row.text("adGroupAd.ad.type"),
            status:          row.text("adGroupAd.status"),
            approval_status: row.opt_text("adGroupAd.policySummary.approvalStatus"),
            final_urls:      row.texts("adGroupAd.ad.finalUrls"),
            headlines:       row.texts("adGroupAd.ad.responsiveSearchAd.headlines"),
            descriptions:    row.texts("adGroupAd.ad.responsiveSearchAd.descriptions"),
            path1:           row.opt_text("adGroupAd.ad.responsiveSearchAd.path1"),
            path2:           row.opt_text("adGroupAd.ad.responsiveSearchAd.path2"),
            ad_group_id:     row.text("adGroup.id"),
            ad_group_name:   row.text("adGroup.name"),
            campaign_id:     row.text("campaign.id"),
            campaign_name:   row.text("campaign.name"),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAdsArgs {
    campaign_id:     Option<String>,
    ad_group_id:     Option<String>,
    status:          Option<String>,
    include_removed: bool,
    limit:           i64,
}

pub struct ListAds;

impl AdsTool for ListAds {
    type Args = ListAdsArgs;
    type Output = Value;

    fn definition(&self) -> ToolDef {
        ToolDef {
            name:        TOOL_LIST_ADS,
            description: "List ads with their headlines, descriptions, final URLs and approval \
                          status. Campaign and ad group filters combine.",
            action:      "list ads",
            params:      vec![
                ParamDef::campaign_id(false),
                ParamDef::ad_group_id(false),
                ParamDef::status_filter(),
                ParamDef::include_removed(),
                ParamDef::limit(DEFAULT_LIST_LIMIT),
            ],
        }
    }

    fn build(&self, args: &ListAdsArgs, _ctx: &BuildContext<'_>) -> Result<AdsRequest> {
        let query = Query::select(AD_FIELDS)
            .from("ad_group_ad")
            .id_equals("campaign.id", args.campaign_id.as_deref())
            .id_equals("ad_group.id", args.ad_group_id.as_deref())
            .status("ad_group_ad.status", args.status.as_deref(), args.include_removed)
            .order_by("ad_group_ad.ad.id", SortOrder::Asc)
            .limit(args.limit);
        Ok(AdsRequest::Query(query.build()))
    }

    fn normalize(&self, _args: &ListAdsArgs, response: AdsResponse) -> Result<Value> {
        let values = response.into_rows()?;
        let ads: Vec<AdSummary> = rows(&values).map(|row| AdSummary::from_row(&row)).collect();
        Ok(json!({ "count": ads.len(), "ads": ads }))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdRefArgs {
    ad_group_id: String,
    ad_id:       String,
}

pub struct GetAd;

impl AdsTool for GetAd {
    type Args = AdRefArgs;
    type Output = AdSummary;

    fn definition(&self) -> ToolDef {
        ToolDef {
            name:        TOOL_GET_AD,
            description: "Get one ad by ad group ID and ad ID.",
            action:      "get ad",
            params:      vec![
                ParamDef::ad_group_id(true),
                ParamDef::required(PARAM_AD_ID, "Ad ID", ParamType::Id),
            ],
        }
    }

    fn build(&self, args: &AdRefArgs, _ctx: &BuildContext<'_>) -> Result<AdsRequest> {
        let query = Query::select(AD_FIELDS)
            .from("ad_group_ad")
            .id_equals("ad_group.id", Some(&args.ad_group_id))
            .id_equals("ad_group_ad.ad.id", Some(&args.ad_id))
            .limit(1);
        Ok(AdsRequest::Query(query.build()))
    }

    fn normalize(&self, args: &AdRefArgs, response: AdsResponse) -> Result<AdSummary> {
        let id = format!("{}~{}", args.ad_group_id, args.ad_id);
        let value = single_row(response.into_rows()?, "Ad", &id)?;
        Ok(AdSummary::from_row(&Row::new(&value)))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRsaArgs {
    ad_group_id:  String,
    headlines:    Vec<String>,
    descriptions: Vec<String>,
    final_url:    String,
    path1:        Option<String>,
    path2:        Option<String>,
    status:       String,
}

fn text_assets(texts: &[String]) -> Vec<Value> {
    texts.iter().map(|text| json!({ "text": text })).collect()
}

pub struct CreateResponsiveSearchAd;

impl AdsTool for CreateResponsiveSearchAd {
    type Args = CreateRsaArgs;
    type Output = Value;

    fn definition(&self) -> ToolDef {
        ToolDef {
            name:        TOOL_CREATE_RESPONSIVE_SEARCH_AD,
            description: "Create a responsive search ad: 3 to 15 headlines of at most 30 \
                          characters, 2 to 4 descriptions of at most 90 characters, and a final \
                          URL. Optional display path parts are at most 15 characters.",
            action:      "create responsive search ad",
            params:      vec![
                ParamDef::ad_group_id(true),
                ParamDef::required(
                    PARAM_HEADLINES,
                    "Headlines",
                    ParamType::StringArray {
                        min_items: RSA_MIN_HEADLINES,
                        max_items: Some(RSA_MAX_HEADLINES),
                        max_len:   Some(RSA_HEADLINE_MAX_LEN),
                    },
                ),
                ParamDef::required(
                    PARAM_DESCRIPTIONS,
                    "Descriptions",
                    ParamType::StringArray {
                        min_items: RSA_MIN_DESCRIPTIONS,
                        max_items: Some(RSA_MAX_DESCRIPTIONS),
                        max_len:   Some(RSA_DESCRIPTION_MAX_LEN),
                    },
                ),
                ParamDef::required(
                    PARAM_FINAL_URL,
                    "Landing page URL (http or https)",
                    ParamType::string(),
                ),
                ParamDef::optional(
                    PARAM_PATH1,
                    "First display path part",
                    ParamType::String {
                        max_len: Some(RSA_PATH_MAX_LEN),
                    },
                ),
                ParamDef::optional(
                    PARAM_PATH2,
                    "Second display path part",
                    ParamType::String {
                        max_len: Some(RSA_PATH_MAX_LEN),
                    },
                ),
                ParamDef::optional(
                    PARAM_STATUS,
                    "Initial status (default: ENABLED)",
                    ParamType::enumeration(SETTABLE_STATUSES, Some("ENABLED")),
                ),
            ],
        }
    }

    fn build(&self, args: &CreateRsaArgs, ctx: &BuildContext<'_>) -> Result<AdsRequest> {
        if !(args.final_url.starts_with("https://") || args.final_url.starts_with("http://")) {
            return Err(Error::validation(
                PARAM_FINAL_URL,
                format!("'{}' must start with http:// or https://", args.final_url),
            ));
        }
        if args.path2.is_some() && args.path1.is_none() {
            return Err(Error::validation(PARAM_PATH2, "requires path1"));
        }

        let mut rsa = json!({
            "headlines": text_assets(&args.headlines),
            "descriptions": text_assets(&args.descriptions),
        });
        if let Some(path1) = &args.path1 {
            rsa["path1"] = json!(path1);
        }
        if let Some(path2) = &args.path2 {
            rsa["path2"] = json!(path2);
        }

        let ad_group_ad = json!({
            "adGroup": ResourceKind::AdGroup.resource_name(ctx.customer_id, &args.ad_group_id),
            "status": args.status,
            "ad": {
                "finalUrls": [args.final_url],
                "responsiveSearchAd": rsa,
            },
        });
        Ok(AdsRequest::Mutate(vec![MutateOperation::create(
            ResourceKind::AdGroupAd,
            ad_group_ad,
        )]))
    }

    fn normalize(&self, args: &CreateRsaArgs, response: AdsResponse) -> Result<Value> {
        let (ad_id, resource_name) = created(&response.into_resource_names()?, 0)?;
        Ok(json!({
            "success": true,
            "adId": ad_id,
            "adGroupId": args.ad_group_id,
            "resourceName": resource_name,
            "headlines": args.headlines.len(),
            "descriptions": args.descriptions.len(),
        }))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAdStatusArgs {
    ad_group_id: String,
    ad_id:       String,
    status:      String,
}

pub struct UpdateAdStatus;

impl AdsTool for UpdateAdStatus {
    type Args = UpdateAdStatusArgs;
    type Output = UpdatedResource;

    fn definition(&self) -> ToolDef {
        ToolDef {
            name:        TOOL_UPDATE_AD_STATUS,
            description: "Enable or pause an ad.",
            action:      "update ad status",
            params:      vec![
                ParamDef::ad_group_id(true),
                ParamDef::required(PARAM_AD_ID, "Ad ID", ParamType::Id),
                ParamDef::required(
                    PARAM_STATUS,
                    "New status",
                    ParamType::enumeration(SETTABLE_STATUSES, None),
                ),
            ],
        }
    }

    fn build(&self, args: &UpdateAdStatusArgs, ctx: &BuildContext<'_>) -> Result<AdsRequest> {
        let resource_name = ResourceKind::AdGroupAd.composite_resource_name(
            ctx.customer_id,
            &args.ad_group_id,
            &args.ad_id,
        );
        let operation = UpdateBuilder::new(ResourceKind::AdGroupAd, resource_name)
            .set("status", args.status.clone())
            .build()
            .ok_or_else(|| Error::internal("ad status update carried no fields"))?;
        Ok(AdsRequest::Mutate(vec![operation]))
    }

    fn normalize(
        &self,
        _args: &UpdateAdStatusArgs,
        response: AdsResponse,
    ) -> Result<UpdatedResource> {
        updated(&response.into_resource_names()?, vec!["status".to_string()])
    }
}
