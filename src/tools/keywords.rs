//! Keyword tools: listing, batch creation, negatives, bid/status updates and the search terms
//! report.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::{UpdatedResource, created, updated};
use crate::ads_api::{MutateOperation, ResourceKind, UpdateBuilder};
use crate::constants::{
    DEFAULT_KEYWORD_LIMIT, KEYWORD_MAX_LEN, MATCH_TYPES, PARAM_AD_GROUP_ID,
    PARAM_CAMPAIGN_ID, PARAM_CPC_BID, PARAM_INCLUDE_NEGATIVES, PARAM_KEYWORD_ID, PARAM_KEYWORDS,
    PARAM_MATCH_TYPE, PARAM_MIN_IMPRESSIONS, PARAM_SORT_BY, PARAM_STATUS, PARAM_TEXT,
    SETTABLE_STATUSES, TOOL_ADD_KEYWORDS, TOOL_ADD_NEGATIVE_KEYWORDS, TOOL_GET_SEARCH_TERMS_REPORT,
    TOOL_LIST_KEYWORDS, TOOL_REMOVE_KEYWORD, TOOL_UPDATE_KEYWORD,
};
use crate::error::{Error, Result};
use crate::support::date_range::{CustomDateRange, DateRange, DateWindow};
use crate::support::metrics::{METRIC_FIELDS, Metric, PerformanceMetrics};
use crate::support::money::to_micros;
use crate::support::query::{Query, SortOrder};
use crate::support::rows::{Row, rows};
use crate::tool_definitions::{ParamDef, ParamType, ToolDef};
use crate::tool_generator::{AdsRequest, AdsResponse, AdsTool, BuildContext};

const KEYWORD_FIELDS: &[&str] = &[
    "ad_group_criterion.criterion_id",
    "ad_group_criterion.keyword.text",
    "ad_group_criterion.keyword.match_type",
    "ad_group_criterion.status",
    "ad_group_criterion.negative",
    "ad_group_criterion.cpc_bid_micros",
    "ad_group_criterion.quality_info.quality_score",
    "ad_group.id",
    "ad_group.name",
    "campaign.id",
    "campaign.name",
];

const SEARCH_TERM_FIELDS: &[&str] = &[
    "search_term_view.search_term",
    "search_term_view.status",
    "campaign.id",
    "campaign.name",
    "ad_group.id",
    "ad_group.name",
];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct KeywordSummary {
    id:            String,
    text:          String,
    match_type:    String,
    status:        String,
    negative:      bool,
    cpc_bid:       Option<f64>,
    quality_score: Option<i64>,
    ad_group_id:   String,
    ad_group_name: String,
    campaign_id:   String,
    campaign_name: String,
}

impl KeywordSummary {
    fn from_row(row: &Row<'_>) -> Self {
        Self {
            id:            row.text("adGroupCriterion.criterionId"),
            text:          row.text("adGroupCriterion.keyword.text"),
            match_type:    row.text("adGroupCriterion.keyword.matchType"),
            status:        row.text("adGroupCriterion.status"),
            negative:      row.flag("adGroupCriterion.negative"),
            cpc_bid:       row.opt_money("adGroupCriterion.cpcBidMicros"),
            quality_score: row.opt_int("adGroupCriterion.qualityInfo.qualityScore"),
            ad_group_id:   row.text("adGroup.id"),
            ad_group_name: row.text("adGroup.name"),
            campaign_id:   row.text("campaign.id"),
            campaign_name: row.text("campaign.name"),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListKeywordsArgs {
    campaign_id:       Option<String>,
    ad_group_id:       Option<String>,
    include_negatives: bool,
    include_removed:   bool,
    limit:             i64,
}

pub struct ListKeywords;

impl AdsTool for ListKeywords {
    type Args = ListKeywordsArgs;
    type Output = Value;

    fn definition(&self) -> ToolDef {
        ToolDef {
            name:        TOOL_LIST_KEYWORDS,
            description: "List keywords with match type, status, bid and quality score. \
                          Negative and removed keywords are hidden unless requested.",
            action:      "list keywords",
            params:      vec![
                ParamDef::campaign_id(false),
                ParamDef::ad_group_id(false),
                ParamDef::optional(
                    PARAM_INCLUDE_NEGATIVES,
                    "Include negative keywords (default: false)",
                    ParamType::boolean(false),
                ),
                ParamDef::include_removed(),
                ParamDef::limit(DEFAULT_KEYWORD_LIMIT),
            ],
        }
    }

    fn build(&self, args: &ListKeywordsArgs, _ctx: &BuildContext<'_>) -> Result<AdsRequest> {
        let query = Query::select(KEYWORD_FIELDS)
            .from("ad_group_criterion")
            .filter("ad_group_criterion.type = 'KEYWORD'")
            .id_equals("campaign.id", args.campaign_id.as_deref())
            .id_equals("ad_group.id", args.ad_group_id.as_deref())
            .status("ad_group_criterion.status", None, args.include_removed)
            .filter_if(!args.include_negatives, "ad_group_criterion.negative = FALSE")
            .order_by("ad_group_criterion.keyword.text", SortOrder::Asc)
            .limit(args.limit);
        Ok(AdsRequest::Query(query.build()))
    }

    fn normalize(&self, _args: &ListKeywordsArgs, response: AdsResponse) -> Result<Value> {
        let values = response.into_rows()?;
        let keywords: Vec<KeywordSummary> = rows(&values)
            .map(|row| KeywordSummary::from_row(&row))
            .collect();
        Ok(json!({ "count": keywords.len(), "keywords": keywords }))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordInput {
    text:       String,
    match_type: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddKeywordsArgs {
    ad_group_id: String,
    keywords:    Vec<KeywordInput>,
    cpc_bid:     Option<f64>,
    status:      String,
}

pub struct AddKeywords;

impl AdsTool for AddKeywords {
    type Args = AddKeywordsArgs;
    type Output = Value;

    fn definition(&self) -> ToolDef {
        ToolDef {
            name:        TOOL_ADD_KEYWORDS,
            description: "Add keywords to an ad group in one request; either all are added or \
                          none. An optional bid applies to every keyword.",
            action:      "add keywords",
            params:      vec![
                ParamDef::ad_group_id(true),
                ParamDef::required(
                    PARAM_KEYWORDS,
                    "Keywords to add",
                    ParamType::ObjectArray {
                        fields:    vec![
                            ParamDef::required(
                                PARAM_TEXT,
                                "Keyword text",
                                ParamType::String {
                                    max_len: Some(KEYWORD_MAX_LEN),
                                },
                            ),
                            ParamDef::optional(
                                PARAM_MATCH_TYPE,
                                "Match type (default: BROAD)",
                                ParamType::enumeration(MATCH_TYPES, Some("BROAD")),
                            ),
                        ],
                        min_items: 1,
                    },
                ),
                ParamDef::money(PARAM_CPC_BID, "Max CPC bid for the new keywords", false),
                ParamDef::optional(
                    PARAM_STATUS,
                    "Initial status (default: ENABLED)",
                    ParamType::enumeration(SETTABLE_STATUSES, Some("ENABLED")),
                ),
            ],
        }
    }

    fn build(&self, args: &AddKeywordsArgs, ctx: &BuildContext<'_>) -> Result<AdsRequest> {
        let ad_group = ResourceKind::AdGroup.resource_name(ctx.customer_id, &args.ad_group_id);
        let operations = args
            .keywords
            .iter()
            .map(|keyword| {
                let mut criterion = json!({
                    "adGroup": ad_group,
                    "status": args.status,
                    "keyword": { "text": keyword.text, "matchType": keyword.match_type },
                });
                if let Some(cpc_bid) = args.cpc_bid {
                    criterion["cpcBidMicros"] = json!(to_micros(cpc_bid));
                }
                MutateOperation::create(ResourceKind::AdGroupCriterion, criterion)
            })
            .collect();
        Ok(AdsRequest::Mutate(operations))
    }

    fn normalize(&self, args: &AddKeywordsArgs, response: AdsResponse) -> Result<Value> {
        let names = response.into_resource_names()?;
        let mut added = Vec::with_capacity(args.keywords.len());
        for (index, keyword) in args.keywords.iter().enumerate() {
            let (id, resource_name) = created(&names, index)?;
            added.push(json!({
                "keywordId": id,
                "text": keyword.text,
                "matchType": keyword.match_type,
                "resourceName": resource_name,
            }));
        }
        Ok(json!({
            "success": true,
            "adGroupId": args.ad_group_id,
            "count": added.len(),
            "keywords": added,
        }))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddNegativeKeywordsArgs {
    keywords:    Vec<String>,
    match_type:  String,
    campaign_id: Option<String>,
    ad_group_id: Option<String>,
}

/// Where negative keywords are attached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NegativeLevel<'a> {
    Campaign(&'a str),
    AdGroup(&'a str),
}

impl AddNegativeKeywordsArgs {
    fn level(&self) -> Result<NegativeLevel<'_>> {
        match (&self.campaign_id, &self.ad_group_id) {
            (Some(campaign_id), None) => Ok(NegativeLevel::Campaign(campaign_id)),
            (None, Some(ad_group_id)) => Ok(NegativeLevel::AdGroup(ad_group_id)),
            (None, None) => Err(Error::validation(
                PARAM_CAMPAIGN_ID,
                "either campaignId or adGroupId is required",
            )),
            (Some(_), Some(_)) => Err(Error::validation(
                PARAM_AD_GROUP_ID,
                "give either campaignId or adGroupId, not both",
            )),
        }
    }
}

pub struct AddNegativeKeywords;

impl AdsTool for AddNegativeKeywords {
    type Args = AddNegativeKeywordsArgs;
    type Output = Value;

    fn definition(&self) -> ToolDef {
        ToolDef {
            name:        TOOL_ADD_NEGATIVE_KEYWORDS,
            description: "Add negative keywords to exactly one campaign (campaignId) or one ad \
                          group (adGroupId) in one request.",
            action:      "add negative keywords",
            params:      vec![
                ParamDef::required(
                    PARAM_KEYWORDS,
                    "Negative keyword texts",
                    ParamType::StringArray {
                        min_items: 1,
                        max_items: None,
                        max_len:   Some(KEYWORD_MAX_LEN),
                    },
                ),
                ParamDef::optional(
                    PARAM_MATCH_TYPE,
                    "Match type for all keywords (default: BROAD)",
                    ParamType::enumeration(MATCH_TYPES, Some("BROAD")),
                ),
                ParamDef::campaign_id(false),
                ParamDef::ad_group_id(false),
            ],
        }
    }

    fn build(&self, args: &AddNegativeKeywordsArgs, ctx: &BuildContext<'_>) -> Result<AdsRequest> {
        let (kind, parent_field, parent) = match args.level()? {
            NegativeLevel::Campaign(campaign_id) => (
                ResourceKind::CampaignCriterion,
                "campaign",
                ResourceKind::Campaign.resource_name(ctx.customer_id, campaign_id),
            ),
            NegativeLevel::AdGroup(ad_group_id) => (
                ResourceKind::AdGroupCriterion,
                "adGroup",
                ResourceKind::AdGroup.resource_name(ctx.customer_id, ad_group_id),
            ),
        };
        let operations = args
            .keywords
            .iter()
            .map(|text| {
                MutateOperation::create(
                    kind,
                    json!({
                        parent_field: parent,
                        "negative": true,
                        "keyword": { "text": text, "matchType": args.match_type },
                    }),
                )
            })
            .collect();
        Ok(AdsRequest::Mutate(operations))
    }

    fn normalize(&self, args: &AddNegativeKeywordsArgs, response: AdsResponse) -> Result<Value> {
        let names = response.into_resource_names()?;
        let (level, id) = match args.level()? {
            NegativeLevel::Campaign(id) => ("campaign", id),
            NegativeLevel::AdGroup(id) => ("ad_group", id),
        };
        Ok(json!({
            "success": true,
            "level": level,
            "targetId": id,
            "matchType": args.match_type,
            "count": names.len(),
            "resourceNames": names,
        }))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateKeywordArgs {
    keyword_id:  String,
    ad_group_id: String,
    status:      Option<String>,
    cpc_bid:     Option<f64>,
}

fn keyword_update(args: &UpdateKeywordArgs, customer_id: &str) -> Option<MutateOperation> {
    let resource_name = ResourceKind::AdGroupCriterion.composite_resource_name(
        customer_id,
        &args.ad_group_id,
        &args.keyword_id,
    );
    UpdateBuilder::new(ResourceKind::AdGroupCriterion, resource_name)
        .set_opt("status", args.status.clone())
        .set_opt("cpc_bid_micros", args.cpc_bid.map(to_micros))
        .build()
}

pub struct UpdateKeyword;

impl AdsTool for UpdateKeyword {
    type Args = UpdateKeywordArgs;
    type Output = UpdatedResource;

    fn definition(&self) -> ToolDef {
        ToolDef {
            name:        TOOL_UPDATE_KEYWORD,
            description: "Change a keyword's status or max CPC bid. Only the supplied fields are \
                          changed; at least one is required.",
            action:      "update keyword",
            params:      vec![
                ParamDef::required(PARAM_KEYWORD_ID, "Keyword criterion ID", ParamType::Id),
                ParamDef::ad_group_id(true),
                ParamDef::optional(
                    PARAM_STATUS,
                    "New status",
                    ParamType::enumeration(SETTABLE_STATUSES, None),
                ),
                ParamDef::money(PARAM_CPC_BID, "New max CPC bid", false),
            ],
        }
    }

    fn build(&self, args: &UpdateKeywordArgs, ctx: &BuildContext<'_>) -> Result<AdsRequest> {
        let operation = keyword_update(args, ctx.customer_id).ok_or_else(|| {
            Error::validation(PARAM_KEYWORD_ID, "nothing to update; supply status or cpcBid")
        })?;
        Ok(AdsRequest::Mutate(vec![operation]))
    }

    fn normalize(
        &self,
        args: &UpdateKeywordArgs,
        response: AdsResponse,
    ) -> Result<UpdatedResource> {
        let mask = keyword_update(args, "")
            .and_then(|op| op.update_mask().map(<[String]>::to_vec))
            .unwrap_or_default();
        updated(&response.into_resource_names()?, mask)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordRefArgs {
    keyword_id:  String,
    ad_group_id: String,
}

pub struct RemoveKeyword;

impl AdsTool for RemoveKeyword {
    type Args = KeywordRefArgs;
    type Output = Value;

    fn definition(&self) -> ToolDef {
        ToolDef {
            name:        TOOL_REMOVE_KEYWORD,
            description: "Remove a keyword from its ad group. This cannot be undone.",
            action:      "remove keyword",
            params:      vec![
                ParamDef::required(PARAM_KEYWORD_ID, "Keyword criterion ID", ParamType::Id),
                ParamDef::ad_group_id(true),
            ],
        }
    }

    fn build(&self, args: &KeywordRefArgs, ctx: &BuildContext<'_>) -> Result<AdsRequest> {
        let resource_name = ResourceKind::AdGroupCriterion.composite_resource_name(
            ctx.customer_id,
            &args.ad_group_id,
            &args.keyword_id,
        );
        Ok(AdsRequest::Mutate(vec![MutateOperation::remove(
            ResourceKind::AdGroupCriterion,
            resource_name,
        )]))
    }

    fn normalize(&self, args: &KeywordRefArgs, response: AdsResponse) -> Result<Value> {
        let (_, resource_name) = created(&response.into_resource_names()?, 0)?;
        Ok(json!({
            "success": true,
            "keywordId": args.keyword_id,
            "resourceName": resource_name,
        }))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchTerm {
    search_term:   String,
    status:        String,
    campaign_id:   String,
    campaign_name: String,
    ad_group_id:   String,
    ad_group_name: String,
    #[serde(flatten)]
    metrics:       PerformanceMetrics,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchTermsArgs {
    campaign_id:       Option<String>,
    ad_group_id:       Option<String>,
    date_range:        DateRange,
    custom_date_range: Option<CustomDateRange>,
    sort_by:           Metric,
    min_impressions:   i64,
    limit:             i64,
}

impl SearchTermsArgs {
    fn window(&self) -> Result<DateWindow> {
        DateWindow::resolve(self.date_range, self.custom_date_range.as_ref())
    }
}

pub struct GetSearchTermsReport;

impl AdsTool for GetSearchTermsReport {
    type Args = SearchTermsArgs;
    type Output = Value;

    fn definition(&self) -> ToolDef {
        ToolDef {
            name:        TOOL_GET_SEARCH_TERMS_REPORT,
            description: "Report the search queries that triggered ads, with metrics, ordered by \
                          the chosen metric (highest first).",
            action:      "get search terms report",
            params:      vec![
                ParamDef::campaign_id(false),
                ParamDef::ad_group_id(false),
                ParamDef::date_range(),
                ParamDef::custom_date_range(),
                ParamDef::metric(
                    PARAM_SORT_BY,
                    "Metric to order by (default: impressions)",
                    Metric::PERFORMANCE_TOKENS,
                    Metric::Impressions,
                ),
                ParamDef::optional(
                    PARAM_MIN_IMPRESSIONS,
                    "Only include terms with at least this many impressions",
                    ParamType::Integer {
                        default: Some(0),
                        min:     0,
                        max:     i64::MAX,
                    },
                ),
                ParamDef::limit(DEFAULT_KEYWORD_LIMIT),
            ],
        }
    }

    fn build(&self, args: &SearchTermsArgs, _ctx: &BuildContext<'_>) -> Result<AdsRequest> {
        let query = Query::select(SEARCH_TERM_FIELDS)
            .from("search_term_view")
            .and_select(METRIC_FIELDS)
            .id_equals("campaign.id", args.campaign_id.as_deref())
            .id_equals("ad_group.id", args.ad_group_id.as_deref())
            .filter_if(
                args.min_impressions > 0,
                format!("metrics.impressions >= {}", args.min_impressions),
            )
            .during(&args.window()?)
            .order_by(args.sort_by.field(), SortOrder::Desc)
            .limit(args.limit);
        Ok(AdsRequest::Query(query.build()))
    }

    fn normalize(&self, args: &SearchTermsArgs, response: AdsResponse) -> Result<Value> {
        let values = response.into_rows()?;
        let terms: Vec<SearchTerm> = rows(&values)
            .map(|row| SearchTerm {
                search_term:   row.text("searchTermView.searchTerm"),
                status:        row.text("searchTermView.status"),
                campaign_id:   row.text("campaign.id"),
                campaign_name: row.text("campaign.name"),
                ad_group_id:   row.text("adGroup.id"),
                ad_group_name: row.text("adGroup.name"),
                metrics:       PerformanceMetrics::from_row(&row),
            })
            .collect();
        Ok(json!({
            "dateRange": args.window()?.label(),
            "sortBy": args.sort_by.token(),
            "count": terms.len(),
            "searchTerms": terms,
        }))
    }
}
