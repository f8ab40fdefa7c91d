//! Performance reports over campaigns, ad groups, keywords and the whole account.
//!
//! All reports share the same window handling (`dateRange` plus `customDateRange`) and the
//! standard metric block from [`PerformanceMetrics`]. Ordering always happens in the query; the
//! normalizers keep row order as returned.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::constants::{
    DEFAULT_LIST_LIMIT, PARAM_BOTTOM_COUNT, PARAM_INCLUDE_PAUSED, PARAM_METRIC, PARAM_SEGMENT_BY,
    PARAM_SORT_BY, PARAM_TOP_COUNT, TOOL_COMPARE_CAMPAIGNS, TOOL_GET_ACCOUNT_PERFORMANCE,
    TOOL_GET_AD_GROUP_PERFORMANCE, TOOL_GET_CAMPAIGN_PERFORMANCE, TOOL_GET_KEYWORD_PERFORMANCE,
    TOOL_GET_TOP_BOTTOM_KEYWORDS,
};
use crate::error::Result;
use crate::support::date_range::{CustomDateRange, DateRange, DateWindow};
use crate::support::metrics::{METRIC_FIELDS, Metric, PerformanceMetrics};
use crate::support::query::{Query, SortOrder};
use crate::support::rows::{Row, rows};
use crate::tool_definitions::{ParamDef, ParamType, ToolDef};
use crate::tool_generator::{AdsRequest, AdsResponse, AdsTool, BuildContext};

const CAMPAIGN_FIELDS: &[&str] = &[
    "campaign.id",
    "campaign.name",
    "campaign.status",
    "campaign.advertising_channel_type",
];

const AD_GROUP_FIELDS: &[&str] = &[
    "ad_group.id",
    "ad_group.name",
    "ad_group.status",
    "campaign.id",
    "campaign.name",
];

const KEYWORD_FIELDS: &[&str] = &[
    "ad_group_criterion.criterion_id",
    "ad_group_criterion.keyword.text",
    "ad_group_criterion.keyword.match_type",
    "ad_group_criterion.status",
    "ad_group_criterion.quality_info.quality_score",
    "ad_group.id",
    "ad_group.name",
    "campaign.id",
    "campaign.name",
];

const SEGMENT_TOKENS: &[&str] = &["date", "device", "network"];

/// Arguments shared by the per-entity reports; tools without `adGroupId` never receive one
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportArgs {
    campaign_id:       Option<String>,
    ad_group_id:       Option<String>,
    date_range:        DateRange,
    custom_date_range: Option<CustomDateRange>,
    sort_by:           Metric,
    limit:             i64,
}

impl ReportArgs {
    fn window(&self) -> Result<DateWindow> {
        DateWindow::resolve(self.date_range, self.custom_date_range.as_ref())
    }
}

fn report_params(with_ad_group: bool, sort_tokens: &'static [&'static str]) -> Vec<ParamDef> {
    let mut params = vec![ParamDef::campaign_id(false)];
    if with_ad_group {
        params.push(ParamDef::ad_group_id(false));
    }
    params.extend([
        ParamDef::date_range(),
        ParamDef::custom_date_range(),
        ParamDef::metric(
            PARAM_SORT_BY,
            "Metric to order by, highest first (default: cost)",
            sort_tokens,
            Metric::Cost,
        ),
        ParamDef::limit(DEFAULT_LIST_LIMIT),
    ]);
    params
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CampaignPerformance {
    campaign_id:   String,
    campaign_name: String,
    status:        String,
    channel_type:  String,
    #[serde(flatten)]
    metrics:       PerformanceMetrics,
}

impl CampaignPerformance {
    fn from_row(row: &Row<'_>) -> Self {
        Self {
            campaign_id:   row.text("campaign.id"),
            campaign_name: row.text("campaign.name"),
            status:        row.text("campaign.status"),
            channel_type:  row.text("campaign.advertisingChannelType"),
            metrics:       PerformanceMetrics::from_row(row),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AdGroupPerformance {
    ad_group_id:   String,
    ad_group_name: String,
    status:        String,
    campaign_id:   String,
    campaign_name: String,
    #[serde(flatten)]
    metrics:       PerformanceMetrics,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct KeywordPerformance {
    keyword_id:    String,
    text:          String,
    match_type:    String,
    status:        String,
    quality_score: Option<i64>,
    ad_group_id:   String,
    ad_group_name: String,
    campaign_id:   String,
    campaign_name: String,
    #[serde(flatten)]
    metrics:       PerformanceMetrics,
}

impl KeywordPerformance {
    fn from_row(row: &Row<'_>) -> Self {
        Self {
            keyword_id:    row.text("adGroupCriterion.criterionId"),
            text:          row.text("adGroupCriterion.keyword.text"),
            match_type:    row.text("adGroupCriterion.keyword.matchType"),
            status:        row.text("adGroupCriterion.status"),
            quality_score: row.opt_int("adGroupCriterion.qualityInfo.qualityScore"),
            ad_group_id:   row.text("adGroup.id"),
            ad_group_name: row.text("adGroup.name"),
            campaign_id:   row.text("campaign.id"),
            campaign_name: row.text("campaign.name"),
            metrics:       PerformanceMetrics::from_row(row),
        }
    }

    /// Keyword ids are only unique within their ad group
    fn key(&self) -> (&str, &str) {
        (&self.ad_group_id, &self.keyword_id)
    }
}

pub struct GetCampaignPerformance;

impl AdsTool for GetCampaignPerformance {
    type Args = ReportArgs;
    type Output = Value;

    fn definition(&self) -> ToolDef {
        ToolDef {
            name:        TOOL_GET_CAMPAIGN_PERFORMANCE,
            description: "Campaign metrics over a date range: impressions, clicks, cost, \
                          conversions, revenue and derived CTR, CPC, CPA and ROAS.",
            action:      "get campaign performance",
            params:      report_params(false, Metric::PERFORMANCE_TOKENS),
        }
    }

    fn build(&self, args: &ReportArgs, _ctx: &BuildContext<'_>) -> Result<AdsRequest> {
        let query = Query::select(CAMPAIGN_FIELDS)
            .from("campaign")
            .and_select(METRIC_FIELDS)
            .id_equals("campaign.id", args.campaign_id.as_deref())
            .during(&args.window()?)
            .order_by(args.sort_by.field(), SortOrder::Desc)
            .limit(args.limit);
        Ok(AdsRequest::Query(query.build()))
    }

    fn normalize(&self, args: &ReportArgs, response: AdsResponse) -> Result<Value> {
        let values = response.into_rows()?;
        let campaigns: Vec<CampaignPerformance> = rows(&values)
            .map(|row| CampaignPerformance::from_row(&row))
            .collect();
        Ok(json!({
            "dateRange": args.window()?.label(),
            "count": campaigns.len(),
            "campaigns": campaigns,
        }))
    }
}

pub struct GetAdGroupPerformance;

impl AdsTool for GetAdGroupPerformance {
    type Args = ReportArgs;
    type Output = Value;

    fn definition(&self) -> ToolDef {
        ToolDef {
            name:        TOOL_GET_AD_GROUP_PERFORMANCE,
            description: "Ad group metrics over a date range, optionally within one campaign.",
            action:      "get ad group performance",
            params:      report_params(true, Metric::PERFORMANCE_TOKENS),
        }
    }

    fn build(&self, args: &ReportArgs, _ctx: &BuildContext<'_>) -> Result<AdsRequest> {
        let query = Query::select(AD_GROUP_FIELDS)
            .from("ad_group")
            .and_select(METRIC_FIELDS)
            .id_equals("campaign.id", args.campaign_id.as_deref())
            .id_equals("ad_group.id", args.ad_group_id.as_deref())
            .during(&args.window()?)
            .order_by(args.sort_by.field(), SortOrder::Desc)
            .limit(args.limit);
        Ok(AdsRequest::Query(query.build()))
    }

    fn normalize(&self, args: &ReportArgs, response: AdsResponse) -> Result<Value> {
        let values = response.into_rows()?;
        let ad_groups: Vec<AdGroupPerformance> = rows(&values)
            .map(|row| AdGroupPerformance {
                ad_group_id:   row.text("adGroup.id"),
                ad_group_name: row.text("adGroup.name"),
                status:        row.text("adGroup.status"),
                campaign_id:   row.text("campaign.id"),
                campaign_name: row.text("campaign.name"),
                metrics:       PerformanceMetrics::from_row(&row),
            })
            .collect();
        Ok(json!({
            "dateRange": args.window()?.label(),
            "count": ad_groups.len(),
            "adGroups": ad_groups,
        }))
    }
}

fn keyword_query(
    campaign_id: Option<&str>,
    ad_group_id: Option<&str>,
    window: &DateWindow,
) -> Query {
    Query::select(KEYWORD_FIELDS)
        .from("keyword_view")
        .and_select(METRIC_FIELDS)
        .id_equals("campaign.id", campaign_id)
        .id_equals("ad_group.id", ad_group_id)
        .during(window)
}

fn keywords_from(values: &[Value]) -> Vec<KeywordPerformance> {
    rows(values)
        .map(|row| KeywordPerformance::from_row(&row))
        .collect()
}

pub struct GetKeywordPerformance;

impl AdsTool for GetKeywordPerformance {
    type Args = ReportArgs;
    type Output = Value;

    fn definition(&self) -> ToolDef {
        ToolDef {
            name:        TOOL_GET_KEYWORD_PERFORMANCE,
            description: "Keyword metrics over a date range including quality score, optionally \
                          within one campaign or ad group.",
            action:      "get keyword performance",
            params:      report_params(true, Metric::KEYWORD_TOKENS),
        }
    }

    fn build(&self, args: &ReportArgs, _ctx: &BuildContext<'_>) -> Result<AdsRequest> {
        let query = keyword_query(
            args.campaign_id.as_deref(),
            args.ad_group_id.as_deref(),
            &args.window()?,
        )
        .order_by(args.sort_by.field(), SortOrder::Desc)
        .limit(args.limit);
        Ok(AdsRequest::Query(query.build()))
    }

    fn normalize(&self, args: &ReportArgs, response: AdsResponse) -> Result<Value> {
        let keywords = keywords_from(&response.into_rows()?);
        Ok(json!({
            "dateRange": args.window()?.label(),
            "count": keywords.len(),
            "keywords": keywords,
        }))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopBottomArgs {
    metric:            Metric,
    top_count:         i64,
    bottom_count:      i64,
    campaign_id:       Option<String>,
    ad_group_id:       Option<String>,
    date_range:        DateRange,
    custom_date_range: Option<CustomDateRange>,
}

impl TopBottomArgs {
    fn window(&self) -> Result<DateWindow> {
        DateWindow::resolve(self.date_range, self.custom_date_range.as_ref())
    }
}

/// Best and worst keywords by one metric
pub struct GetTopBottomKeywords;

impl AdsTool for GetTopBottomKeywords {
    type Args = TopBottomArgs;
    type Output = Value;

    fn definition(&self) -> ToolDef {
        ToolDef {
            name:        TOOL_GET_TOP_BOTTOM_KEYWORDS,
            description: "Best and worst keywords by one metric. The top list is highest first, \
                          the bottom list lowest first; keywords with no data for the metric are \
                          left out of the bottom list (except for quality_score) and the two \
                          lists never share a keyword.",
            action:      "get top and bottom keywords",
            params:      vec![
                ParamDef::metric(
                    PARAM_METRIC,
                    "Metric to rank by (default: conversions)",
                    Metric::KEYWORD_TOKENS,
                    Metric::Conversions,
                ),
                ParamDef::count(PARAM_TOP_COUNT, "Number of top keywords (default: 5)"),
                ParamDef::count(PARAM_BOTTOM_COUNT, "Number of bottom keywords (default: 5)"),
                ParamDef::campaign_id(false),
                ParamDef::ad_group_id(false),
                ParamDef::date_range(),
                ParamDef::custom_date_range(),
            ],
        }
    }

    fn build(&self, args: &TopBottomArgs, _ctx: &BuildContext<'_>) -> Result<AdsRequest> {
        let field = args.metric.field();
        let base = keyword_query(
            args.campaign_id.as_deref(),
            args.ad_group_id.as_deref(),
            &args.window()?,
        );
        let top = base
            .clone()
            .order_by(field, SortOrder::Desc)
            .limit(args.top_count);
        // Over-fetch so dropping keywords already in the top list still fills the bottom list
        let bottom = base
            .filter_if(
                !args.metric.zero_is_meaningful(),
                format!("{field} > 0"),
            )
            .order_by(field, SortOrder::Asc)
            .limit(args.bottom_count + args.top_count);
        Ok(AdsRequest::Queries(vec![top.build(), bottom.build()]))
    }

    fn normalize(&self, args: &TopBottomArgs, response: AdsResponse) -> Result<Value> {
        let mut sets = response.into_row_sets()?.into_iter();
        let top = keywords_from(&sets.next().unwrap_or_default());
        let bottom_count = usize::try_from(args.bottom_count).unwrap_or_default();
        let bottom: Vec<KeywordPerformance> = keywords_from(&sets.next().unwrap_or_default())
            .into_iter()
            .filter(|keyword| !top.iter().any(|best| best.key() == keyword.key()))
            .take(bottom_count)
            .collect();
        Ok(json!({
            "metric": args.metric.token(),
            "dateRange": args.window()?.label(),
            "top": top,
            "bottom": bottom,
        }))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareCampaignsArgs {
    date_range:        DateRange,
    custom_date_range: Option<CustomDateRange>,
    include_paused:    bool,
}

impl CompareCampaignsArgs {
    fn window(&self) -> Result<DateWindow> {
        DateWindow::resolve(self.date_range, self.custom_date_range.as_ref())
    }
}

/// Side-by-side campaign metrics with account totals
pub struct CompareCampaigns;

impl AdsTool for CompareCampaigns {
    type Args = CompareCampaignsArgs;
    type Output = Value;

    fn definition(&self) -> ToolDef {
        ToolDef {
            name:        TOOL_COMPARE_CAMPAIGNS,
            description: "Compare all campaigns side by side, highest cost first, with totals \
                          whose ratios are recomputed from the summed values.",
            action:      "compare campaigns",
            params:      vec![
                ParamDef::date_range(),
                ParamDef::custom_date_range(),
                ParamDef::optional(
                    PARAM_INCLUDE_PAUSED,
                    "Include paused campaigns (default: true)",
                    ParamType::boolean(true),
                ),
            ],
        }
    }

    fn build(&self, args: &CompareCampaignsArgs, _ctx: &BuildContext<'_>) -> Result<AdsRequest> {
        let query = Query::select(CAMPAIGN_FIELDS)
            .from("campaign")
            .and_select(METRIC_FIELDS);
        let query = if args.include_paused {
            query.status("campaign.status", None, false)
        } else {
            query.status("campaign.status", Some("ENABLED"), false)
        };
        let query = query
            .during(&args.window()?)
            .order_by(Metric::Cost.field(), SortOrder::Desc);
        Ok(AdsRequest::Query(query.build()))
    }

    fn normalize(&self, args: &CompareCampaignsArgs, response: AdsResponse) -> Result<Value> {
        let values = response.into_rows()?;
        let campaigns: Vec<CampaignPerformance> = rows(&values)
            .map(|row| CampaignPerformance::from_row(&row))
            .collect();
        let totals = PerformanceMetrics::total(campaigns.iter().map(|c| &c.metrics));
        Ok(json!({
            "dateRange": args.window()?.label(),
            "count": campaigns.len(),
            "campaigns": campaigns,
            "totals": totals,
        }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentBy {
    Date,
    Device,
    Network,
}

impl SegmentBy {
    const fn field(self) -> &'static str {
        match self {
            Self::Date => "segments.date",
            Self::Device => "segments.device",
            Self::Network => "segments.ad_network_type",
        }
    }

    const fn row_path(self) -> &'static str {
        match self {
            Self::Date => "segments.date",
            Self::Device => "segments.device",
            Self::Network => "segments.adNetworkType",
        }
    }

    const fn token(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Device => "device",
            Self::Network => "network",
        }
    }
}

#[derive(Debug, Serialize)]
struct SegmentPerformance {
    segment: String,
    #[serde(flatten)]
    metrics: PerformanceMetrics,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountPerformanceArgs {
    segment_by:        SegmentBy,
    date_range:        DateRange,
    custom_date_range: Option<CustomDateRange>,
}

impl AccountPerformanceArgs {
    fn window(&self) -> Result<DateWindow> {
        DateWindow::resolve(self.date_range, self.custom_date_range.as_ref())
    }
}

pub struct GetAccountPerformance;

impl AdsTool for GetAccountPerformance {
    type Args = AccountPerformanceArgs;
    type Output = Value;

    fn definition(&self) -> ToolDef {
        ToolDef {
            name:        TOOL_GET_ACCOUNT_PERFORMANCE,
            description: "Account-wide metrics segmented by date (oldest first), device or \
                          network (highest cost first), with totals.",
            action:      "get account performance",
            params:      vec![
                ParamDef::optional(
                    PARAM_SEGMENT_BY,
                    "Segmentation (default: date)",
                    ParamType::enumeration(SEGMENT_TOKENS, Some("date")),
                ),
                ParamDef::date_range(),
                ParamDef::custom_date_range(),
            ],
        }
    }

    fn build(
        &self,
        args: &AccountPerformanceArgs,
        _ctx: &BuildContext<'_>,
    ) -> Result<AdsRequest> {
        let segment = args.segment_by.field();
        let query = Query::select(&[segment])
            .from("customer")
            .and_select(METRIC_FIELDS)
            .during(&args.window()?);
        let query = match args.segment_by {
            SegmentBy::Date => query.order_by(segment, SortOrder::Asc),
            SegmentBy::Device | SegmentBy::Network => {
                query.order_by(Metric::Cost.field(), SortOrder::Desc)
            }
        };
        Ok(AdsRequest::Query(query.build()))
    }

    fn normalize(&self, args: &AccountPerformanceArgs, response: AdsResponse) -> Result<Value> {
        let values = response.into_rows()?;
        let segments: Vec<SegmentPerformance> = rows(&values)
            .map(|row| SegmentPerformance {
                segment: row.text(args.segment_by.row_path()),
                metrics: PerformanceMetrics::from_row(&row),
            })
            .collect();
        let totals = PerformanceMetrics::total(segments.iter().map(|s| &s.metrics));
        Ok(json!({
            "dateRange": args.window()?.label(),
            "segmentBy": args.segment_by.token(),
            "count": segments.len(),
            "segments": segments,
            "totals": totals,
        }))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::error::Error;
    use crate::test_support::{MockAdsApi, invoke};

    fn keyword_row(ad_group: &str, id: &str, conversions: f64) -> Value {
        json!({
            "adGroupCriterion": { "criterionId": id, "keyword": { "text": format!("kw {id}") } },
            "adGroup": { "id": ad_group },
            "metrics": { "conversions": conversions }
        })
    }

    #[tokio::test]
    async fn test_campaign_performance_query() {
        let api = MockAdsApi::new();

        invoke(
            GetCampaignPerformance,
            &api,
            json!({ "dateRange": "LAST_MONTH", "sortBy": "roas", "limit": 10 }),
        )
        .await
        .unwrap();

        assert_eq!(
            api.queries()[0],
            "SELECT campaign.id, campaign.name, campaign.status, \
             campaign.advertising_channel_type, metrics.impressions, metrics.clicks, \
             metrics.cost_micros, metrics.conversions, metrics.conversions_value \
             FROM campaign WHERE segments.date DURING LAST_MONTH \
             ORDER BY metrics.conversions_value_per_cost DESC LIMIT 10"
        );
    }

    #[tokio::test]
    async fn test_campaign_performance_rejects_quality_score_sort() {
        let api = MockAdsApi::new();

        let err = invoke(GetCampaignPerformance, &api, json!({ "sortBy": "quality_score" }))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Validation { ref field, .. } if field == "sortBy"));
    }

    #[tokio::test]
    async fn test_all_time_has_no_date_clause() {
        let api = MockAdsApi::new();

        invoke(GetAdGroupPerformance, &api, json!({ "dateRange": "ALL_TIME", "campaignId": "42" }))
            .await
            .unwrap();

        let query = &api.queries()[0];
        assert!(query.contains("FROM ad_group WHERE campaign.id = 42 ORDER BY"));
        assert!(!query.contains("segments.date"));
    }

    #[tokio::test]
    async fn test_keyword_performance_includes_quality_score() {
        let api = MockAdsApi::new().with_rows(vec![json!({
            "adGroupCriterion": {
                "criterionId": "99",
                "keyword": { "text": "shoes", "matchType": "EXACT" },
                "qualityInfo": { "qualityScore": 7 }
            },
            "metrics": { "clicks": "3" }
        })]);

        let result = invoke(GetKeywordPerformance, &api, json!({ "sortBy": "quality_score" }))
            .await
            .unwrap();

        assert!(api.queries()[0].contains(
            "FROM keyword_view WHERE segments.date DURING LAST_30_DAYS \
             ORDER BY ad_group_criterion.quality_info.quality_score DESC"
        ));
        assert_eq!(result["keywords"][0]["qualityScore"], 7);
        assert_eq!(result["keywords"][0]["clicks"], 3);
        assert_eq!(result["keywords"][0]["cost"], 0.0);
    }

    #[tokio::test]
    async fn test_top_bottom_builds_descending_and_ascending_queries() {
        let api = MockAdsApi::new();

        invoke(GetTopBottomKeywords, &api, json!({ "topCount": 3, "bottomCount": 3 }))
            .await
            .unwrap();

        let queries = api.queries();
        assert_eq!(queries.len(), 2);
        assert!(queries[0].ends_with("ORDER BY metrics.conversions DESC LIMIT 3"));
        assert!(!queries[0].contains("metrics.conversions > 0"));
        assert!(queries[1].contains("AND metrics.conversions > 0"));
        assert!(queries[1].ends_with("ORDER BY metrics.conversions ASC LIMIT 6"));
    }

    #[tokio::test]
    async fn test_top_bottom_keeps_zero_quality_scores() {
        let api = MockAdsApi::new();

        invoke(GetTopBottomKeywords, &api, json!({ "metric": "quality_score" }))
            .await
            .unwrap();

        let bottom = &api.queries()[1];
        assert!(!bottom.contains("> 0"));
        assert!(bottom.contains("ORDER BY ad_group_criterion.quality_info.quality_score ASC"));
    }

    #[tokio::test]
    async fn test_top_bottom_lists_never_overlap() {
        let api = MockAdsApi::new()
            .with_rows(vec![
                keyword_row("1", "10", 9.0),
                keyword_row("1", "11", 5.0),
                keyword_row("1", "12", 3.0),
            ])
            .with_rows(vec![
                keyword_row("2", "12", 1.0),
                keyword_row("1", "12", 3.0),
                keyword_row("1", "11", 5.0),
                keyword_row("1", "10", 9.0),
            ]);

        let result = invoke(GetTopBottomKeywords, &api, json!({ "topCount": 3, "bottomCount": 3 }))
            .await
            .unwrap();

        let top: Vec<&str> = result["top"]
            .as_array()
            .unwrap()
            .iter()
            .map(|k| k["keywordId"].as_str().unwrap())
            .collect();
        assert_eq!(top, ["10", "11", "12"]);
        let bottom = result["bottom"].as_array().unwrap();
        assert_eq!(bottom.len(), 1);
        assert_eq!(bottom[0]["adGroupId"], "2");
        assert_eq!(bottom[0]["keywordId"], "12");
    }

    #[tokio::test]
    async fn test_top_bottom_truncates_bottom_list() {
        let bottom_rows: Vec<Value> = (1..=6_i32)
            .map(|i| keyword_row("1", &i.to_string(), f64::from(i)))
            .collect();
        let api = MockAdsApi::new().with_rows(vec![]).with_rows(bottom_rows);

        let result = invoke(GetTopBottomKeywords, &api, json!({ "topCount": 2, "bottomCount": 2 }))
            .await
            .unwrap();

        assert_eq!(result["bottom"].as_array().unwrap().len(), 2);
        assert_eq!(result["bottom"][0]["keywordId"], "1");
    }

    #[tokio::test]
    async fn test_compare_campaigns_totals_are_recomputed() {
        let api = MockAdsApi::new().with_rows(vec![
            json!({
                "campaign": { "id": "1", "name": "A" },
                "metrics": { "impressions": "1000", "clicks": "100", "costMicros": "50000000",
                             "conversions": 5.0, "conversionsValue": 200.0 }
            }),
            json!({
                "campaign": { "id": "2", "name": "B" },
                "metrics": { "impressions": "1000", "clicks": "10", "costMicros": "10000000",
                             "conversions": 0.0, "conversionsValue": 0.0 }
            }),
        ]);

        let result = invoke(CompareCampaigns, &api, json!({})).await.unwrap();

        let query = &api.queries()[0];
        assert!(query.contains("WHERE campaign.status != 'REMOVED'"));
        assert!(query.ends_with("ORDER BY metrics.cost_micros DESC"));
        assert_eq!(result["campaigns"][1]["roas"], 0.0);
        assert_eq!(result["campaigns"][1]["cpa"], 0.0);
        assert_eq!(result["totals"]["cost"], 60.0);
        assert_eq!(result["totals"]["clicks"], 110);
        assert_eq!(result["totals"]["roas"], 200.0 / 60.0);
        assert_eq!(result["totals"]["ctr"], 110.0 / 2000.0);
    }

    #[tokio::test]
    async fn test_compare_campaigns_enabled_only() {
        let api = MockAdsApi::new();

        invoke(CompareCampaigns, &api, json!({ "includePaused": false })).await.unwrap();

        assert!(api.queries()[0].contains("WHERE campaign.status = 'ENABLED'"));
    }

    #[tokio::test]
    async fn test_account_performance_segments() {
        let api = MockAdsApi::new().with_rows(vec![json!({
            "segments": { "adNetworkType": "SEARCH" },
            "metrics": { "costMicros": "1500000" }
        })]);

        let result = invoke(GetAccountPerformance, &api, json!({ "segmentBy": "network" }))
            .await
            .unwrap();

        assert!(api.queries()[0].starts_with("SELECT segments.ad_network_type, metrics."));
        assert!(api.queries()[0].ends_with("ORDER BY metrics.cost_micros DESC"));
        assert_eq!(result["segments"][0]["segment"], "SEARCH");
        assert_eq!(result["totals"]["cost"], 1.5);

        let api = MockAdsApi::new();
        invoke(GetAccountPerformance, &api, json!({})).await.unwrap();
        assert!(api.queries()[0].ends_with("ORDER BY segments.date ASC"));
    }
}
