//! Shopping reports: product-level performance and the listing group tree of an ad group.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::constants::{
    DEFAULT_KEYWORD_LIMIT, DEFAULT_LIST_LIMIT, PARAM_SORT_BY, TOOL_GET_SHOPPING_PERFORMANCE,
    TOOL_LIST_LISTING_GROUPS,
};
use crate::error::Result;
use crate::support::date_range::{CustomDateRange, DateRange, DateWindow};
use crate::support::metrics::{METRIC_FIELDS, Metric, PerformanceMetrics};
use crate::support::query::{Query, SortOrder};
use crate::support::rows::{Row, rows};
use crate::tool_definitions::{ParamDef, ToolDef};
use crate::tool_generator::{AdsRequest, AdsResponse, AdsTool, BuildContext};

const PRODUCT_FIELDS: &[&str] = &[
    "segments.product_item_id",
    "segments.product_title",
    "segments.product_brand",
    "segments.product_type_l1",
    "campaign.id",
    "campaign.name",
];

const LISTING_GROUP_FIELDS: &[&str] = &[
    "ad_group_criterion.criterion_id",
    "ad_group_criterion.status",
    "ad_group_criterion.cpc_bid_micros",
    "ad_group_criterion.listing_group.type",
    "ad_group_criterion.listing_group.parent_ad_group_criterion",
    "ad_group_criterion.listing_group.case_value.product_brand.value",
    "ad_group_criterion.listing_group.case_value.product_item_id.value",
    "ad_group_criterion.listing_group.case_value.product_type.value",
    "ad_group_criterion.listing_group.case_value.product_type.level",
    "ad_group_criterion.listing_group.case_value.product_category.category_id",
    "ad_group_criterion.listing_group.case_value.product_condition.condition",
    "ad_group_criterion.listing_group.case_value.product_channel.channel",
    "ad_group_criterion.listing_group.case_value.product_custom_attribute.value",
    "ad_group_criterion.listing_group.case_value.product_custom_attribute.index",
    "ad_group.id",
];

const CASE_VALUE: &str = "adGroupCriterion.listingGroup.caseValue";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProductPerformance {
    item_id:       String,
    title:         Option<String>,
    brand:         Option<String>,
    product_type:  Option<String>,
    campaign_id:   String,
    campaign_name: String,
    #[serde(flatten)]
    metrics:       PerformanceMetrics,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingPerformanceArgs {
    campaign_id:       Option<String>,
    date_range:        DateRange,
    custom_date_range: Option<CustomDateRange>,
    sort_by:           Metric,
    limit:             i64,
}

impl ShoppingPerformanceArgs {
    fn window(&self) -> Result<DateWindow> {
        DateWindow::resolve(self.date_range, self.custom_date_range.as_ref())
    }
}

pub struct GetShoppingPerformance;

impl AdsTool for GetShoppingPerformance {
    type Args = ShoppingPerformanceArgs;
    type Output = Value;

    fn definition(&self) -> ToolDef {
        ToolDef {
            name:        TOOL_GET_SHOPPING_PERFORMANCE,
            description: "Product-level Shopping performance (item id, title, brand, product \
                          type) with metrics, ordered by the chosen metric.",
            action:      "get shopping performance",
            params:      vec![
                ParamDef::campaign_id(false),
                ParamDef::date_range(),
                ParamDef::custom_date_range(),
                ParamDef::metric(
                    PARAM_SORT_BY,
                    "Metric to order by (default: cost)",
                    Metric::PERFORMANCE_TOKENS,
                    Metric::Cost,
                ),
                ParamDef::limit(DEFAULT_LIST_LIMIT),
            ],
        }
    }

    fn build(
        &self,
        args: &ShoppingPerformanceArgs,
        _ctx: &BuildContext<'_>,
    ) -> Result<AdsRequest> {
        let query = Query::select(PRODUCT_FIELDS)
            .from("shopping_performance_view")
            .and_select(METRIC_FIELDS)
            .id_equals("campaign.id", args.campaign_id.as_deref())
            .during(&args.window()?)
            .order_by(args.sort_by.field(), SortOrder::Desc)
            .limit(args.limit);
        Ok(AdsRequest::Query(query.build()))
    }

    fn normalize(&self, args: &ShoppingPerformanceArgs, response: AdsResponse) -> Result<Value> {
        let values = response.into_rows()?;
        let products: Vec<ProductPerformance> = rows(&values)
            .map(|row| ProductPerformance {
                item_id:       row.text("segments.productItemId"),
                title:         row.opt_text("segments.productTitle"),
                brand:         row.opt_text("segments.productBrand"),
                product_type:  row.opt_text("segments.productTypeL1"),
                campaign_id:   row.text("campaign.id"),
                campaign_name: row.text("campaign.name"),
                metrics:       PerformanceMetrics::from_row(&row),
            })
            .collect();
        let totals = PerformanceMetrics::total(products.iter().map(|product| &product.metrics));
        Ok(json!({
            "dateRange": args.window()?.label(),
            "sortBy": args.sort_by.token(),
            "count": products.len(),
            "products": products,
            "totals": totals,
        }))
    }
}

/// Dimension a listing group node partitions on
#[derive(Debug, PartialEq, Serialize)]
struct CaseValue {
    dimension: &'static str,
    value:     Option<String>,
}

/// Flatten the one populated `caseValue` member; the root node has none
fn case_value(row: &Row<'_>) -> CaseValue {
    let text = |path: &str| row.opt_text(&format!("{CASE_VALUE}.{path}"));
    let (dimension, value) = if row.get(&format!("{CASE_VALUE}.productBrand")).is_some() {
        ("brand", text("productBrand.value"))
    } else if row.get(&format!("{CASE_VALUE}.productItemId")).is_some() {
        ("item_id", text("productItemId.value"))
    } else if row.get(&format!("{CASE_VALUE}.productType")).is_some() {
        ("product_type", text("productType.value"))
    } else if row.get(&format!("{CASE_VALUE}.productCategory")).is_some() {
        ("category", text("productCategory.categoryId"))
    } else if row.get(&format!("{CASE_VALUE}.productCondition")).is_some() {
        ("condition", text("productCondition.condition"))
    } else if row.get(&format!("{CASE_VALUE}.productChannel")).is_some() {
        ("channel", text("productChannel.channel"))
    } else if row.get(&format!("{CASE_VALUE}.productCustomAttribute")).is_some() {
        ("custom_attribute", text("productCustomAttribute.value"))
    } else {
        ("all", None)
    };
    CaseValue { dimension, value }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ListingGroup {
    id:         String,
    #[serde(rename = "type")]
    group_type: String,
    status:     String,
    parent_id:  Option<String>,
    case_value: CaseValue,
    cpc_bid:    Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingGroupsArgs {
    ad_group_id: String,
    limit:       i64,
}

pub struct ListListingGroups;

impl AdsTool for ListListingGroups {
    type Args = ListingGroupsArgs;
    type Output = Value;

    fn definition(&self) -> ToolDef {
        ToolDef {
            name:        TOOL_LIST_LISTING_GROUPS,
            description: "List the product partition (listing group) tree of a Shopping ad \
                          group: node type, parent, partition dimension and bid.",
            action:      "list listing groups",
            params:      vec![
                ParamDef::ad_group_id(true),
                ParamDef::limit(DEFAULT_KEYWORD_LIMIT),
            ],
        }
    }

    fn build(&self, args: &ListingGroupsArgs, _ctx: &BuildContext<'_>) -> Result<AdsRequest> {
        let query = Query::select(LISTING_GROUP_FIELDS)
            .from("ad_group_criterion")
            .filter("ad_group_criterion.type = 'LISTING_GROUP'")
            .id_equals("ad_group.id", Some(&args.ad_group_id))
            .status("ad_group_criterion.status", None, false)
            .limit(args.limit);
        Ok(AdsRequest::Query(query.build()))
    }

    fn normalize(&self, args: &ListingGroupsArgs, response: AdsResponse) -> Result<Value> {
        let values = response.into_rows()?;
        let groups: Vec<ListingGroup> = rows(&values)
            .map(|row| ListingGroup {
                id:         row.text("adGroupCriterion.criterionId"),
                group_type: row.text("adGroupCriterion.listingGroup.type"),
                status:     row.text("adGroupCriterion.status"),
                parent_id:  row
                    .resource_id("adGroupCriterion.listingGroup.parentAdGroupCriterion"),
                case_value: case_value(&row),
                cpc_bid:    row.opt_money("adGroupCriterion.cpcBidMicros"),
            })
            .collect();
        Ok(json!({
            "adGroupId": args.ad_group_id,
            "count": groups.len(),
            "listingGroups": groups,
        }))
    }
}
