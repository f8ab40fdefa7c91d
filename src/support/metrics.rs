//! Logical metric names and the standard metric block every report row carries.

use serde::{Deserialize, Serialize};

use super::rows::Row;

/// Caller-facing metric name used for ordering and ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Impressions,
    Clicks,
    Cost,
    Conversions,
    ConversionValue,
    Ctr,
    AverageCpc,
    Roas,
    QualityScore,
}

impl Metric {
    /// Metrics any performance view can be ordered by
    pub const PERFORMANCE_TOKENS: &'static [&'static str] = &[
        "impressions",
        "clicks",
        "cost",
        "conversions",
        "conversion_value",
        "ctr",
        "average_cpc",
        "roas",
    ];

    /// Keyword views additionally rank by quality score
    pub const KEYWORD_TOKENS: &'static [&'static str] = &[
        "impressions",
        "clicks",
        "cost",
        "conversions",
        "conversion_value",
        "ctr",
        "average_cpc",
        "roas",
        "quality_score",
    ];

    pub const fn token(self) -> &'static str {
        match self {
            Self::Impressions => "impressions",
            Self::Clicks => "clicks",
            Self::Cost => "cost",
            Self::Conversions => "conversions",
            Self::ConversionValue => "conversion_value",
            Self::Ctr => "ctr",
            Self::AverageCpc => "average_cpc",
            Self::Roas => "roas",
            Self::QualityScore => "quality_score",
        }
    }

    /// Physical query-language field this metric orders by
    pub const fn field(self) -> &'static str {
        match self {
            Self::Impressions => "metrics.impressions",
            Self::Clicks => "metrics.clicks",
            Self::Cost => "metrics.cost_micros",
            Self::Conversions => "metrics.conversions",
            Self::ConversionValue => "metrics.conversions_value",
            Self::Ctr => "metrics.ctr",
            Self::AverageCpc => "metrics.average_cpc",
            Self::Roas => "metrics.conversions_value_per_cost",
            Self::QualityScore => "ad_group_criterion.quality_info.quality_score",
        }
    }

    /// Whether a zero value is a real measurement rather than "no data"
    pub const fn zero_is_meaningful(self) -> bool {
        matches!(self, Self::QualityScore)
    }
}

/// Divide, yielding 0 instead of infinity or NaN on a zero denominator
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Standard metric block: base counters plus locally derived ratios
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    pub impressions:     i64,
    pub clicks:          i64,
    pub cost:            f64,
    pub conversions:     f64,
    pub revenue:         f64,
    pub ctr:             f64,
    pub average_cpc:     f64,
    pub cpa:             f64,
    pub roas:            f64,
    pub conversion_rate: f64,
}

impl PerformanceMetrics {
    /// Build the block from base values, deriving every ratio
    #[allow(clippy::cast_precision_loss)]
    pub fn from_base(
        impressions: i64,
        clicks: i64,
        cost: f64,
        conversions: f64,
        revenue: f64,
    ) -> Self {
        let impressions_f = impressions as f64;
        let clicks_f = clicks as f64;
        Self {
            impressions,
            clicks,
            cost,
            conversions,
            revenue,
            ctr: ratio(clicks_f, impressions_f),
            average_cpc: ratio(cost, clicks_f),
            cpa: ratio(cost, conversions),
            roas: ratio(revenue, cost),
            conversion_rate: ratio(conversions, clicks_f),
        }
    }

    /// Read the `metrics` object of a result row; absent fields count as zero
    pub fn from_row(row: &Row<'_>) -> Self {
        Self::from_base(
            row.int("metrics.impressions"),
            row.int("metrics.clicks"),
            row.money("metrics.costMicros"),
            row.float("metrics.conversions"),
            row.float("metrics.conversionsValue"),
        )
    }

    /// Sum base values across blocks and derive ratios from the sums
    pub fn total<'a>(blocks: impl IntoIterator<Item = &'a Self>) -> Self {
        let (impressions, clicks, cost, conversions, revenue) = blocks.into_iter().fold(
            (0_i64, 0_i64, 0.0_f64, 0.0_f64, 0.0_f64),
            |(impressions, clicks, cost, conversions, revenue), block| {
                (
                    impressions + block.impressions,
                    clicks + block.clicks,
                    cost + block.cost,
                    conversions + block.conversions,
                    revenue + block.revenue,
                )
            },
        );
        Self::from_base(impressions, clicks, cost, conversions, revenue)
    }
}

/// Query-language field list backing [`PerformanceMetrics::from_row`]
pub const METRIC_FIELDS: &[&str] = &[
    "metrics.impressions",
    "metrics.clicks",
    "metrics.cost_micros",
    "metrics.conversions",
    "metrics.conversions_value",
];
