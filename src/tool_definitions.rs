//! Declarative tool definitions.
//!
//! Every tool describes its arguments as a list of [`ParamDef`]s. The same list drives both the
//! JSON schema published through `list_tools` (see [`crate::support::schema`]) and the argument
//! validation run on every call (see [`crate::support::params`]), so the declared required
//! fields are by construction the fields whose absence is rejected.
//!
//! # Parameter types
//!
//! - **`String`** / **`Date`** / **`Id`**: scalar text; dates are `YYYY-MM-DD`, ids accept a
//!   digit string or a non-negative integer and are normalized to a string
//! - **`Integer`** / **`Number`** / **`Money`**: numbers; `Money` is a non-negative currency amount
//!   that write tools convert to micros
//! - **`Enum`**: one of a closed value set, optionally defaulted
//! - **`StringArray`** / **`ObjectArray`** / **`Object`**: nested shapes validated recursively
//!
//! # Adding a new tool
//!
//! 1. Add the tool name to `constants.rs`
//! 2. Implement [`crate::tool_generator::AdsTool`] for a unit struct in the matching `tools/`
//!    module, returning a [`ToolDef`] from `definition()`
//! 3. Register it in [`crate::tools::all_tools`]

use crate::constants::{
    CAMPAIGN_STATUSES, DEFAULT_TOP_BOTTOM_COUNT, MAX_LIMIT, MAX_TOP_BOTTOM_COUNT,
    PARAM_AD_GROUP_ID, PARAM_CAMPAIGN_ID, PARAM_CUSTOM_DATE_RANGE, PARAM_DATE_RANGE,
    PARAM_END_DATE, PARAM_INCLUDE_REMOVED, PARAM_LIMIT, PARAM_START_DATE, PARAM_STATUS,
};
use crate::support::date_range::DateRange;
use crate::support::metrics::Metric;

/// Represents a parameter definition for a tool
#[derive(Clone, Debug)]
pub struct ParamDef {
    /// Parameter name as it appears in the arguments object
    pub name:        &'static str,
    /// Description of the parameter
    pub description: &'static str,
    /// Whether this parameter is required
    pub required:    bool,
    /// Type of the parameter
    pub param_type:  ParamType,
}

/// Types of parameters that can be defined
#[derive(Clone, Debug)]
pub enum ParamType {
    /// Free text, optionally length-limited
    String { max_len: Option<usize> },
    /// Calendar date in `YYYY-MM-DD` form
    Date,
    /// Numeric resource id
    Id,
    /// Whole number within an inclusive range
    Integer {
        default: Option<i64>,
        min:     i64,
        max:     i64,
    },
    /// Non-negative decimal
    Number { default: Option<f64> },
    /// Non-negative currency amount
    Money,
    /// True or false
    Boolean { default: Option<bool> },
    /// One of a closed set of string values
    Enum {
        values:  &'static [&'static str],
        default: Option<&'static str>,
    },
    /// Array of non-empty strings
    StringArray {
        min_items: usize,
        max_items: Option<usize>,
        max_len:   Option<usize>,
    },
    /// Array of objects sharing one shape
    ObjectArray {
        fields:    Vec<ParamDef>,
        min_items: usize,
    },
    /// Nested object
    Object { fields: Vec<ParamDef> },
}

impl ParamType {
    pub const fn string() -> Self {
        Self::String { max_len: None }
    }

    pub const fn enumeration(
        values: &'static [&'static str],
        default: Option<&'static str>,
    ) -> Self {
        Self::Enum { values, default }
    }

    pub const fn boolean(default: bool) -> Self {
        Self::Boolean {
            default: Some(default),
        }
    }
}

impl ParamDef {
    pub const fn required(
        name: &'static str,
        description: &'static str,
        param_type: ParamType,
    ) -> Self {
        Self {
            name,
            description,
            required: true,
            param_type,
        }
    }

    pub const fn optional(
        name: &'static str,
        description: &'static str,
        param_type: ParamType,
    ) -> Self {
        Self {
            name,
            description,
            required: false,
            param_type,
        }
    }

    /// Campaign id, required or used as a filter
    pub const fn campaign_id(required: bool) -> Self {
        Self {
            name: PARAM_CAMPAIGN_ID,
            description: "Campaign ID",
            required,
            param_type: ParamType::Id,
        }
    }

    /// Ad group id, required or used as a filter
    pub const fn ad_group_id(required: bool) -> Self {
        Self {
            name: PARAM_AD_GROUP_ID,
            description: "Ad group ID",
            required,
            param_type: ParamType::Id,
        }
    }

    /// Standard `limit` parameter
    pub const fn limit(default: i64) -> Self {
        Self::optional(
            PARAM_LIMIT,
            "Maximum number of rows to return",
            ParamType::Integer {
                default: Some(default),
                min:     1,
                max:     MAX_LIMIT,
            },
        )
    }

    /// Count parameter for top/bottom style tools
    pub const fn count(name: &'static str, description: &'static str) -> Self {
        Self::optional(
            name,
            description,
            ParamType::Integer {
                default: Some(DEFAULT_TOP_BOTTOM_COUNT),
                min:     1,
                max:     MAX_TOP_BOTTOM_COUNT,
            },
        )
    }

    /// Opt-in to removed entities in list results
    pub const fn include_removed() -> Self {
        Self::optional(
            PARAM_INCLUDE_REMOVED,
            "Include removed entities (default: false)",
            ParamType::boolean(false),
        )
    }

    /// Exact status filter for list tools
    pub const fn status_filter() -> Self {
        Self::optional(
            PARAM_STATUS,
            "Only return entities with this status",
            ParamType::enumeration(CAMPAIGN_STATUSES, None),
        )
    }

    /// Monetary amount in account currency
    pub const fn money(name: &'static str, description: &'static str, required: bool) -> Self {
        Self {
            name,
            description,
            required,
            param_type: ParamType::Money,
        }
    }

    /// Named reporting window
    pub const fn date_range() -> Self {
        Self::optional(
            PARAM_DATE_RANGE,
            "Reporting window; use CUSTOM together with customDateRange (default: LAST_30_DAYS)",
            ParamType::enumeration(DateRange::TOKENS, Some(DateRange::DEFAULT_TOKEN)),
        )
    }

    /// Explicit window used when `dateRange` is CUSTOM
    pub fn custom_date_range() -> Self {
        Self::optional(
            PARAM_CUSTOM_DATE_RANGE,
            "Explicit window, required when dateRange is CUSTOM",
            ParamType::Object {
                fields: vec![
                    Self::required(PARAM_START_DATE, "First day (YYYY-MM-DD)", ParamType::Date),
                    Self::required(PARAM_END_DATE, "Last day (YYYY-MM-DD)", ParamType::Date),
                ],
            },
        )
    }

    /// Logical metric used for ordering
    pub const fn metric(
        name: &'static str,
        description: &'static str,
        values: &'static [&'static str],
        default: Metric,
    ) -> Self {
        Self::optional(
            name,
            description,
            ParamType::enumeration(values, Some(default.token())),
        )
    }
}

/// Complete definition of a tool
#[derive(Clone, Debug)]
pub struct ToolDef {
    /// Tool name (e.g., "`list_campaigns`")
    pub name:        &'static str,
    /// Tool description shown to the agent
    pub description: &'static str,
    /// What the tool does, used to prefix external-call failures ("list campaigns")
    pub action:      &'static str,
    /// Parameters for the tool
    pub params:      Vec<ParamDef>,
}

impl ToolDef {
    /// Names of the parameters declared as required
    pub fn required_params(&self) -> Vec<&'static str> {
        self.params
            .iter()
            .filter(|param| param.required)
            .map(|param| param.name)
            .collect()
    }
}
