// This file contains constants for the MCP server and cross-cutting concerns
// Per-tool field lists live next to the tools that use them

// Server info
pub const SERVER_NAME: &str = "google_ads_mcp";
pub const SERVER_INSTRUCTIONS: &str = "Tools for reading and managing a Google Ads account: \
    accounts, campaigns, ad groups, ads, keywords, conversions, shopping and performance \
    reporting. Monetary arguments are plain currency amounts (12.50), never micros. Write tools \
    change the live account immediately.";

// Environment variables
pub const ENV_CLIENT_ID: &str = "GOOGLE_ADS_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "GOOGLE_ADS_CLIENT_SECRET";
pub const ENV_DEVELOPER_TOKEN: &str = "GOOGLE_ADS_DEVELOPER_TOKEN";
pub const ENV_REFRESH_TOKEN: &str = "GOOGLE_ADS_REFRESH_TOKEN";
pub const ENV_CUSTOMER_ID: &str = "GOOGLE_ADS_CUSTOMER_ID";
pub const ENV_LOGIN_CUSTOMER_ID: &str = "GOOGLE_ADS_LOGIN_CUSTOMER_ID";
pub const ENV_API_VERSION: &str = "GOOGLE_ADS_API_VERSION";

// External API
pub const DEFAULT_API_VERSION: &str = "v17";
pub const ADS_API_BASE_URL: &str = "https://googleads.googleapis.com";
pub const OAUTH_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const MICROS_PER_UNIT: f64 = 1_000_000.0;

// Logging
pub const LOG_FILE_PREFIX: &str = "google_ads_mcp.log";
pub const DEFAULT_LOG_FILTER: &str = "google_ads_mcp=info";

// Parameter name constants
pub const PARAM_AD_GROUP_ID: &str = "adGroupId";
pub const PARAM_AD_ID: &str = "adId";
pub const PARAM_ALWAYS_USE_DEFAULT_VALUE: &str = "alwaysUseDefaultValue";
pub const PARAM_AMOUNT: &str = "amount";
pub const PARAM_BIDDING_STRATEGY: &str = "biddingStrategy";
pub const PARAM_BOTTOM_COUNT: &str = "bottomCount";
pub const PARAM_BUDGET: &str = "budget";
pub const PARAM_BUDGET_ID: &str = "budgetId";
pub const PARAM_CAMPAIGN_ID: &str = "campaignId";
pub const PARAM_CATEGORY: &str = "category";
pub const PARAM_CHANNEL_TYPE: &str = "channelType";
pub const PARAM_COUNTING_TYPE: &str = "countingType";
pub const PARAM_CPC_BID: &str = "cpcBid";
pub const PARAM_CUSTOM_DATE_RANGE: &str = "customDateRange";
pub const PARAM_DATE_RANGE: &str = "dateRange";
pub const PARAM_DEFAULT_CURRENCY_CODE: &str = "defaultCurrencyCode";
pub const PARAM_DEFAULT_VALUE: &str = "defaultValue";
pub const PARAM_DESCRIPTIONS: &str = "descriptions";
pub const PARAM_END_DATE: &str = "endDate";
pub const PARAM_FINAL_URL: &str = "finalUrl";
pub const PARAM_HEADLINES: &str = "headlines";
pub const PARAM_INCLUDE_NEGATIVES: &str = "includeNegatives";
pub const PARAM_INCLUDE_PAUSED: &str = "includePaused";
pub const PARAM_INCLUDE_REMOVED: &str = "includeRemoved";
pub const PARAM_KEYWORD_ID: &str = "keywordId";
pub const PARAM_KEYWORDS: &str = "keywords";
pub const PARAM_LIMIT: &str = "limit";
pub const PARAM_MATCH_TYPE: &str = "matchType";
pub const PARAM_MERCHANT_ID: &str = "merchantId";
pub const PARAM_METRIC: &str = "metric";
pub const PARAM_MIN_IMPRESSIONS: &str = "minImpressions";
pub const PARAM_NAME: &str = "name";
pub const PARAM_PATH1: &str = "path1";
pub const PARAM_PATH2: &str = "path2";
pub const PARAM_SEGMENT_BY: &str = "segmentBy";
pub const PARAM_SORT_BY: &str = "sortBy";
pub const PARAM_START_DATE: &str = "startDate";
pub const PARAM_STATUS: &str = "status";
pub const PARAM_TARGET_CPA: &str = "targetCpa";
pub const PARAM_TARGET_ROAS: &str = "targetRoas";
pub const PARAM_TEXT: &str = "text";
pub const PARAM_TOP_COUNT: &str = "topCount";
pub const PARAM_TYPE: &str = "type";
pub const PARAM_VALUE_SETTINGS: &str = "valueSettings";

// Defaults
pub const DEFAULT_LIST_LIMIT: i64 = 50;
pub const DEFAULT_KEYWORD_LIMIT: i64 = 100;
pub const DEFAULT_TOP_BOTTOM_COUNT: i64 = 5;
pub const MAX_LIMIT: i64 = 10_000;
pub const MAX_TOP_BOTTOM_COUNT: i64 = 100;

// Shared enum value sets
pub const CAMPAIGN_STATUSES: &[&str] = &["ENABLED", "PAUSED", "REMOVED"];
pub const SETTABLE_STATUSES: &[&str] = &["ENABLED", "PAUSED"];
pub const MATCH_TYPES: &[&str] = &["EXACT", "PHRASE", "BROAD"];
pub const CHANNEL_TYPES: &[&str] = &["SEARCH", "DISPLAY", "SHOPPING", "VIDEO", "PERFORMANCE_MAX"];
pub const AD_GROUP_TYPES: &[&str] = &[
    "SEARCH_STANDARD",
    "DISPLAY_STANDARD",
    "SHOPPING_PRODUCT_ADS",
    "VIDEO_TRUE_VIEW_IN_STREAM",
];
pub const CONVERSION_STATUSES: &[&str] = &["ENABLED", "HIDDEN"];
pub const CONVERSION_COUNTING_TYPES: &[&str] = &["ONE_PER_CLICK", "MANY_PER_CLICK"];
pub const CONVERSION_TYPES: &[&str] = &[
    "WEBPAGE",
    "UPLOAD_CLICKS",
    "UPLOAD_CALLS",
    "CLICK_TO_CALL",
    "WEBSITE_CALL",
    "AD_CALL",
];
pub const CONVERSION_CATEGORIES: &[&str] = &[
    "DEFAULT",
    "PAGE_VIEW",
    "PURCHASE",
    "SIGNUP",
    "DOWNLOAD",
    "ADD_TO_CART",
    "BEGIN_CHECKOUT",
    "SUBSCRIBE_PAID",
    "PHONE_CALL_LEAD",
    "IMPORTED_LEAD",
    "SUBMIT_LEAD_FORM",
    "BOOK_APPOINTMENT",
    "REQUEST_QUOTE",
    "GET_DIRECTIONS",
    "OUTBOUND_CLICK",
    "CONTACT",
    "ENGAGEMENT",
    "STORE_VISIT",
    "STORE_SALE",
    "QUALIFIED_LEAD",
    "CONVERTED_LEAD",
];

// Responsive search ad limits
pub const RSA_MIN_HEADLINES: usize = 3;
pub const RSA_MAX_HEADLINES: usize = 15;
pub const RSA_HEADLINE_MAX_LEN: usize = 30;
pub const RSA_MIN_DESCRIPTIONS: usize = 2;
pub const RSA_MAX_DESCRIPTIONS: usize = 4;
pub const RSA_DESCRIPTION_MAX_LEN: usize = 90;
pub const RSA_PATH_MAX_LEN: usize = 15;
pub const KEYWORD_MAX_LEN: usize = 80;

// Tool name constants
pub const TOOL_LIST_ACCOUNTS: &str = "list_accounts";
pub const TOOL_GET_ACCOUNT_INFO: &str = "get_account_info";
pub const TOOL_LIST_CAMPAIGNS: &str = "list_campaigns";
pub const TOOL_GET_CAMPAIGN: &str = "get_campaign";
pub const TOOL_CREATE_CAMPAIGN: &str = "create_campaign";
pub const TOOL_UPDATE_CAMPAIGN: &str = "update_campaign";
pub const TOOL_UPDATE_CAMPAIGN_BUDGET: &str = "update_campaign_budget";
pub const TOOL_LIST_AD_GROUPS: &str = "list_ad_groups";
pub const TOOL_GET_AD_GROUP: &str = "get_ad_group";
pub const TOOL_CREATE_AD_GROUP: &str = "create_ad_group";
pub const TOOL_UPDATE_AD_GROUP: &str = "update_ad_group";
pub const TOOL_LIST_ADS: &str = "list_ads";
pub const TOOL_GET_AD: &str = "get_ad";
pub const TOOL_CREATE_RESPONSIVE_SEARCH_AD: &str = "create_responsive_search_ad";
pub const TOOL_UPDATE_AD_STATUS: &str = "update_ad_status";
pub const TOOL_LIST_KEYWORDS: &str = "list_keywords";
pub const TOOL_ADD_KEYWORDS: &str = "add_keywords";
pub const TOOL_ADD_NEGATIVE_KEYWORDS: &str = "add_negative_keywords";
pub const TOOL_UPDATE_KEYWORD: &str = "update_keyword";
pub const TOOL_REMOVE_KEYWORD: &str = "remove_keyword";
pub const TOOL_GET_SEARCH_TERMS_REPORT: &str = "get_search_terms_report";
pub const TOOL_LIST_CONVERSION_ACTIONS: &str = "list_conversion_actions";
pub const TOOL_CREATE_CONVERSION_ACTION: &str = "create_conversion_action";
pub const TOOL_GET_CONVERSION_STATS: &str = "get_conversion_stats";
pub const TOOL_GET_SHOPPING_PERFORMANCE: &str = "get_shopping_performance";
pub const TOOL_LIST_LISTING_GROUPS: &str = "list_listing_groups";
pub const TOOL_GET_CAMPAIGN_PERFORMANCE: &str = "get_campaign_performance";
pub const TOOL_GET_AD_GROUP_PERFORMANCE: &str = "get_ad_group_performance";
pub const TOOL_GET_KEYWORD_PERFORMANCE: &str = "get_keyword_performance";
pub const TOOL_GET_TOP_BOTTOM_KEYWORDS: &str = "get_top_bottom_keywords";
pub const TOOL_COMPARE_CAMPAIGNS: &str = "compare_campaigns";
pub const TOOL_GET_ACCOUNT_PERFORMANCE: &str = "get_account_performance";
