//! Tool implementations, grouped by the resource they work on.

use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::support::rows::id_from_resource_name;
use crate::tool_generator::RegisteredTool;

mod accounts;
mod ad_groups;
mod ads;
mod campaigns;
mod conversions;
mod keywords;
mod performance;
mod shopping;

/// Every tool the server offers, in listing order
pub fn all_tools() -> Vec<RegisteredTool> {
    vec![
        RegisteredTool::new(accounts::ListAccounts),
        RegisteredTool::new(accounts::GetAccountInfo),
        RegisteredTool::new(campaigns::ListCampaigns),
        RegisteredTool::new(campaigns::GetCampaign),
        RegisteredTool::new(campaigns::CreateCampaign),
        RegisteredTool::new(campaigns::UpdateCampaign),
        RegisteredTool::new(campaigns::UpdateCampaignBudget),
        RegisteredTool::new(ad_groups::ListAdGroups),
        RegisteredTool::new(ad_groups::GetAdGroup),
        RegisteredTool::new(ad_groups::CreateAdGroup),
        RegisteredTool::new(ad_groups::UpdateAdGroup),
        RegisteredTool::new(ads::ListAds),
        RegisteredTool::new(ads::GetAd),
        RegisteredTool::new(ads::CreateResponsiveSearchAd),
        RegisteredTool::new(ads::UpdateAdStatus),
        RegisteredTool::new(keywords::ListKeywords),
        RegisteredTool::new(keywords::AddKeywords),
        RegisteredTool::new(keywords::AddNegativeKeywords),
        RegisteredTool::new(keywords::UpdateKeyword),
        RegisteredTool::new(keywords::RemoveKeyword),
        RegisteredTool::new(keywords::GetSearchTermsReport),
        RegisteredTool::new(conversions::ListConversionActions),
        RegisteredTool::new(conversions::CreateConversionAction),
        RegisteredTool::new(conversions::GetConversionStats),
        RegisteredTool::new(shopping::GetShoppingPerformance),
        RegisteredTool::new(shopping::ListListingGroups),
        RegisteredTool::new(performance::GetCampaignPerformance),
        RegisteredTool::new(performance::GetAdGroupPerformance),
        RegisteredTool::new(performance::GetKeywordPerformance),
        RegisteredTool::new(performance::GetTopBottomKeywords),
        RegisteredTool::new(performance::CompareCampaigns),
        RegisteredTool::new(performance::GetAccountPerformance),
    ]
}

/// The single row of a lookup by id; zero rows is a not-found error
fn single_row(rows: Vec<Value>, resource: &'static str, id: &str) -> Result<Value> {
    rows.into_iter()
        .next()
        .ok_or_else(|| Error::not_found(resource, id))
}

/// Resource name and trailing id of the `index`-th mutate result
fn created(names: &[String], index: usize) -> Result<(String, String)> {
    let name = names.get(index).ok_or_else(|| {
        Error::internal(format!(
            "mutation returned {} result(s), expected at least {}",
            names.len(),
            index + 1
        ))
    })?;
    Ok((id_from_resource_name(name), name.clone()))
}

/// Result of a single update, echoing the field mask that was sent
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedResource {
    success:        bool,
    id:             String,
    resource_name:  String,
    updated_fields: Vec<String>,
}

fn updated(names: &[String], update_mask: Vec<String>) -> Result<UpdatedResource> {
    let (id, resource_name) = created(names, 0)?;
    Ok(UpdatedResource {
        success: true,
        id,
        resource_name,
        updated_fields: update_mask,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use serde_json::json;

    use super::*;

    #[test]
    fn test_single_row_not_found() {
        let err = single_row(vec![], "Ad group", "42").unwrap_err();
        assert_eq!(err.to_string(), "Ad group not found: 42");
        assert_eq!(
            single_row(vec![json!({ "a": 1 })], "Ad group", "42").unwrap(),
            json!({ "a": 1 })
        );
    }

    #[test]
    fn test_created_extracts_id() {
        let names = vec!["customers/1/adGroups/77".to_string()];
        let (id, name) = created(&names, 0).unwrap();
        assert_eq!(id, "77");
        assert_eq!(name, "customers/1/adGroups/77");
        assert!(matches!(created(&names, 1), Err(Error::Internal(_))));
    }
}
