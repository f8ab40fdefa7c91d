//! REST client for the Google Ads API
//!
//! Queries go through `googleAds:searchStream`, which returns every row of the query in a
//! sequence of batches, so no page-token handling is needed. Mutations go through the generic
//! `googleAds:mutate` endpoint, which accepts operations for different entity types in one
//! atomic request and lets new entities reference each other through temporary ids.

use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde_json::{Value, json};
use tracing::debug;

use super::http_client::get_client;
use super::oauth::TokenProvider;
use super::{AdsApi, ApiError, MutateOperation};
use crate::config::Config;
use crate::constants::ADS_API_BASE_URL;

/// Production [`AdsApi`] implementation
pub struct GoogleAdsClient {
    customer_id:       String,
    login_customer_id: Option<String>,
    developer_token:   String,
    base_url:          String,
    tokens:            TokenProvider,
}

impl GoogleAdsClient {
    pub fn new(config: Config) -> Self {
        Self {
            base_url:          format!("{ADS_API_BASE_URL}/{}", config.api_version),
            customer_id:       config.customer_id,
            login_customer_id: config.login_customer_id,
            developer_token:   config.developer_token,
            tokens:            TokenProvider::new(
                config.client_id,
                config.client_secret,
                config.refresh_token,
            ),
        }
    }

    fn endpoint(&self, method: &str) -> String {
        format!(
            "{}/customers/{}/googleAds:{method}",
            self.base_url, self.customer_id
        )
    }

    async fn authorized(&self, url: &str) -> Result<RequestBuilder, ApiError> {
        let token = self.tokens.access_token().await?;
        let mut request = get_client()
            .post(url)
            .bearer_auth(token)
            .header("developer-token", &self.developer_token);
        if let Some(login_customer_id) = &self.login_customer_id {
            request = request.header("login-customer-id", login_customer_id);
        }
        Ok(request)
    }

    async fn post_json(&self, method: &str, body: Value) -> Result<Value, ApiError> {
        let url = self.endpoint(method);
        let response = self.authorized(&url).await?.json(&body).send().await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::Status {
                status:  status.as_u16(),
                message: extract_error_message(&text),
            });
        }

        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl AdsApi for GoogleAdsClient {
    fn customer_id(&self) -> &str {
        &self.customer_id
    }

    async fn query(&self, query: &str) -> Result<Vec<Value>, ApiError> {
        debug!("GAQL: {query}");
        let batches = self
            .post_json("searchStream", json!({ "query": query }))
            .await?;
        flatten_stream(batches)
    }

    async fn mutate(&self, operations: Vec<MutateOperation>) -> Result<Vec<String>, ApiError> {
        let body = json!({
            "mutateOperations": operations.iter().map(MutateOperation::to_json).collect::<Vec<_>>(),
        });
        debug!("Mutate: {body}");
        let response = self.post_json("mutate", body).await?;
        parse_mutate_response(&response, &operations)
    }
}

/// Concatenate the `results` of every streamed batch, preserving order
fn flatten_stream(batches: Value) -> Result<Vec<Value>, ApiError> {
    let batches = match batches {
        Value::Array(batches) => batches,
        single @ Value::Object(_) => vec![single],
        other => {
            return Err(ApiError::Decode(format!(
                "expected a list of result batches, got {other}"
            )));
        }
    };

    Ok(batches
        .into_iter()
        .flat_map(|mut batch| match batch.get_mut("results").map(Value::take) {
            Some(Value::Array(rows)) => rows,
            _ => Vec::new(),
        })
        .collect())
}

/// Pull one resource name per submitted operation out of a mutate response
fn parse_mutate_response(
    response: &Value,
    operations: &[MutateOperation],
) -> Result<Vec<String>, ApiError> {
    let results = response
        .get("mutateOperationResponses")
        .and_then(Value::as_array)
        .ok_or_else(|| ApiError::Decode("missing mutateOperationResponses".to_string()))?;

    if results.len() != operations.len() {
        return Err(ApiError::Decode(format!(
            "expected {} operation results, got {}",
            operations.len(),
            results.len()
        )));
    }

    results
        .iter()
        .zip(operations)
        .map(|(result, operation)| {
            result
                .get(operation.kind.result_key())
                .and_then(|r| r.get("resourceName"))
                .and_then(Value::as_str)
                .map(String::from)
                .ok_or_else(|| {
                    ApiError::Decode(format!(
                        "missing {}.resourceName in mutate response",
                        operation.kind.result_key()
                    ))
                })
        })
        .collect()
}

/// Most specific human-readable message in a Google error body
fn extract_error_message(body: &str) -> String {
    let Ok(parsed) = serde_json::from_str::<Value>(body) else {
        return body.trim().to_string();
    };
    // searchStream wraps its error object in a one-element array
    let error = match &parsed {
        Value::Array(items) => items.first().and_then(|item| item.get("error")),
        _ => parsed.get("error"),
    };
    let Some(error) = error else {
        return body.trim().to_string();
    };

    let detailed: Vec<&str> = error
        .get("details")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|detail| detail.get("errors").and_then(Value::as_array))
        .flatten()
        .filter_map(|e| e.get("message").and_then(Value::as_str))
        .collect();

    if !detailed.is_empty() {
        return detailed.join("; ");
    }

    error
        .get("message")
        .and_then(Value::as_str)
        .map_or_else(|| body.trim().to_string(), String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ads_api::ResourceKind;

    #[test]
    fn test_flatten_stream_keeps_batch_order() {
        let batches = json!([
            { "results": [{ "campaign": { "id": "1" } }, { "campaign": { "id": "2" } }] },
            { "results": [{ "campaign": { "id": "3" } }] },
            { "fieldMask": "campaign.id" }
        ]);
        let rows = flatten_stream(batches).unwrap();
        let ids: Vec<&str> = rows
            .iter()
            .map(|row| row["campaign"]["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, ["1", "2", "3"]);
    }

    #[test]
    fn test_flatten_stream_empty_result() {
        assert!(flatten_stream(json!([])).unwrap().is_empty());
        assert!(flatten_stream(json!("nope")).is_err());
    }

    #[test]
    fn test_parse_mutate_response_per_operation() {
        let operations = vec![
            MutateOperation::create(ResourceKind::CampaignBudget, json!({})),
            MutateOperation::create(ResourceKind::Campaign, json!({})),
        ];
        let response = json!({
            "mutateOperationResponses": [
                { "campaignBudgetResult": { "resourceName": "customers/1/campaignBudgets/10" } },
                { "campaignResult": { "resourceName": "customers/1/campaigns/20" } }
            ]
        });
        assert_eq!(
            parse_mutate_response(&response, &operations).unwrap(),
            ["customers/1/campaignBudgets/10", "customers/1/campaigns/20"]
        );
    }

    #[test]
    fn test_parse_mutate_response_count_mismatch() {
        let operations = vec![MutateOperation::create(ResourceKind::AdGroup, json!({}))];
        let response = json!({ "mutateOperationResponses": [] });
        assert!(matches!(
            parse_mutate_response(&response, &operations),
            Err(ApiError::Decode(_))
        ));
    }

    #[test]
    fn test_extract_error_message_prefers_detailed_errors() {
        let body = r#"[{"error":{"code":400,"message":"Request contains an invalid argument.",
            "details":[{"errors":[{"message":"Unrecognized field in the query: 'campaign.nme'."}]}]}}]"#;
        assert_eq!(
            extract_error_message(body),
            "Unrecognized field in the query: 'campaign.nme'."
        );
    }

    #[test]
    fn test_extract_error_message_fallbacks() {
        assert_eq!(
            extract_error_message(r#"{"error":{"code":401,"message":"Unauthenticated"}}"#),
            "Unauthenticated"
        );
        assert_eq!(extract_error_message("Bad Gateway\n"), "Bad Gateway");
    }

    #[test]
    fn test_endpoint_uses_version_and_customer() {
        let config = Config::from_lookup(|key| {
            Some(
                match key {
                    "GOOGLE_ADS_CUSTOMER_ID" => "1234567890",
                    "GOOGLE_ADS_LOGIN_CUSTOMER_ID" | "GOOGLE_ADS_API_VERSION" => return None,
                    _ => "x",
                }
                .to_string(),
            )
        })
        .unwrap();
        let client = GoogleAdsClient::new(config);
        assert_eq!(
            client.endpoint("searchStream"),
            "https://googleads.googleapis.com/v17/customers/1234567890/googleAds:searchStream"
        );
        assert_eq!(client.customer_id(), "1234567890");
    }
}
