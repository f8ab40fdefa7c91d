//! In-memory [`AdsApi`] double for pipeline tests.

#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::ads_api::{AdsApi, ApiError, MutateOperation};
use crate::error;
use crate::tool_generator::{AdsTool, RegisteredTool};

pub const TEST_CUSTOMER_ID: &str = "1234567890";

/// Records every query and mutation; answers queries with queued row sets in order
pub struct MockAdsApi {
    responses: Mutex<VecDeque<Vec<Value>>>,
    queries:   Mutex<Vec<String>>,
    mutations: Mutex<Vec<Vec<MutateOperation>>>,
    failure:   Option<String>,
}

impl MockAdsApi {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            queries:   Mutex::new(Vec::new()),
            mutations: Mutex::new(Vec::new()),
            failure:   None,
        }
    }

    /// Queue the rows returned by the next query; queries beyond the queue get no rows
    pub fn with_rows(self, rows: Vec<Value>) -> Self {
        self.responses.lock().unwrap().push_back(rows);
        self
    }

    /// Make every call fail with an HTTP 400 carrying `message`
    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    pub fn mutations(&self) -> Vec<Vec<MutateOperation>> {
        self.mutations.lock().unwrap().clone()
    }

    /// Operations of the only mutate request made
    pub fn single_mutation(&self) -> Vec<MutateOperation> {
        let mutations = self.mutations();
        assert_eq!(mutations.len(), 1, "expected exactly one mutate request");
        mutations.into_iter().next().unwrap()
    }

    /// Total number of external calls made
    pub fn calls(&self) -> usize {
        self.queries.lock().unwrap().len() + self.mutations.lock().unwrap().len()
    }

    fn check_failure(&self) -> Result<(), ApiError> {
        match &self.failure {
            Some(message) => Err(ApiError::Status {
                status:  400,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

/// Run one tool through the full pipeline against the mock
pub async fn invoke<T: AdsTool>(
    tool: T,
    api: &MockAdsApi,
    arguments: Value,
) -> error::Result<Value> {
    RegisteredTool::new(tool)
        .invoke(api, arguments.as_object())
        .await
}

#[async_trait]
impl AdsApi for MockAdsApi {
    fn customer_id(&self) -> &str {
        TEST_CUSTOMER_ID
    }

    async fn query(&self, query: &str) -> Result<Vec<Value>, ApiError> {
        self.queries.lock().unwrap().push(query.to_string());
        self.check_failure()?;
        Ok(self.responses.lock().unwrap().pop_front().unwrap_or_default())
    }

    async fn mutate(&self, operations: Vec<MutateOperation>) -> Result<Vec<String>, ApiError> {
        let names = operations
            .iter()
            .enumerate()
            .map(|(index, op)| {
                op.kind
                    .resource_name(TEST_CUSTOMER_ID, &(index + 101).to_string())
            })
            .collect();
        self.mutations.lock().unwrap().push(operations);
        self.check_failure()?;
        Ok(names)
    }
}
