//! Tool generation from declarative definitions.
//!
//! Every tool runs through the same four steps:
//!
//! ```text
//! arguments → validate → build (AdsRequest) → execute (AdsApi) → normalize → JSON
//! ```
//!
//! A tool only supplies the three tool-specific pieces through [`AdsTool`]:
//! - **`definition()`**: name, description and [`ParamDef`](crate::tool_definitions::ParamDef)s,
//!   which drive both the published schema and validation
//! - **`build()`**: turns typed arguments into one query, several queries or one mutate request
//! - **`normalize()`**: reshapes the raw response into the tool's result type
//!
//! [`RegisteredTool`] erases the per-tool argument and output types so the registry can hold
//! all tools in one list.
//!
//! # Error Handling
//!
//! - Validation failures (schema or cross-field checks in `build`) never reach the API
//! - API failures are wrapped with the tool's action: "Failed to list campaigns: ..."
//! - Zero-row lookups are raised by `normalize` as not-found errors

use futures::future::BoxFuture;
use rmcp::model::Tool;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use crate::ads_api::{AdsApi, MutateOperation};
use crate::error::{Error, Result};
use crate::support::params::validate_arguments;
use crate::support::schema::SchemaBuilder;
use crate::tool_definitions::ToolDef;

/// Values a builder may need besides the arguments
#[derive(Debug, Clone, Copy)]
pub struct BuildContext<'a> {
    /// Account the call is scoped to, used in resource names
    pub customer_id: &'a str,
}

/// What a tool asks the external API to do
#[derive(Debug, Clone, PartialEq)]
pub enum AdsRequest {
    Query(String),
    /// Independent queries run in order, one row set each
    Queries(Vec<String>),
    /// One atomic mutate request
    Mutate(Vec<MutateOperation>),
}

/// Raw result matching the [`AdsRequest`] variant
#[derive(Debug, Clone, PartialEq)]
pub enum AdsResponse {
    Rows(Vec<Value>),
    RowSets(Vec<Vec<Value>>),
    Mutated(Vec<String>),
}

impl AdsResponse {
    pub fn into_rows(self) -> Result<Vec<Value>> {
        match self {
            Self::Rows(rows) => Ok(rows),
            Self::RowSets(_) | Self::Mutated(_) => {
                Err(Error::internal("expected the rows of a single query"))
            }
        }
    }

    pub fn into_row_sets(self) -> Result<Vec<Vec<Value>>> {
        match self {
            Self::RowSets(sets) => Ok(sets),
            Self::Rows(_) | Self::Mutated(_) => {
                Err(Error::internal("expected the row sets of several queries"))
            }
        }
    }

    pub fn into_resource_names(self) -> Result<Vec<String>> {
        match self {
            Self::Mutated(names) => Ok(names),
            Self::Rows(_) | Self::RowSets(_) => {
                Err(Error::internal("expected the resource names of a mutation"))
            }
        }
    }
}

/// The tool-specific parts of the pipeline
pub trait AdsTool: Send + Sync + 'static {
    /// Typed arguments, deserialized from the validated argument object
    type Args: DeserializeOwned + Send + Sync;
    /// Normalized result, serialized as the tool's JSON payload
    type Output: Serialize;

    fn definition(&self) -> ToolDef;

    fn build(&self, args: &Self::Args, ctx: &BuildContext<'_>) -> Result<AdsRequest>;

    fn normalize(&self, args: &Self::Args, response: AdsResponse) -> Result<Self::Output>;
}

/// Object-safe view of an [`AdsTool`] with its types erased
trait ToolHandler: Send + Sync {
    fn run<'a>(
        &'a self,
        def: &'a ToolDef,
        api: &'a dyn AdsApi,
        arguments: Map<String, Value>,
    ) -> BoxFuture<'a, Result<Value>>;
}

impl<T: AdsTool> ToolHandler for T {
    fn run<'a>(
        &'a self,
        def: &'a ToolDef,
        api: &'a dyn AdsApi,
        arguments: Map<String, Value>,
    ) -> BoxFuture<'a, Result<Value>> {
        Box::pin(async move {
            let args: T::Args = serde_json::from_value(Value::Object(arguments)).map_err(|e| {
                Error::internal(format!("arguments for {} did not deserialize: {e}", def.name))
            })?;

            let ctx = BuildContext {
                customer_id: api.customer_id(),
            };
            let request = self.build(&args, &ctx)?;
            let response = execute(api, def.action, request).await?;
            let output = self.normalize(&args, response)?;

            Ok(serde_json::to_value(output)?)
        })
    }
}

/// Run a request against the API, wrapping failures with the tool's action
async fn execute(api: &dyn AdsApi, action: &str, request: AdsRequest) -> Result<AdsResponse> {
    match request {
        AdsRequest::Query(query) => {
            debug!(%query, "Running query");
            let rows = api
                .query(&query)
                .await
                .map_err(|e| Error::external(action, &e))?;
            debug!(rows = rows.len(), "Query returned");
            Ok(AdsResponse::Rows(rows))
        }
        AdsRequest::Queries(queries) => {
            let mut sets = Vec::with_capacity(queries.len());
            for query in queries {
                debug!(%query, "Running query");
                let rows = api
                    .query(&query)
                    .await
                    .map_err(|e| Error::external(action, &e))?;
                sets.push(rows);
            }
            Ok(AdsResponse::RowSets(sets))
        }
        AdsRequest::Mutate(operations) => {
            debug!(operations = operations.len(), "Submitting mutation");
            let names = api
                .mutate(operations)
                .await
                .map_err(|e| Error::external(action, &e))?;
            Ok(AdsResponse::Mutated(names))
        }
    }
}

/// A tool ready for listing and dispatch
pub struct RegisteredTool {
    definition: ToolDef,
    handler:    Box<dyn ToolHandler>,
}

impl RegisteredTool {
    pub fn new<T: AdsTool>(tool: T) -> Self {
        Self {
            definition: tool.definition(),
            handler:    Box::new(tool),
        }
    }

    pub const fn definition(&self) -> &ToolDef {
        &self.definition
    }

    pub fn name(&self) -> &'static str {
        self.definition.name
    }

    /// Validate, build, execute and normalize one call
    pub async fn invoke(
        &self,
        api: &dyn AdsApi,
        arguments: Option<&Map<String, Value>>,
    ) -> Result<Value> {
        let validated = validate_arguments(&self.definition.params, arguments)?;
        self.handler.run(&self.definition, api, validated).await
    }
}

/// Generate tool registration from a declarative definition
pub fn generate_tool_registration(def: &ToolDef) -> Tool {
    Tool {
        name:         def.name.into(),
        description:  def.description.into(),
        input_schema: SchemaBuilder::new().add_params(&def.params).build(),
    }
}
