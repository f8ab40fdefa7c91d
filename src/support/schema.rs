use std::sync::Arc;

use serde_json::{Map, Value};

use crate::tool_definitions::{ParamDef, ParamType};

/// Builder for creating JSON schemas for tool registration
pub struct SchemaBuilder {
    properties: Map<String, Value>,
    required:   Vec<String>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self {
            properties: Map::new(),
            required:   Vec::new(),
        }
    }

    /// Add a declared parameter to the schema
    pub fn add_param(mut self, param: &ParamDef) -> Self {
        self.properties.insert(
            param.name.to_string(),
            property_schema(&param.param_type, param.description).into(),
        );

        if param.required {
            self.required.push(param.name.to_string());
        }

        self
    }

    /// Add every parameter of a definition
    pub fn add_params(self, params: &[ParamDef]) -> Self {
        params.iter().fold(self, Self::add_param)
    }

    /// Build the schema as a plain object
    pub fn build_object(self) -> Map<String, Value> {
        let mut schema = Map::new();
        schema.insert("type".to_string(), "object".into());
        schema.insert("properties".to_string(), self.properties.into());

        if !self.required.is_empty() {
            schema.insert("required".to_string(), self.required.into());
        }

        schema
    }

    /// Build the final schema
    pub fn build(self) -> Arc<Map<String, Value>> {
        Arc::new(self.build_object())
    }
}

/// Schema for a single property
fn property_schema(param_type: &ParamType, description: &str) -> Map<String, Value> {
    let mut prop = Map::new();

    match param_type {
        ParamType::String { max_len } => {
            prop.insert("type".to_string(), "string".into());
            if let Some(max_len) = max_len {
                prop.insert("maxLength".to_string(), (*max_len).into());
            }
        }
        ParamType::Date => {
            prop.insert("type".to_string(), "string".into());
            prop.insert("format".to_string(), "date".into());
        }
        ParamType::Id => {
            prop.insert("type".to_string(), "string".into());
            prop.insert("pattern".to_string(), r"^\d+$".into());
        }
        ParamType::Integer { default, min, max } => {
            prop.insert("type".to_string(), "integer".into());
            prop.insert("minimum".to_string(), (*min).into());
            prop.insert("maximum".to_string(), (*max).into());
            if let Some(default) = default {
                prop.insert("default".to_string(), (*default).into());
            }
        }
        ParamType::Number { default } => {
            prop.insert("type".to_string(), "number".into());
            prop.insert("minimum".to_string(), 0.into());
            if let Some(default) = default {
                prop.insert("default".to_string(), (*default).into());
            }
        }
        ParamType::Money => {
            prop.insert("type".to_string(), "number".into());
            prop.insert("minimum".to_string(), 0.into());
        }
        ParamType::Boolean { default } => {
            prop.insert("type".to_string(), "boolean".into());
            if let Some(default) = default {
                prop.insert("default".to_string(), (*default).into());
            }
        }
        ParamType::Enum { values, default } => {
            prop.insert("type".to_string(), "string".into());
            prop.insert("enum".to_string(), values.to_vec().into());
            if let Some(default) = default {
                prop.insert("default".to_string(), (*default).into());
            }
        }
        ParamType::StringArray {
            min_items,
            max_items,
            max_len,
        } => {
            prop.insert("type".to_string(), "array".into());
            let mut items = Map::new();
            items.insert("type".to_string(), "string".into());
            if let Some(max_len) = max_len {
                items.insert("maxLength".to_string(), (*max_len).into());
            }
            prop.insert("items".to_string(), items.into());
            prop.insert("minItems".to_string(), (*min_items).into());
            if let Some(max_items) = max_items {
                prop.insert("maxItems".to_string(), (*max_items).into());
            }
        }
        ParamType::ObjectArray { fields, min_items } => {
            prop.insert("type".to_string(), "array".into());
            prop.insert(
                "items".to_string(),
                SchemaBuilder::new().add_params(fields).build_object().into(),
            );
            prop.insert("minItems".to_string(), (*min_items).into());
        }
        ParamType::Object { fields } => {
            prop = SchemaBuilder::new().add_params(fields).build_object();
        }
    }

    prop.insert("description".to_string(), description.into());
    prop
}
