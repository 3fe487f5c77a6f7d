//! Parameter schemas for catalog operations.
//!
//! Each operation lists its parameters as [`ParameterSpec`] values. The same
//! list drives the JSON input schema advertised to clients and the argument
//! validation performed before dispatch.

use std::sync::Arc;

use rmcp::model::{JsonObject, Tool};
use serde_json::{Value, json};

use super::error::ToolError;

/// Semantic type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    String,
    Integer,
    Number,
    Boolean,
}

impl ParamType {
    /// JSON schema type keyword.
    pub fn as_schema_type(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }

    fn accepts(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
        }
    }
}

/// One parameter of an operation.
#[derive(Debug, Clone)]
pub struct ParameterSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub param_type: ParamType,
    pub required: bool,
    pub allowed_values: Option<&'static [&'static str]>,
    /// Upper bound applied by clamping, never by rejection.
    pub maximum: Option<i64>,
    pub default: Option<Value>,
}

impl ParameterSpec {
    fn base(name: &'static str, param_type: ParamType, description: &'static str) -> Self {
        Self {
            name,
            description,
            param_type,
            required: false,
            allowed_values: None,
            maximum: None,
            default: None,
        }
    }

    /// A required parameter. Required parameters never carry a default.
    pub fn required(name: &'static str, param_type: ParamType, description: &'static str) -> Self {
        Self {
            required: true,
            ..Self::base(name, param_type, description)
        }
    }

    /// An optional parameter with no default.
    pub fn optional(name: &'static str, param_type: ParamType, description: &'static str) -> Self {
        Self::base(name, param_type, description)
    }

    /// An optional string restricted to a fixed set of values.
    pub fn enumerated(
        name: &'static str,
        values: &'static [&'static str],
        description: &'static str,
    ) -> Self {
        Self {
            allowed_values: Some(values),
            ..Self::base(name, ParamType::String, description)
        }
    }

    /// Attach a default value. Ignored on required parameters.
    pub fn with_default(mut self, default: Value) -> Self {
        if !self.required {
            self.default = Some(default);
        }
        self
    }

    /// Attach a clamp bound.
    pub fn with_maximum(mut self, maximum: i64) -> Self {
        self.maximum = Some(maximum);
        self
    }

    /// JSON schema fragment for this parameter.
    pub fn to_schema(&self) -> Value {
        let mut schema = json!({
            "type": self.param_type.as_schema_type(),
            "description": self.description,
        });
        if let Some(values) = self.allowed_values {
            schema["enum"] = json!(values);
        }
        if let Some(default) = &self.default {
            schema["default"] = default.clone();
        }
        if let Some(maximum) = self.maximum {
            schema["maximum"] = json!(maximum);
        }
        schema
    }

    fn check(&self, value: &Value) -> Result<(), ToolError> {
        if !self.param_type.accepts(value) {
            return Err(ToolError::invalid_arguments(format!(
                "parameter '{}' must be of type {}",
                self.name,
                self.param_type.as_schema_type()
            )));
        }
        if let (Some(values), Some(given)) = (self.allowed_values, value.as_str()) {
            if !values.contains(&given) {
                return Err(ToolError::invalid_arguments(format!(
                    "parameter '{}' must be one of: {}",
                    self.name,
                    values.join(", ")
                )));
            }
        }
        Ok(())
    }
}

/// Name, description and parameters of one operation.
#[derive(Debug, Clone)]
pub struct OperationDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Vec<ParameterSpec>,
}

impl OperationDescriptor {
    /// JSON schema object for the operation input.
    pub fn input_schema(&self) -> JsonObject {
        let properties: serde_json::Map<String, Value> = self
            .parameters
            .iter()
            .map(|p| (p.name.to_string(), p.to_schema()))
            .collect();
        let required: Vec<&str> = self
            .parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name)
            .collect();

        let mut schema = JsonObject::new();
        schema.insert("type".to_string(), json!("object"));
        schema.insert("properties".to_string(), Value::Object(properties));
        if !required.is_empty() {
            schema.insert("required".to_string(), json!(required));
        }
        schema
    }

    /// Create a Tool model for this operation (metadata).
    pub fn to_tool(&self) -> Tool {
        Tool {
            name: self.name.into(),
            description: Some(self.description.into()),
            input_schema: Arc::new(self.input_schema()),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Check raw arguments against the parameter list.
    ///
    /// `null` values are treated as absent.
    pub fn validate_arguments(&self, arguments: &JsonObject) -> Result<(), ToolError> {
        if let Some(unknown) = arguments
            .keys()
            .find(|key| !self.parameters.iter().any(|p| p.name == key.as_str()))
        {
            return Err(ToolError::invalid_arguments(format!(
                "unexpected parameter '{}'",
                unknown
            )));
        }

        for spec in &self.parameters {
            match arguments.get(spec.name) {
                None | Some(Value::Null) if spec.required => {
                    return Err(ToolError::invalid_arguments(format!(
                        "missing required parameter '{}'",
                        spec.name
                    )));
                }
                None | Some(Value::Null) => {}
                Some(value) => spec.check(value)?,
            }
        }
        Ok(())
    }
}
