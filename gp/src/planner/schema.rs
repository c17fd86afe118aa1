//! Response schema declaration and validation
//!
//! The schema is sent with every plan request as the response-format
//! directive, and the provider's parsed answer is checked against the same
//! schema before it is exposed as a `GoalPlan`.

use serde_json::{Value, json};
use thiserror::Error;
use tracing::debug;

use crate::domain::ResourceType;

/// Name the schema is registered under with providers that require one
pub const SCHEMA_NAME: &str = "goal_plan";

/// Top-level fields every plan must carry
pub const REQUIRED_FIELDS: &[&str] = &[
    "title",
    "summary",
    "difficulty",
    "isTimeframeRealistic",
    "milestones",
    "resources",
    "dailyHabits",
    "weeklyChecklist",
    "commonObstacles",
];

/// JSON Schema describing exactly the GoalPlan shape
///
/// `timeframeWarning` is the only optional field.
pub fn goal_plan_schema() -> Value {
    debug!("goal_plan_schema: called");
    let string = json!({ "type": "string" });
    let string_list = json!({ "type": "array", "items": { "type": "string" } });
    let resource_types: Vec<&str> = ResourceType::ALL.iter().map(|t| t.label()).collect();

    json!({
        "type": "object",
        "required": REQUIRED_FIELDS,
        "properties": {
            "title": string,
            "summary": string,
            "difficulty": string,
            "isTimeframeRealistic": { "type": "boolean" },
            "timeframeWarning": {
                "type": "string",
                "description": "Only provide if isTimeframeRealistic is false"
            },
            "milestones": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["title", "description", "timeframe"],
                    "properties": {
                        "title": string,
                        "description": string,
                        "timeframe": string
                    }
                }
            },
            "resources": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["name", "type", "description", "estimated_cost"],
                    "properties": {
                        "name": string,
                        "type": { "type": "string", "enum": resource_types },
                        "description": string,
                        "estimated_cost": string
                    }
                }
            },
            "dailyHabits": string_list,
            "weeklyChecklist": string_list,
            "commonObstacles": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["obstacle", "solution"],
                    "properties": {
                        "obstacle": string,
                        "solution": string
                    }
                }
            }
        }
    })
}

/// Where and how a document failed to match the schema
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("at {path}: expected {expected}, found {found}")]
pub struct SchemaViolation {
    /// JSON path such as `$.milestones[2].title`
    pub path: String,
    pub expected: String,
    pub found: String,
}

/// Check `value` against `schema`
///
/// Understands the keywords `goal_plan_schema` uses: `type`, `required`,
/// `properties`, `items` and `enum`. Fields the schema does not mention are
/// tolerated. Returns the first violation found in document order.
pub fn validate(schema: &Value, value: &Value) -> Result<(), SchemaViolation> {
    debug!("validate: called");
    validate_at("$", schema, value)
}

fn validate_at(path: &str, schema: &Value, value: &Value) -> Result<(), SchemaViolation> {
    if let Some(expected) = schema.get("type").and_then(Value::as_str)
        && !type_matches(expected, value)
    {
        return Err(SchemaViolation {
            path: path.to_string(),
            expected: expected.to_string(),
            found: json_type_name(value).to_string(),
        });
    }

    if let Some(allowed) = schema.get("enum").and_then(Value::as_array)
        && !allowed.contains(value)
    {
        let options: Vec<String> = allowed.iter().map(Value::to_string).collect();
        return Err(SchemaViolation {
            path: path.to_string(),
            expected: format!("one of {}", options.join(", ")),
            found: value.to_string(),
        });
    }

    if let Some(object) = value.as_object() {
        let required: Vec<&str> = schema
            .get("required")
            .and_then(Value::as_array)
            .map(|fields| fields.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        for field in &required {
            if !object.contains_key(*field) {
                return Err(SchemaViolation {
                    path: format!("{}.{}", path, field),
                    expected: "required field".to_string(),
                    found: "nothing".to_string(),
                });
            }
        }

        if let Some(properties) = schema.get("properties").and_then(Value::as_object) {
            for (field, field_schema) in properties {
                let Some(field_value) = object.get(field) else {
                    continue;
                };
                // An optional field sent as null counts as absent
                if field_value.is_null() && !required.contains(&field.as_str()) {
                    continue;
                }
                validate_at(&format!("{}.{}", path, field), field_schema, field_value)?;
            }
        }
    }

    if let (Some(items), Some(array)) = (schema.get("items"), value.as_array()) {
        for (index, item) in array.iter().enumerate() {
            validate_at(&format!("{}[{}]", path, index), items, item)?;
        }
    }

    Ok(())
}

fn type_matches(expected: &str, value: &Value) -> bool {
    match expected {
        "object" => value.is_object(),
        "array" => value.is_array(),
        "string" => value.is_string(),
        "boolean" => value.is_boolean(),
        "integer" => value.is_i64() || value.is_u64(),
        "number" => value.is_number(),
        "null" => value.is_null(),
        _ => true,
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
