//! Structural argument schemas for tool invocations.
//!
//! A tool's arguments are described by an [`ObjectSchema`] built from small
//! combinators. The same description drives two things: runtime validation of
//! the raw JSON argument bag before dispatch, and the JSON Schema advertised
//! to clients in `tools/list`.
//!
//! Validation is first-violation: the walk is depth first in field
//! declaration order and stops at the first constraint that does not hold.

use std::fmt::Write as _;

use serde_json::{json, Map, Value};

/// Schema for a single argument value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgSchema {
    /// A JSON string.
    String,
    /// A JSON number with no fractional part that fits in `i64`. Whole-valued
    /// floats such as `1.0` or `1e2` are accepted and normalized to integers.
    Integer,
    /// A JSON array whose every element matches the item schema.
    Array(Box<ArgSchema>),
    /// A JSON object with declared fields.
    Object(ObjectSchema),
}

impl ArgSchema {
    /// Array of `item`.
    #[must_use]
    pub fn array(item: impl Into<ArgSchema>) -> Self {
        Self::Array(Box::new(item.into()))
    }

    /// Validates `value` against this schema.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        self.validate_at(value, &mut String::from("$"))
    }

    fn validate_at(&self, value: &Value, path: &mut String) -> Result<(), ValidationError> {
        match self {
            Self::String => {
                if value.is_string() {
                    Ok(())
                } else {
                    Err(ValidationError::mismatch(path, "string", value))
                }
            }
            Self::Integer => {
                if whole_i64(value).is_some() {
                    Ok(())
                } else {
                    Err(ValidationError::mismatch(path, "integer", value))
                }
            }
            Self::Array(item) => {
                let Some(elements) = value.as_array() else {
                    return Err(ValidationError::mismatch(path, "array", value));
                };
                for (index, element) in elements.iter().enumerate() {
                    let len = path.len();
                    let _ = write!(path, "[{index}]");
                    item.validate_at(element, path)?;
                    path.truncate(len);
                }
                Ok(())
            }
            Self::Object(object) => object.validate_at(value, path),
        }
    }

    /// Rewrites whole-valued floats at integer positions as JSON integers.
    ///
    /// Meant for values that already passed [`Self::validate`]; anything that
    /// does not match the schema is left as it is.
    pub fn normalize(&self, value: &mut Value) {
        match self {
            Self::String => {}
            Self::Integer => {
                if !value.is_i64() {
                    if let Some(whole) = whole_i64(value) {
                        *value = Value::from(whole);
                    }
                }
            }
            Self::Array(item) => {
                if let Some(elements) = value.as_array_mut() {
                    for element in elements {
                        item.normalize(element);
                    }
                }
            }
            Self::Object(object) => object.normalize(value),
        }
    }

    /// Renders this schema as a JSON Schema fragment.
    #[must_use]
    pub fn to_json_schema(&self) -> Value {
        match self {
            Self::String => json!({ "type": "string" }),
            Self::Integer => json!({ "type": "integer" }),
            Self::Array(item) => json!({ "type": "array", "items": item.to_json_schema() }),
            Self::Object(object) => object.to_json_schema(),
        }
    }
}

impl From<ObjectSchema> for ArgSchema {
    fn from(object: ObjectSchema) -> Self {
        Self::Object(object)
    }
}

/// A declared field of an [`ObjectSchema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    /// Wire name of the field.
    pub name: &'static str,
    /// Schema the field's value must satisfy.
    pub schema: ArgSchema,
    /// Whether the field must be present and non-null.
    pub required: bool,
}

/// Schema for a JSON object. Undeclared keys are accepted and ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectSchema {
    fields: Vec<FieldDef>,
}

impl ObjectSchema {
    /// An object with no declared fields.
    #[must_use]
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Declares a required field.
    #[must_use]
    pub fn required(mut self, name: &'static str, schema: impl Into<ArgSchema>) -> Self {
        self.fields.push(FieldDef {
            name,
            schema: schema.into(),
            required: true,
        });
        self
    }

    /// Declares an optional field. `null` is treated the same as absent.
    #[must_use]
    pub fn optional(mut self, name: &'static str, schema: impl Into<ArgSchema>) -> Self {
        self.fields.push(FieldDef {
            name,
            schema: schema.into(),
            required: false,
        });
        self
    }

    /// Declared fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Validates `value` against this object schema.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        self.validate_at(value, &mut String::from("$"))
    }

    fn validate_at(&self, value: &Value, path: &mut String) -> Result<(), ValidationError> {
        let Some(map) = value.as_object() else {
            return Err(ValidationError::mismatch(path, "object", value));
        };
        for field in &self.fields {
            let len = path.len();
            path.push('.');
            path.push_str(field.name);
            match map.get(field.name) {
                None | Some(Value::Null) if field.required => {
                    return Err(ValidationError::MissingField { path: path.clone() });
                }
                None | Some(Value::Null) => {}
                Some(present) => field.schema.validate_at(present, path)?,
            }
            path.truncate(len);
        }
        Ok(())
    }

    /// Applies [`ArgSchema::normalize`] to every declared field present in `value`.
    pub fn normalize(&self, value: &mut Value) {
        let Some(map) = value.as_object_mut() else {
            return;
        };
        for field in &self.fields {
            if let Some(present) = map.get_mut(field.name) {
                field.schema.normalize(present);
            }
        }
    }

    /// Renders this schema as a JSON Schema object.
    #[must_use]
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for field in &self.fields {
            properties.insert(field.name.to_string(), field.schema.to_json_schema());
            if field.required {
                required.push(Value::String(field.name.to_string()));
            }
        }
        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

/// The first constraint a value failed to satisfy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing required field {path}")]
    MissingField { path: String },
    #[error("expected {expected} at {path}, received {received}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        received: &'static str,
    },
}

impl ValidationError {
    fn mismatch(path: &str, expected: &'static str, value: &Value) -> Self {
        Self::TypeMismatch {
            path: path.to_string(),
            expected,
            received: json_type_name(value),
        }
    }

    /// JSON-path-like location of the violation, rooted at `$`.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::MissingField { path } | Self::TypeMismatch { path, .. } => path,
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn whole_i64(value: &Value) -> Option<i64> {
    if let Some(int) = value.as_i64() {
        return Some(int);
    }
    // i64::MAX as f64 rounds up to 2^63, which is already out of range.
    value
        .as_f64()
        .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
        .map(|f| f as i64)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::json;

    use super::*;

    fn row_update_schema() -> ObjectSchema {
        ObjectSchema::new().required("tableId", ArgSchema::String).required(
            "newRow",
            ObjectSchema::new().required(
                "rows",
                ArgSchema::array(
                    ObjectSchema::new()
                        .required("row_id", ArgSchema::Integer)
                        .required(
                            "columns",
                            ArgSchema::array(
                                ObjectSchema::new()
                                    .required("column_id", ArgSchema::String)
                                    .required("update_cell_value", ArgSchema::String),
                            ),
                        ),
                ),
            ),
        )
    }

    #[test]
    fn accepts_conforming_nested_value() {
        let value = json!({
            "tableId": "t1",
            "newRow": { "rows": [
                { "row_id": 7, "columns": [{ "column_id": "c1", "update_cell_value": "x" }] }
            ]}
        });
        assert_eq!(row_update_schema().validate(&value), Ok(()));
    }

    #[test]
    fn reports_missing_top_level_field() {
        let err = row_update_schema()
            .validate(&json!({ "tableId": "t1" }))
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingField {
                path: "$.newRow".to_string()
            }
        );
    }

    #[test]
    fn null_counts_as_missing_for_required_fields() {
        let err = row_update_schema()
            .validate(&json!({ "tableId": null, "newRow": { "rows": [] } }))
            .unwrap_err();
        assert_eq!(err.path(), "$.tableId");
    }

    #[test]
    fn reports_first_violation_with_indexed_path() {
        let value = json!({
            "tableId": "t1",
            "newRow": { "rows": [
                { "row_id": 1, "columns": [] },
                { "row_id": 2, "columns": [{ "column_id": 3, "update_cell_value": 4 }] }
            ]}
        });
        let err = row_update_schema().validate(&value).unwrap_err();
        assert_eq!(
            err,
            ValidationError::TypeMismatch {
                path: "$.newRow.rows[1].columns[0].column_id".to_string(),
                expected: "string",
                received: "integer",
            }
        );
    }

    #[test]
    fn integer_accepts_whole_valued_floats_and_normalizes_them() {
        let schema = ObjectSchema::new().required("row_ids", ArgSchema::array(ArgSchema::Integer));
        let mut value = json!({ "row_ids": [1.0, 2, 1e2], "other": 1.0 });
        assert!(schema.validate(&value).is_ok());

        schema.normalize(&mut value);
        assert_eq!(value, json!({ "row_ids": [1, 2, 100], "other": 1.0 }));
        assert!(value["row_ids"][0].is_i64());
    }

    #[test]
    fn integer_rejects_out_of_range_floats() {
        let schema = ObjectSchema::new().required("id", ArgSchema::Integer);
        assert!(schema.validate(&json!({ "id": 1e19 })).is_err());
        assert!(schema.validate(&json!({ "id": -1e300 })).is_err());
    }

    #[test]
    fn integer_rejects_fractional_numbers() {
        let schema = ObjectSchema::new().required("ids", ArgSchema::array(ArgSchema::Integer));
        assert!(schema.validate(&json!({ "ids": [1, 2, -3] })).is_ok());
        let err = schema.validate(&json!({ "ids": [1, 2.5] })).unwrap_err();
        assert_eq!(err.path(), "$.ids[1]");
        assert_eq!(
            err.to_string(),
            "expected integer at $.ids[1], received number"
        );
    }

    #[test]
    fn non_object_root_is_a_type_mismatch() {
        let err = ObjectSchema::new().validate(&json!([])).unwrap_err();
        assert_eq!(
            err,
            ValidationError::TypeMismatch {
                path: "$".to_string(),
                expected: "object",
                received: "array",
            }
        );
    }

    #[test]
    fn unknown_keys_and_absent_optionals_are_accepted() {
        let schema = ObjectSchema::new()
            .required("name", ArgSchema::String)
            .optional("note", ArgSchema::String);
        assert!(schema.validate(&json!({ "name": "a", "extra": true })).is_ok());
        assert!(schema.validate(&json!({ "name": "a", "note": null })).is_ok());
        assert!(schema.validate(&json!({ "name": "a", "note": 1 })).is_err());
    }

    #[test]
    fn renders_json_schema() {
        let schema = ObjectSchema::new()
            .required("tableId", ArgSchema::String)
            .optional("row_ids", ArgSchema::array(ArgSchema::Integer));
        assert_eq!(
            schema.to_json_schema(),
            json!({
                "type": "object",
                "properties": {
                    "tableId": { "type": "string" },
                    "row_ids": { "type": "array", "items": { "type": "integer" } }
                },
                "required": ["tableId"]
            })
        );
    }

    const FIELD_NAMES: [&str; 4] = ["workspaceId", "name", "description", "color"];

    proptest! {
        #[test]
        fn dropping_any_required_field_is_reported(drop_index in 0usize..FIELD_NAMES.len(),
                                                   values in proptest::collection::vec("[a-z]{0,8}", 4)) {
            let schema = FIELD_NAMES
                .iter()
                .fold(ObjectSchema::new(), |schema, name| schema.required(*name, ArgSchema::String));

            let mut object = Map::new();
            for (name, value) in FIELD_NAMES.iter().zip(&values) {
                object.insert((*name).to_string(), Value::String(value.clone()));
            }
            prop_assert!(schema.validate(&Value::Object(object.clone())).is_ok());

            object.remove(FIELD_NAMES[drop_index]);
            let err = schema.validate(&Value::Object(object)).unwrap_err();
            prop_assert_eq!(err, ValidationError::MissingField {
                path: format!("$.{}", FIELD_NAMES[drop_index]),
            });
        }
    }
}
