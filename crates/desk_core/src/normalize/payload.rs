use serde_json::Value;

use crate::error::{codes, AppError};

/// How a list endpoint may wrap its records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadShape {
    /// Wrapper keys probed in priority order.
    pub list_keys: &'static [&'static str],
    /// Fall back to the first top-level property holding an array.
    pub scan_for_array: bool,
    /// Treat an unmatched object as a single record.
    pub single_object: bool,
}

pub const INCIDENTS_SHAPE: PayloadShape = PayloadShape {
    list_keys: &["data", "incidents", "result", "results"],
    scan_for_array: true,
    single_object: false,
};

pub const AFFECTED_USERS_SHAPE: PayloadShape = PayloadShape {
    list_keys: &["users", "affected_users", "data"],
    scan_for_array: false,
    single_object: true,
};

/// Pull the record list out of a decoded body.
///
/// Contract:
/// - A direct array is returned as-is.
/// - Wrapper keys are probed in `shape.list_keys` order; the first array wins.
/// - With `scan_for_array`, the first array-valued property in document order is used.
/// - With `single_object`, an unmatched object becomes a one-element list and any non-object
///   body becomes an empty list.
/// - Otherwise a non-list body is a `PAYLOAD_SHAPE` error.
pub fn extract_records(body: Value, shape: &PayloadShape) -> Result<Vec<Value>, AppError> {
    let obj = match body {
        Value::Array(items) => return Ok(items),
        Value::Object(obj) => obj,
        other => {
            if shape.single_object {
                return Ok(Vec::new());
            }
            return Err(AppError::new(codes::PAYLOAD_SHAPE, "Unexpected payload structure")
                .with_details(format!("body_type={}", type_name(&other))));
        }
    };

    for key in shape.list_keys {
        if let Some(Value::Array(items)) = obj.get(*key) {
            return Ok(items.clone());
        }
    }

    if shape.scan_for_array {
        if let Some(items) = obj.values().find_map(|v| v.as_array()) {
            return Ok(items.clone());
        }
    }

    if shape.single_object {
        return Ok(vec![Value::Object(obj)]);
    }

    Err(
        AppError::new(codes::PAYLOAD_SHAPE, "Unexpected payload structure").with_details(format!(
            "keys={}",
            obj.keys().cloned().collect::<Vec<_>>().join(",")
        )),
    )
}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
