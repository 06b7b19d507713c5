//! Conversions between API values and Terraform values
//!
//! The server omits attributes that have no value. Whether an omitted string
//! becomes null or `""` in state depends on what Terraform expects: a
//! configuration of `""` must read back as `""` or Terraform reports an
//! inconsistent result.

use std::collections::BTreeSet;
use tfplug::Value;

pub fn string_type_or_nil(value: Option<String>, use_empty_for_nil: bool) -> Value<String> {
    match value {
        Some(s) => Value::Known(s),
        None if use_empty_for_nil => Value::Known(String::new()),
        None => Value::Null,
    }
}

pub fn bool_type_or_nil(value: Option<bool>) -> Value<bool> {
    value.into()
}

pub fn int64_type_or_nil(value: Option<i64>) -> Value<i64> {
    value.into()
}

/// An omitted set reads as the empty set
pub fn string_set(values: Option<Vec<String>>) -> Value<BTreeSet<String>> {
    Value::Known(values.unwrap_or_default().into_iter().collect())
}

pub fn is_empty_string(value: &Value<String>) -> bool {
    matches!(value.known(), Some(s) if s.is_empty())
}

pub fn is_non_empty_string(value: &Value<String>) -> bool {
    matches!(value.known(), Some(s) if !s.is_empty())
}

/// Known, non-empty string for a request body
pub fn request_string(value: &Value<String>) -> Option<String> {
    if is_non_empty_string(value) {
        value.known().cloned()
    } else {
        None
    }
}

/// Known, non-empty set for a request body
pub fn request_string_set(value: &Value<BTreeSet<String>>) -> Option<Vec<String>> {
    value
        .known()
        .filter(|values| !values.is_empty())
        .map(|values| values.iter().cloned().collect())
}
