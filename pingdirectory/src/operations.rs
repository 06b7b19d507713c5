//! PATCH operation builders
//!
//! Each helper compares one attribute of the plan with the same attribute in
//! state and appends whatever operations reconcile the server with the plan.
//! Unknown plan values never produce operations: Terraform only knows the
//! value after apply, so whatever the server holds is kept.

use std::collections::BTreeSet;
use tfplug::Value;

use crate::api::{Operation, OperationKind};

/// `replace` with the new value, or `remove` when the plan is null or empty
pub fn add_string_operation_if_necessary(
    ops: &mut Vec<Operation>,
    plan: &Value<String>,
    state: &Value<String>,
    path: &str,
) {
    if plan.is_unknown() || plan == state {
        return;
    }
    match plan.known() {
        Some(value) if !value.is_empty() => {
            ops.push(Operation::new(OperationKind::Replace, path).with_value(value.as_str()));
        }
        _ => ops.push(Operation::new(OperationKind::Remove, path)),
    }
}

pub fn add_bool_operation_if_necessary(
    ops: &mut Vec<Operation>,
    plan: &Value<bool>,
    state: &Value<bool>,
    path: &str,
) {
    if plan.is_unknown() || plan == state {
        return;
    }
    match plan.known() {
        Some(value) => {
            ops.push(Operation::new(OperationKind::Replace, path).with_value(value.to_string()))
        }
        None => ops.push(Operation::new(OperationKind::Remove, path)),
    }
}

pub fn add_int64_operation_if_necessary(
    ops: &mut Vec<Operation>,
    plan: &Value<i64>,
    state: &Value<i64>,
    path: &str,
) {
    if plan.is_unknown() || plan == state {
        return;
    }
    match plan.known() {
        Some(value) => {
            ops.push(Operation::new(OperationKind::Replace, path).with_value(value.to_string()))
        }
        None => ops.push(Operation::new(OperationKind::Remove, path)),
    }
}

/// One `add` for values missing from state, one `remove` for values
/// missing from the plan. Null counts as the empty set.
pub fn add_string_set_operations_if_necessary(
    ops: &mut Vec<Operation>,
    plan: &Value<BTreeSet<String>>,
    state: &Value<BTreeSet<String>>,
    path: &str,
) {
    if plan.is_unknown() {
        return;
    }
    let empty = BTreeSet::new();
    let plan_values = plan.known().unwrap_or(&empty);
    let state_values = state.known().unwrap_or(&empty);

    let to_add: Vec<String> = plan_values.difference(state_values).cloned().collect();
    let to_remove: Vec<String> = state_values.difference(plan_values).cloned().collect();

    if !to_add.is_empty() {
        ops.push(Operation::new(OperationKind::Add, path).with_values(to_add));
    }
    if !to_remove.is_empty() {
        ops.push(Operation::new(OperationKind::Remove, path).with_values(to_remove));
    }
}

/// Debug-log the operations of an update request
pub fn log_update_operations(ops: &[Operation]) {
    match serde_json::to_string(ops) {
        Ok(json) => tracing::debug!(operations = %json, "Update request operations"),
        Err(e) => tracing::warn!("Failed to serialize update operations: {}", e),
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;

    fn s(v: &str) -> Value<String> {
        Value::Known(v.to_string())
    }

    fn set(values: &[&str]) -> Value<BTreeSet<String>> {
        Value::Known(values.iter().map(|v| v.to_string()).collect())
    }

    #[test]
    fn unchanged_string_produces_nothing() {
        let mut ops = Vec::new();
        add_string_operation_if_necessary(&mut ops, &s("a"), &s("a"), "description");
        add_string_operation_if_necessary(&mut ops, &Value::Null, &Value::Null, "description");
        assert!(ops.is_empty());
    }

    #[test]
    fn unknown_plan_produces_nothing() {
        let mut ops = Vec::new();
        add_string_operation_if_necessary(&mut ops, &Value::Unknown, &s("a"), "description");
        add_bool_operation_if_necessary(&mut ops, &Value::Unknown, &Value::Known(true), "enabled");
        add_int64_operation_if_necessary(
            &mut ops,
            &Value::Unknown,
            &Value::Known(1),
            "evaluationOrderIndex",
        );
        add_string_set_operations_if_necessary(
            &mut ops,
            &Value::Unknown,
            &set(&["x"]),
            "extensionArgument",
        );
        assert!(ops.is_empty());
    }

    #[test]
    fn changed_string_is_replaced() {
        let mut ops = Vec::new();
        add_string_operation_if_necessary(&mut ops, &s("new"), &s("old"), "description");
        assert_eq!(
            ops,
            vec![Operation::new(OperationKind::Replace, "description").with_value("new")]
        );
    }

    #[test]
    fn null_or_empty_string_is_removed() {
        let mut ops = Vec::new();
        add_string_operation_if_necessary(&mut ops, &Value::Null, &s("old"), "description");
        add_string_operation_if_necessary(&mut ops, &s(""), &s("old"), "jwksEndpointPath");
        assert_eq!(
            ops,
            vec![
                Operation::new(OperationKind::Remove, "description"),
                Operation::new(OperationKind::Remove, "jwksEndpointPath"),
            ]
        );
    }

    #[test]
    fn bool_and_int_values_travel_as_strings() {
        let mut ops = Vec::new();
        add_bool_operation_if_necessary(
            &mut ops,
            &Value::Known(false),
            &Value::Known(true),
            "enabled",
        );
        add_int64_operation_if_necessary(
            &mut ops,
            &Value::Known(42),
            &Value::Null,
            "evaluationOrderIndex",
        );
        add_int64_operation_if_necessary(
            &mut ops,
            &Value::Null,
            &Value::Known(7),
            "adjacentIntervalsToCheck",
        );

        let json = serde_json::to_value(&ops).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"op": "replace", "path": "enabled", "value": "false"},
                {"op": "replace", "path": "evaluationOrderIndex", "value": "42"},
                {"op": "remove", "path": "adjacentIntervalsToCheck"}
            ])
        );
    }

    #[test]
    fn sets_add_and_remove_differences() {
        let mut ops = Vec::new();
        add_string_set_operations_if_necessary(
            &mut ops,
            &set(&["ES256", "RS256"]),
            &set(&["HS256", "RS256"]),
            "allowedSigningAlgorithm",
        );
        assert_eq!(
            ops,
            vec![
                Operation::new(OperationKind::Add, "allowedSigningAlgorithm")
                    .with_values(vec!["ES256".to_string()]),
                Operation::new(OperationKind::Remove, "allowedSigningAlgorithm")
                    .with_values(vec!["HS256".to_string()]),
            ]
        );
    }

    #[test]
    fn null_set_is_empty_set() {
        let mut ops = Vec::new();
        add_string_set_operations_if_necessary(
            &mut ops,
            &Value::Null,
            &set(&[]),
            "extensionArgument",
        );
        assert!(ops.is_empty());

        add_string_set_operations_if_necessary(
            &mut ops,
            &Value::Null,
            &set(&["a=b"]),
            "extensionArgument",
        );
        assert_eq!(
            ops,
            vec![Operation::new(OperationKind::Remove, "extensionArgument")
                .with_values(vec!["a=b".to_string()])]
        );
    }
}
