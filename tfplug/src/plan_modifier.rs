//! Built-in plan modifiers
//!
//! Plan modifiers run during `PlanResourceChange` after defaults have been
//! applied and computed attributes have been marked unknown. They can:
//! - Modify the planned value
//! - Mark an attribute as requiring replacement
//! - Add warnings or errors to the plan

use crate::schema::{PlanModifier, PlanModifierRequest, PlanModifierResponse};
use crate::types::Dynamic;

/// Uses the prior state value when the planned value is unknown
///
/// Computed attributes that never change after creation (such as `id`) keep
/// their value across updates instead of showing `(known after apply)`.
pub struct UseStateForUnknown;

impl UseStateForUnknown {
    pub fn create() -> Box<dyn PlanModifier> {
        Box::new(Self)
    }
}

impl PlanModifier for UseStateForUnknown {
    fn description(&self) -> String {
        "once set, the value of this attribute in state will not change".to_string()
    }

    fn modify(&self, request: PlanModifierRequest) -> PlanModifierResponse {
        if !request.prior_state_exists
            || !request.plan_value.is_unknown()
            || request.state_value.is_null()
            || !request.config_value.is_null()
        {
            return PlanModifierResponse::unchanged(request);
        }

        PlanModifierResponse {
            plan_value: request.state_value,
            requires_replace: false,
            diagnostics: Vec::new(),
        }
    }
}

/// Marks the resource for replacement when this attribute changes
pub struct RequiresReplace;

impl RequiresReplace {
    pub fn create() -> Box<dyn PlanModifier> {
        Box::new(Self)
    }
}

impl PlanModifier for RequiresReplace {
    fn description(&self) -> String {
        "if the value of this attribute changes, Terraform will destroy and recreate the resource"
            .to_string()
    }

    fn modify(&self, request: PlanModifierRequest) -> PlanModifierResponse {
        let requires_replace = request.prior_state_exists
            && !matches!(request.plan_value, Dynamic::Null)
            && request.plan_value != request.state_value;

        PlanModifierResponse {
            plan_value: request.plan_value,
            requires_replace,
            diagnostics: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AttributePath;

    fn request(state: Dynamic, plan: Dynamic, config: Dynamic, exists: bool) -> PlanModifierRequest {
        PlanModifierRequest {
            config_value: config,
            state_value: state,
            plan_value: plan,
            path: AttributePath::new("field"),
            prior_state_exists: exists,
        }
    }

    fn s(v: &str) -> Dynamic {
        Dynamic::String(v.to_string())
    }

    #[test]
    fn use_state_for_unknown_copies_prior_value() {
        let response = UseStateForUnknown.modify(request(s("abc"), Dynamic::Unknown, Dynamic::Null, true));
        assert_eq!(response.plan_value, s("abc"));
        assert!(!response.requires_replace);
    }

    #[test]
    fn use_state_for_unknown_leaves_create_unknown() {
        let response =
            UseStateForUnknown.modify(request(Dynamic::Null, Dynamic::Unknown, Dynamic::Null, false));
        assert_eq!(response.plan_value, Dynamic::Unknown);
    }

    #[test]
    fn use_state_for_unknown_ignores_configured_values() {
        let response = UseStateForUnknown.modify(request(s("old"), Dynamic::Unknown, Dynamic::Unknown, true));
        assert_eq!(response.plan_value, Dynamic::Unknown);
    }

    #[test]
    fn requires_replace_on_change() {
        let response = RequiresReplace.modify(request(s("a"), s("b"), s("b"), true));
        assert!(response.requires_replace);
    }

    #[test]
    fn requires_replace_not_on_create_or_same_value() {
        assert!(!RequiresReplace.modify(request(Dynamic::Null, s("a"), s("a"), false)).requires_replace);
        assert!(!RequiresReplace.modify(request(s("a"), s("a"), s("a"), true)).requires_replace);
    }

    #[test]
    fn requires_replace_when_plan_becomes_unknown() {
        let response = RequiresReplace.modify(request(s("a"), Dynamic::Unknown, Dynamic::Unknown, true));
        assert!(response.requires_replace);
    }
}
