//! Attribute validators
//!
//! Validators run against configuration values during
//! `ValidateResourceConfig` / `ValidateDataResourceConfig`. Null and unknown
//! values are skipped; Terraform validates again once they are known.

use crate::schema::{Validator, ValidatorRequest, ValidatorResponse};
use crate::types::{Diagnostic, Dynamic};

/// Value must be one of a fixed list of strings
pub struct StringOneOf {
    allowed: Vec<String>,
}

impl StringOneOf {
    pub fn create(allowed: &[&str]) -> Box<dyn Validator> {
        Box::new(Self {
            allowed: allowed.iter().map(|s| s.to_string()).collect(),
        })
    }
}

impl Validator for StringOneOf {
    fn description(&self) -> String {
        format!("value must be one of: {}", self.allowed.join(", "))
    }

    // Sets of strings are checked element by element
    fn validate(&self, request: ValidatorRequest) -> ValidatorResponse {
        let mut response = ValidatorResponse::default();
        let candidates: Vec<&str> = match &request.config_value {
            Dynamic::String(s) => vec![s.as_str()],
            Dynamic::List(items) => items.iter().filter_map(Dynamic::as_str).collect(),
            _ => Vec::new(),
        };
        for s in candidates {
            if !self.allowed.iter().any(|a| a == s) {
                response.diagnostics.push(
                    Diagnostic::error(
                        "Invalid Attribute Value Match",
                        format!(
                            "Attribute {} value must be one of: [{}], got: \"{}\"",
                            request.path,
                            self.allowed
                                .iter()
                                .map(|a| format!("\"{}\"", a))
                                .collect::<Vec<_>>()
                                .join(" "),
                            s
                        ),
                    )
                    .with_attribute(request.path.clone()),
                );
            }
        }
        response
    }
}

pub struct StringLength {
    pub min: Option<usize>,
    pub max: Option<usize>,
}

impl StringLength {
    pub fn at_least(min: usize) -> Box<dyn Validator> {
        Box::new(Self {
            min: Some(min),
            max: None,
        })
    }

    pub fn between(min: usize, max: usize) -> Box<dyn Validator> {
        Box::new(Self {
            min: Some(min),
            max: Some(max),
        })
    }
}

impl Validator for StringLength {
    fn description(&self) -> String {
        match (self.min, self.max) {
            (Some(min), Some(max)) => format!("string length must be between {} and {}", min, max),
            (Some(min), None) => format!("string length must be at least {}", min),
            (None, Some(max)) => format!("string length must be at most {}", max),
            (None, None) => "any string length".to_string(),
        }
    }

    fn validate(&self, request: ValidatorRequest) -> ValidatorResponse {
        let mut response = ValidatorResponse::default();
        if let Dynamic::String(s) = &request.config_value {
            let len = s.chars().count();
            let too_short = self.min.is_some_and(|min| len < min);
            let too_long = self.max.is_some_and(|max| len > max);
            if too_short || too_long {
                response.diagnostics.push(
                    Diagnostic::error(
                        "Invalid Attribute Value Length",
                        format!(
                            "Attribute {} {}, got: {}",
                            request.path,
                            self.description(),
                            len
                        ),
                    )
                    .with_attribute(request.path),
                );
            }
        }
        response
    }
}

/// Value must match a regular expression
pub struct StringPattern {
    pub pattern: regex::Regex,
    pub message: String,
}

impl StringPattern {
    /// Panics on an invalid pattern; patterns are compile-time constants
    pub fn create(pattern: &str, message: &str) -> Box<dyn Validator> {
        #[allow(clippy::expect_used)]
        let pattern = regex::Regex::new(pattern).expect("validator pattern must compile");
        Box::new(Self {
            pattern,
            message: message.to_string(),
        })
    }
}

impl Validator for StringPattern {
    fn description(&self) -> String {
        self.message.clone()
    }

    fn validate(&self, request: ValidatorRequest) -> ValidatorResponse {
        let mut response = ValidatorResponse::default();
        if let Dynamic::String(s) = &request.config_value {
            if !self.pattern.is_match(s) {
                response.diagnostics.push(
                    Diagnostic::error(
                        "Invalid Attribute Value Match",
                        format!("Attribute {} {}, got: \"{}\"", request.path, self.message, s),
                    )
                    .with_attribute(request.path),
                );
            }
        }
        response
    }
}

pub struct Int64AtLeast {
    pub min: i64,
}

impl Int64AtLeast {
    pub fn create(min: i64) -> Box<dyn Validator> {
        Box::new(Self { min })
    }
}

impl Validator for Int64AtLeast {
    fn description(&self) -> String {
        format!("value must be at least {}", self.min)
    }

    fn validate(&self, request: ValidatorRequest) -> ValidatorResponse {
        let mut response = ValidatorResponse::default();
        if let Dynamic::Number(n) = &request.config_value {
            if *n < self.min as f64 {
                response.diagnostics.push(
                    Diagnostic::error(
                        "Invalid Attribute Value",
                        format!(
                            "Attribute {} value must be at least {}, got: {}",
                            request.path, self.min, n
                        ),
                    )
                    .with_attribute(request.path),
                );
            }
        }
        response
    }
}
