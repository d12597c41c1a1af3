//! Field rules checked on create and update, per entity.

use crate::error::AppError;
use crate::model::Record;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

/// Rule patterns are static, so each is compiled once per process.
static PATTERNS: OnceLock<Mutex<HashMap<&'static str, Regex>>> = OnceLock::new();

fn compiled(pattern: &'static str) -> Result<Regex, regex::Error> {
    let Ok(mut cache) = PATTERNS.get_or_init(Default::default).lock() else {
        return Regex::new(pattern);
    };
    if let Some(re) = cache.get(pattern) {
        return Ok(re.clone());
    }
    let re = Regex::new(pattern)?;
    cache.insert(pattern, re.clone());
    Ok(re)
}

#[derive(Clone, Debug, Default)]
pub struct ValidationRule {
    /// "email" is the only named format.
    pub format: Option<&'static str>,
    pub max_length: Option<usize>,
    pub pattern: Option<&'static str>,
    pub allowed: Option<&'static [&'static str]>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
}

pub struct RequestValidator;

impl RequestValidator {
    /// Check the fields present in `record`; absent and null fields pass (requiredness is the table's concern).
    pub fn validate(record: &Record, rules: &[(&str, ValidationRule)]) -> Result<(), AppError> {
        for (col, rule) in rules {
            if let Some(v) = record.get(*col) {
                validate_field(col, v, rule)?;
            }
        }
        Ok(())
    }
}

fn validate_field(col: &str, v: &Value, rule: &ValidationRule) -> Result<(), AppError> {
    if v.is_null() {
        return Ok(());
    }
    if let Some(format) = rule.format {
        validate_format(col, v, format)?;
    }
    if let (Some(max), Some(s)) = (rule.max_length, v.as_str()) {
        if s.chars().count() > max {
            return Err(AppError::Validation(format!("{} must be at most {} characters", col, max)));
        }
    }
    if let Some(pattern) = rule.pattern {
        let re = compiled(pattern).map_err(|_| AppError::Validation(format!("invalid pattern for {}", col)))?;
        if let Some(s) = v.as_str() {
            if !re.is_match(s) {
                return Err(AppError::Validation(format!("{} does not match required pattern", col)));
            }
        }
    }
    if let Some(allowed) = rule.allowed {
        let ok = v.as_str().map(|s| allowed.iter().any(|a| *a == s)).unwrap_or(false);
        if !ok {
            return Err(AppError::Validation(format!("{} must be one of: {}", col, allowed.join(", "))));
        }
    }
    if let Some(min) = rule.minimum {
        match v.as_f64() {
            Some(n) if n >= min => {}
            _ => return Err(AppError::Validation(format!("{} must be a number of at least {}", col, min))),
        }
    }
    if let Some(max) = rule.maximum {
        match v.as_f64() {
            Some(n) if n <= max => {}
            _ => return Err(AppError::Validation(format!("{} must be a number of at most {}", col, max))),
        }
    }
    Ok(())
}

fn validate_format(col: &str, v: &Value, format: &str) -> Result<(), AppError> {
    match format {
        "email" => {
            let ok = v
                .as_str()
                .and_then(|s| s.split_once('@'))
                .map(|(local, domain)| !local.is_empty() && domain.contains('.'))
                .unwrap_or(false);
            if !ok {
                return Err(AppError::Validation(format!("{} must be a valid email", col)));
            }
        }
        _ => {}
    }
    Ok(())
}
