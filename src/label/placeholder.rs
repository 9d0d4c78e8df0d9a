//! `{{ field }}` template substitution

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::collections::HashMap;

lazy_static! {
    static ref PLACEHOLDER: Regex = Regex::new(r"\{\{\s*([A-Za-z0-9_.\-]+)\s*\}\}").unwrap();
}

/// Result of substituting one template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub text: String,
    /// Fields referenced by the template that had no value, in order of first use
    pub unresolved: Vec<String>,
}

/// Distinct field names referenced by `template`, in order of first use
pub fn placeholders(template: &str) -> Vec<String> {
    let mut fields: Vec<String> = Vec::new();
    for caps in PLACEHOLDER.captures_iter(template) {
        let field = &caps[1];
        if !fields.iter().any(|f| f == field) {
            fields.push(field.to_string());
        }
    }
    fields
}

pub fn has_placeholders(template: &str) -> bool {
    PLACEHOLDER.is_match(template)
}

/// Replace known fields; unknown placeholders stay verbatim
pub fn substitute(template: &str, values: &HashMap<String, String>) -> Substitution {
    let mut unresolved: Vec<String> = Vec::new();

    let text = PLACEHOLDER.replace_all(template, |caps: &Captures<'_>| match values.get(&caps[1]) {
        Some(value) => value.clone(),
        None => {
            if !unresolved.iter().any(|f| f == &caps[1]) {
                unresolved.push(caps[1].to_string());
            }
            caps[0].to_string()
        }
    });

    Substitution {
        text: text.into_owned(),
        unresolved,
    }
}
