//! Reusable checks for OpenAPI values.
//!
//! Each returns `None` when the value is acceptable, otherwise the message to
//! report.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};

static COMPONENT_KEY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9.\-_]+$").unwrap());

static MEDIA_TYPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\w+|\*)/([-+.\w]+|\*)$").unwrap());

static EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

/// `default`, a status code or a status code range
static RESPONSE_KEY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(default|[1-5][0-9][0-9]|[1-5]XX)$").unwrap());

static PATH_PARAMETER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{[^}]*\}").unwrap());

fn quoted(keys: &[&str]) -> String {
    keys.iter()
        .map(|key| format!("'{}'", key))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Absolute URIs and references relative to some base are both accepted.
pub fn url(value: &str) -> Option<String> {
    let invalid = || Some(format!("\"{}\" is not a valid URI", value));
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return invalid();
    }
    match url::Url::parse(value) {
        Ok(_) => None,
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let base = url::Url::parse("http://localhost/").ok()?;
            match base.join(value) {
                Ok(_) => None,
                Err(_) => invalid(),
            }
        }
        Err(_) => invalid(),
    }
}

pub fn email(value: &str) -> Option<String> {
    if EMAIL.is_match(value) {
        None
    } else {
        Some(format!("\"{}\" is not a valid email address", value))
    }
}

pub fn media_type(value: &str) -> Option<String> {
    if MEDIA_TYPE.is_match(value) {
        None
    } else {
        Some(format!("\"{}\" is not a valid media type", value))
    }
}

/// Keys of a components map (and of response links).
pub fn component_keys(map: &Map<String, Value>) -> Option<String> {
    let invalid: Vec<&str> = map
        .keys()
        .map(String::as_str)
        .filter(|key| !COMPONENT_KEY.is_match(key))
        .collect();
    if invalid.is_empty() {
        None
    } else {
        Some(format!("Contains invalid keys: {}", invalid.join(", ")))
    }
}

pub fn responses_keys(map: &Map<String, Value>) -> Option<String> {
    let invalid: Vec<&str> = map
        .keys()
        .map(String::as_str)
        .filter(|key| !RESPONSE_KEY.is_match(key))
        .collect();
    if invalid.is_empty() {
        None
    } else {
        Some(format!(
            "Invalid responses keys: {} - default, status codes and status code ranges allowed",
            quoted(&invalid)
        ))
    }
}

/// Path keys that don't start with a slash.
pub fn path_keys(map: &Map<String, Value>) -> Option<String> {
    let invalid: Vec<&str> = map
        .keys()
        .map(String::as_str)
        .filter(|key| !key.starts_with('/'))
        .collect();
    if invalid.is_empty() {
        None
    } else {
        Some(format!("There are invalid paths: {}", quoted(&invalid)))
    }
}

/// Templated paths that only differ by parameter names, such as
/// `/pets/{id}` and `/pets/{name}`.
pub fn conflicting_paths(map: &Map<String, Value>) -> Option<String> {
    let mut groups: HashMap<String, Vec<&str>> = HashMap::new();
    for key in map.keys() {
        if PATH_PARAMETER.is_match(key) {
            let normalised = PATH_PARAMETER.replace_all(key, "{}").into_owned();
            groups.entry(normalised).or_default().push(key.as_str());
        }
    }

    let conflicts: Vec<&str> = map
        .keys()
        .map(String::as_str)
        .filter(|key| {
            let normalised = PATH_PARAMETER.replace_all(key, "{}");
            groups.get(&*normalised).is_some_and(|group| group.len() > 1)
        })
        .collect();

    if conflicts.is_empty() {
        None
    } else {
        Some(format!("There are paths that conflict: {}", quoted(&conflicts)))
    }
}

/// Names of values that repeat an earlier identity, each named once, in the
/// order the repeats appear.
fn repeated<T: Eq + std::hash::Hash + Clone>(identities: impl Iterator<Item = T>) -> Vec<T> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut duplicates = Vec::new();
    for identity in identities {
        if !seen.insert(identity.clone()) && reported.insert(identity.clone()) {
            duplicates.push(identity);
        }
    }
    duplicates
}

/// Parameters are unique by the combination of `name` and `in`.
pub fn duplicate_parameters(parameters: &Value) -> Option<String> {
    let identities = parameters.as_array().into_iter().flatten().filter_map(|parameter| {
        let name = parameter.get("name")?.as_str()?;
        let location = parameter.get("in")?.as_str()?;
        Some((name, location))
    });
    let duplicates = repeated(identities);
    if duplicates.is_empty() {
        return None;
    }
    let names: Vec<String> = duplicates
        .iter()
        .map(|(name, location)| format!("{} in {}", name, location))
        .collect();
    Some(format!("Duplicate parameters: {}", names.join(", ")))
}

pub fn duplicate_tags(tags: &Value) -> Option<String> {
    let names = tags
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|tag| tag.get("name")?.as_str());
    let duplicates = repeated(names);
    if duplicates.is_empty() {
        None
    } else {
        Some(format!("Duplicate tag names: {}", duplicates.join(", ")))
    }
}

pub fn mutually_exclusive(map: &Map<String, Value>, first: &str, second: &str) -> Option<String> {
    let present = |key: &str| map.get(key).is_some_and(|value| !value.is_null());
    if present(first) && present(second) {
        Some(format!("{} and {} are mutually exclusive fields", first, second))
    } else {
        None
    }
}
