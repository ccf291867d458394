//! Decoding of the catalog JSON document.
//!
//! Missing optional fields fall back to defaults. Records without a usable
//! `name`, or with a field of the wrong JSON type, are dropped and counted.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

use crate::{
    domain::{Catalog, Project, ProjectGroup, Repo},
    error::DecodeError,
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoadedCatalog {
    pub catalog: Catalog,
    /// Records dropped by validation.
    pub rejected: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
enum RecordError {
    #[error("missing or blank name")]
    MissingName,
    #[error("field '{0}' has the wrong type")]
    WrongType(&'static str),
    #[error("unparseable timestamp '{0}'")]
    BadTimestamp(String),
}

pub fn decode_catalog(bytes: &[u8]) -> Result<LoadedCatalog, DecodeError> {
    let root: Value = serde_json::from_slice(bytes)?;
    let Value::Array(entries) = root else {
        return Err(DecodeError::NotAnArray);
    };

    let mut objects = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        match entry {
            Value::Object(map) => objects.push(map),
            _ => return Err(DecodeError::NotAnObject { index }),
        }
    }

    let grouped = objects
        .first()
        .is_some_and(|first| first.contains_key("repos"));

    let mut rejected = 0;
    let catalog = if grouped {
        let mut groups = Vec::with_capacity(objects.len());
        for (index, map) in objects.into_iter().enumerate() {
            match decode_group(map, &mut rejected) {
                Ok(group) => groups.push(group),
                Err(err) => {
                    warn!(index, reason = %err, "rejected project group");
                    rejected += 1;
                }
            }
        }
        Catalog::Grouped(groups)
    } else {
        let mut projects = Vec::with_capacity(objects.len());
        for (index, map) in objects.into_iter().enumerate() {
            match decode_project(map) {
                Ok(project) => projects.push(project),
                Err(err) => {
                    warn!(index, reason = %err, "rejected project record");
                    rejected += 1;
                }
            }
        }
        Catalog::Flat(projects)
    };

    Ok(LoadedCatalog { catalog, rejected })
}

fn decode_project(map: &Map<String, Value>) -> Result<Project, RecordError> {
    Ok(Project {
        name: required_name(map)?,
        description: string_field(map, "description")?,
        category: string_field(map, "category")?,
        technology: string_field(map, "technology")?,
        github_url: string_field(map, "githubUrl")?,
        is_private: bool_field(map, "isPrivate")?,
        status: string_field(map, "status")?,
        last_updated: timestamp_field(map, "lastUpdated")?,
        priority: integer_field(map, "priority")?,
    })
}

fn decode_repo(map: &Map<String, Value>) -> Result<Repo, RecordError> {
    Ok(Repo {
        name: required_name(map)?,
        description: string_field(map, "description")?,
        technology: string_field(map, "technology")?,
        github_url: string_field(map, "githubUrl")?,
        is_private: bool_field(map, "isPrivate")?,
    })
}

fn decode_group(
    map: &Map<String, Value>,
    rejected: &mut usize,
) -> Result<ProjectGroup, RecordError> {
    let name = required_name(map)?;
    let description = string_field(map, "description")?;

    let repos = match map.get("repos") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(entries)) => {
            let mut repos = Vec::with_capacity(entries.len());
            for (index, entry) in entries.iter().enumerate() {
                let decoded = match entry {
                    Value::Object(repo) => decode_repo(repo),
                    _ => Err(RecordError::WrongType("repos")),
                };
                match decoded {
                    Ok(repo) => repos.push(repo),
                    Err(err) => {
                        warn!(group = %name, index, reason = %err, "rejected repo record");
                        *rejected += 1;
                    }
                }
            }
            repos
        }
        Some(_) => return Err(RecordError::WrongType("repos")),
    };

    Ok(ProjectGroup {
        name,
        description,
        repos,
    })
}

fn required_name(map: &Map<String, Value>) -> Result<String, RecordError> {
    match map.get("name") {
        Some(Value::String(name)) if !name.trim().is_empty() => Ok(name.clone()),
        _ => Err(RecordError::MissingName),
    }
}

fn string_field(map: &Map<String, Value>, key: &'static str) -> Result<String, RecordError> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(value)) => Ok(value.clone()),
        Some(_) => Err(RecordError::WrongType(key)),
    }
}

fn bool_field(map: &Map<String, Value>, key: &'static str) -> Result<bool, RecordError> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(value)) => Ok(*value),
        Some(_) => Err(RecordError::WrongType(key)),
    }
}

fn integer_field(map: &Map<String, Value>, key: &'static str) -> Result<Option<i64>, RecordError> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(number)) => {
            if let Some(value) = number.as_i64() {
                return Ok(Some(value));
            }
            // Whole floats only, and only inside the i64 range.
            match number.as_f64() {
                Some(value)
                    if value.fract() == 0.0
                        && value >= i64::MIN as f64
                        && value < i64::MAX as f64 =>
                {
                    Ok(Some(value as i64))
                }
                _ => Err(RecordError::WrongType(key)),
            }
        }
        Some(_) => Err(RecordError::WrongType(key)),
    }
}

fn timestamp_field(
    map: &Map<String, Value>,
    key: &'static str,
) -> Result<Option<DateTime<Utc>>, RecordError> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(raw)) if raw.trim().is_empty() => Ok(None),
        Some(Value::String(raw)) => parse_timestamp(raw)
            .map(Some)
            .ok_or_else(|| RecordError::BadTimestamp(raw.clone())),
        Some(_) => Err(RecordError::WrongType(key)),
    }
}

/// Accepts RFC 3339, a zone-less ISO date-time (read as UTC), or a bare
/// calendar date (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(parsed.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
