//! Boundary model for decoded event and submission payloads.
//!
//! Payloads are loosely shaped: every field is optional, some are nested
//! under `meta`, and types vary between producers. Everything is resolved
//! once here so the registry only ever sees typed values.

use serde_json::{Map, Value};

/// Fields nested under `meta`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventMeta {
    pub job_id: Option<String>,
    pub tool: Option<String>,
    /// Set when `meta.harvester_opts` carries a truthy value.
    pub harvester_opts: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventBody {
    pub job_id: Option<String>,
    pub meta: EventMeta,
    pub status: Option<String>,
    pub progress: Option<i64>,
    pub report: Option<String>,
    pub tool: Option<String>,
    pub opts_summary: Option<String>,
    pub tools: Vec<String>,
}

impl EventBody {
    /// Decodes a JSON document. Non-object documents decode to an empty body.
    pub fn decode(data: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(data)?;
        Ok(Self::from_value(&value))
    }

    pub fn from_value(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            return Self::default();
        };

        let meta = map
            .get("meta")
            .and_then(Value::as_object)
            .map(|meta| EventMeta {
                job_id: text_field(meta, "job_id"),
                tool: text_field(meta, "tool"),
                harvester_opts: meta.get("harvester_opts").is_some_and(is_truthy),
            })
            .unwrap_or_default();

        let tools = match map.get("tools") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|tool| !tool.is_empty())
                .map(ToOwned::to_owned)
                .collect(),
            _ => Vec::new(),
        };

        Self {
            job_id: text_field(map, "job_id"),
            meta,
            status: text_field(map, "status"),
            progress: map.get("progress").and_then(number_field),
            report: text_field(map, "report"),
            tool: text_field(map, "tool"),
            opts_summary: text_field(map, "opts_summary"),
            tools,
        }
    }

    /// Category tag, direct field first.
    pub fn category_tag(&self) -> Option<&str> {
        self.tool.as_deref().or(self.meta.tool.as_deref())
    }
}

/// Non-empty string, or a number rendered as text (ids are sometimes numeric).
fn text_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Integer progress, truncating fractions; numeric strings are accepted.
fn number_field(value: &Value) -> Option<i64> {
    let raw = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if raw.is_finite() {
        Some(raw.trunc() as i64)
    } else {
        None
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
