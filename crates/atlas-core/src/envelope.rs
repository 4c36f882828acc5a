// crates/atlas-core/src/envelope.rs

//! Compact JSON envelopes returned by every tool.
//!
//! ```json
//! {"success": true,  "tool": "country_info", "result": {...}}
//! {"success": false, "tool": "country_info", "error": "...", "suggestions": [...]}
//! ```

use crate::resolver::{ResolutionResult, Suggestion};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::fmt::Display;

pub fn success<T: Serialize + ?Sized>(tool: &str, result: &T) -> String {
    match serde_json::to_value(result) {
        Ok(value) => json!({ "success": true, "tool": tool, "result": value }).to_string(),
        Err(e) => failure(tool, format!("failed to encode result: {e}")),
    }
}

pub fn failure(tool: &str, error: impl Display) -> String {
    json!({ "success": false, "tool": tool, "error": error.to_string() }).to_string()
}

/// A failure that still gives the caller something to act on.
pub fn not_found(tool: &str, message: impl Display, suggestions: &[Suggestion]) -> String {
    let mut body = Map::new();
    body.insert("success".into(), Value::Bool(false));
    body.insert("tool".into(), Value::String(tool.to_owned()));
    body.insert("error".into(), Value::String(message.to_string()));
    if !suggestions.is_empty() {
        let list = suggestions
            .iter()
            .map(|s| {
                json!({
                    "code": s.record.code,
                    "name": s.record.name,
                    "similarity": round2(s.similarity),
                })
            })
            .collect();
        body.insert("suggestions".into(), Value::Array(list));
    }
    Value::Object(body).to_string()
}

/// Envelope for a resolution: `Found` is a success, `NotFound` a failure
/// carrying its suggestions.
pub fn resolution(tool: &str, query: &str, result: &ResolutionResult) -> String {
    match result {
        ResolutionResult::Found { record, match_method } => success(
            tool,
            &json!({
                "query": query,
                "code": record.code,
                "name": record.name,
                "match_method": match_method,
            }),
        ),
        ResolutionResult::NotFound { suggestions } => {
            not_found(tool, format!("no country matches '{query}'"), suggestions)
        }
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
