//! Normalized inventory objects
//!
//! Built-in and custom resources come back from the API in slightly
//! different shapes. [`ResolvedResource`] gives both a common surface.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::kube::ObjectTarget;

/// Metadata every resolved resource carries
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceMeta {
    pub name: String,
    pub namespace: Option<String>,
    /// Server uid, or `group/kind/namespace/name` when the payload has none
    pub uid: String,
    pub creation_timestamp: Option<DateTime<Utc>>,
}

/// A fetched inventory object
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedResource {
    pub kind: String,
    /// API group the object was resolved through (empty for core)
    pub api_name: String,
    /// Fetched through the built-in registry rather than CRD discovery
    pub builtin: bool,
    pub metadata: ResourceMeta,
    pub json_data: Value,
}

impl ResolvedResource {
    /// Wrap a built-in object; the payload is kept as returned
    pub fn from_builtin(raw: Value, kind: &str, group: &str, target: &ObjectTarget) -> Self {
        let kind = raw
            .get("kind")
            .and_then(|k| k.as_str())
            .filter(|k| !k.is_empty())
            .unwrap_or(kind)
            .to_string();
        let metadata = read_meta(&raw, &kind, group, target);

        Self {
            kind,
            api_name: group.to_string(),
            builtin: true,
            metadata,
            json_data: raw,
        }
    }

    /// Wrap a custom resource, filling in what the payload may omit
    ///
    /// `json_data` gets `kind`, `apiName` and metadata name/namespace set
    /// from the inventory id when the payload lacks them.
    pub fn from_custom(raw: Value, kind: &str, group: &str, target: &ObjectTarget) -> Self {
        let metadata = read_meta(&raw, kind, group, target);

        let mut json = match raw {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        json.insert("kind".to_string(), Value::String(kind.to_string()));
        json.insert("apiName".to_string(), Value::String(group.to_string()));

        let meta = json
            .entry("metadata")
            .or_insert_with(|| Value::Object(Map::new()));
        if !meta.is_object() {
            *meta = Value::Object(Map::new());
        }
        if let Value::Object(meta) = meta {
            meta.insert("name".to_string(), Value::String(metadata.name.clone()));
            if let Some(ns) = &metadata.namespace {
                meta.insert("namespace".to_string(), Value::String(ns.clone()));
            }
        }

        Self {
            kind: kind.to_string(),
            api_name: group.to_string(),
            builtin: false,
            metadata,
            json_data: Value::Object(json),
        }
    }

    pub fn uid(&self) -> &str {
        &self.metadata.uid
    }

    /// Kind as shown in tables: `json_data.kind`, falling back to `kind`
    pub fn display_kind(&self) -> &str {
        self.json_data
            .get("kind")
            .and_then(|k| k.as_str())
            .unwrap_or(&self.kind)
    }

    /// True when a `Ready` condition reports status `True`
    pub fn is_ready(&self) -> bool {
        is_ready(&self.json_data)
    }
}

/// True when `status.conditions` has `Ready=True`
pub fn is_ready(obj: &Value) -> bool {
    obj.get("status")
        .and_then(|s| s.get("conditions"))
        .and_then(|c| c.as_array())
        .is_some_and(|conditions| {
            conditions.iter().any(|c| {
                c.get("type").and_then(|t| t.as_str()) == Some("Ready")
                    && c.get("status").and_then(|s| s.as_str()) == Some("True")
            })
        })
}

/// Parse `metadata.creationTimestamp`
pub fn creation_timestamp(obj: &Value) -> Option<DateTime<Utc>> {
    obj.get("metadata")
        .and_then(|m| m.get("creationTimestamp"))
        .and_then(|t| t.as_str())
        .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
        .map(|t| t.with_timezone(&Utc))
}

fn read_meta(raw: &Value, kind: &str, group: &str, target: &ObjectTarget) -> ResourceMeta {
    let meta = raw.get("metadata");
    let field = |key: &str| {
        meta.and_then(|m| m.get(key))
            .and_then(|v| v.as_str())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    let name = field("name").unwrap_or_else(|| target.name.clone());
    let namespace = field("namespace").or_else(|| target.namespace.clone());
    let uid = field("uid").unwrap_or_else(|| {
        format!(
            "{}/{}/{}/{}",
            group,
            kind,
            namespace.as_deref().unwrap_or(""),
            name
        )
    });

    ResourceMeta {
        name,
        namespace,
        uid,
        creation_timestamp: creation_timestamp(raw),
    }
}
