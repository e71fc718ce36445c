use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::MutationRequest;

/// Operation an item declares, also used as the label on its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperationKind {
    Create,
    Update,
    Upsert,
    Delete,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Upsert => "UPSERT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationKind {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "CREATE" => Ok(Self::Create),
            "UPDATE" => Ok(Self::Update),
            "UPSERT" => Ok(Self::Upsert),
            "DELETE" => Ok(Self::Delete),
            _ => Err(format!("unknown operation '{raw}'")),
        }
    }
}

/// One raw input item after per-item decoding.
///
/// Decoding happens item by item so that a single bad item is reported in its
/// own result slot instead of rejecting the whole request.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationItem {
    Parsed(MutationRequest),
    Malformed { id: Option<String>, reason: String },
}

impl MutationItem {
    pub fn from_json(value: Value) -> Self {
        if !value.is_object() {
            return Self::Malformed {
                id: None,
                reason: "item must be a JSON object".to_string(),
            };
        }
        let id = value.get("id").and_then(Value::as_str).map(str::to_string);
        match serde_json::from_value::<MutationRequest>(value) {
            Ok(request) => Self::Parsed(request),
            Err(err) => Self::Malformed {
                id,
                reason: format!("malformed item: {err}"),
            },
        }
    }

    /// Decodes one element of a delete body, which is a bare id string.
    pub fn delete_target(value: Value) -> Self {
        match value {
            Value::String(id) => Self::Parsed(MutationRequest::with_id(id)),
            other => Self::Malformed {
                id: None,
                reason: format!("id must be a string, got {other}"),
            },
        }
    }

    pub fn declared_id(&self) -> Option<&str> {
        match self {
            Self::Parsed(request) => request.id.as_deref(),
            Self::Malformed { id, .. } => id.as_deref(),
        }
    }
}

impl From<MutationRequest> for MutationItem {
    fn from(request: MutationRequest) -> Self {
        Self::Parsed(request)
    }
}

/// An item paired with the operation it should undergo.
#[derive(Debug, Clone, PartialEq)]
pub struct Mutation {
    pub kind: OperationKind,
    pub item: MutationItem,
}

impl Mutation {
    pub fn new(kind: OperationKind, item: impl Into<MutationItem>) -> Self {
        Self {
            kind,
            item: item.into(),
        }
    }

    pub fn create(item: impl Into<MutationItem>) -> Self {
        Self::new(OperationKind::Create, item)
    }

    pub fn update(item: impl Into<MutationItem>) -> Self {
        Self::new(OperationKind::Update, item)
    }

    pub fn upsert(item: impl Into<MutationItem>) -> Self {
        Self::new(OperationKind::Upsert, item)
    }

    pub fn delete(id: impl Into<String>) -> Self {
        Self::new(OperationKind::Delete, MutationRequest::with_id(id))
    }
}
