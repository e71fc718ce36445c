use serde::{Deserialize, Serialize};

use super::request::OperationKind;
use crate::core::MutationError;

pub const STATUS_OK: u16 = 200;
pub const STATUS_CREATED: u16 = 201;
pub const STATUS_STORE_FAILURE: u16 = 500;

/// Outcome of one input item, reported at the item's input position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationResult {
    pub id: Option<String>,
    pub operation: OperationKind,
    pub success: bool,
    pub error: Option<String>,
    pub status: u16,
}

impl OperationResult {
    pub fn succeeded(id: impl Into<String>, operation: OperationKind, status: u16) -> Self {
        Self {
            id: Some(id.into()),
            operation,
            success: true,
            error: None,
            status,
        }
    }

    pub fn failed(id: Option<String>, operation: OperationKind, err: &MutationError) -> Self {
        Self {
            id,
            operation,
            success: false,
            error: Some(err.to_string()),
            status: err.status_code(),
        }
    }

    /// Rewrites a result whose write was never confirmed by the store.
    pub fn demoted(self, message: &str) -> Self {
        Self {
            success: false,
            error: Some(message.to_string()),
            status: STATUS_STORE_FAILURE,
            ..self
        }
    }
}

/// A result tagged with whether the batch submission can still change it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    /// Success that depends on the shared batch write.
    Provisional(OperationResult),
    /// Final regardless of what the batch write does.
    Terminal(OperationResult),
}

impl ItemOutcome {
    pub fn is_provisional(&self) -> bool {
        matches!(self, Self::Provisional(_))
    }

    pub fn result(&self) -> &OperationResult {
        match self {
            Self::Provisional(result) | Self::Terminal(result) => result,
        }
    }

    pub fn into_result(self) -> OperationResult {
        match self {
            Self::Provisional(result) | Self::Terminal(result) => result,
        }
    }
}

/// Aggregated answer to one bulk request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResponse {
    pub has_errors: bool,
    pub total_operations: u64,
    pub successful_operations: u64,
    pub failed_operations: u64,
    pub processing_time_ms: u64,
    pub results: Vec<OperationResult>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn demotion_keeps_identity_and_label() {
        let demoted = OperationResult::succeeded("p-1", OperationKind::Update, STATUS_OK)
            .demoted("Store unavailable: timeout");

        assert_eq!(demoted.id.as_deref(), Some("p-1"));
        assert_eq!(demoted.operation, OperationKind::Update);
        assert!(!demoted.success);
        assert_eq!(demoted.status, 500);
        assert_eq!(demoted.error.as_deref(), Some("Store unavailable: timeout"));
    }

    #[test]
    fn failed_result_takes_status_from_error() {
        let result = OperationResult::failed(
            Some("missing".to_string()),
            OperationKind::Delete,
            &MutationError::not_found("Product not found"),
        );
        assert_eq!(result.status, 404);
        assert_eq!(result.error.as_deref(), Some("Product not found"));
    }

    #[test]
    fn batch_response_uses_camel_case_fields() {
        let response = BatchResponse {
            has_errors: false,
            total_operations: 1,
            successful_operations: 1,
            failed_operations: 0,
            processing_time_ms: 3,
            results: vec![OperationResult::succeeded("a", OperationKind::Create, STATUS_CREATED)],
        };

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "hasErrors": false,
                "totalOperations": 1,
                "successfulOperations": 1,
                "failedOperations": 0,
                "processingTimeMs": 3,
                "results": [
                    {"id": "a", "operation": "CREATE", "success": true, "error": null, "status": 201}
                ]
            })
        );
    }
}
