use std::time::Instant;

use super::result::{BatchResponse, OperationResult};

/// Summarizes the final, ordered results of one request.
pub fn aggregate(results: Vec<OperationResult>, started: Instant) -> BatchResponse {
    let total_operations = results.len() as u64;
    let successful_operations = results.iter().filter(|result| result.success).count() as u64;
    let failed_operations = total_operations - successful_operations;

    BatchResponse {
        has_errors: failed_operations > 0,
        total_operations,
        successful_operations,
        failed_operations,
        processing_time_ms: started.elapsed().as_millis() as u64,
        results,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bulk::request::OperationKind;
    use crate::core::MutationError;
    use std::time::Duration;

    #[test]
    fn counts_add_up_and_flag_errors() {
        let results = vec![
            OperationResult::succeeded("a", OperationKind::Create, 201),
            OperationResult::failed(None, OperationKind::Create, &MutationError::validation("bad")),
            OperationResult::succeeded("b", OperationKind::Create, 201),
        ];

        let response = aggregate(results, Instant::now());

        assert_eq!(response.total_operations, 3);
        assert_eq!(response.successful_operations, 2);
        assert_eq!(response.failed_operations, 1);
        assert!(response.has_errors);
        assert_eq!(response.results[1].status, 400);
    }

    #[test]
    fn empty_batch_has_no_errors() {
        let response = aggregate(Vec::new(), Instant::now());
        assert_eq!(response.total_operations, 0);
        assert!(!response.has_errors);
    }

    #[test]
    fn processing_time_is_measured_from_start() {
        let started = Instant::now();
        std::thread::sleep(Duration::from_millis(5));
        let response = aggregate(Vec::new(), started);
        assert!(response.processing_time_ms >= 5);
    }
}
