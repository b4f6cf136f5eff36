use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PayrollError {
    /// Malformed or missing request fields.
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// A payroll row pointed at an employee that does not exist.
    #[error("{0}")]
    Referential(String),

    /// The storage layer contradicted itself (e.g. an upserted row could not be read back).
    #[error("integrity failure: {0}")]
    Integrity(String),

    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("database error: {0}")]
    Database(String),
}

pub type PayrollResult<T> = Result<T, PayrollError>;

impl From<sqlx::Error> for PayrollError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::WorkerCrashed => PayrollError::StorageUnavailable(e.to_string()),
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                PayrollError::Referential(db_err.message().to_string())
            }
            _ => PayrollError::Database(e.to_string()),
        }
    }
}

impl ResponseError for PayrollError {
    fn status_code(&self) -> StatusCode {
        match self {
            PayrollError::Validation(_) => StatusCode::BAD_REQUEST,
            PayrollError::NotFound(_) | PayrollError::Referential(_) => StatusCode::NOT_FOUND,
            PayrollError::Integrity(_)
            | PayrollError::StorageUnavailable(_)
            | PayrollError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

impl PayrollError {
    /// Response used by write endpoints: 500s carry a fixed summary in `error`
    /// and the underlying message in `details`.
    pub fn with_details(&self, summary: &str) -> HttpResponse {
        let status = self.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            HttpResponse::build(status).json(json!({
                "error": summary,
                "details": self.to_string()
            }))
        } else {
            self.error_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_bad_request() {
        let err = PayrollError::Validation("IdEmpleado es requerido".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "IdEmpleado es requerido");
    }

    #[test]
    fn missing_and_dangling_references_map_to_not_found() {
        assert_eq!(
            PayrollError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            PayrollError::Referential("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn storage_failures_map_to_internal_error() {
        for err in [
            PayrollError::Integrity("x".into()),
            PayrollError::StorageUnavailable("x".into()),
            PayrollError::Database("x".into()),
        ] {
            assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn pool_timeout_is_storage_unavailable() {
        let err: PayrollError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, PayrollError::StorageUnavailable(_)));
    }

    #[test]
    fn row_not_found_is_a_database_error() {
        let err: PayrollError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, PayrollError::Database(_)));
    }

    #[test]
    fn details_only_added_to_internal_errors() {
        let resp = PayrollError::Database("boom".into()).with_details("Error al guardar nómina");
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let resp = PayrollError::NotFound("nope".into()).with_details("Error al guardar nómina");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
