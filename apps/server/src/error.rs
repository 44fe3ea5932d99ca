//! Error types for the contacts server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Missing query parameter: {0}")]
    MissingParameter(&'static str),

    /// A `$where` script built from the request could not be parsed or
    /// evaluated.
    #[error("Query evaluation failed: {0}")]
    Evaluation(String),

    #[error("Store error: {0}")]
    Store(#[from] contactsdb_docstore::Error),
}

impl From<contactsdb_contacts::Error> for Error {
    fn from(err: contactsdb_contacts::Error) -> Self {
        use contactsdb_contacts::Error as ContactsError;

        if err.is_evaluation() {
            return Error::Evaluation(err.to_string());
        }
        match err {
            ContactsError::UnsupportedVariant { mode, variant } => Error::NotFound(format!(
                "/{}/{}/contacts/search",
                mode.as_str(),
                variant.slug()
            )),
            ContactsError::Store(e) => Error::Store(e),
        }
    }
}

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::MissingParameter(_) | Error::Evaluation(_) => StatusCode::BAD_REQUEST,
            Error::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Error::Store(_) => {
                tracing::error!("Internal error: {}", self);
                "Internal server error".to_string()
            }
            Error::Evaluation(_) => {
                tracing::warn!("{}", self);
                self.to_string()
            }
            _ => self.to_string(),
        };

        let body = Json(json!({
            "status": status.as_u16(),
            "error": status.canonical_reason().unwrap_or("Error"),
            "message": message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contactsdb_contacts::{QueryMode, QueryVariant};
    use contactsdb_docstore::{Collection, Predicate, WhereExprEngine};
    use std::sync::Arc;

    #[test]
    fn test_unsupported_variant_maps_to_not_found() {
        let err: Error = contactsdb_contacts::Error::UnsupportedVariant {
            mode: QueryMode::Insecure,
            variant: QueryVariant::BsonFilter,
        }
        .into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_evaluation_maps_to_bad_request() {
        let collection = Collection::new("contacts", Arc::new(WhereExprEngine));
        let parse_error = collection.find(&Predicate::script("\"")).unwrap_err();
        let err: Error = contactsdb_contacts::Error::Store(parse_error).into();
        assert!(matches!(err, Error::Evaluation(_)));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_store_errors_are_internal() {
        let err: Error =
            contactsdb_contacts::Error::Store(contactsdb_docstore::Error::NotRunning).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_store_error_details_are_hidden() {
        let response = Error::Store(contactsdb_docstore::Error::Poisoned).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["status"], 500);
        assert_eq!(body["message"], "Internal server error");
    }
}
