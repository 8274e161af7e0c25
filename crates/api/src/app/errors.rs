use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use chrono::{SecondsFormat, Utc};
use serde_json::json;

use stockwise_core::DomainError;
use stockwise_infra::ServiceError;

/// Map an orchestrator failure onto the uniform error body.
pub fn service_error_to_response(uri: &Uri, err: ServiceError) -> Response {
    let status = match &err {
        ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
        ServiceError::Communication { .. } => StatusCode::BAD_GATEWAY,
        ServiceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };
    json_error(uri, status, err.message())
}

/// Input rejected before reaching a service (bad path id, bad query value).
pub fn domain_error_to_response(uri: &Uri, err: DomainError) -> Response {
    json_error(uri, StatusCode::BAD_REQUEST, err.message())
}

pub fn json_error(uri: &Uri, status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            "status": status.as_u16(),
            "error": status.canonical_reason().unwrap_or("Error"),
            "message": message.into(),
            "path": uri.path(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use stockwise_core::ProductId;
    use stockwise_infra::RemoteFailure;

    async fn body(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn error_body_shape() {
        let uri: Uri = "/api/productos/5?x=1".parse().unwrap();
        let response =
            service_error_to_response(&uri, ServiceError::product_not_found(ProductId::new(5)));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let json = body(response).await;
        assert_eq!(json["status"], 404);
        assert_eq!(json["error"], "Not Found");
        assert_eq!(json["message"], "product not found with id: 5");
        assert_eq!(json["path"], "/api/productos/5");
        assert!(json["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[tokio::test]
    async fn status_mapping() {
        let uri: Uri = "/api/x".parse().unwrap();
        let cases = [
            (ServiceError::Validation("bad".into()), 400, "Bad Request"),
            (
                ServiceError::Communication {
                    operation: "products.list",
                    source: RemoteFailure::unavailable("products.list", "refused"),
                },
                502,
                "Bad Gateway",
            ),
            (
                ServiceError::Internal {
                    operation: "products.list",
                    detail: "boom".into(),
                },
                500,
                "Internal Server Error",
            ),
        ];
        for (err, status, reason) in cases {
            let json = body(service_error_to_response(&uri, err)).await;
            assert_eq!(json["status"], status);
            assert_eq!(json["error"], reason);
        }
    }

    #[tokio::test]
    async fn remote_detail_stays_out_of_the_body() {
        let uri: Uri = "/api/x".parse().unwrap();
        let err = ServiceError::Communication {
            operation: "products.list",
            source: RemoteFailure::unavailable("products.list", "secret-host:5432 refused"),
        };
        let json = body(service_error_to_response(&uri, err)).await;
        assert_eq!(json["message"], "error communicating with the data service");
    }
}
