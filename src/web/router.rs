//! Web application router and middleware setup.

use crate::sensors::SensorContext;
use crate::web::handlers;
use axum::{
    http::{header, HeaderValue},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

/// Create the axum application: one catch-all route plus middleware.
pub fn create_app(sensors: SensorContext) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ));

    Router::new()
        .fallback(handlers::dispatch)
        .layer(middleware)
        .with_state(sensors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ExporterError, ParticulateError, Result};
    use crate::sensors::{
        EnvironmentalSensor, ParticulateSensor, PmFrame, ReadingsAssembler,
    };
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use std::time::Duration;
    use tower::ServiceExt;

    struct Steady;

    impl EnvironmentalSensor for Steady {
        fn temperature(&mut self) -> Result<f64> {
            Ok(19.0)
        }

        fn pressure(&mut self) -> Result<f64> {
            Ok(1001.5)
        }

        fn humidity(&mut self) -> Result<f64> {
            Ok(62.25)
        }
    }

    struct Dust {
        stalled: bool,
    }

    impl ParticulateSensor for Dust {
        fn read(&mut self) -> std::result::Result<PmFrame, ParticulateError> {
            if self.stalled {
                return Err(ParticulateError::Timeout(Duration::from_secs(5)));
            }
            Ok(PmFrame::new([2, 6, 11, 2, 6, 11, 0, 0, 0, 0, 0, 0, 0]))
        }

        fn reset(&mut self) -> std::result::Result<(), ParticulateError> {
            Ok(())
        }
    }

    fn app(stalled: bool) -> Router {
        let assembler = ReadingsAssembler::new(Box::new(Steady), Box::new(Dust { stalled }));
        create_app(SensorContext::new(assembler))
    }

    fn request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_get_returns_reading() {
        let response = app(false).oneshot(request("GET", "/")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 5);
        assert_eq!(json["temperature"], "19.00");
        assert_eq!(json["pressure"], "100150.00");
        assert_eq!(json["humidity"], "62.25");
        assert_eq!(json["P2"], "6");
        assert_eq!(json["P1"], "11");
    }

    #[tokio::test]
    async fn test_get_any_path() {
        let response = app(false)
            .oneshot(request("GET", "/some/other/path?x=1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_options_preflight() {
        let response = app(false)
            .oneshot(request("OPTIONS", "/anything"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "GET, POST");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "content-type");

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_other_methods_not_implemented() {
        for method in ["POST", "PUT", "DELETE", "HEAD"] {
            let response = app(false).oneshot(request(method, "/")).await.unwrap();
            assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED, "{}", method);
        }
    }

    #[tokio::test]
    async fn test_sensor_failure_returns_500() {
        let response = app(true).oneshot(request("GET", "/")).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json["error"].as_str().unwrap().contains("no start of frame"));
    }

    #[test]
    fn test_api_error_wraps_exporter_error() {
        let err = handlers::ApiError::from(ExporterError::environmental_error("gone"));
        let response = axum::response::IntoResponse::into_response(err);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
