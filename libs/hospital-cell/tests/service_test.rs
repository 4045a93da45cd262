use assert_matches::assert_matches;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hospital_cell::HospitalService;
use shared_models::AppError;
use shared_utils::test_utils::{MockPortalResponses, TestConfig};

#[tokio::test]
async fn fetches_hospital_catalog() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/hospitals/"))
        .and(header("Authorization", "Bearer test-api-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockPortalResponses::hospital_response(1, "Bir Hospital", Some("Kathmandu"), Some("Kathmandu"), Some("Bagmati Province")),
            MockPortalResponses::hospital_response(2, "Unlisted Clinic", None, None, None),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let service = HospitalService::new(&TestConfig::for_server(&server.uri()).to_app_config()).unwrap();
    let hospitals = service.get_hospitals().await.unwrap();

    assert_eq!(hospitals.len(), 2);
    assert_eq!(hospitals[0].hospital_unique_id.as_deref(), Some("HSP-0001"));
    assert!(!hospitals[1].has_location());
}

#[tokio::test]
async fn server_error_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/hospitals/"))
        .respond_with(ResponseTemplate::new(500).set_body_json(MockPortalResponses::error_response("database unavailable")))
        .mount(&server)
        .await;

    let service = HospitalService::new(&TestConfig::for_server(&server.uri()).to_app_config()).unwrap();
    let result = service.get_hospitals().await;

    assert_matches!(result, Err(AppError::ExternalService(msg)) if msg == "database unavailable");
}
