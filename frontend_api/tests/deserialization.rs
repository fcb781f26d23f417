use chrono::{Datelike, Timelike};
use frontend_api::types::{ApiResponse, BaseEntity, ErrorResponse, PageResponse};
use serde::Deserialize;

#[derive(Deserialize, Debug)]
struct Widget {
    id: i64,
    name: String,
    #[serde(flatten)]
    audit: BaseEntity,
}

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

#[test]
fn deserialize_widget_page() {
    let json = load_fixture("widgets_page.json");
    let resp: ApiResponse<PageResponse<Widget>> = serde_json::from_str(&json).unwrap();
    assert!(resp.success);
    assert_eq!(resp.message.as_deref(), Some("OK"));

    let page = resp.data;
    assert_eq!(page.content.len(), 2);
    assert_eq!(page.total_elements, 12);
    assert_eq!(page.total_pages, 6);
    assert_eq!(page.size, 2);
    assert_eq!(page.number, 0);
    assert!(page.first);
    assert!(!page.last);
    assert!(page.check_invariants().is_ok());

    let sprocket = &page.content[0];
    assert_eq!(sprocket.id, 1);
    assert_eq!(sprocket.name, "Sprocket");
    assert_eq!(sprocket.audit.created_at().unwrap().hour(), 9);
    assert_eq!(sprocket.audit.updated_at().unwrap().day(), 3);

    let flange = &page.content[1];
    assert_eq!(flange.audit.created_at().unwrap().hour(), 2);
    assert!(flange.audit.updated_date.is_none());
}

#[test]
fn deserialize_empty_page_without_message() {
    let json = load_fixture("widgets_last_page.json");
    let resp: ApiResponse<PageResponse<Widget>> = serde_json::from_str(&json).unwrap();
    assert!(resp.message.is_none());
    let page = resp.into_result().unwrap();
    assert!(page.is_empty());
    assert!(!page.has_next());
    assert!(page.next_page_params().is_none());
    assert!(page.check_invariants().is_ok());
}

#[test]
fn deserialize_error_response() {
    let json = load_fixture("error.json");
    let err: ErrorResponse = serde_json::from_str(&json).unwrap();
    assert_eq!(err.message, "Widget not found");
    assert_eq!(err.status, 404);
    assert_eq!(err.path.as_deref(), Some("/api/widgets/99"));
    assert_eq!(err.parsed_timestamp().unwrap().month(), 2);
}

#[test]
fn deserialize_error_response_without_path() {
    let json = load_fixture("forbidden.json");
    let err: ErrorResponse = serde_json::from_str(&json).unwrap();
    assert_eq!(err.status, 403);
    assert!(err.path.is_none());
    assert!(err.parsed_timestamp().is_some());
}

#[test]
fn serialize_omits_absent_optionals() {
    let resp = ApiResponse {
        data: 1,
        message: None,
        success: true,
    };
    let json = serde_json::to_value(&resp).unwrap();
    assert!(json.get("message").is_none());

    let entity = BaseEntity::default();
    assert_eq!(serde_json::to_string(&entity).unwrap(), "{}");
}

#[test]
fn deserialize_missing_required_fields_returns_error() {
    let json = r#"{"content": [], "totalElements": 0}"#;
    let result = serde_json::from_str::<PageResponse<Widget>>(json);
    assert!(result.is_err());

    let json = r#"{"data": 1}"#;
    let result = serde_json::from_str::<ApiResponse<i32>>(json);
    assert!(result.is_err());
}
