use actix_web::http::StatusCode;
use actix_web::web::Data;
use actix_web::{test, App};
use marmot::replication::Mode;
use marmot::server::{self, AppData};
use marmot::Store;
use serde_json::json;

fn node(mode: Mode, store: Store) -> Data<AppData> {
    Data::new(AppData::new(mode, store, None))
}

macro_rules! init_app {
    ($data:expr) => {
        test::init_service(
            App::new()
                .app_data($data)
                .app_data(server::json_config())
                .configure(server::routes),
        )
        .await
    };
}

#[actix_web::test]
async fn follower_rejects_client_writes() {
    let app = init_app!(node(Mode::Follower, Store::new()));

    let req = test::TestRequest::post()
        .uri("/set")
        .set_json(json!({"key": "a", "value": "1"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("Only leader accepts write requests"));
}

#[actix_web::test]
async fn leader_rejects_replication_requests() {
    let app = init_app!(node(Mode::Leader, Store::new()));

    let req = test::TestRequest::post()
        .uri("/replicate")
        .set_json(json!({"key": "a", "value": "1"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(
        body["error"],
        json!("Only followers accept replication requests")
    );
}

#[actix_web::test]
async fn get_of_absent_key_is_not_found() {
    let app = init_app!(node(Mode::Leader, Store::new()));

    let req = test::TestRequest::get().uri("/get?key=ghost").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("Key not found"));
}

#[actix_web::test]
async fn get_serves_local_values_in_all_forms() {
    let store = Store::new();
    store.put("key1".to_owned(), "value1".to_owned());
    let app = init_app!(node(Mode::Follower, store));

    for req in [
        test::TestRequest::get().uri("/get?key=key1").to_request(),
        test::TestRequest::post()
            .uri("/get")
            .set_json(json!({"key": "key1"}))
            .to_request(),
        test::TestRequest::get().uri("/get/key1").to_request(),
    ] {
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["key"], json!("key1"));
        assert_eq!(body["value"], json!("value1"));
        assert_eq!(body["node_type"], json!("follower"));
    }
}

#[actix_web::test]
async fn replicate_applies_the_write() {
    let store = Store::new();
    let app = init_app!(node(Mode::Follower, store.clone()));

    let req = test::TestRequest::post()
        .uri("/replicate")
        .set_json(json!({"key": "key1", "value": "value1"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"success": true}));
    assert_eq!(store.get("key1"), Some("value1".to_owned()));
}

#[actix_web::test]
async fn malformed_body_is_a_client_error() {
    let app = init_app!(node(Mode::Leader, Store::new()));

    // Missing the value field entirely.
    let req = test::TestRequest::post()
        .uri("/set")
        .set_json(json!({"key": "a"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(false));
}

#[actix_web::test]
async fn empty_key_is_a_client_error() {
    let app = init_app!(node(Mode::Follower, Store::new()));

    let req = test::TestRequest::post()
        .uri("/replicate")
        .set_json(json!({"key": "", "value": "1"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn health_reports_the_role() {
    let app = init_app!(node(Mode::Follower, Store::new()));

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"status": "healthy", "node_type": "follower"}));
}

#[actix_web::test]
async fn status_dumps_the_key_space() {
    let store = Store::new();
    store.put("key1".to_owned(), "value1".to_owned());
    store.put("key2".to_owned(), "value2".to_owned());
    let app = init_app!(node(Mode::Follower, store));

    let req = test::TestRequest::get().uri("/status").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["node_type"], json!("follower"));
    assert_eq!(body["key_count"], json!(2));
    assert_eq!(body["keys"]["key1"], json!("value1"));
    assert_eq!(body["keys"]["key2"], json!("value2"));
    // Followers have no quorum to report.
    assert_eq!(body["write_quorum"], json!(null));
}
