use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use tabprep::{
    api::{self, AppState},
    config::Config,
};

const BOUNDARY: &str = "tabprep-test-boundary";

fn app() -> Router {
    let config = Config::default();
    api::router(AppState::new(&config), config.max_upload_bytes)
}

fn multipart(filename: &str, content: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

fn post_json(uri: &str, payload: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn health_and_root() {
    let app = app();
    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));

    let (status, body) = send(&app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn operations_require_an_upload() {
    let app = app();
    let (status, body) = send(&app, get("/api/data/preview")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "no_dataset_loaded");

    let (status, body) = send(&app, post_json("/api/preprocess/reset", json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "no_dataset_loaded");
}

#[tokio::test]
async fn full_preprocessing_flow() {
    let app = app();
    let csv = b"age,income,color\n20,1000,red\n,3000,blue\n40,2000,red\n";

    let (status, body) = send(&app, multipart("people.csv", csv)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["rows"], 3);
    assert_eq!(body["filename"], "people.csv");
    assert_eq!(body["missing_values"]["age"], 1);
    assert_eq!(body["columns"][2], json!({ "name": "color", "kind": "categorical" }));

    let (status, body) = send(
        &app,
        post_json(
            "/api/preprocess/handle-missing",
            json!({ "columns": ["age"], "method": "mean" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["missing_values"]["age"], 0);
    assert_eq!(body["rows"], 3);

    let (status, body) = send(
        &app,
        post_json(
            "/api/preprocess/normalize",
            json!({ "columns": ["income"], "method": "minmax" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["sample_data"],
        json!([{ "income": 0.0 }, { "income": 1.0 }, { "income": 0.5 }])
    );

    let (status, body) = send(
        &app,
        post_json(
            "/api/preprocess/encode-categorical",
            json!({ "columns": ["color"], "method": "onehot" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["new_columns"],
        json!(["age", "income", "color_blue", "color_red"])
    );

    let (status, body) = send(
        &app,
        post_json("/api/preprocess/drop-columns", json!({ "columns": ["income"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["columns"], json!(["age", "color_blue", "color_red"]));

    let (status, body) = send(&app, get("/api/data/download")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["filename"], "preprocessed_people.csv");
    let content = STANDARD.decode(body["content"].as_str().unwrap()).unwrap();
    assert_eq!(
        String::from_utf8(content).unwrap(),
        "age,color_blue,color_red\n20,false,true\n30,true,false\n40,false,true\n"
    );

    let (status, body) = send(&app, post_json("/api/preprocess/reset", json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["columns"], json!(["age", "income", "color"]));
    assert_eq!(body["rows"], 3);

    let (status, body) = send(&app, get("/api/data/preview")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["missing_values"]["age"], 1);
    assert_eq!(body["sample_data"][1]["age"], Value::Null);
}

#[tokio::test]
async fn errors_map_to_status_codes() {
    let app = app();

    let (status, body) = send(&app, multipart("notes.txt", b"hello")).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(body["error"], "unsupported_format");

    let (status, body) = send(&app, multipart("broken.csv", b"a,b\n1\n")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "parse_error");

    let (status, _) = send(&app, multipart("ok.csv", b"color,color_red\nred,1\n")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        post_json(
            "/api/preprocess/normalize",
            json!({ "columns": ["color"], "method": "zscore" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_method");

    let (status, body) = send(
        &app,
        post_json(
            "/api/preprocess/normalize",
            json!({ "columns": ["color"], "method": "standard" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "non_numeric_column");

    let (status, body) = send(
        &app,
        post_json(
            "/api/preprocess/encode-categorical",
            json!({ "columns": ["color"], "method": "onehot" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "name_collision");

    let (status, body) = send(
        &app,
        post_json("/api/preprocess/drop-columns", json!({ "columns": ["missing"] })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Column 'missing' not found in the dataset.");
}

#[tokio::test]
async fn malformed_bodies_get_json_errors() {
    let app = app();
    let (status, _) = send(&app, multipart("a.csv", b"age\n1\n2\n")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        post_json("/api/preprocess/normalize", json!({ "columns": "age" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "invalid_request");
    assert!(body["message"].as_str().unwrap().contains("columns"));

    let request = Request::builder()
        .method("POST")
        .uri("/api/statistics")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_request");

    let request = Request::builder()
        .method("POST")
        .uri("/api/preprocess/drop-columns")
        .body(Body::from(r#"{"columns":["age"]}"#))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(body["error"], "invalid_request");

    let request = Request::builder()
        .method("POST")
        .uri("/api/upload")
        .body(Body::from("plain"))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_request");

    // отклоненные запросы не трогают загруженную таблицу
    let (status, body) = send(&app, get("/api/data/preview")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["columns"], json!(["age"]));
}

#[tokio::test]
async fn column_statistics_endpoint() {
    let app = app();
    let (status, _) = send(&app, multipart("n.csv", b"v\n1\n2\n2\n7\n")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, post_json("/api/statistics", json!({ "column": "v" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mean"], 3.0);
    assert_eq!(body["median"], 2.0);
    assert_eq!(body["mode"], json!([2.0]));
    assert_eq!(body["sample_data"], json!([1.0, 2.0, 2.0, 7.0]));
}
