use std::path::PathBuf;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use migration::MigratorTrait;
use tower::ServiceExt;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use server::routes::{self, ServerState};

const BOUNDARY: &str = "x-food-journal-test-boundary";

async fn test_app() -> anyhow::Result<(Router, ServerState)> {
    let db = models::db::connect_to("sqlite::memory:").await?;
    migration::Migrator::up(&db, None).await?;
    let uploads_dir = PathBuf::from("target")
        .join("test-data")
        .join(Uuid::new_v4().to_string());
    std::fs::create_dir_all(&uploads_dir)?;
    let state = ServerState { db, uploads_dir };
    let app = routes::build_router(CorsLayer::very_permissive(), state.clone());
    Ok((app, state))
}

fn text_part(name: &str, value: &str) -> String {
    format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
    )
}

fn file_part(name: &str, filename: &str, bytes: &[u8]) -> String {
    let mut part = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
    );
    part.push_str(std::str::from_utf8(bytes).expect("test bytes are utf8"));
    part.push_str("\r\n");
    part
}

fn multipart_request(uri: &str, parts: &[String]) -> Request<Body> {
    let mut body = parts.concat();
    body.push_str(&format!("--{BOUNDARY}--\r\n"));
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("request")
}

async fn body_json(res: axum::response::Response) -> anyhow::Result<serde_json::Value> {
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[tokio::test]
async fn health_is_ok() -> anyhow::Result<()> {
    let (app, _) = test_app().await?;
    let res = app
        .oneshot(Request::builder().uri("/health").body(Body::empty())?)
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await?;
    assert_eq!(json["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn entry_crud_flow() -> anyhow::Result<()> {
    let (app, state) = test_app().await?;

    // create with one embedded image and one plain upload
    let description = format!(
        r#"<p>Warm bowl</p><img src="data:image/png;base64,{}"><b>x</b><script>no</script>"#,
        STANDARD.encode(b"embedded-bytes")
    );
    let req = multipart_request(
        "/api/entries",
        &[
            text_part("title", "Soto Betawi"),
            text_part("description", &description),
            text_part("food_type", "lunch"),
            file_part("images", "side dish.jpg", b"upload-bytes"),
        ],
    );
    let res = app.clone().oneshot(req).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let created = body_json(res).await?;
    let id = created["id"].as_i64().expect("entry id");
    let stored = created["description"].as_str().unwrap();
    assert!(stored.contains("/uploads/"));
    assert!(!stored.contains("base64"));
    assert!(!stored.contains("script"));

    // list contains it
    let res = app
        .clone()
        .oneshot(Request::builder().uri("/api/entries").body(Body::empty())?)
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let listed = body_json(res).await?;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    // image-listing API: embedded + upload
    let res = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/entries/{id}/images"))
                .body(Body::empty())?,
        )
        .await?;
    let images = body_json(res).await?;
    let images = images.as_array().unwrap();
    assert_eq!(images.len(), 2);
    for img in images {
        let filename = img["filename"].as_str().unwrap();
        assert!(state.uploads_dir.join(filename).is_file());
    }

    // view
    let res = app
        .clone()
        .oneshot(Request::builder().uri(format!("/api/entries/{id}")).body(Body::empty())?)
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    // edit sanitizes
    let res = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/api/entries/{id}"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "title": "Soto Betawi (edited)",
                        "description": "<p>better</p><iframe></iframe>"
                    })
                    .to_string(),
                ))?,
        )
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let updated = body_json(res).await?;
    assert_eq!(updated["title"], "Soto Betawi (edited)");
    assert!(!updated["description"].as_str().unwrap().contains("iframe"));

    // delete removes row and files
    let res = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/entries/{id}"))
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = app
        .clone()
        .oneshot(Request::builder().uri(format!("/api/entries/{id}")).body(Body::empty())?)
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // second delete reports missing
    let res = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/entries/{id}"))
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn create_rejects_missing_title() -> anyhow::Result<()> {
    let (app, _) = test_app().await?;
    let req = multipart_request(
        "/api/entries",
        &[
            text_part("description", "<p>no title</p>"),
            text_part("food_type", "snack"),
        ],
    );
    let res = app.oneshot(req).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn stats_and_export() -> anyhow::Result<()> {
    let (app, _) = test_app().await?;

    for (title, food_type) in [("a", "dinner"), ("b", "dinner"), ("c", "snack")] {
        let req = multipart_request(
            "/api/entries",
            &[
                text_part("title", title),
                text_part("description", "<p>x</p>"),
                text_part("food_type", food_type),
            ],
        );
        let res = app.clone().oneshot(req).await?;
        assert_eq!(res.status(), StatusCode::OK);
    }

    let res = app
        .clone()
        .oneshot(Request::builder().uri("/api/stats").body(Body::empty())?)
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let stats = body_json(res).await?;
    assert_eq!(stats["dinner"], 2);
    assert_eq!(stats["snack"], 1);

    let res = app
        .oneshot(Request::builder().uri("/export").body(Body::empty())?)
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/csv; charset=utf-8"
    );
    assert!(res
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()?
        .contains("export.csv"));
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await?;
    let text = String::from_utf8(bytes.to_vec())?;
    assert!(text.starts_with("ID,Title,Description,Type,Timestamp"));
    assert_eq!(text.trim().lines().count(), 4);
    Ok(())
}

#[tokio::test]
async fn cleanup_endpoint_reports_removals() -> anyhow::Result<()> {
    let (app, state) = test_app().await?;

    let req = multipart_request(
        "/api/entries",
        &[
            text_part("title", "Teh manis"),
            text_part("description", "<p>just tea</p>"),
            text_part("food_type", "drink"),
            file_part("images", "unreferenced.png", b"bytes"),
        ],
    );
    let res = app.clone().oneshot(req).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let created = body_json(res).await?;
    let id = created["id"].as_i64().unwrap();

    // upload is recorded but never referenced by the description
    assert!(state.uploads_dir.join("unreferenced.png").is_file());

    let res = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/admin/cleanup")
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let report = body_json(res).await?;
    assert_eq!(report["removed_records"], 1);
    assert_eq!(report["removed_files"], 1);
    assert!(!state.uploads_dir.join("unreferenced.png").exists());

    let res = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/entries/{id}/images"))
                .body(Body::empty())?,
        )
        .await?;
    let images = body_json(res).await?;
    assert!(images.as_array().unwrap().is_empty());
    Ok(())
}
