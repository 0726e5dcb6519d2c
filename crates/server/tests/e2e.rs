use std::net::SocketAddr;

use axum::Router;
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use reqwest::StatusCode as HttpStatusCode;

use server::routes::{self, AppState};
use service::store::JsonStoreRepository;

struct TestApp {
    base_url: String,
}

fn cors() -> CorsLayer { CorsLayer::very_permissive() }

/// Boot the router on an ephemeral port with an isolated collection file.
async fn start_server() -> anyhow::Result<TestApp> {
    let temp_id = Uuid::new_v4();
    let data_path = format!("target/test-data/{}/stores.json", temp_id);
    let stores = JsonStoreRepository::open(&data_path).await?;
    let state = AppState { stores };

    let app: Router = routes::build_router(state, cors());
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url })
}

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

#[tokio::test]
async fn e2e_health() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client().get(format!("{}/health", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn e2e_create_get_delete_roundtrip() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    // Create with a partial field set
    let res = c
        .post(format!("{}/stores", app.base_url))
        .json(&json!({"name": "Acme", "city": "Springfield"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["message"], "New store added");
    let id = body["id"].as_str().expect("id is a string").to_string();

    // Read-after-write sees exactly the supplied fields
    let res = c.get(format!("{}/stores/{}", app.base_url, id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let store = res.json::<serde_json::Value>().await?;
    assert_eq!(store["name"], "Acme");
    assert_eq!(store["city"], "Springfield");
    assert!(store.get("street").is_none());

    // First delete succeeds
    let res = c.delete(format!("{}/stores/{}", app.base_url, id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["message"], "Store deleted successfully");

    // Second delete and any further lookup miss
    let res = c.delete(format!("{}/stores/{}", app.base_url, id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    let res = c.get(format!("{}/stores/{}", app.base_url, id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["message"], "Store not found");

    Ok(())
}

#[tokio::test]
async fn e2e_list_filtering() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    // Empty collection is a request-level failure, not an empty success
    let res = c.get(format!("{}/stores", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["message"], "No matching stores found");

    let owner = Uuid::new_v4();
    let res = c
        .post(format!("{}/stores", app.base_url))
        .json(&json!({"name": "Acme", "owner_id": owner}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let res = c
        .post(format!("{}/stores", app.base_url))
        .json(&json!({"name": "Globex"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);

    // No filters: everything, in insertion order
    let res = c.get(format!("{}/stores", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let list = res.json::<Vec<serde_json::Value>>().await?;
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["name"], "Acme");

    // Name filter is a case-insensitive substring match
    let res = c.get(format!("{}/stores?name=ACM", app.base_url)).send().await?;
    let list = res.json::<Vec<serde_json::Value>>().await?;
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["name"], "Acme");

    // Owner filter
    let res = c.get(format!("{}/stores?owner={}", app.base_url, owner)).send().await?;
    let list = res.json::<Vec<serde_json::Value>>().await?;
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["owner_id"], owner.to_string());

    // AND semantics: both filters must hit
    let res = c
        .get(format!("{}/stores?owner={}&name=globex", app.base_url, owner))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);

    // Malformed owner fails fast with the fixed message
    let res = c.get(format!("{}/stores?owner=not-an-id", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["message"], "Invalid owner_id format");

    Ok(())
}

#[tokio::test]
async fn e2e_partial_update() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    let res = c
        .post(format!("{}/stores", app.base_url))
        .json(&json!({
            "name": "Acme",
            "street": "742 Evergreen Terrace",
            "city": "Springfield",
            "email": "front@acme.example.com"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let id = res.json::<serde_json::Value>().await?["id"].as_str().unwrap().to_string();

    // PATCH changes only the supplied field
    let res = c
        .patch(format!("{}/stores/{}", app.base_url, id))
        .json(&json!({"city": "Shelbyville"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["message"], "Store updated successfully");
    assert_eq!(body["store"]["city"], "Shelbyville");
    assert_eq!(body["store"]["name"], "Acme");
    assert_eq!(body["store"]["street"], "742 Evergreen Terrace");
    assert_eq!(body["store"]["email"], "front@acme.example.com");

    // PUT takes the same partial-update path
    let res = c
        .put(format!("{}/stores/{}", app.base_url, id))
        .json(&json!({"phone_number": "555-0100"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let res = c.get(format!("{}/stores/{}", app.base_url, id)).send().await?;
    let store = res.json::<serde_json::Value>().await?;
    assert_eq!(store["city"], "Shelbyville");
    assert_eq!(store["phone_number"], "555-0100");
    assert_eq!(store["name"], "Acme");

    Ok(())
}

#[tokio::test]
async fn e2e_identifier_edge_cases() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    // Valid-but-absent id misses on every verb
    let ghost = Uuid::new_v4();
    let res = c.get(format!("{}/stores/{}", app.base_url, ghost)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    let res = c
        .put(format!("{}/stores/{}", app.base_url, ghost))
        .json(&json!({"city": "Nowhere"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    let res = c.delete(format!("{}/stores/{}", app.base_url, ghost)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);

    // Malformed ids collapse to not-found
    let res = c.get(format!("{}/stores/not-an-id", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["message"], "Store not found");

    // A blank id is a caller error
    let res = c.get(format!("{}/stores/%20", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["message"], "ID parameter is required");

    Ok(())
}

#[tokio::test]
async fn e2e_validation_and_body_shape() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    // Schema violations are client errors, not 500s
    let res = c
        .post(format!("{}/stores", app.base_url))
        .json(&json!({"name": "Acme", "email": "nobody"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["message"], "Failed to create store");
    assert!(body["error"].as_str().is_some());

    let res = c
        .post(format!("{}/stores", app.base_url))
        .json(&json!({"name": "Acme"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let id = res.json::<serde_json::Value>().await?["id"].as_str().unwrap().to_string();

    let res = c
        .patch(format!("{}/stores/{}", app.base_url, id))
        .json(&json!({"website": "ftp://acme.example"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["message"], "Failed to update store");

    // A rejected patch leaves the document unchanged
    let res = c.get(format!("{}/stores/{}", app.base_url, id)).send().await?;
    let store = res.json::<serde_json::Value>().await?;
    assert!(store.get("website").is_none());

    // Unknown body fields are rejected at deserialization
    let res = c
        .post(format!("{}/stores", app.base_url))
        .json(&json!({"name": "Acme", "rating": 5}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);

    Ok(())
}
