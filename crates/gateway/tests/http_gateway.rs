use std::net::SocketAddr;
use std::sync::Arc;

use configs::{GatewayConfig, ServerConfig};
use models::ObjectId;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use service::employee::repository::mock::MockEmployeeStore;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

struct TestApp {
    base_url: String,
    store: Arc<MockEmployeeStore>,
    _stop: Vec<oneshot::Sender<()>>,
}

fn shutdown_on(rx: oneshot::Receiver<()>) -> impl std::future::Future<Output = ()> + Send + 'static {
    async move {
        let _ = rx.await;
    }
}

async fn start_with(store: Arc<MockEmployeeStore>) -> anyhow::Result<TestApp> {
    // gRPC backend on an ephemeral port
    let grpc_listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let grpc_addr: SocketAddr = grpc_listener.local_addr()?;
    let (grpc_stop, grpc_stopped) = oneshot::channel();
    let backend = Arc::clone(&store);
    tokio::spawn(async move {
        let cfg = ServerConfig::default();
        if let Err(e) = server::startup::serve(grpc_listener, backend, &cfg, shutdown_on(grpc_stopped)).await {
            eprintln!("grpc server error: {}", e);
        }
    });

    // Gateway in front of it
    let cfg = GatewayConfig { grpc_endpoint: format!("http://{}", grpc_addr), ..GatewayConfig::default() };
    let router = gateway::bootstrap::router(&cfg)?;
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let (http_stop, http_stopped) = oneshot::channel();
    tokio::spawn(async move {
        if let Err(e) = gateway::bootstrap::serve(listener, router, shutdown_on(http_stopped)).await {
            eprintln!("gateway error: {}", e);
        }
    });

    Ok(TestApp {
        base_url: format!("http://{}:{}", addr.ip(), addr.port()),
        store,
        _stop: vec![grpc_stop, http_stop],
    })
}

async fn start() -> anyhow::Result<TestApp> {
    start_with(Arc::new(MockEmployeeStore::default())).await
}

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

fn jane_doe() -> Value {
    json!({
        "first_name": "Jane",
        "last_name": "Doe",
        "email": "jane.doe@example.com",
        "position": "Software Engineer",
        "department": "Engineering"
    })
}

#[tokio::test]
async fn health_is_ok() -> anyhow::Result<()> {
    let app = start().await?;
    let res = client().get(format!("{}/health", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn jane_doe_scenario_over_http() -> anyhow::Result<()> {
    let app = start().await?;
    let c = client();

    // Create
    let res = c.post(format!("{}/v1/employees", app.base_url)).json(&jane_doe()).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let created = res.json::<Value>().await?;
    let id = created["employee"]["id"].as_str().unwrap_or_default().to_string();
    assert_eq!(id.len(), 24);
    assert_eq!(created["employee"]["last_name"], "Doe");

    // List
    let listed = c.get(format!("{}/v1/employees", app.base_url)).send().await?.json::<Value>().await?;
    assert_eq!(listed["employees"].as_array().map(Vec::len), Some(1));

    // Update (full replace)
    let smith = json!({
        "first_name": "Jane",
        "last_name": "Smith",
        "email": "jane.smith@example.com",
        "position": "Senior Manager",
        "department": "Management"
    });
    let res = c.put(format!("{}/v1/employees/{}", app.base_url, id)).json(&smith).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?["employee"]["id"], id.as_str());

    // Get reflects exactly the update
    let res = c.get(format!("{}/v1/employees/{}", app.base_url, id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let fetched = res.json::<Value>().await?;
    let mut expected = smith.clone();
    expected["id"] = json!(id);
    assert_eq!(fetched["employee"], expected);

    // Delete, then NotFound
    let res = c.delete(format!("{}/v1/employees/{}", app.base_url, id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?["success"], true);

    let res = c.get(format!("{}/v1/employees/{}", app.base_url, id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    let body = res.json::<Value>().await?;
    assert_eq!(body["code"], 5);
    assert_eq!(body["message"], format!("Employee not found with ID: {}", id));

    let res = c.delete(format!("{}/v1/employees/{}", app.base_url, id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn malformed_id_is_bad_request() -> anyhow::Result<()> {
    let app = start().await?;
    let c = client();

    let res = c.get(format!("{}/v1/employees/not-an-id", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["code"], 3);

    let res = c.put(format!("{}/v1/employees/123", app.base_url)).json(&jane_doe()).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    let res = c.delete(format!("{}/v1/employees/xyz", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    assert_eq!(app.store.calls(), 0);
    Ok(())
}

#[tokio::test]
async fn unreadable_body_is_bad_request_with_error_body() -> anyhow::Result<()> {
    let app = start().await?;
    let c = client();
    let url = format!("{}/v1/employees", app.base_url);

    // Not JSON at all
    let res = c
        .post(&url)
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(body["code"], 3);
    assert!(!body["message"].as_str().unwrap_or_default().is_empty());
    assert_eq!(body["details"], json!([]));

    // JSON without a content type
    let res = c.post(&url).body(jane_doe().to_string()).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["code"], 3);

    // Wrong type for a text field
    let res = c.post(&url).json(&json!({ "first_name": 42 })).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["code"], 3);

    // Same on update
    let id = ObjectId::new().to_hex();
    let res = c
        .put(format!("{}/v1/employees/{}", app.base_url, id))
        .header("content-type", "application/json")
        .body("[")
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["code"], 3);

    assert_eq!(app.store.calls(), 0);
    Ok(())
}

#[tokio::test]
async fn null_fields_are_stored_as_empty() -> anyhow::Result<()> {
    let app = start().await?;
    let c = client();
    let body = json!({
        "first_name": "Jane",
        "last_name": null,
        "email": null,
        "position": "Software Engineer",
        "department": null
    });
    let res = c.post(format!("{}/v1/employees", app.base_url)).json(&body).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let created = res.json::<Value>().await?;
    let id = created["employee"]["id"].as_str().unwrap_or_default().to_string();
    assert_eq!(created["employee"]["last_name"], "");

    let fetched = c.get(format!("{}/v1/employees/{}", app.base_url, id)).send().await?.json::<Value>().await?;
    assert_eq!(
        fetched["employee"],
        json!({
            "id": id,
            "first_name": "Jane",
            "last_name": "",
            "email": "",
            "position": "Software Engineer",
            "department": ""
        })
    );
    Ok(())
}

#[tokio::test]
async fn path_id_overrides_body_id() -> anyhow::Result<()> {
    let app = start().await?;
    let c = client();
    let created = c.post(format!("{}/v1/employees", app.base_url)).json(&jane_doe()).send().await?.json::<Value>().await?;
    let id = created["employee"]["id"].as_str().unwrap_or_default().to_string();

    let mut body = jane_doe();
    body["id"] = json!(ObjectId::new().to_hex());
    body["position"] = json!("Principal Engineer");
    let res = c.put(format!("{}/v1/employees/{}", app.base_url, id)).json(&body).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let fetched = c.get(format!("{}/v1/employees/{}", app.base_url, id)).send().await?.json::<Value>().await?;
    assert_eq!(fetched["employee"]["position"], "Principal Engineer");
    Ok(())
}

#[tokio::test]
async fn empty_collection_lists_empty_array() -> anyhow::Result<()> {
    let app = start().await?;
    let res = client().get(format!("{}/v1/employees", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!({ "employees": [] }));
    Ok(())
}

#[tokio::test]
async fn store_failure_is_internal_server_error() -> anyhow::Result<()> {
    let app = start_with(Arc::new(MockEmployeeStore::failing("not primary"))).await?;
    let res = client().get(format!("{}/v1/employees", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::INTERNAL_SERVER_ERROR);
    let body = res.json::<Value>().await?;
    assert_eq!(body["code"], 13);
    assert!(body["message"].as_str().unwrap_or_default().contains("not primary"));
    Ok(())
}

#[tokio::test]
async fn unreachable_backend_is_service_unavailable() -> anyhow::Result<()> {
    // Reserve a port, then free it so nothing listens there.
    let probe = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let dead = probe.local_addr()?;
    drop(probe);

    let cfg = GatewayConfig { grpc_endpoint: format!("http://{}", dead), ..GatewayConfig::default() };
    let router = gateway::bootstrap::router(&cfg)?;
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr = listener.local_addr()?;
    let (_stop, stopped) = oneshot::channel();
    tokio::spawn(gateway::bootstrap::serve(listener, router, shutdown_on(stopped)));

    let res = client().get(format!("http://{}/v1/employees", addr)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::SERVICE_UNAVAILABLE);
    Ok(())
}
