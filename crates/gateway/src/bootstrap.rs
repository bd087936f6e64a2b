use std::future::Future;

use anyhow::Context;
use axum::Router;
use configs::GatewayConfig;
use proto::pb::employee_service_client::EmployeeServiceClient;
use tokio::net::TcpListener;
use tonic::transport::{Channel, Endpoint};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes::{build_router, GatewayState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// gRPC client for `cfg.grpc_endpoint`. The channel dials on first use, so
/// the gateway can start before the gRPC server is reachable.
pub fn connect_lazy(cfg: &GatewayConfig) -> anyhow::Result<EmployeeServiceClient<Channel>> {
    let channel = Endpoint::from_shared(cfg.grpc_endpoint.clone())
        .with_context(|| format!("invalid gRPC endpoint {}", cfg.grpc_endpoint))?
        .connect_timeout(cfg.connect_timeout())
        .timeout(cfg.request_timeout())
        .connect_lazy();
    Ok(EmployeeServiceClient::new(channel))
}

/// Router wired to the configured gRPC endpoint.
pub fn router(cfg: &GatewayConfig) -> anyhow::Result<Router> {
    let client = connect_lazy(cfg)?;
    let state = GatewayState::new(client, cfg.request_timeout());
    Ok(build_router(state, build_cors()))
}

/// Serve `router` on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, router: Router, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router).with_graceful_shutdown(shutdown).await?;
    Ok(())
}

/// Public entry: bind from config and run the HTTP gateway.
pub async fn run<F>(cfg: GatewayConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = router(&cfg)?;
    let addr = cfg.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("cannot bind HTTP gateway on {addr}"))?;
    info!(%addr, grpc_endpoint = %cfg.grpc_endpoint, "http_gateway_listening");
    serve(listener, app, shutdown).await?;
    info!("http_gateway_stopped");
    Ok(())
}
