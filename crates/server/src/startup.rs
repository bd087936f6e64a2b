use std::{future::Future, net::SocketAddr, sync::Arc};

use anyhow::Context;
use configs::{AppConfig, ServerConfig};
use models::db::Datastore;
use proto::pb;
use service::employee::repo::MongoEmployeeStore;
use service::employee::repository::EmployeeStore;
use service::EmployeeService;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::grpc::EmployeeGrpc;

/// Bind the gRPC listener from config.
pub async fn bind(cfg: &ServerConfig) -> anyhow::Result<TcpListener> {
    let addr = cfg.grpc_bind_addr();
    TcpListener::bind(&addr)
        .await
        .with_context(|| format!("cannot bind gRPC listener on {addr}"))
}

/// Serve the employee gRPC service on `listener` until `shutdown` resolves.
pub async fn serve<S, F>(listener: TcpListener, store: Arc<S>, cfg: &ServerConfig, shutdown: F) -> anyhow::Result<()>
where
    S: EmployeeStore + 'static,
    F: Future<Output = ()> + Send,
{
    let grpc = EmployeeGrpc::new(EmployeeService::new(store), Some(cfg.request_timeout()));

    let reflection = if cfg.reflection {
        Some(
            tonic_reflection::server::Builder::configure()
                .register_encoded_file_descriptor_set(pb::FILE_DESCRIPTOR_SET)
                .build_v1()?,
        )
    } else {
        None
    };

    let addr: Option<SocketAddr> = listener.local_addr().ok();
    info!(addr = ?addr, reflection = cfg.reflection, "grpc_server_listening");

    Server::builder()
        .layer(TraceLayer::new_for_grpc())
        .add_service(grpc.into_server())
        .add_optional_service(reflection)
        .serve_with_incoming_shutdown(TcpListenerStream::new(listener), shutdown)
        .await?;
    Ok(())
}

/// Public entry: connect the datastore, serve gRPC until `shutdown`, then disconnect.
pub async fn run<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send,
{
    let datastore = Datastore::connect(&cfg.database)
        .await
        .context("failed to connect to MongoDB")?;
    let store = Arc::new(MongoEmployeeStore::new(datastore.employees()));

    let listener = bind(&cfg.server).await?;
    let served = serve(listener, store, &cfg.server, shutdown).await;

    // Release the pool on every exit path.
    datastore.close().await;
    info!("grpc_server_stopped");
    served
}
