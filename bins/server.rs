use configs::AppConfig;
use dotenvy::dotenv;
use tokio::sync::watch;
use tracing::{error, info};
use uuid::Uuid;

fn init_logging() {
    // Load .env early so RUST_LOG and the config overrides apply
    dotenv().ok();
    common::utils::logging::init_logging_json();
    info!(service = "server", event = "logger_init", "tracing subscriber initialized");
}

/// Resolves once the shutdown flag flips (or the sender is gone).
async fn wait_for(mut rx: watch::Receiver<bool>) {
    loop {
        let stopped = *rx.borrow();
        if stopped || rx.changed().await.is_err() {
            break;
        }
    }
}

fn main() -> std::process::ExitCode {
    init_logging();

    // Service context (no secrets)
    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    // Panic hook: route panics through tracing
    std::panic::set_hook(Box::new({
        let service_id = service_id;
        move |info| {
            error!(
                service = "server",
                event = "panic",
                %service_id,
                pid,
                message = %info,
                "unhandled panic occurred"
            );
        }
    }));

    let cfg = match AppConfig::load_or_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service = "server", event = "config_invalid", error = %e, "invalid configuration");
            return std::process::ExitCode::FAILURE;
        }
    };
    let worker_threads = cfg.server.worker_threads;

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = worker_threads { builder.worker_threads(w); }

    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "server", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return std::process::ExitCode::FAILURE;
        }
    };

    info!(
        service = "server",
        event = "start",
        %service_id,
        pid,
        version,
        threads = worker_threads.unwrap_or_default(),
        grpc_port = cfg.server.grpc_port,
        embed_gateway = cfg.server.embed_gateway,
        "server service starting"
    );

    rt.block_on(async move {
        let (stop_tx, stop_rx) = watch::channel(false);

        // The embedded gateway dials the gRPC listener of this process.
        let gateway_task = cfg.server.embed_gateway.then(|| {
            let mut gw = cfg.gateway.clone();
            gw.grpc_endpoint = cfg.server.local_grpc_endpoint();
            let stop = wait_for(stop_rx.clone());
            tokio::spawn(async move { gateway::bootstrap::run(gw, stop).await })
        });

        let mut server_task = tokio::spawn(server::run(cfg, wait_for(stop_rx)));

        let result = tokio::select! {
            res = &mut server_task => res,
            _ = tokio::signal::ctrl_c() => {
                info!(service = "server", event = "shutdown_signal", %service_id, pid, "received Ctrl+C, shutting down");
                let _ = stop_tx.send(true);
                server_task.await
            }
        };
        // Stop the gateway whichever way the gRPC server ended.
        let _ = stop_tx.send(true);
        if let Some(task) = gateway_task {
            match task.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => error!(service = "server", event = "gateway_failed", error = %e, "embedded gateway returned error"),
                Err(e) => error!(service = "server", event = "task_join_error", error = %e, "gateway task join error"),
            }
        }

        match result {
            Ok(Ok(())) => {
                info!(service = "server", event = "stop", %service_id, pid, "server stopped normally");
                std::process::ExitCode::SUCCESS
            }
            Ok(Err(e)) => {
                error!(service = "server", event = "run_failed", error = %e, "server::run returned error");
                std::process::ExitCode::FAILURE
            }
            Err(e) => {
                error!(service = "server", event = "task_join_error", error = %e, "server task join error");
                std::process::ExitCode::FAILURE
            }
        }
    })
}
