use configs::AppConfig;
use dotenvy::dotenv;
use tracing::{error, info};
use common::utils::logging::init_logging_json;
use uuid::Uuid;

fn init_logging() {
    // Load .env (RUST_LOG, GRPC_ENDPOINT, HTTP_PORT)
    dotenv().ok();
    init_logging_json();
    info!(service = "gateway", event = "logger_init", "tracing subscriber initialized");
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    init_logging();

    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new({
        let service_id = service_id;
        move |info| {
            error!(
                service = "gateway",
                event = "panic",
                %service_id,
                pid,
                message = %info,
                "unhandled panic occurred"
            );
        }
    }));

    let cfg = match AppConfig::load_or_env() {
        Ok(cfg) => cfg.gateway,
        Err(e) => {
            error!(service = "gateway", event = "config_invalid", error = %e, "invalid configuration");
            return std::process::ExitCode::FAILURE;
        }
    };

    info!(
        service = "gateway",
        event = "start",
        %service_id,
        pid,
        version,
        grpc_endpoint = %cfg.grpc_endpoint,
        "gateway service starting"
    );

    let shutdown = async move {
        let _ = tokio::signal::ctrl_c().await;
        info!(service = "gateway", event = "shutdown_signal", %service_id, pid, "received Ctrl+C, shutting down");
    };

    match gateway::bootstrap::run(cfg, shutdown).await {
        Ok(()) => {
            info!(service = "gateway", event = "stop", %service_id, pid, "gateway service stopped");
            std::process::ExitCode::SUCCESS
        }
        Err(e) => {
            error!(service = "gateway", event = "run_failed", error = %e, "gateway::bootstrap::run returned error");
            std::process::ExitCode::FAILURE
        }
    }
}
