use std::{
    process,
    sync::{Arc, OnceLock},
    time::Duration,
};

use huebee::{
    bridge::HueBridge,
    config::Config,
    core::{executor::Executor, registry::GaugeRegistry},
    logger::LoggerManager,
    print_error, server,
};
use tracing::{error, info};

static CONFIG: OnceLock<Config> = OnceLock::new();

pub fn config() -> &'static Config {
    CONFIG.get_or_init(|| {
        Config::new().unwrap_or_else(|e| {
            print_error!("{}", e);
            process::exit(1);
        })
    })
}

/// Resolves the bridge address and application key, discovering and
/// registering where the configuration leaves them blank.
async fn connect_bridge(cfg: &Config) -> Result<HueBridge, huebee::bridge::BridgeError> {
    let timeout = Duration::from_secs(cfg.bridge.request_timeout_secs);
    let http = HueBridge::http_client(timeout)?;

    let host = match &cfg.bridge.host {
        Some(host) => host.clone(),
        None => {
            info!("No bridge host configured, running discovery...");
            let host = HueBridge::discover(&http).await?;
            info!("Discovered bridge at {}", host);
            host
        }
    };

    let username = match &cfg.bridge.username {
        Some(username) => username.clone(),
        None => {
            info!("No application key configured, registering (press the bridge link button first)");
            let username = HueBridge::register(&http, &host, &cfg.bridge.device_type).await?;
            info!(
                "Created application key {:?}, persist it as bridge.username to skip this step",
                username
            );
            username
        }
    };

    Ok(HueBridge::new(http, host, username))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config();
    let mut logger_manager = LoggerManager::new(cfg.logger.clone()).unwrap_or_else(|e| {
        print_error!("Failed to setup Log Manager: {}", e);
        process::exit(1);
    });
    logger_manager.init().unwrap_or_else(|e| {
        print_error!("Failed to init Log Manager: {}", e);
        process::exit(1);
    });
    info!("Starting huebee version {}...", env!("CARGO_PKG_VERSION"));
    info!("Log level: {}", cfg.logger.level);

    let bridge = connect_bridge(cfg).await.unwrap_or_else(|e| {
        error!("Failed to connect to the bridge: {}", e);
        process::exit(1);
    });

    if cfg.bridge.alert_on_start {
        info!("Alerting all lights");
        bridge.alert_all().await.unwrap_or_else(|e| {
            error!("Failed to alert lights: {}", e);
            process::exit(1);
        });
    }

    let registry = Arc::new(GaugeRegistry::new(cfg.poller.namespace.clone()));

    let executor = Executor::new(
        Arc::new(bridge),
        Arc::clone(&registry),
        Duration::from_secs(cfg.poller.poll_interval),
    );

    let app = server::build_router(Arc::clone(&registry));
    let listener = tokio::net::TcpListener::bind(&cfg.server.bind)
        .await
        .unwrap_or_else(|e| {
            error!("Failed to bind {}: {}", cfg.server.bind, e);
            process::exit(1);
        });
    info!("Serving metrics on http://{}/metrics", cfg.server.bind);

    tokio::select! {
        res = executor.run() => {
            // The loop only returns on a fatal error; surface it and die
            // so the operator's supervisor can restart the process.
            if let Err(e) = res {
                error!("Sensor polling failed: {}", e);
                process::exit(1);
            }
        }
        res = axum::serve(listener, app) => {
            if let Err(e) = res {
                error!("Metrics server failed: {}", e);
                process::exit(1);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C — shutting down");
        }
    }
    Ok(())
}
