use anyhow::{anyhow, Context, Result};
use fee_router::config::AppConfig;
use fee_router::control::AdmissionControl;
use fee_router::router::api::{create_api_router, ApiState};
use fee_router::sandbox::{Sandbox, SharedSandbox};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing().context("initialize tracing subscriber")?;

    if let Err(err) = run().await {
        tracing::error!(error = ?err, "fatal fee router error");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> Result<()> {
    let config = AppConfig::load().context("load configuration")?;
    let settings = config.router_settings().context("validate router settings")?;

    if config.genesis_path.is_none() {
        warn!("genesis_path not provided; sandbox starts with no tokens or balances");
    }
    let genesis = config.load_genesis()?;
    let sandbox = Sandbox::from_genesis(settings, config.registry_address, &genesis)
        .context("build sandbox from genesis")?
        .into_shared();

    let admission = AdmissionControl::new(config.max_inflight, config.rate_per_sec);

    let app = App {
        config: Arc::new(config),
        sandbox,
        admission,
    };
    app.run().await
}

struct App {
    config: Arc<AppConfig>,
    sandbox: SharedSandbox,
    admission: AdmissionControl,
}

impl App {
    async fn run(self) -> Result<()> {
        {
            let sandbox = self.sandbox.lock().await;
            info!(
                owner = %sandbox.router.owner(),
                account = %sandbox.router.account(),
                fee_rate = %sandbox.router.fee_rate(),
                fee_recipient = %sandbox.router.fee_recipient(),
                registry = %sandbox.router.registry_address(),
                "fee router online"
            );
        }

        let api_router = create_api_router(ApiState {
            sandbox: self.sandbox.clone(),
            admission: self.admission.clone(),
        });
        let api_addr = self.config.listen_addr;
        let listener = tokio::net::TcpListener::bind(&api_addr)
            .await
            .with_context(|| format!("bind API server address {api_addr}"))?;

        info!(address = %api_addr, "HTTP API server starting");
        let _api_handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, api_router).await {
                warn!(error = %e, "API server error");
            }
        });

        let mut ticker = tokio::time::interval(Duration::from_secs(30));
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let stats = self.sandbox.lock().await.router.stats();
                    info!(
                        max_inflight = self.config.max_inflight,
                        available_permits = self.admission.available_permits(),
                        total_executions = stats.total_executions,
                        successful = stats.successful_executions,
                        failed = stats.failed_executions,
                        success_rate = stats.success_rate,
                        "fee router heartbeat"
                    );
                }
                res = tokio::signal::ctrl_c() => {
                    if let Err(err) = res {
                        warn!(error = %err, "ctrl_c listener error");
                    }
                    info!("Shutdown signal received, exiting");
                    break;
                }
            }
        }
        Ok(())
    }
}

fn init_tracing() -> Result<()> {
    let env_filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=warn".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(env_filter))
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow!("tracing subscriber init: {err}"))
}
