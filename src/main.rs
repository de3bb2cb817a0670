//! Wiring & DI. Entry point: bootstrap adapters, inject into services, run UI.
//! No business logic here; the reminder loop runs as a background task.

use dotenv::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use medtrack::adapters::api::{HttpBackend, MockMedicationApi};
use medtrack::adapters::clock::SystemClock;
use medtrack::adapters::notify::{TerminalAlertSink, TerminalNotifier};
use medtrack::adapters::persistence::PermissionStore;
use medtrack::adapters::ui::tui::TuiInputPort;
use medtrack::ports::{AlertSink, AuthPort, Clock, InputPort, MedicationApi, NotifierPort};
use medtrack::usecases::{HistoryService, MedicationService, ReminderService};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!("no .env found"),
    }

    medtrack::adapters::ui::init_ui();

    let cfg = medtrack::shared::config::AppConfig::load().unwrap_or_default();

    let data_path = PathBuf::from(cfg.data_dir_or_default());
    tokio::fs::create_dir_all(&data_path).await?;

    // --- Backend gateway: real HTTP client, or the in-memory mock when no
    // base URL is configured ---
    let api: Arc<dyn MedicationApi> = match &cfg.base_url {
        Some(base_url) => {
            info!(base_url = %base_url, "using HTTP backend");
            let backend =
                Arc::new(HttpBackend::new(base_url.as_str()).map_err(|e| anyhow::anyhow!("{e}"))?);
            if cfg.is_login_configured() {
                let auth: Arc<dyn AuthPort> = Arc::clone(&backend) as Arc<dyn AuthPort>;
                auth.login(
                    cfg.email.as_deref().unwrap_or_default(),
                    cfg.password.as_deref().unwrap_or_default(),
                )
                .await
                .map_err(|e| anyhow::anyhow!("login failed: {e}"))?;
                info!("logged in");
            } else {
                warn!("MEDTRACK_EMAIL/MEDTRACK_PASSWORD not set; relying on public mode");
            }
            backend
        }
        None => {
            warn!("MEDTRACK_BASE_URL not set, using in-memory mock backend");
            Arc::new(MockMedicationApi::new())
        }
    };

    // --- Notification permission state (survives restarts) ---
    let permission_store = Arc::new(PermissionStore::new(data_path.join("state.json")));
    permission_store
        .load()
        .await
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    let notifier: Arc<dyn NotifierPort> =
        Arc::new(TerminalNotifier::new(Arc::clone(&permission_store)));

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let alert: Arc<dyn AlertSink> = Arc::new(TerminalAlertSink);

    // --- Services ---
    let tick_secs = cfg.tick_secs_or_default();
    info!(tick_secs, "reminder tick period: {} s", tick_secs);
    let reminder = Arc::new(ReminderService::new(
        Arc::clone(&api),
        Arc::clone(&clock),
        alert,
        Arc::clone(&notifier),
        Duration::from_secs(tick_secs),
    ));
    let medications = Arc::new(MedicationService::new(Arc::clone(&api), Arc::clone(&clock)));
    let history = Arc::new(HistoryService::new(Arc::clone(&api), Arc::clone(&clock)));

    // --- Reminder loop: background task for the lifetime of the process ---
    let loop_service = Arc::clone(&reminder);
    tokio::spawn(async move {
        loop_service.run_loop().await;
    });

    let input_port: Arc<dyn InputPort> =
        Arc::new(TuiInputPort::new(reminder, medications, history, notifier));

    input_port.run().await.map_err(|e| anyhow::anyhow!("{}", e))?;

    Ok(())
}
