use std::sync::Arc;
use std::time::Duration;

use secrecy::ExposeSecret;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use checkout_sheets::adapters::google_sheets::{
    GoogleSheetsConfig, GoogleSheetsStore, ServiceAccountKey,
};
use checkout_sheets::adapters::http::{app_router, AppState};
use checkout_sheets::adapters::stripe::{StripeConfig, StripePaymentAdapter};
use checkout_sheets::application::handlers::{
    CheckoutSettings, CreateCheckoutSessionHandler, FormConfigSource, GetFormConfigHandler,
    HandlePaymentWebhookHandler, WebhookStorageSettings,
};
use checkout_sheets::config::{AppConfig, ServerConfig};
use checkout_sheets::domain::submission::{NormalizerOptions, StripeWebhookVerifier};
use checkout_sheets::ports::SheetTarget;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    let state = build_state(&config)?;
    let app = app_router(
        state,
        Duration::from_secs(config.server.request_timeout_secs),
    );

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;

    info!(
        %addr,
        environment = ?config.server.environment,
        stripe_test_mode = config.payment.is_test_mode(),
        "Server is running"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(server.log_level.clone()));

    if server.is_production() {
        let _ = fmt().with_env_filter(filter).json().try_init();
    } else {
        let _ = fmt().with_env_filter(filter).pretty().try_init();
    }
}

fn build_state(config: &AppConfig) -> Result<AppState, Box<dyn std::error::Error>> {
    let payment = &config.payment;
    let sheets = &config.sheets;

    let stripe = StripePaymentAdapter::new(StripeConfig::new(
        payment.stripe_api_key.expose_secret().clone(),
    ))?;

    let service_account = match &sheets.credentials_json {
        Some(json) => match ServiceAccountKey::from_json(json.expose_secret()) {
            Ok(key) => Some(key),
            Err(e) => {
                error!(error = %e, "Service account credentials unusable; storage will fail");
                None
            }
        },
        None => {
            warn!("No service account credentials configured; storage will fail");
            None
        }
    };
    let sheet_store = Arc::new(GoogleSheetsStore::new(
        GoogleSheetsConfig::new(service_account)
            .with_timeout(Duration::from_secs(sheets.request_timeout_secs)),
    )?);

    let checkout_handler = CreateCheckoutSessionHandler::new(
        Arc::new(stripe),
        CheckoutSettings {
            currency: payment.currency.clone(),
            success_url: payment.success_url.clone(),
            cancel_url: payment.cancel_url.clone(),
        },
    );

    let verifier = StripeWebhookVerifier::new(payment.stripe_webhook_secret.expose_secret().clone())
        .with_tolerance_secs(payment.signature_tolerance_secs);
    let mut storage = WebhookStorageSettings::new(SheetTarget::new(
        sheets.spreadsheet_id.clone(),
        sheets.data_sheet_name.clone(),
    ));
    storage.append_retry_delay = Duration::from_millis(sheets.append_retry_delay_ms);
    storage.normalizer = NormalizerOptions {
        drop_duplicate_customer_name: sheets.drop_duplicate_customer_name,
    };
    let webhook_handler =
        HandlePaymentWebhookHandler::new(verifier, sheet_store.clone(), storage);

    let form_config_handler = GetFormConfigHandler::new(
        sheet_store,
        FormConfigSource {
            spreadsheet_id: sheets.form_config_spreadsheet_id().to_string(),
            range: sheets.form_config_range.clone(),
        },
    );

    Ok(AppState::new(
        checkout_handler,
        webhook_handler,
        form_config_handler,
    ))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install CTRL+C signal handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received ctrl+C signal"),
        _ = terminate => info!("Received terminate signal"),
    }
}
