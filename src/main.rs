use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use paylink_confirm::application::cancellation::PaymentCancellation;
use paylink_confirm::application::confirmation::{PaymentConfirmationFlow, RetryPolicy};
use paylink_confirm::application::initiation::PaymentInitiation;
use paylink_confirm::config::{Config, DEFAULT_API_BASE_URL, DEFAULT_APP_URL};
use paylink_confirm::domain::order::OrderIdSet;
use paylink_confirm::domain::ports::TokenSourceBox;
use paylink_confirm::infrastructure::http::HttpPaymentBackend;
use paylink_confirm::infrastructure::in_memory::StaticTokenSource;
use paylink_confirm::infrastructure::session::{EnvTokenSource, FileTokenSource};
use paylink_confirm::interfaces::display::View;
use paylink_confirm::interfaces::redirect::order_ids_param;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Backend API base URL
    #[arg(long, global = true, env = "API_BASE_URL", default_value = DEFAULT_API_BASE_URL)]
    api_base_url: String,

    /// Public URL of the web app, used to build provider redirect URLs
    #[arg(long, global = true, env = "APP_URL", default_value = DEFAULT_APP_URL)]
    app_url: String,

    /// Explicit success redirect URL
    #[arg(long, global = true, env = "PAYOS_RETURN_URL")]
    return_url: Option<String>,

    /// Explicit cancel redirect URL
    #[arg(long, global = true, env = "PAYOS_CANCEL_URL")]
    cancel_url: Option<String>,

    /// Session bearer token. Falls back to --token-file, then $SESSION_TOKEN.
    #[arg(long, global = true)]
    token: Option<String>,

    /// File whose first line holds the session token
    #[arg(long, global = true)]
    token_file: Option<PathBuf>,

    /// Per-request HTTP timeout in milliseconds
    #[arg(long, global = true)]
    http_timeout_ms: Option<u64>,

    /// Status lookups made before settling for a warning
    #[arg(long, global = true, default_value_t = RetryPolicy::DEFAULT_MAX_ATTEMPTS)]
    max_attempts: u32,

    /// Delay between status lookups in milliseconds
    #[arg(long, global = true, default_value_t = 2000)]
    retry_delay_ms: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Confirm a payment from the provider's success redirect
    Confirm {
        /// Redirect URL or query string carrying `orderIds`
        redirect: String,
    },
    /// Show where to go after the provider's cancel redirect
    Cancel {
        /// Redirect URL or query string carrying `orderIds`
        redirect: String,
    },
    /// Create a payment link for comma-separated order ids
    Link { order_ids: String },
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            api_base_url: self.api_base_url.clone(),
            app_url: self.app_url.clone(),
            return_url: self.return_url.clone(),
            cancel_url: self.cancel_url.clone(),
            http_timeout: self.http_timeout_ms.map(Duration::from_millis),
            retry: RetryPolicy::new(self.max_attempts, Duration::from_millis(self.retry_delay_ms)),
        }
    }

    fn token_source(&self) -> TokenSourceBox {
        if let Some(token) = &self.token {
            Box::new(StaticTokenSource::new(token.clone()))
        } else if let Some(path) = &self.token_file {
            Box::new(FileTokenSource::new(path))
        } else {
            Box::new(EnvTokenSource::default())
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config();
    config.validate().into_diagnostic()?;

    match &cli.command {
        Command::Confirm { redirect } => {
            let raw = order_ids_param(redirect);
            let backend = HttpPaymentBackend::new(&config.api_base_url, config.http_timeout)
                .into_diagnostic()?;
            let flow = PaymentConfirmationFlow::with_retry(
                cli.token_source(),
                Box::new(backend),
                config.retry,
            );

            let outcome = flow.run(raw.as_deref()).await;
            let order_ids = raw.as_deref().map(OrderIdSet::parse).unwrap_or_default();
            print!("{}", View::confirmation(&outcome, &order_ids));

            if outcome.is_failed() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Cancel { redirect } => {
            let cancel = PaymentCancellation::from_param(order_ids_param(redirect).as_deref());
            print!("{}", View::cancellation(&cancel));
        }
        Command::Link { order_ids } => {
            for warning in config.redirect_warnings() {
                warn!("{warning}");
            }
            let order_ids = OrderIdSet::parse(order_ids);
            let backend = HttpPaymentBackend::new(&config.api_base_url, config.http_timeout)
                .into_diagnostic()?;
            let initiation = PaymentInitiation::new(cli.token_source(), Box::new(backend));
            let link = initiation.start(&order_ids).await.into_diagnostic()?;

            println!("Checkout: {}", link.checkout_url);
            if let Some(qr_code) = &link.qr_code {
                println!("QR: {qr_code}");
            }
            println!("Return: {}", config.return_url(&order_ids));
            println!("Cancel: {}", config.cancel_url(&order_ids));
        }
    }

    Ok(ExitCode::SUCCESS)
}
