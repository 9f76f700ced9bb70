use crate::application::confirmation::RetryPolicy;
use crate::domain::order::{ORDER_IDS_PARAM, OrderIdSet};
use crate::error::{ConfirmError, Result};
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_APP_URL: &str = "http://localhost:3000";

/// Runtime settings for talking to the backend and building provider redirects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_base_url: String,
    pub app_url: String,
    /// Overrides `{app_url}/payment/success`.
    pub return_url: Option<String>,
    /// Overrides `{app_url}/payment/cancel`.
    pub cancel_url: Option<String>,
    pub http_timeout: Option<Duration>,
    pub retry: RetryPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            app_url: DEFAULT_APP_URL.to_string(),
            return_url: None,
            cancel_url: None,
            http_timeout: None,
            retry: RetryPolicy::default(),
        }
    }
}

impl Config {
    /// Checks that the configured URLs are absolute http(s) URLs.
    pub fn validate(&self) -> Result<()> {
        let urls = [
            Some(("api base", self.api_base_url.as_str())),
            Some(("app", self.app_url.as_str())),
            self.return_url.as_deref().map(|url| ("return", url)),
            self.cancel_url.as_deref().map(|url| ("cancel", url)),
        ];
        for (name, url) in urls.into_iter().flatten() {
            let parsed = reqwest::Url::parse(url).map_err(|e| {
                ConfirmError::ConfigError(format!("invalid {name} url {url:?}: {e}"))
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ConfirmError::ConfigError(format!(
                    "{name} url must use http or https: {url}"
                )));
            }
        }
        Ok(())
    }

    /// URL the payment provider sends the user to after a successful payment.
    pub fn return_url(&self, order_ids: &OrderIdSet) -> String {
        let base = self
            .return_url
            .clone()
            .unwrap_or_else(|| format!("{}/payment/success", self.app_base()));
        with_order_ids(base, order_ids)
    }

    /// URL the payment provider sends the user to after cancelling.
    pub fn cancel_url(&self, order_ids: &OrderIdSet) -> String {
        let base = self
            .cancel_url
            .clone()
            .unwrap_or_else(|| format!("{}/payment/cancel", self.app_base()));
        with_order_ids(base, order_ids)
    }

    /// Warnings for redirect targets the payment provider will refuse.
    pub fn redirect_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let none = OrderIdSet::default();
        if is_localhost(&self.app_url) {
            warnings.push(format!(
                "app url {} is localhost; the payment provider will reject it",
                self.app_url
            ));
        }
        if is_localhost(&self.return_url(&none)) {
            warnings.push("payment return url is localhost".to_string());
        }
        if is_localhost(&self.cancel_url(&none)) {
            warnings.push("payment cancel url is localhost".to_string());
        }
        warnings
    }

    fn app_base(&self) -> &str {
        self.app_url.trim_end_matches('/')
    }
}

fn with_order_ids(base: String, order_ids: &OrderIdSet) -> String {
    if order_ids.is_empty() {
        base
    } else {
        format!("{base}?{ORDER_IDS_PARAM}={order_ids}")
    }
}

fn is_localhost(url: &str) -> bool {
    url.contains("localhost") || url.contains("127.0.0.1")
}
