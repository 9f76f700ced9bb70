use crate::domain::order::{OrderId, OrderIdSet};
use crate::domain::payment::{PaymentLink, PaymentStatus};
use crate::domain::ports::{PaymentLinkCreator, PaymentStatusLookup};
use crate::error::{ConfirmError, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument};

/// `GET /api/payments/order/{id}` answers `{"message": .., "payment": {..}}`.
#[derive(Deserialize)]
struct PaymentEnvelope {
    payment: PaymentStatus,
}

/// `POST /api/payments/link` answers `{"message": .., "data": {..}}`.
#[derive(Deserialize)]
struct LinkEnvelope {
    data: PaymentLink,
}

/// Client for the restaurant backend's payment endpoints.
#[derive(Clone)]
pub struct HttpPaymentBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpPaymentBackend {
    /// Builds a client for `base_url`. Without a timeout the transport default applies.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: builder.build()?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn auth_headers(token: &str) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| ConfirmError::ValidationError(format!("invalid auth header: {e}")))?;
        headers.insert(AUTHORIZATION, value);
        Ok(headers)
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ConfirmError::ApiError {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }
        Ok(response.json::<T>().await?)
    }
}

/// Picks the user-facing message out of a failed response: the body's
/// `message`, then its `error`, then the status reason phrase.
pub fn error_message(status: StatusCode, body: &str) -> String {
    let from_body = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["message", "error"].iter().find_map(|key| {
                value
                    .get(key)
                    .and_then(|v| v.as_str())
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
            })
        });
    from_body.unwrap_or_else(|| {
        status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| status.as_str().to_string())
    })
}

#[async_trait]
impl PaymentStatusLookup for HttpPaymentBackend {
    #[instrument(name = "backend_payment_status", skip(self, token))]
    async fn payment_status(&self, order_id: OrderId, token: &str) -> Result<PaymentStatus> {
        let url = self.endpoint(&format!("/api/payments/order/{order_id}"));
        let response = self
            .client
            .get(&url)
            .headers(Self::auth_headers(token)?)
            .send()
            .await?;
        debug!(status = %response.status(), "payment status response");
        let envelope: PaymentEnvelope = Self::read_json(response).await?;
        Ok(envelope.payment)
    }
}

#[async_trait]
impl PaymentLinkCreator for HttpPaymentBackend {
    #[instrument(
        name = "backend_create_link",
        skip(self, order_ids, token),
        fields(order_ids = %order_ids)
    )]
    async fn create_link(&self, order_ids: &OrderIdSet, token: &str) -> Result<PaymentLink> {
        let url = self.endpoint("/api/payments/link");
        let body: Vec<u64> = order_ids.iter().map(|id| u64::from(*id)).collect();
        let response = self
            .client
            .post(&url)
            .headers(Self::auth_headers(token)?)
            .json(&body)
            .send()
            .await?;
        debug!(status = %response.status(), "payment link response");
        let envelope: LinkEnvelope = Self::read_json(response).await?;
        Ok(envelope.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::confirmation::{PaymentConfirmationFlow, RetryPolicy};
    use crate::domain::outcome::{ConfirmationOutcome, FailureReason};
    use crate::infrastructure::in_memory::StaticTokenSource;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    const COMPLETED_BODY: &str = r#"{"message":"Payment retrieved successfully","payment":{"id":1,"status":"COMPLETED","paidAt":"2025-01-02T10:00:00","amount":120000}}"#;
    const PENDING_BODY: &str = r#"{"message":"Payment retrieved successfully","payment":{"id":1,"status":"PENDING","paidAt":null,"amount":120000}}"#;

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf);
            if let Some(head_end) = text.find("\r\n\r\n") {
                let content_length = text[..head_end]
                    .lines()
                    .find_map(|line| {
                        line.to_ascii_lowercase()
                            .strip_prefix("content-length:")
                            .map(|v| v.trim().parse::<usize>().unwrap_or(0))
                    })
                    .unwrap_or(0);
                if buf.len() >= head_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Answers one connection per canned response and hands back the raw requests.
    async fn serve(responses: Vec<(u16, &'static str)>) -> (String, JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let mut requests = Vec::new();
            for (status, body) in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                requests.push(read_request(&mut socket).await);
                let response = format!(
                    "HTTP/1.1 {status} Stub\r\ncontent-type: application/json\r\n\
                     content-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                socket.write_all(response.as_bytes()).await.unwrap();
                socket.shutdown().await.ok();
            }
            requests
        });
        (base_url, handle)
    }

    fn flow_against(base_url: &str) -> PaymentConfirmationFlow {
        PaymentConfirmationFlow::with_retry(
            Box::new(StaticTokenSource::new("tok")),
            Box::new(HttpPaymentBackend::new(base_url, None).unwrap()),
            RetryPolicy::new(2, Duration::from_millis(10)),
        )
    }

    #[tokio::test]
    async fn test_wrapped_completed_status_is_verified() {
        let (base_url, server) = serve(vec![(200, COMPLETED_BODY)]).await;

        let outcome = flow_against(&base_url).run(Some("12,13")).await;

        assert_eq!(outcome, ConfirmationOutcome::Verified);
        let requests = server.await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].starts_with("GET /api/payments/order/12 "));
        assert!(requests[0].to_ascii_lowercase().contains("authorization: bearer tok\r\n"));
    }

    #[tokio::test]
    async fn test_wrapped_pending_then_completed_is_verified() {
        let (base_url, server) = serve(vec![(200, PENDING_BODY), (200, COMPLETED_BODY)]).await;

        let outcome = flow_against(&base_url).run(Some("12")).await;

        assert_eq!(outcome, ConfirmationOutcome::Verified);
        assert_eq!(server.await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_error_body_message_becomes_lookup_failure() {
        let not_found = r#"{"message":"Payment not found"}"#;
        let (base_url, server) = serve(vec![(404, not_found), (404, not_found)]).await;

        let outcome = flow_against(&base_url).run(Some("99")).await;

        assert_eq!(
            outcome,
            ConfirmationOutcome::Failed(FailureReason::Lookup("Payment not found".to_string()))
        );
        assert_eq!(server.await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_unwrapped_status_body_is_rejected() {
        let (base_url, _server) = serve(vec![(200, r#"{"status":"COMPLETED"}"#)]).await;
        let backend = HttpPaymentBackend::new(&base_url, None).unwrap();

        let result = backend
            .payment_status(OrderId::new(1).unwrap(), "tok")
            .await;
        assert!(matches!(result, Err(ConfirmError::HttpError(_))));
    }

    #[tokio::test]
    async fn test_wrapped_link_is_decoded() {
        let body = r#"{"message":"Payment link created","data":{"checkoutUrl":"https://pay.example/web/abc","qrCode":"000201","orderCode":1700,"amount":50000}}"#;
        let (base_url, server) = serve(vec![(200, body)]).await;
        let backend = HttpPaymentBackend::new(&base_url, None).unwrap();

        let link = backend
            .create_link(&OrderIdSet::parse("4,5"), "tok")
            .await
            .unwrap();

        assert_eq!(link.checkout_url, "https://pay.example/web/abc");
        assert_eq!(link.qr_code.as_deref(), Some("000201"));
        assert_eq!(link.amount, Some(50000));
        let requests = server.await.unwrap();
        assert!(requests[0].starts_with("POST /api/payments/link "));
        assert!(requests[0].to_ascii_lowercase().contains("authorization: bearer tok\r\n"));
        assert!(requests[0].ends_with("[4,5]"));
    }

    #[test]
    fn test_error_message_prefers_message_field() {
        let body = r#"{"message": "Payment not found", "error": "Not Found"}"#;
        assert_eq!(error_message(StatusCode::NOT_FOUND, body), "Payment not found");
    }

    #[test]
    fn test_error_message_falls_back_to_error_field() {
        let body = r#"{"error": "Forbidden order"}"#;
        assert_eq!(error_message(StatusCode::FORBIDDEN, body), "Forbidden order");
    }

    #[test]
    fn test_error_message_falls_back_to_reason_phrase() {
        assert_eq!(
            error_message(StatusCode::UNAUTHORIZED, "<html>nope</html>"),
            "Unauthorized"
        );
        assert_eq!(error_message(StatusCode::BAD_GATEWAY, ""), "Bad Gateway");
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let backend = HttpPaymentBackend::new("http://localhost:8080/", None).unwrap();
        assert_eq!(backend.base_url(), "http://localhost:8080");
        assert_eq!(
            backend.endpoint("/api/payments/order/3"),
            "http://localhost:8080/api/payments/order/3"
        );
    }

    #[test]
    fn test_auth_header_rejects_control_characters() {
        assert!(HttpPaymentBackend::auth_headers("abc\n").is_err());
        let headers = HttpPaymentBackend::auth_headers("abc").unwrap();
        assert_eq!(headers[AUTHORIZATION], "Bearer abc");
    }
}
