use futures::future::{self, Either};
use reqwest::{Client, StatusCode};
use std::future::Future;
use std::time::Duration;
use tracing::debug;

use super::config::Config;
use super::error::SyncError;
use super::message::{decode_listing, Retrieved, SendRequest, StatusResponse};

/// HTTP side of the synchronizer: one method per backend endpoint.
#[derive(Clone)]
pub struct MessengerApi {
    client: Client,
    config: Config,
}

impl MessengerApi {
    pub fn new(config: Config) -> Result<Self, SyncError> {
        let client = Client::builder().build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn retrieve_messages(&self) -> Result<Retrieved, SyncError> {
        let url = self.config.messages_url();
        debug!(%url, "retrieving messages");
        self.bounded(async move {
            let resp = self.client.get(url).send().await?;
            let status = resp.status();
            let body = resp.text().await?;
            if !status.is_success() {
                return Err(server_error(status, &body));
            }
            decode_listing(&body)
        })
        .await
    }

    pub async fn submit_message(&self, text: &str) -> Result<(), SyncError> {
        let url = self.config.send_url();
        debug!(%url, len = text.len(), "submitting message");
        self.bounded(async move {
            let resp = self.client.post(url).json(&SendRequest { message: text }).send().await?;
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            if status != StatusCode::OK && status != StatusCode::CREATED {
                return Err(server_error(status, &body));
            }
            debug!(%status, body = %body, "send accepted");
            Ok(())
        })
        .await
    }

    pub async fn check_status(&self) -> Result<String, SyncError> {
        let url = self.config.status_url();
        self.bounded(async move {
            let resp = self.client.get(url).send().await?;
            let status = resp.status();
            let body = resp.text().await?;
            if !status.is_success() {
                return Err(server_error(status, &body));
            }
            let parsed: StatusResponse = serde_json::from_str(&body)?;
            Ok(parsed.status)
        })
        .await
    }

    async fn bounded<T, F>(&self, fut: F) -> Result<T, SyncError>
    where
        F: Future<Output = Result<T, SyncError>>,
    {
        with_timeout(self.config.request_timeout, fut).await?
    }
}

fn server_error(status: StatusCode, body: &str) -> SyncError {
    let detail = status.canonical_reason().unwrap_or("unexpected status");
    debug!(%status, body = %body, "backend rejected request");
    SyncError::Server { status: status.as_u16(), detail: detail.to_string() }
}

pub(crate) async fn with_timeout<F: Future>(limit: Duration, fut: F) -> Result<F::Output, SyncError> {
    futures::pin_mut!(fut);
    let timer = sleep(limit);
    futures::pin_mut!(timer);
    match future::select(fut, timer).await {
        Either::Left((out, _)) => Ok(out),
        Either::Right(_) => Err(SyncError::Timeout(limit)),
    }
}

pub(crate) async fn sleep(duration: Duration) {
    #[cfg(not(target_arch = "wasm32"))]
    tokio::time::sleep(duration).await;
    #[cfg(target_arch = "wasm32")]
    gloo_timers::future::sleep(duration).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::error::ErrorKind;
    use crate::backend::mock::MockBackend;
    use serde_json::json;

    async fn api_for(mock: &MockBackend) -> MessengerApi {
        MessengerApi::new(mock.config()).unwrap()
    }

    #[tokio::test]
    async fn test_retrieve_returns_backend_sequence() {
        let mock = MockBackend::start().await;
        mock.set_messages(vec![
            json!({"sender": "Node 1", "message": "b", "timestamp": "2025-01-01 00:00:02"}),
            json!({"sender": "Node 1", "message": "a", "timestamp": "2025-01-01 00:00:01"}),
            json!({"sender": "Node 1", "message": "b", "timestamp": "2025-01-01 00:00:02"}),
        ]);
        let retrieved = api_for(&mock).await.retrieve_messages().await.unwrap();
        let texts: Vec<_> = retrieved.messages.iter().map(|m| m.message.clone()).collect();
        assert_eq!(texts, ["b", "a", "b"]);
        assert_eq!(mock.requests(), ["GET /messages"]);
    }

    #[tokio::test]
    async fn test_submit_posts_json_payload() {
        let mock = MockBackend::start().await;
        api_for(&mock).await.submit_message("hello").await.unwrap();
        assert_eq!(mock.requests(), ["POST /send"]);
        assert_eq!(mock.received_payloads(), [json!({"message": "hello"})]);
    }

    #[tokio::test]
    async fn test_submit_accepts_created_and_rejects_other_codes() {
        let mock = MockBackend::start().await;
        let api = api_for(&mock).await;

        mock.set_send_status(201);
        assert!(api.submit_message("ok").await.is_ok());

        mock.set_send_status(202);
        let err = api.submit_message("not ok").await.unwrap_err();
        assert_eq!(err, SyncError::Server { status: 202, detail: "Accepted".into() });

        mock.set_send_status(500);
        assert_eq!(api.submit_message("boom").await.unwrap_err().kind(), ErrorKind::Server);
    }

    #[tokio::test]
    async fn test_retrieve_maps_failures() {
        let mock = MockBackend::start().await;
        let api = api_for(&mock).await;

        mock.set_raw_listing("not json at all");
        assert_eq!(api.retrieve_messages().await.unwrap_err().kind(), ErrorKind::Decode);

        mock.set_list_status(503);
        assert_eq!(api.retrieve_messages().await.unwrap_err().kind(), ErrorKind::Server);
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_network_error() {
        let config = MockBackend::unreachable_config().await;
        let err = MessengerApi::new(config).unwrap().retrieve_messages().await.unwrap_err();
        assert!(matches!(err, SyncError::Network(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_slow_backend_times_out() {
        let mock = MockBackend::start().await;
        mock.delay_next_listing(Duration::from_secs(2));
        let mut config = mock.config();
        config.request_timeout = Duration::from_millis(200);
        let err = MessengerApi::new(config).unwrap().retrieve_messages().await.unwrap_err();
        assert_eq!(err, SyncError::Timeout(Duration::from_millis(200)));
        assert_eq!(err.kind(), ErrorKind::Network);
    }

    #[tokio::test]
    async fn test_check_status_reads_status_field() {
        let mock = MockBackend::start().await;
        let status = api_for(&mock).await.check_status().await.unwrap();
        assert_eq!(status, "Quantum Blockchain Backend Running");
    }
}
