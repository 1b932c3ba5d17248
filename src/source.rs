// contact-deck/src/source.rs

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use crate::{
    clock::Clock,
    config::SourceConfig,
    contacts::{Contact, ContactName, Picture},
};

/// Anything that can produce a fresh contact collection.
#[async_trait]
pub trait ContactSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<Contact>>;
}

#[derive(Deserialize)]
struct UpstreamBody {
    results: Vec<UpstreamContact>,
}

#[derive(Deserialize)]
struct UpstreamContact {
    #[serde(default)]
    id: Option<UpstreamId>,
    #[serde(default)]
    name: ContactName,
    #[serde(default)]
    email: String,
    #[serde(default)]
    phone: String,
    #[serde(default)]
    picture: Picture,
}

#[derive(Deserialize)]
struct UpstreamId {
    #[serde(default)]
    value: Option<String>,
}

/// `contact-<index>-<fetched_at_ms>` unless upstream supplied a non-empty id.
pub fn backfill_id(upstream: Option<String>, index: usize, fetched_at_ms: i64) -> String {
    match upstream {
        Some(v) if !v.is_empty() => v,
        _ => format!("contact-{index}-{fetched_at_ms}"),
    }
}

/// Parses a `{"results": [...]}` body into contacts with guaranteed ids.
pub fn ingest(body: &str, fetched_at_ms: i64) -> Result<Vec<Contact>> {
    let parsed: UpstreamBody = serde_json::from_str(body).context("parse contact source body")?;
    Ok(parsed.results.into_iter().enumerate().map(|(i, c)| Contact {
        id: backfill_id(c.id.and_then(|id| id.value), i, fetched_at_ms),
        name: c.name,
        email: c.email,
        phone: c.phone,
        picture: c.picture,
    }).collect())
}

pub struct HttpContactSource {
    client: reqwest::Client,
    url: String,
    results: u32,
    clock: Arc<dyn Clock>,
}

impl HttpContactSource {
    pub fn new(cfg: &SourceConfig, clock: Arc<dyn Clock>) -> Self {
        Self { client: reqwest::Client::new(), url: cfg.url().to_string(), results: cfg.results(), clock }
    }
}

#[async_trait]
impl ContactSource for HttpContactSource {
    async fn fetch(&self) -> Result<Vec<Contact>> {
        let body = self.client.get(&self.url)
            .query(&[("results", self.results)])
            .send().await
            .with_context(|| format!("GET {}", self.url))?
            .error_for_status()?
            .text().await?;
        let contacts = ingest(&body, self.clock.now_ms())?;
        info!(url = %self.url, count = contacts.len(), "fetched contacts");
        Ok(contacts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use tokio::{io::{AsyncReadExt, AsyncWriteExt}, net::TcpListener, task::JoinHandle};

    /// Answers a single request with `status` and `body`; yields the request line.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            let mut req = Vec::new();
            let mut buf = [0u8; 1024];
            while !req.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = sock.read(&mut buf).await.unwrap();
                if n == 0 { break; }
                req.extend_from_slice(&buf[..n]);
            }
            let resp = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            sock.write_all(resp.as_bytes()).await.unwrap();
            let _ = sock.shutdown().await;
            String::from_utf8_lossy(&req).lines().next().unwrap_or_default().to_string()
        });
        (format!("http://{addr}/api/"), handle)
    }

    #[tokio::test]
    async fn http_source_asks_for_result_count_and_backfills_ids() {
        let body = r#"{"results": [
            {"id": {"value": null}, "name": {"first": "Ann", "last": "Lee"}, "email": "ann@example.com", "phone": "1"},
            {"id": {"value": "u-9"}, "name": {"first": "Bo", "last": "Ray"}, "email": "bo@example.com", "phone": "2"}
        ]}"#;
        let (url, server) = serve_once("200 OK", body).await;
        let cfg = SourceConfig { url: Some(url), results: Some(3) };
        let contacts = HttpContactSource::new(&cfg, Arc::new(ManualClock::new(77))).fetch().await.unwrap();
        let ids: Vec<_> = contacts.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["contact-0-77", "u-9"]);

        let request_line = server.await.unwrap();
        assert!(request_line.starts_with("GET /api/?results=3 "), "unexpected request: {request_line}");
    }

    #[tokio::test]
    async fn http_source_reports_error_status() {
        let (url, server) = serve_once("503 Service Unavailable", "{}").await;
        let cfg = SourceConfig { url: Some(url), results: None };
        assert!(HttpContactSource::new(&cfg, Arc::new(ManualClock::new(0))).fetch().await.is_err());
        assert!(server.await.unwrap().contains("results=10"));
    }

    #[test]
    fn missing_or_null_ids_are_backfilled_by_position() {
        let body = r#"{"results": [
            {"id": {"name": "SSN", "value": "123"}, "name": {"title": "Ms", "first": "Ann", "last": "Lee"},
             "email": "ann@example.com", "phone": "1", "picture": {"thumbnail": "t", "medium": "m", "large": "l"}},
            {"id": {"name": "", "value": null}, "name": {"first": "Bo", "last": "Ray"}, "email": "bo@example.com", "phone": "2"},
            {"name": {"first": "Cy", "last": "Xu"}, "email": "cy@example.com", "phone": "3"}
        ], "info": {"seed": "abc"}}"#;
        let contacts = ingest(body, 42).unwrap();
        let ids: Vec<_> = contacts.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["123", "contact-1-42", "contact-2-42"]);
        assert_eq!(contacts[0].picture.large, "l");
        assert_eq!(contacts[0].full_name(), "Ann Lee");
    }

    #[test]
    fn empty_string_id_counts_as_missing() {
        assert_eq!(backfill_id(Some(String::new()), 0, 7), "contact-0-7");
        assert_eq!(backfill_id(None, 3, 7), "contact-3-7");
        assert_eq!(backfill_id(Some("k".into()), 0, 7), "k");
    }

    #[test]
    fn body_without_results_is_an_error() {
        assert!(ingest(r#"{"error": "down"}"#, 0).is_err());
        assert!(ingest("<html>", 0).is_err());
    }
}
