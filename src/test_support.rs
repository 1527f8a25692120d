//! Loopback HTTP server for exercising the real clients in tests
//!
//! Serves one canned response per connection (the last one repeats) and
//! records every request it sees.

use crate::config::Config;
use reqwest::Client;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

pub const TEST_API_KEY: &str = "test-key";

#[derive(Debug, Clone)]
pub struct CannedResponse {
    status: u16,
    body: String,
}

impl CannedResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    fn to_http(&self) -> String {
        let reason = match self.status {
            200 => "OK",
            400 => "Bad Request",
            404 => "Not Found",
            500 => "Internal Server Error",
            503 => "Service Unavailable",
            _ => "Unknown",
        };
        format!(
            "HTTP/1.1 {} {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            self.status,
            reason,
            self.body.len(),
            self.body
        )
    }
}

#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    headers: HashMap<String, String>,
    pub body: String,
}

impl CapturedRequest {
    /// Header value by lowercase name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    pub fn json_body(&self) -> Value {
        serde_json::from_str(&self.body).expect("request body is JSON")
    }
}

pub struct CannedServer {
    base_url: String,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl CannedServer {
    pub async fn start(responses: Vec<CannedResponse>) -> Self {
        assert!(!responses.is_empty(), "at least one canned response");

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind loopback");
        let addr = listener.local_addr().expect("local addr");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let captured = requests.clone();

        tokio::spawn(async move {
            let mut served = 0usize;
            while let Ok((mut stream, _)) = listener.accept().await {
                let Ok(request) = read_request(&mut stream).await else {
                    continue;
                };
                captured.lock().unwrap().push(request);

                let response = &responses[served.min(responses.len() - 1)];
                served += 1;
                let _ = stream.write_all(response.to_http().as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });

        Self {
            base_url: format!("http://{}", addr),
            requests,
        }
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Config pointing both services at this server
    pub fn config(&self) -> Config {
        let analytics = format!("{}/graphql", self.base_url);
        let registry = self.base_url.clone();
        Config::from_lookup(move |key| match key {
            "BITQUERY_API_KEY" => Some(TEST_API_KEY.to_string()),
            "BITQUERY_ENDPOINT" => Some(analytics.clone()),
            "ONCHAINBRAIN_API_URL" => Some(registry.clone()),
            _ => None,
        })
        .expect("test config")
    }

    /// Client that ignores proxy environment variables
    pub fn http_client(&self) -> Client {
        Client::builder().no_proxy().build().expect("test client")
    }
}

async fn read_request(stream: &mut TcpStream) -> std::io::Result<CapturedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    let header_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break buf.len();
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next().unwrap_or_default().split_whitespace();
    let method = request_line.next().unwrap_or_default().to_string();
    let path = request_line.next().unwrap_or_default().to_string();

    let headers: HashMap<String, String> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(name, value)| (name.trim().to_ascii_lowercase(), value.trim().to_string()))
        .collect();

    let length = headers
        .get("content-length")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + length {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let body = String::from_utf8_lossy(&buf[header_end..]).to_string();

    Ok(CapturedRequest {
        method,
        path,
        headers,
        body,
    })
}
