//! In-process adapter for chain and orchestrator tests.

use async_trait::async_trait;
use secrecy::SecretString;
use serde_json::json;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use super::{CredentialSlot, GenerationRequest, QuizProvider};
use crate::types::{QuizError, Result};

pub enum Reply {
    Text(String),
    RequestFailed,
    ShapeInvalid,
    Hang,
}

pub struct MockProvider {
    name: String,
    slot: Option<CredentialSlot>,
    reply: Reply,
    calls: AtomicU32,
}

impl MockProvider {
    pub fn new(name: &str, reply: Reply) -> Self {
        Self {
            name: name.to_string(),
            slot: None,
            reply,
            calls: AtomicU32::new(0),
        }
    }

    /// Adapter that answers with a valid quiz of `questions` items
    pub fn valid(name: &str, questions: usize) -> Self {
        Self::new(name, Reply::Text(quiz_json("Mock Quiz", questions, questions)))
    }

    pub fn failing(name: &str) -> Self {
        Self::new(name, Reply::RequestFailed)
    }

    pub fn needing(mut self, slot: CredentialSlot) -> Self {
        self.slot = Some(slot);
        self
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuizProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    fn credential(&self) -> Option<CredentialSlot> {
        self.slot
    }

    async fn generate(
        &self,
        _request: &GenerationRequest,
        _credential: Option<&SecretString>,
    ) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::RequestFailed => Err(QuizError::http_status(&self.name, 503, "unavailable")),
            Reply::ShapeInvalid => Err(QuizError::response_shape(&self.name, "no candidates")),
            Reply::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(String::new())
            }
        }
    }
}

/// Fenced quiz JSON declaring `declared` questions and delivering `delivered`
pub fn quiz_json(title: &str, declared: usize, delivered: usize) -> String {
    let questions: Vec<_> = (0..delivered)
        .map(|i| {
            if i % 2 == 0 {
                json!({
                    "question": format!("Which option is number {}?", i),
                    "type": "multiple-choice",
                    "options": ["A) one", "B) two", "C) three", "D) four"],
                    "answer": "B) two",
                    "explanation": "Because it is listed second.",
                    "difficulty": "medium"
                })
            } else {
                json!({
                    "question": format!("Statement {} is accurate.", i),
                    "type": "true-false",
                    "answer": "False",
                    "explanation": "It is not.",
                    "difficulty": "hard"
                })
            }
        })
        .collect();

    let body = json!({
        "title": title,
        "total_questions": declared,
        "questions": questions,
    });
    format!("```json\n{}\n```", body)
}

/// Serve one canned HTTP response on a local port, returning its base URL
///
/// The whole request is read before replying so the client never sees a reset.
pub async fn serve_once(status: &str, body: &str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let response = format!(
        "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );

    tokio::spawn(async move {
        let Ok((mut socket, _)) = listener.accept().await else {
            return;
        };

        let mut request = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            match socket.read(&mut chunk).await {
                Ok(0) | Err(_) => break,
                Ok(n) => request.extend_from_slice(&chunk[..n]),
            }
            if request_complete(&request) {
                break;
            }
        }

        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.shutdown().await;
    });

    format!("http://{}", addr)
}

fn request_complete(request: &[u8]) -> bool {
    let Some(header_end) = request.windows(4).position(|w| w == b"\r\n\r\n") else {
        return false;
    };
    let headers = String::from_utf8_lossy(&request[..header_end]).to_ascii_lowercase();
    let content_length = headers
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);
    request.len() >= header_end + 4 + content_length
}
