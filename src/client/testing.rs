//! Scripted [`MediaApi`] for hook tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use super::{ClientError, Endpoint, MediaApi};

#[derive(Clone)]
struct Scripted {
    delay: Duration,
    result: Result<Value, (u16, String)>,
}

/// Answers by [`Endpoint::describe`] after a fixed delay. Unless
/// `honor_cancel` is set the answer arrives even after cancellation, like a
/// response that was already on the wire.
#[derive(Default)]
pub struct FakeApi {
    scripts: Mutex<HashMap<String, Scripted>>,
    calls: Mutex<Vec<String>>,
    honor_cancel: AtomicBool,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn honoring_cancel() -> Self {
        let api = Self::default();
        api.honor_cancel.store(true, Ordering::SeqCst);
        api
    }

    pub fn respond(&self, endpoint: &str, delay_ms: u64, data: Value) {
        self.scripts.lock().unwrap().insert(
            endpoint.to_string(),
            Scripted {
                delay: Duration::from_millis(delay_ms),
                result: Ok(data),
            },
        );
    }

    pub fn fail(&self, endpoint: &str, delay_ms: u64, status: u16, message: &str) {
        self.scripts.lock().unwrap().insert(
            endpoint.to_string(),
            Scripted {
                delay: Duration::from_millis(delay_ms),
                result: Err((status, message.to_string())),
            },
        );
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaApi for FakeApi {
    async fn fetch(
        &self,
        endpoint: &Endpoint,
        cancel: &CancellationToken,
    ) -> Result<Value, ClientError> {
        let key = endpoint.describe();
        self.calls.lock().unwrap().push(key.clone());
        let script = self.scripts.lock().unwrap().get(&key).cloned();
        let Some(script) = script else {
            return Err(ClientError::Status {
                status: 404,
                message: format!("no fake response for {}", key),
            });
        };

        if self.honor_cancel.load(Ordering::SeqCst) {
            tokio::select! {
                _ = cancel.cancelled() => return Err(ClientError::Cancelled),
                _ = tokio::time::sleep(script.delay) => {}
            }
        } else {
            tokio::time::sleep(script.delay).await;
        }
        script
            .result
            .map_err(|(status, message)| ClientError::Status { status, message })
    }
}

pub fn page_of(page: u32, ids: &[u64], total_pages: u32) -> Value {
    serde_json::json!({
        "page": page,
        "results": ids
            .iter()
            .map(|id| serde_json::json!({"id": id, "title": format!("Title {}", id)}))
            .collect::<Vec<_>>(),
        "total_pages": total_pages,
        "total_results": u64::from(total_pages) * 20
    })
}
