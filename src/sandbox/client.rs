use serde_json::Value;
use std::{
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};
use thiserror::Error;

use super::wire::{ExecuteRequest, ExecuteResponse};

#[derive(Error, Debug)]
pub enum SandboxError {
    #[error("a submission is already running")]
    Busy,

    #[error("HTTP request failed: {0}")]
    Http(#[from] ureq::Error),

    #[error("Failed to read response body: {0}")]
    Io(#[from] std::io::Error),

    #[error("Sandbox returned an error: {status} {message}")]
    Server { status: u16, message: String },
}

/// Blocking client of the hosted code-execution service. One submission at a
/// time: a second `execute` while one is pending fails with `Busy`.
pub struct SandboxClient {
    url: String,
    timeout: Duration,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when the submission ends, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl SandboxClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn begin(&self) -> Result<InFlight<'_>, SandboxError> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| InFlight(&self.in_flight))
            .map_err(|_| SandboxError::Busy)
    }

    pub fn execute(&self, request: &ExecuteRequest) -> Result<ExecuteResponse, SandboxError> {
        let _guard = self.begin()?;

        log::info!(
            "submitting {} file(s) to {} ({} {})",
            request.files.len(),
            self.url,
            request.language,
            request.version
        );

        let response = ureq::post(&self.url)
            .timeout(self.timeout)
            .set("Content-Type", "application/json")
            .send_json(request)
            .map_err(|e| {
                let err = match e {
                    ureq::Error::Status(status, response) => SandboxError::Server {
                        status,
                        message: error_message(response),
                    },
                    other => SandboxError::Http(other),
                };
                log::warn!("sandbox submission failed: {}", err);
                err
            })?;

        let body: ExecuteResponse = response.into_json()?;
        log::debug!("sandbox run exited with {:?}", body.run.code);
        Ok(body)
    }
}

/// The sandbox answers errors with `{"message": ...}`; fall back to the raw body.
fn error_message(response: ureq::Response) -> String {
    let body = response.into_string().unwrap_or_default();
    serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(String::from))
        .unwrap_or(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sandbox::Language;

    #[test]
    fn second_submission_while_busy_is_rejected() {
        let client = SandboxClient::new("http://127.0.0.1:9", Duration::from_secs(1));
        let request = ExecuteRequest::new(Language::Python, "print('hi')");

        let guard = client.begin().unwrap();
        assert!(client.is_busy());
        assert!(matches!(client.execute(&request), Err(SandboxError::Busy)));

        drop(guard);
        assert!(!client.is_busy());
    }

    #[test]
    fn failed_submission_releases_the_guard() {
        // nothing listens on the discard port
        let client = SandboxClient::new("http://127.0.0.1:9/execute", Duration::from_secs(2));
        let request = ExecuteRequest::new(Language::Python, "print('hi')");

        let result = client.execute(&request);
        assert!(matches!(result, Err(SandboxError::Http(_))));
        assert!(!client.is_busy());
    }
}
