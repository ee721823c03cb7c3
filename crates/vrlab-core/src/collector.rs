//! Interaction collectors.
//!
//! A [`Collector`] receives every interaction the dispatcher emits. Submission
//! is fire-and-forget: `submit` never blocks the caller and never reports
//! failure back to the interaction flow. Failed submissions are logged and
//! dropped, with no retry.

use std::time::Duration;

use vrlab_types::InteractionSubmission;

/// Errors raised while building a collector.
#[derive(Debug, thiserror::Error)]
pub enum CollectorError {
    /// The HTTP client could not be constructed.
    #[error("failed to build collector HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Sink for interaction submissions.
pub trait Collector: Send + Sync {
    /// Hand a submission to the collector. Must not block.
    fn submit(&self, submission: InteractionSubmission);
}

// ---------------------------------------------------------------------------
// Null collector
// ---------------------------------------------------------------------------

/// Drops every submission.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullCollector;

impl Collector for NullCollector {
    fn submit(&self, submission: InteractionSubmission) {
        tracing::trace!(
            interaction_type = submission.interaction_type.as_deref().unwrap_or_default(),
            "Collection disabled, dropping interaction"
        );
    }
}

// ---------------------------------------------------------------------------
// HTTP collector
// ---------------------------------------------------------------------------

/// Posts submissions as JSON to a remote interactions endpoint.
///
/// Each submission is sent from its own task on the current Tokio runtime.
/// Calls made outside a runtime are logged and dropped.
#[derive(Debug, Clone)]
pub struct HttpCollector {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpCollector {
    /// Create a collector posting to `endpoint`, with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`CollectorError::Client`] if the TLS backend cannot be initialized.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, CollectorError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// The endpoint submissions are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Collector for HttpCollector {
    fn submit(&self, submission: InteractionSubmission) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(
                endpoint = %self.endpoint,
                "No async runtime available, dropping interaction"
            );
            return;
        };

        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        handle.spawn(async move {
            let interaction_type = submission.interaction_type.clone().unwrap_or_default();
            match client.post(&endpoint).json(&submission).send().await {
                Ok(response) if response.status().is_success() => {
                    tracing::debug!(
                        endpoint = %endpoint,
                        interaction_type = %interaction_type,
                        "Interaction submitted"
                    );
                }
                Ok(response) => {
                    tracing::warn!(
                        endpoint = %endpoint,
                        status = %response.status(),
                        interaction_type = %interaction_type,
                        "Collector rejected interaction, dropping"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        endpoint = %endpoint,
                        error = %e,
                        interaction_type = %interaction_type,
                        "Failed to submit interaction, dropping"
                    );
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_collector_accepts_anything() {
        NullCollector.submit(InteractionSubmission::default());
    }

    #[test]
    fn http_collector_outside_runtime_drops_silently() {
        let collector = HttpCollector::new("http://127.0.0.1:9/api/interactions", Duration::from_millis(50));
        assert!(collector.is_ok());
        if let Ok(collector) = collector {
            assert_eq!(collector.endpoint(), "http://127.0.0.1:9/api/interactions");
            collector.submit(InteractionSubmission::default());
        }
    }

    #[tokio::test]
    async fn http_collector_does_not_block_on_unreachable_endpoint() {
        let collector =
            HttpCollector::new("http://127.0.0.1:9/api/interactions", Duration::from_millis(50));
        assert!(collector.is_ok());
        if let Ok(collector) = collector {
            let started = std::time::Instant::now();
            collector.submit(InteractionSubmission::default());
            assert!(started.elapsed() < Duration::from_millis(50));
        }
    }
}
