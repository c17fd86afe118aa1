//! LlmClient trait definition

use async_trait::async_trait;

use super::{CompletionRequest, CompletionResponse, LlmError};

/// Stateless LLM client - each call is independent
///
/// One call is one outbound request. Implementations must not retry, cache
/// or keep conversation state between calls.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a single completion request and wait for the full response
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing::debug;

    /// Mock LLM client for unit tests
    pub struct MockLlmClient {
        replies: Mutex<VecDeque<Result<CompletionResponse, LlmError>>>,
        call_count: AtomicUsize,
        last_request: Mutex<Option<CompletionRequest>>,
    }

    impl MockLlmClient {
        pub fn new(replies: Vec<Result<CompletionResponse, LlmError>>) -> Self {
            debug!(reply_count = %replies.len(), "MockLlmClient::new: called");
            Self {
                replies: Mutex::new(replies.into()),
                call_count: AtomicUsize::new(0),
                last_request: Mutex::new(None),
            }
        }

        /// Mock that answers once with `text`
        pub fn with_text(text: impl Into<String>) -> Self {
            Self::new(vec![Ok(CompletionResponse::from_text(text))])
        }

        /// Mock that answers once with a response that has no content
        pub fn empty() -> Self {
            Self::new(vec![Ok(CompletionResponse::default())])
        }

        /// Mock that fails once with `error`
        pub fn failing(error: LlmError) -> Self {
            Self::new(vec![Err(error)])
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }

        pub fn last_request(&self) -> Option<CompletionRequest> {
            self.last_request.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmClient for MockLlmClient {
        async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
            debug!("MockLlmClient::complete: called");
            self.call_count.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some(request);
            self.replies.lock().unwrap().pop_front().unwrap_or_else(|| {
                debug!("MockLlmClient::complete: no more mock replies");
                Err(LlmError::InvalidResponse("No more mock responses".to_string()))
            })
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_mock_client_returns_replies_in_order() {
            let client = MockLlmClient::new(vec![
                Ok(CompletionResponse::from_text("Response 1")),
                Ok(CompletionResponse::from_text("Response 2")),
            ]);

            let req = CompletionRequest::text("Test", 1000);

            let resp1 = client.complete(req.clone()).await.unwrap();
            assert_eq!(resp1.content, Some("Response 1".to_string()));

            let resp2 = client.complete(req.clone()).await.unwrap();
            assert_eq!(resp2.content, Some("Response 2".to_string()));

            assert_eq!(client.call_count(), 2);
            assert_eq!(client.last_request().unwrap().prompt, "Test");
        }

        #[tokio::test]
        async fn test_mock_client_errors_when_exhausted() {
            let client = MockLlmClient::new(vec![]);
            let result = client.complete(CompletionRequest::text("Test", 1000)).await;
            assert!(result.is_err());
        }

        #[tokio::test]
        async fn test_mock_client_replays_errors() {
            let client = MockLlmClient::failing(LlmError::ApiError {
                status: 401,
                message: "bad key".to_string(),
            });
            let err = client.complete(CompletionRequest::text("Test", 10)).await.unwrap_err();
            assert_eq!(err.status(), Some(401));
        }
    }
}
