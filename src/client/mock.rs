//! Scripted transport for testing
//!
//! Replays a fixed sequence of responses and captures every request so tests
//! can drive backend clients without a real scanner.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::transport::{OutboundRequest, RawResponse, Transport};
use crate::error::{ApiError, Result};

/// Mock transport returning scripted responses in order.
///
/// Once the script runs out every further request fails with
/// [`ApiError::Transport`].
///
/// # Example
/// ```ignore
/// let transport = Arc::new(ScriptedTransport::new(vec![
///     RawResponse::new(200, r#"{"generate": "/tmp/r.html"}"#),
/// ]));
/// let client = ZapClient::new(transport.clone(), &setting);
/// ```
#[derive(Default)]
pub struct ScriptedTransport {
    /// Responses to hand out, front first
    responses: Mutex<VecDeque<RawResponse>>,
    /// Every request seen, including ones that failed
    captured: Mutex<Vec<OutboundRequest>>,
    /// Request index that fails with a transport error
    fail_at: Option<(usize, String)>,
    /// Cancel this token after serving N responses
    cancel_after: Option<(usize, CancellationToken)>,
}

impl ScriptedTransport {
    /// Create a transport that replays `responses` in order.
    pub fn new(responses: Vec<RawResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            ..Default::default()
        }
    }

    /// Fail the request at `index` (0-based) with a transport error.
    pub fn fail_at(mut self, index: usize, message: &str) -> Self {
        self.fail_at = Some((index, message.to_string()));
        self
    }

    /// Cancel `token` once `served` responses have been returned.
    pub fn cancel_after(mut self, served: usize, token: CancellationToken) -> Self {
        self.cancel_after = Some((served, token));
        self
    }

    /// All captured requests, in order.
    pub fn requests(&self) -> Vec<OutboundRequest> {
        self.captured.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: OutboundRequest) -> Result<RawResponse> {
        let index = {
            let mut captured = self.captured.lock().unwrap();
            captured.push(request);
            captured.len() - 1
        };

        if let Some((fail_index, ref message)) = self.fail_at
            && fail_index == index
        {
            return Err(ApiError::Transport(message.clone()).into());
        }

        let response = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| ApiError::Transport("script exhausted".to_string()))?;

        if let Some((served, ref token)) = self.cancel_after
            && index + 1 >= served
        {
            token.cancel();
        }

        Ok(response)
    }
}
