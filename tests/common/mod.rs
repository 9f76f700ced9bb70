#![allow(dead_code)]

use async_trait::async_trait;
use paylink_confirm::domain::order::OrderId;
use paylink_confirm::domain::payment::PaymentStatus;
use paylink_confirm::domain::ports::PaymentStatusLookup;
use paylink_confirm::error::{ConfirmError, Result};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::time::Instant;

/// One scripted backend answer.
pub enum Reply {
    Status(PaymentStatus),
    Fail(&'static str),
}

/// A status lookup that replays scripted answers and records every call.
#[derive(Clone, Default)]
pub struct ScriptedLookup {
    replies: Arc<Mutex<VecDeque<Reply>>>,
    calls: Arc<Mutex<Vec<(OrderId, String, Instant)>>>,
}

impl ScriptedLookup {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.into())),
            calls: Arc::default(),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn called_ids(&self) -> Vec<u64> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(id, _, _)| id.value())
            .collect()
    }

    pub fn call_times(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().iter().map(|(_, _, at)| *at).collect()
    }

    pub fn tokens_seen(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, token, _)| token.clone())
            .collect()
    }
}

#[async_trait]
impl PaymentStatusLookup for ScriptedLookup {
    async fn payment_status(&self, order_id: OrderId, token: &str) -> Result<PaymentStatus> {
        self.calls
            .lock()
            .unwrap()
            .push((order_id, token.to_string(), Instant::now()));
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("lookup called more often than scripted");
        match reply {
            Reply::Status(status) => Ok(status),
            Reply::Fail(message) => Err(ConfirmError::ApiError {
                status: 503,
                message: message.to_string(),
            }),
        }
    }
}
