//! In-memory transport that records every call.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::config::ChannelRef;
use crate::error::TransportError;
use crate::transport::{Membership, Transport};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Copy {
        from: ChannelRef,
        to: ChannelRef,
        message_id: i32,
    },
    CopyAlbum {
        from: ChannelRef,
        to: ChannelRef,
        message_ids: Vec<i32>,
    },
    Send {
        user_id: u64,
        text: String,
    },
    Membership(ChannelRef),
}

#[derive(Default)]
pub struct RecordingTransport {
    calls: Mutex<Vec<Call>>,
    copy_failures: Mutex<VecDeque<TransportError>>,
    send_fails: AtomicBool,
    memberships: Mutex<HashMap<String, Result<Membership, TransportError>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an error for the next copy call.
    pub fn fail_next_copy(&self, error: TransportError) {
        self.copy_failures.lock().unwrap().push_back(error);
    }

    pub fn fail_sends(&self) {
        self.send_fails.store(true, Ordering::SeqCst);
    }

    pub fn set_membership(
        &self,
        channel: &ChannelRef,
        membership: Result<Membership, TransportError>,
    ) {
        self.memberships
            .lock()
            .unwrap()
            .insert(channel.to_string(), membership);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn copies(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Copy { .. } | Call::CopyAlbum { .. }))
            .collect()
    }

    pub fn sent_texts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Send { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_copy_result(&self) -> Result<(), TransportError> {
        match self.copy_failures.lock().unwrap().pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn copy_message(
        &self,
        from: &ChannelRef,
        to: &ChannelRef,
        message_id: i32,
    ) -> Result<(), TransportError> {
        self.record(Call::Copy {
            from: from.clone(),
            to: to.clone(),
            message_id,
        });
        self.next_copy_result()
    }

    async fn copy_album(
        &self,
        from: &ChannelRef,
        to: &ChannelRef,
        message_ids: &[i32],
    ) -> Result<(), TransportError> {
        self.record(Call::CopyAlbum {
            from: from.clone(),
            to: to.clone(),
            message_ids: message_ids.to_vec(),
        });
        self.next_copy_result()
    }

    async fn send_to_user(&self, user_id: u64, text: &str) -> Result<(), TransportError> {
        self.record(Call::Send {
            user_id,
            text: text.to_string(),
        });
        if self.send_fails.load(Ordering::SeqCst) {
            Err(TransportError::Api("Forbidden: bot was blocked by the user".into()))
        } else {
            Ok(())
        }
    }

    async fn bot_membership(&self, channel: &ChannelRef) -> Result<Membership, TransportError> {
        self.record(Call::Membership(channel.clone()));
        self.memberships
            .lock()
            .unwrap()
            .get(&channel.to_string())
            .cloned()
            .unwrap_or(Ok(Membership::Absent))
    }
}
