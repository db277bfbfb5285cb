//! Structured client events.
//!
//! The client reports what it did as [`ClientEvent`] values handed to an
//! [`EventSink`] chosen by the caller. [`TracingSink`] is the default and
//! forwards to `tracing`; which subscriber (if any) receives them is up to the
//! application.

use std::sync::{Mutex, PoisonError};

use ton_crypto::Hash256;
use ton_wallet::Address;
use tracing::{debug, info, warn};

use crate::transport::PayloadKind;

/// Something the client did or refused to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// Account state was read from the ledger.
    StateQueried {
        address: Address,
        balance: u64,
        seqno: u32,
        is_deployed: bool,
    },
    /// A wallet's cached seqno was replaced with the ledger's value.
    SeqnoRefreshed {
        address: Address,
        previous: u32,
        current: u32,
    },
    /// A payload was signed and is about to be broadcast.
    Signed {
        address: Address,
        kind: PayloadKind,
        hash: Hash256,
    },
    /// The ledger answered a broadcast.
    Broadcast {
        address: Address,
        kind: PayloadKind,
        hash: String,
        lt: u64,
        success: bool,
    },
    /// An operation failed.
    Failed {
        address: Address,
        operation: &'static str,
        reason: String,
    },
}

/// Receiver for [`ClientEvent`]s.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &ClientEvent);
}

/// Forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: &ClientEvent) {
        match event {
            ClientEvent::StateQueried {
                address,
                balance,
                seqno,
                is_deployed,
            } => debug!(%address, balance, seqno, is_deployed, "state queried"),
            ClientEvent::SeqnoRefreshed {
                address,
                previous,
                current,
            } => debug!(%address, previous, current, "seqno refreshed"),
            ClientEvent::Signed {
                address,
                kind,
                hash,
            } => debug!(%address, ?kind, hash = %hex::encode(hash), "payload signed"),
            ClientEvent::Broadcast {
                address,
                kind,
                hash,
                lt,
                success,
            } => info!(%address, ?kind, %hash, lt, success, "broadcast confirmed"),
            ClientEvent::Failed {
                address,
                operation,
                reason,
            } => warn!(%address, operation, %reason, "operation failed"),
        }
    }
}

/// Keeps every event in memory. Handy in tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<ClientEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events so far.
    pub fn events(&self) -> Vec<ClientEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: &ClientEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sink() {
        let sink = RecordingSink::new();
        let address = Address::from_parts([0u8; 32], 0);
        let event = ClientEvent::SeqnoRefreshed {
            address,
            previous: 0,
            current: 3,
        };
        sink.emit(&event);
        TracingSink.emit(&event);
        assert_eq!(sink.events(), vec![event]);
    }
}
