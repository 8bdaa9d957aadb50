//! One chat session: the route-then-respond exchange over a message store

use eyre::Result;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::message::{ChatMessage, SystemTrace};
use super::store::MessageStore;
use crate::agent::{Intent, persona};
use crate::gateway::{Gateway, ModelClient};

pub const CLARIFICATION: &str = "I couldn't clearly understand your request. Could you please rephrase or specify if you need a concept explanation, motivational advice, or a study plan?";

pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred. Please try again.";

/// Shared "request in flight" flag, observable from other threads
#[derive(Debug, Clone, Default)]
pub struct LoadingFlag(Arc<AtomicBool>);

impl LoadingFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Set the flag until the returned guard drops
    pub fn begin(&self) -> LoadingGuard {
        self.0.store(true, Ordering::SeqCst);
        LoadingGuard(self.0.clone())
    }
}

/// Clears the loading flag on drop, including during unwinding
pub struct LoadingGuard(Arc<AtomicBool>);

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Orchestrates exchanges for one session
pub struct ChatSession<'g, C: ModelClient> {
    gateway: &'g Gateway<C>,
    store: MessageStore,
    loading: LoadingFlag,
}

impl<'g, C: ModelClient> ChatSession<'g, C> {
    pub fn new(gateway: &'g Gateway<C>, loading: LoadingFlag) -> Self {
        Self::with_store(gateway, loading, MessageStore::new())
    }

    /// Session over an existing store, e.g. one with a custom id source
    pub fn with_store(gateway: &'g Gateway<C>, loading: LoadingFlag, store: MessageStore) -> Self {
        Self { gateway, store, loading }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        self.store.messages()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_set()
    }

    /// Run one exchange for `input` and return the messages it appended.
    ///
    /// Blank input, or input arriving while a request is in flight, is
    /// ignored: nothing is appended and no remote call is made.
    pub fn submit(&mut self, input: &str) -> Option<&[ChatMessage]> {
        let text = input.trim();
        if text.is_empty() || self.loading.is_set() {
            return None;
        }

        let start = self.store.len();
        {
            let _loading = self.loading.begin();
            if let Err(e) = self.exchange(text) {
                log::error!("Error in multi-agent exchange: {:#}", e);
                if let Err(e) = self.store.push(ChatMessage::agent(UNEXPECTED_ERROR)) {
                    log::error!("Failed to record error message: {:#}", e);
                }
            }
        }

        Some(self.store.since(start))
    }

    fn exchange(&mut self, text: &str) -> Result<()> {
        self.store.push(ChatMessage::user(text))?;

        let decision = self.gateway.route(text);
        if !persona::handles(&decision.agent, &decision.intent) {
            log::warn!("Unexpected routing pair: {} -> {}", decision.intent, decision.agent);
        }
        self.store.push(ChatMessage::trace(SystemTrace::new(&decision)))?;

        let reply = if decision.intent == Intent::Unknown {
            log::info!("Intent unknown, asking the student to clarify");
            CLARIFICATION.to_string()
        } else {
            self.gateway.respond(&decision.agent, text)
        };

        self.store.push(ChatMessage::agent(&reply))
    }
}
