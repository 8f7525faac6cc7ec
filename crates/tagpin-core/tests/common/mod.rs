//! Common test helpers for tagpin-core integration tests
//!
//! Provides stub backends that record how the resolver drives them:
//! - `StubFactory` records every target it is asked to build
//! - `StubRegistry` answers with a canned digest or error and counts calls

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tagpin_core::{BackendError, BackendFactory, Registry, RegistryTarget};

/// Canned backend answer
#[derive(Debug, Clone)]
pub enum Answer {
    Digest(String),
    Fail(String),
}

/// Backend returning a fixed answer
pub struct StubRegistry {
    answer: Answer,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl Registry for StubRegistry {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn digest(&self) -> Result<String, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.answer {
            Answer::Digest(d) => Ok(d.clone()),
            Answer::Fail(msg) => Err(BackendError::Other(msg.clone())),
        }
    }
}

/// Factory handing out `StubRegistry` backends
#[derive(Clone)]
pub struct StubFactory {
    answer: Answer,
    pub calls: Arc<AtomicUsize>,
    pub targets: Arc<Mutex<Vec<RegistryTarget>>>,
}

impl StubFactory {
    pub fn digest(digest: &str) -> Self {
        Self::with_answer(Answer::Digest(digest.to_string()))
    }

    pub fn failing(message: &str) -> Self {
        Self::with_answer(Answer::Fail(message.to_string()))
    }

    fn with_answer(answer: Answer) -> Self {
        Self {
            answer,
            calls: Arc::new(AtomicUsize::new(0)),
            targets: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Number of `digest()` calls made on built backends
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Targets built so far
    pub fn built(&self) -> Vec<RegistryTarget> {
        self.targets.lock().unwrap().clone()
    }
}

impl BackendFactory for StubFactory {
    fn build(&self, target: RegistryTarget) -> Box<dyn Registry> {
        self.targets.lock().unwrap().push(target);
        Box::new(StubRegistry {
            answer: self.answer.clone(),
            calls: Arc::clone(&self.calls),
        })
    }
}
