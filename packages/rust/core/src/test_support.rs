//! Test doubles for the completion service and progress reporter.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use seoforge_shared::{PhaseEvent, PipelineMode, Result, SeoForgeError};

use crate::llm::CompletionService;
use crate::progress::ProgressReporter;

/// Answers call `n` (1-based) with `response n`, optionally failing on one call.
#[derive(Default)]
pub struct ScriptedCompletion {
    calls: Mutex<Vec<(String, String)>>,
    fail_on: Option<usize>,
}

impl ScriptedCompletion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(call: usize) -> Self {
        Self {
            fail_on: Some(call),
            ..Self::default()
        }
    }

    /// `(system, prompt)` pairs in call order.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.calls().into_iter().map(|(_, prompt)| prompt).collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionService for ScriptedCompletion {
    fn model(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        let n = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((system.to_string(), prompt.to_string()));
            calls.len()
        };
        if self.fail_on == Some(n) {
            return Err(SeoForgeError::Completion(format!("scripted failure on call {n}")));
        }
        Ok(format!("response {n}"))
    }
}

/// Records every event it receives.
#[derive(Default)]
pub struct RecordingProgress {
    events: Mutex<Vec<PhaseEvent>>,
    finished: Mutex<Option<PipelineMode>>,
}

impl RecordingProgress {
    pub fn events(&self) -> Vec<PhaseEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn finished(&self) -> Option<PipelineMode> {
        *self.finished.lock().unwrap()
    }
}

impl ProgressReporter for RecordingProgress {
    fn phase(&self, event: &PhaseEvent) {
        self.events.lock().unwrap().push(*event);
    }

    fn done(&self, mode: PipelineMode, _elapsed: Duration) {
        *self.finished.lock().unwrap() = Some(mode);
    }
}
