//! Mock CI trigger for testing

#![allow(dead_code)]

use async_trait::async_trait;
use branchflow::ci::{CiTarget, CiTrigger};
use branchflow::error::{Error, Result};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Call record for `trigger`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerCall {
    pub job: String,
    pub context: BTreeMap<String, String>,
    pub parameters: BTreeMap<String, String>,
}

/// CI trigger that records calls and can be told to fail
#[derive(Default)]
pub struct MockCi {
    calls: Mutex<Vec<TriggerCall>>,
    error: Mutex<Option<String>>,
}

impl MockCi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `trigger` return an error
    pub fn fail_trigger(&self, msg: &str) {
        *self.error.lock().unwrap() = Some(msg.to_string());
    }

    /// All recorded `trigger` calls
    pub fn calls(&self) -> Vec<TriggerCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CiTrigger for MockCi {
    async fn trigger(&self, target: &CiTarget, context: &BTreeMap<String, String>) -> Result<()> {
        self.calls.lock().unwrap().push(TriggerCall {
            job: target.job.clone(),
            context: context.clone(),
            parameters: target.resolve_parameters(context),
        });

        if let Some(msg) = self.error.lock().unwrap().as_ref() {
            return Err(Error::Ci(msg.clone()));
        }
        Ok(())
    }
}
