//! Compensating rollback for multi-step workflows.
//!
//! A workflow records each step once it has durably committed. If a later step fails,
//! [`Saga::compensate`] undoes the recorded steps in reverse order. Compensation errors
//! are logged and do not replace the failure that triggered the rollback.

#![allow(async_fn_in_trait)]

use std::fmt::Debug;

use crate::error::ApiError;

/// Knows how to undo a committed step of type `S`.
pub trait Compensate<S>: Send + Sync {
    async fn compensate(&self, step: &S) -> Result<(), ApiError>;
}

/// How a rollback ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SagaOutcome {
    /// Every recorded step was undone.
    Compensated { undone: usize },
    /// At least one undo failed; those steps may have left durable state behind.
    CompensationFailed { undone: usize, failed: usize },
}

#[derive(Debug)]
pub struct Saga<S> {
    name: &'static str,
    completed: Vec<S>,
}

impl<S: Debug> Saga<S> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            completed: Vec::new(),
        }
    }

    pub fn record(&mut self, step: S) {
        self.completed.push(step);
    }

    /// Undo every recorded step, newest first.
    pub async fn compensate<C: Compensate<S>>(self, compensator: &C) -> SagaOutcome {
        let mut undone = 0;
        let mut failed = 0;
        for step in self.completed.iter().rev() {
            match compensator.compensate(step).await {
                Ok(()) => {
                    undone += 1;
                    tracing::warn!(saga = self.name, ?step, "compensated step");
                }
                Err(e) => {
                    failed += 1;
                    tracing::error!(saga = self.name, ?step, error = %e, "compensation failed");
                }
            }
        }
        if failed == 0 {
            SagaOutcome::Compensated { undone }
        } else {
            SagaOutcome::CompensationFailed { undone, failed }
        }
    }
}
