//! Batch Executor
//!
//! All-or-nothing execution. A [`Transactional`] target can copy its state
//! before an operation and put it back afterwards; [`atomically`] wraps one
//! fallible operation in that pair, and [`BatchExecutor`] runs a sequence of
//! dispatched calls as one such operation.

use crate::types::Address;
use thiserror::Error;
use tracing::{debug, warn};

/// State that can be snapshotted and rolled back
pub trait Transactional {
    type Snapshot;

    fn snapshot(&self) -> Self::Snapshot;

    fn restore(&mut self, snapshot: Self::Snapshot);

    /// Called once after an atomic operation succeeds
    fn commit(&mut self) {}
}

/// Run `f` against `target`; on error, restore the state from before the call
pub fn atomically<T, R, E, F>(target: &mut T, f: F) -> Result<R, E>
where
    T: Transactional,
    F: FnOnce(&mut T) -> Result<R, E>,
{
    let snapshot = target.snapshot();
    match f(target) {
        Ok(value) => {
            target.commit();
            Ok(value)
        }
        Err(err) => {
            target.restore(snapshot);
            Err(err)
        }
    }
}

/// Target that executes individual calls of a batch
pub trait Dispatch {
    type Call;
    type Output;
    type Error: std::error::Error + 'static;

    fn dispatch(
        &mut self,
        call: &Self::Call,
        caller: &Address,
    ) -> Result<Self::Output, Self::Error>;
}

/// Failure of one call inside a batch; nothing from the batch was applied
#[derive(Debug, Error)]
#[error("Batch call {index} failed: {source}")]
pub struct BatchError<E>
where
    E: std::error::Error + 'static,
{
    pub index: usize,
    pub source: E,
}

/// Executes call sequences atomically
pub struct BatchExecutor;

impl BatchExecutor {
    /// Execute `calls` in order as one unit
    ///
    /// Returns one output per call, or the first failure with every effect
    /// of the batch discarded.
    pub fn execute_all<T>(
        target: &mut T,
        calls: &[T::Call],
        caller: &Address,
    ) -> Result<Vec<T::Output>, BatchError<T::Error>>
    where
        T: Transactional + Dispatch,
    {
        debug!(calls = calls.len(), caller = %caller, "Executing batch");
        let result: Result<Vec<T::Output>, BatchError<T::Error>> = atomically(target, |target| {
            let mut outputs = Vec::with_capacity(calls.len());
            for (index, call) in calls.iter().enumerate() {
                let output = target
                    .dispatch(call, caller)
                    .map_err(|source| BatchError { index, source })?;
                outputs.push(output);
            }
            Ok(outputs)
        });
        if let Err(err) = &result {
            warn!(index = err.index, error = %err.source, "Batch rolled back");
        }
        result
    }
}
