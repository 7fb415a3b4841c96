use crate::core::error::StageError;
use crate::core::stage_collection::StageCollection;
use crate::stages::Stage;

/// Pass-through invoker, the default strategy
pub mod direct;

/// Loyalty-checking decorator with interrupt/reset recovery modes
pub mod loyal;

/// Degenerate minimal invoker, kept as an extension-point example
pub mod naive;

/// Policy object deciding how a single stage is invoked and how its failure
/// is resolved.
///
/// Every pipeline owns exactly one invoker. The shipped variants are
/// [`Direct`](direct::Direct) (invoke, rescue with the fallback on failure),
/// [`Loyal`](loyal::Loyal) (decorator that additionally validates the
/// resulting payload), and [`Naive`](naive::Naive) (minimal reference
/// implementation). Callers may supply their own by implementing this trait.
///
/// # Custom invokers
///
/// Only [`process`](Self::process) needs implementing;
/// [`process_stack`](Self::process_stack) is the shared in-order fold over a
/// collection and is rarely overridden.
pub trait Invoker<T> {
    /// Process a single stage and its optionally associated fallback with the
    /// provided payload.
    ///
    /// On stage failure, a present fallback is invoked with the pre-stage
    /// payload and its result is the final outcome for this stage. Fallback
    /// failures propagate uncaught. Without a fallback the stage's error
    /// propagates unchanged.
    fn process(
        &self,
        payload: &T,
        stage: &dyn Stage<T>,
        fallback: Option<&dyn Stage<T>>,
    ) -> Result<T, StageError>;

    /// Process a whole stage collection with the provided payload, threading
    /// the payload through every entry in insertion order.
    fn process_stack(&self, payload: T, stages: &StageCollection<T>) -> Result<T, StageError>
    where
        T: 'static,
    {
        let mut payload = payload;

        for entry in stages.iter() {
            payload = self.process(&payload, entry.stage(), entry.fallback())?;
        }

        Ok(payload)
    }
}
