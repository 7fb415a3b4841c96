use tracing::trace;

use crate::core::error::StageError;
use crate::stages::Stage;
use crate::strategy::Invoker;

/// The pass-through invoker used when a pipeline is built without an explicit
/// strategy.
///
/// Invokes the stage with the payload. On success the stage's result is final.
/// On failure, a registered fallback is invoked with the pre-stage payload and
/// its result stands in for the stage's; a failing fallback propagates its own
/// error. Without a fallback the stage's error propagates unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Direct;

impl<T> Invoker<T> for Direct {
    fn process(
        &self,
        payload: &T,
        stage: &dyn Stage<T>,
        fallback: Option<&dyn Stage<T>>,
    ) -> Result<T, StageError> {
        match stage.apply(payload) {
            Ok(next) => Ok(next),
            Err(error) => match fallback {
                Some(fallback) => {
                    trace!(%error, "stage failed, invoking fallback");
                    fallback.apply(payload)
                }
                None => Err(error),
            },
        }
    }
}
