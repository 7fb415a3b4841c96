use crate::core::error::StageError;

/// A single processing step in a pipeline.
///
/// A stage is a unary transformation: it reads the current payload and produces
/// the next one. Stages may fail with any error; failure handling is the
/// invoker's concern, not the stage's (see [`Invoker`](crate::strategy::Invoker)).
///
/// Fallbacks are stages too: a fallback registered alongside a stage is applied
/// to the **pre-stage** payload when the stage fails, and its result becomes
/// the stage's outcome.
///
/// # Implementing
///
/// Any `Fn(&T) -> Result<T, StageError>` is a stage, so closures work directly
/// (annotate the return type so inference can pick the error type):
///
/// ```ignore
/// let double = |payload: &i32| -> Result<i32, StageError> { Ok(payload * 2) };
/// let pipeline = Pipeline::new().pipe(double);
/// ```
///
/// Named stages implement the trait explicitly:
///
/// ```ignore
/// struct Negate;
///
/// impl Stage<i32> for Negate {
///     fn apply(&self, payload: &i32) -> Result<i32, StageError> {
///         Ok(-payload)
///     }
/// }
/// ```
pub trait Stage<T> {
    /// Apply this stage to the payload, producing the next payload.
    fn apply(&self, payload: &T) -> Result<T, StageError>;
}

impl<T, F> Stage<T> for F
where
    F: Fn(&T) -> Result<T, StageError>,
{
    fn apply(&self, payload: &T) -> Result<T, StageError> {
        self(payload)
    }
}
