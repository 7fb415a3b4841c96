use thiserror::Error;

/// Error type carried by stages and fallbacks.
///
/// Stages may fail with any error; the pipeline propagates it to the caller
/// unchanged, so the concrete type stays downcastable:
///
/// ```ignore
/// let err = pipeline.process(payload).unwrap_err();
/// if let Some(violation) = err.downcast_ref::<LoyaltyViolation>() {
///     println!("expected {}", violation.expected);
/// }
/// ```
pub type StageError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A processed payload failed the loyalty check of a [`Loyal`] invoker.
///
/// Raised only in [`LoyaltyMode::Interrupt`]; in reset mode the violation is
/// suppressed and the pre-stage payload is kept instead.
///
/// [`Loyal`]: crate::strategy::loyal::Loyal
/// [`LoyaltyMode::Interrupt`]: crate::strategy::loyal::LoyaltyMode
#[derive(Debug, Error)]
#[error("processed payload failed the loyalty check, expecting {expected}")]
pub struct LoyaltyViolation {
    /// Label of the expected type or interface, for diagnostics.
    pub expected: String,
}

/// An unrecognized loyalty mode value was supplied.
///
/// Returned when parsing a [`LoyaltyMode`] from a string, typically out of
/// caller configuration. Fatal to construction; never recovered internally.
///
/// [`LoyaltyMode`]: crate::strategy::loyal::LoyaltyMode
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown loyalty mode: {0}")]
pub struct UnknownMode(pub String);
