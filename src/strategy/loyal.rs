use std::any::Any;
use std::rc::Rc;
use std::str::FromStr;

use tracing::trace;

use crate::core::error::{LoyaltyViolation, StageError, UnknownMode};
use crate::stages::Stage;
use crate::strategy::Invoker;

/// Recovery behavior of a [`Loyal`] invoker when a processed payload is not
/// loyal (or when the wrapped invoker failed and no fallback rescued it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoyaltyMode {
    /// Propagate the failure to the caller.
    #[default]
    Interrupt,
    /// Suppress the failure and keep the pre-stage payload unchanged.
    Reset,
}

impl FromStr for LoyaltyMode {
    type Err = UnknownMode;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "interrupt" => Ok(Self::Interrupt),
            "reset" => Ok(Self::Reset),
            other => Err(UnknownMode(other.to_string())),
        }
    }
}

/// Decorator that validates the payload coming out of another invoker.
///
/// Wraps any [`Invoker`] and, after delegating to it, checks the resulting
/// payload against a caller-supplied predicate. A payload passing the check is
/// *loyal*; a disloyal payload is handled according to the [`LoyaltyMode`]:
///
/// * [`LoyaltyMode::Interrupt`] (default) - a [`LoyaltyViolation`] carrying
///   the `expected` label propagates to the caller. Errors out of the wrapped
///   invoker propagate as themselves.
/// * [`LoyaltyMode::Reset`] - any failure is silently discarded; the pre-stage
///   payload is returned unchanged and execution continues with the next
///   stage.
///
/// Decorators nest: `Loyal` wrapping another `Loyal` applies both checks.
///
/// # Example
///
/// ```ignore
/// let invoker = Loyal::new(
///     Direct,
///     "non-negative i32",
///     |payload: &i32| *payload >= 0,
///     LoyaltyMode::Reset,
/// );
/// let pipeline = Pipeline::with_invoker(invoker).pipe(Negate);
///
/// // Negate produces -3, which fails the check; reset keeps the input.
/// assert_eq!(pipeline.process(3).unwrap(), 3);
/// ```
pub struct Loyal<T, I> {
    inner: I,
    check: Box<dyn Fn(&T) -> bool>,
    expected: String,
    mode: LoyaltyMode,
}

impl<T, I> Loyal<T, I> {
    /// Wrap `inner`, validating processed payloads with `check`.
    ///
    /// `expected` labels the expected type or interface in the
    /// [`LoyaltyViolation`] raised on a failed check.
    pub fn new(
        inner: I,
        expected: impl Into<String>,
        check: impl Fn(&T) -> bool + 'static,
        mode: LoyaltyMode,
    ) -> Self {
        Self {
            inner,
            check: Box::new(check),
            expected: expected.into(),
            mode,
        }
    }
}

impl<T: Clone, I: Invoker<T>> Invoker<T> for Loyal<T, I> {
    fn process(
        &self,
        payload: &T,
        stage: &dyn Stage<T>,
        fallback: Option<&dyn Stage<T>>,
    ) -> Result<T, StageError> {
        let outcome = match self.inner.process(payload, stage, fallback) {
            Ok(next) if (self.check)(&next) => return Ok(next),
            Ok(_) => Err::<T, StageError>(Box::new(LoyaltyViolation {
                expected: self.expected.clone(),
            })),
            Err(error) => Err(error),
        };

        match self.mode {
            LoyaltyMode::Interrupt => outcome,
            LoyaltyMode::Reset => {
                trace!(expected = %self.expected, "disloyal payload, resetting to pre-stage value");
                Ok(payload.clone())
            }
        }
    }
}

/// Loyalty check against a concrete runtime type, for pipelines carrying
/// dynamically typed payloads.
///
/// The payload passes when it holds a `U`. Pair this with a payload type of
/// `Rc<dyn Any>`, which stays cheap to clone for reset mode:
///
/// ```ignore
/// let invoker = Loyal::new(Direct, "i32", typed::<i32>(), LoyaltyMode::Interrupt);
/// let pipeline: Pipeline<Rc<dyn Any>> = Pipeline::with_invoker(invoker);
/// ```
pub fn typed<U: Any>() -> impl Fn(&Rc<dyn Any>) -> bool {
    |payload: &Rc<dyn Any>| (**payload).is::<U>()
}
