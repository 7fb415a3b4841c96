use std::rc::Rc;

use tracing::debug;

use crate::core::error::StageError;
use crate::core::stage_collection::StageCollection;
use crate::stages::Stage;
use crate::strategy::Invoker;
use crate::strategy::direct::Direct;

/// Main pipeline orchestrator
///
/// Owns an ordered collection of (stage, fallback) pairs and the invoker that
/// decides how each stage is applied. Pipelines link into a singly-linked
/// chain executed end-to-end.
///
/// # Stage Execution Order
///
/// * **Stages**: execute in FIFO order (first piped → first executed), the
///   payload threading from one stage to the next.
/// * **Chain**: after the local stages, the final payload is handed to the
///   next pipeline in the chain, if one is linked.
///
/// # Failure Recovery
///
/// * A failing stage with a registered fallback yields the fallback's result.
/// * A failing stage without one propagates its error unchanged.
/// * A failing fallback always propagates.
///
/// # Example
///
/// ```ignore
/// let pipeline = Pipeline::new()
///     .pipe(Double)                       // Runs 1st
///     .pipe_with(DivideBy(0), ReturnZero) // Runs 2nd, rescued on failure
///     .pipe(Negate);                      // Runs 3rd
///
/// let result = pipeline.process(3)?;
/// ```
pub struct Pipeline<T> {
    stages: StageCollection<T>,
    invoker: Box<dyn Invoker<T>>,
    next: Option<Box<Pipeline<T>>>,
}

impl<T: 'static> Pipeline<T> {
    /// Create an empty pipeline with the default [`Direct`] invoker.
    pub fn new() -> Self {
        Self::with_invoker(Direct)
    }

    /// Create an empty pipeline driven by a custom invoker.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let pipeline = Pipeline::with_invoker(Loyal::new(
    ///     Direct,
    ///     "non-negative i32",
    ///     |payload: &i32| *payload >= 0,
    ///     LoyaltyMode::Interrupt,
    /// ));
    /// ```
    pub fn with_invoker(invoker: impl Invoker<T> + 'static) -> Self {
        Self {
            stages: StageCollection::new(),
            invoker: Box::new(invoker),
            next: None,
        }
    }

    /// Create a pipeline whose stage collection is pre-populated by `boot`
    /// before any external [`pipe`](Self::pipe) call.
    ///
    /// This is the extension point for pipelines that ship with default
    /// stages:
    ///
    /// ```ignore
    /// fn sanitizing_pipeline() -> Pipeline<String> {
    ///     Pipeline::booted(Direct, |stages| {
    ///         stages.attach(Rc::new(TrimWhitespace), None);
    ///         stages.attach(Rc::new(StripControlChars), None);
    ///     })
    /// }
    /// ```
    pub fn booted(
        invoker: impl Invoker<T> + 'static,
        boot: impl FnOnce(&mut StageCollection<T>),
    ) -> Self {
        let mut pipeline = Self::with_invoker(invoker);
        boot(&mut pipeline.stages);
        pipeline
    }

    /// Pipe a stage without a fallback (fluent API - consumes self)
    ///
    /// Stages execute in the order they are piped (FIFO).
    ///
    /// # Example
    ///
    /// ```ignore
    /// let pipeline = Pipeline::new()
    ///     .pipe(ValidateOrder)   // Executes 1st
    ///     .pipe(PriceOrder)      // Executes 2nd
    ///     .pipe(PlaceOrder);     // Executes 3rd
    /// ```
    pub fn pipe<S: Stage<T> + 'static>(mut self, stage: S) -> Self {
        self.stages.attach(Rc::new(stage), None);
        self
    }

    /// Pipe a stage together with a fallback (fluent API - consumes self)
    ///
    /// The fallback is invoked with the pre-stage payload only when the stage
    /// fails, and its result becomes the stage's outcome.
    pub fn pipe_with<S, F>(mut self, stage: S, fallback: F) -> Self
    where
        S: Stage<T> + 'static,
        F: Stage<T> + 'static,
    {
        self.stages.attach(Rc::new(stage), Some(Rc::new(fallback)));
        self
    }

    /// Pipe pre-shared stage handles (fluent API - consumes self)
    ///
    /// Registration de-duplicates on shared-pointer identity: piping a clone
    /// of an already registered `Rc` overwrites that stage's fallback instead
    /// of adding a second entry. [`pipe`](Self::pipe) and
    /// [`pipe_with`](Self::pipe_with) allocate a fresh `Rc` per call, so only
    /// this method can observe the de-duplication.
    pub fn pipe_shared(
        mut self,
        stage: Rc<dyn Stage<T>>,
        fallback: Option<Rc<dyn Stage<T>>>,
    ) -> Self {
        self.stages.attach(stage, fallback);
        self
    }

    /// Legacy method for attaching stage handles (mutable reference API)
    ///
    /// See [`pipe`](Self::pipe) for the recommended fluent API.
    pub fn attach(
        &mut self,
        stage: Rc<dyn Stage<T>>,
        fallback: Option<Rc<dyn Stage<T>>>,
    ) -> &mut Self {
        self.stages.attach(stage, fallback);
        self
    }

    /// Append a pipeline to the end of the chain (fluent API - consumes self)
    ///
    /// Chaining is append-only: if a next pipeline is already linked, the call
    /// recurses to the current tail, so a second `chain` call appends after
    /// the existing link instead of replacing it.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let a = a.chain(b);   // a → b
    /// let a = a.chain(c);   // a → b → c
    /// ```
    pub fn chain(mut self, other: Pipeline<T>) -> Self {
        self.next = Some(Box::new(match self.next.take() {
            Some(next) => (*next).chain(other),
            None => other,
        }));
        self
    }

    /// Process a payload through every stage, then through the chained
    /// pipeline if one is linked.
    ///
    /// Delegates stage application to the owned invoker; see
    /// [`Invoker::process_stack`]. All errors not recovered by a fallback or
    /// by the invoker's own policy bubble to the caller unchanged.
    pub fn process(&self, payload: T) -> Result<T, StageError> {
        debug!(stages = self.stages.count(), chained = self.next.is_some(), "processing pipeline");

        let payload = self.invoker.process_stack(payload, &self.stages)?;

        match &self.next {
            Some(next) => next.process(payload),
            None => Ok(payload),
        }
    }

    /// Number of stages registered on this pipeline (not counting chained
    /// pipelines).
    pub fn stage_count(&self) -> usize {
        self.stages.count()
    }
}

impl<T: 'static> Default for Pipeline<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fmt;

    struct Double;

    impl Stage<i32> for Double {
        fn apply(&self, payload: &i32) -> Result<i32, StageError> {
            Ok(payload * 2)
        }
    }

    struct Negate;

    impl Stage<i32> for Negate {
        fn apply(&self, payload: &i32) -> Result<i32, StageError> {
            Ok(-payload)
        }
    }

    #[derive(Debug, PartialEq)]
    struct DivisionByZero;

    impl fmt::Display for DivisionByZero {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "division by zero")
        }
    }

    impl std::error::Error for DivisionByZero {}

    struct DivideBy(i32);

    impl Stage<i32> for DivideBy {
        fn apply(&self, payload: &i32) -> Result<i32, StageError> {
            match self.0 {
                0 => Err(Box::new(DivisionByZero)),
                divisor => Ok(payload / divisor),
            }
        }
    }

    struct ReturnZero;

    impl Stage<i32> for ReturnZero {
        fn apply(&self, _payload: &i32) -> Result<i32, StageError> {
            Ok(0)
        }
    }

    struct Push(&'static str);

    impl Stage<String> for Push {
        fn apply(&self, payload: &String) -> Result<String, StageError> {
            Ok(format!("{}{}", payload, self.0))
        }
    }

    #[test]
    fn stages_run_in_registration_order() {
        let pipeline = Pipeline::new().pipe(Double).pipe(Negate);
        assert_eq!(pipeline.process(3).unwrap(), -6);
    }

    #[test]
    fn process_equals_the_left_fold_of_the_stages() {
        let pipeline = Pipeline::new()
            .pipe(Push("a"))
            .pipe(Push("b"))
            .pipe(Push("c"));

        assert_eq!(pipeline.process(String::new()).unwrap(), "abc");
    }

    #[test]
    fn empty_pipeline_returns_the_payload_unchanged() {
        let pipeline: Pipeline<i32> = Pipeline::new();
        assert_eq!(pipeline.process(42).unwrap(), 42);
    }

    #[test]
    fn repeated_process_calls_reuse_the_same_stages() {
        let pipeline = Pipeline::new().pipe(Double);
        assert_eq!(pipeline.process(3).unwrap(), 6);
        assert_eq!(pipeline.process(5).unwrap(), 10);
    }

    #[test]
    fn failing_stage_is_rescued_by_its_fallback() {
        let pipeline = Pipeline::new().pipe_with(DivideBy(0), ReturnZero);
        assert_eq!(pipeline.process(3).unwrap(), 0);
    }

    #[test]
    fn failing_stage_without_fallback_propagates_its_error() {
        let pipeline = Pipeline::new().pipe(DivideBy(0));
        let error = pipeline.process(3).unwrap_err();
        assert_eq!(error.downcast_ref::<DivisionByZero>(), Some(&DivisionByZero));
    }

    #[test]
    fn execution_continues_after_a_rescued_stage() {
        let pipeline = Pipeline::new()
            .pipe_with(DivideBy(0), ReturnZero)
            .pipe(|payload: &i32| -> Result<i32, StageError> { Ok(payload + 1) });

        assert_eq!(pipeline.process(3).unwrap(), 1);
    }

    #[test]
    fn chain_appends_to_the_tail() {
        let a = Pipeline::new().pipe(Push("a"));
        let b = Pipeline::new().pipe(Push("b"));
        let c = Pipeline::new().pipe(Push("c"));

        // a → b, then c appended after b rather than replacing it.
        let a = a.chain(b);
        let a = a.chain(c);

        assert_eq!(a.process(String::new()).unwrap(), "abc");
    }

    #[test]
    fn chain_threads_the_payload_across_pipelines() {
        let front = Pipeline::new().pipe(Double);
        let back = Pipeline::new().pipe(Negate);

        assert_eq!(front.chain(back).process(3).unwrap(), -6);
    }

    #[test]
    fn booted_pipeline_runs_default_stages_first() {
        let pipeline = Pipeline::booted(Direct, |stages| {
            stages.attach(Rc::new(Double), None);
        })
        .pipe(Negate);

        assert_eq!(pipeline.stage_count(), 2);
        assert_eq!(pipeline.process(3).unwrap(), -6);
    }

    #[test]
    fn legacy_attach_registers_stages_in_place() {
        let mut pipeline = Pipeline::new();
        pipeline
            .attach(Rc::new(Double), None)
            .attach(Rc::new(DivideBy(0)), Some(Rc::new(ReturnZero)));

        assert_eq!(pipeline.stage_count(), 2);
        assert_eq!(pipeline.process(3).unwrap(), 0);
    }

    #[test]
    fn shared_stage_fallback_is_overwritten_on_repipe() {
        let stage: Rc<dyn Stage<i32>> = Rc::new(DivideBy(0));

        let pipeline = Pipeline::new()
            .pipe_shared(Rc::clone(&stage), Some(Rc::new(ReturnZero)))
            .pipe_shared(
                Rc::clone(&stage),
                Some(Rc::new(|_: &i32| -> Result<i32, StageError> { Ok(99) })),
            );

        assert_eq!(pipeline.stage_count(), 1);
        assert_eq!(pipeline.process(3).unwrap(), 99);
    }
}
