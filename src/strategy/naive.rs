use crate::core::error::StageError;
use crate::stages::Stage;
use crate::strategy::Invoker;

/// Minimal reference invoker: applies the stage and performs no failure
/// handling at all. The fallback is ignored and every stage error propagates.
///
/// Kept as the smallest possible [`Invoker`] implementation, a starting point
/// for writing custom strategies. Not meant for production use; pipelines
/// built on it silently lose their registered fallbacks.
#[derive(Debug, Clone, Copy, Default)]
pub struct Naive;

impl<T> Invoker<T> for Naive {
    fn process(
        &self,
        payload: &T,
        stage: &dyn Stage<T>,
        _fallback: Option<&dyn Stage<T>>,
    ) -> Result<T, StageError> {
        stage.apply(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Explode;

    impl Stage<i32> for Explode {
        fn apply(&self, _payload: &i32) -> Result<i32, StageError> {
            Err("no rescue here".into())
        }
    }

    #[test]
    fn ignores_the_registered_fallback() {
        let fallback = |_: &i32| -> Result<i32, StageError> { Ok(0) };
        let error = Naive.process(&3, &Explode, Some(&fallback)).unwrap_err();
        assert_eq!(error.to_string(), "no rescue here");
    }

    #[test]
    fn applies_the_stage_on_success() {
        let double = |payload: &i32| -> Result<i32, StageError> { Ok(payload * 2) };
        assert_eq!(Naive.process(&3, &double, None).unwrap(), 6);
    }
}
