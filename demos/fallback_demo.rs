//! Demonstrates fallback recovery: a failing stage rescued by its paired
//! fallback, and error propagation when no fallback exists.
//!
//! Run with: cargo run --example fallback_demo

use pipe_chains::{Pipeline, Stage, StageError};

struct Double;

impl Stage<i32> for Double {
    fn apply(&self, payload: &i32) -> Result<i32, StageError> {
        Ok(payload * 2)
    }
}

struct DivideBy(i32);

impl Stage<i32> for DivideBy {
    fn apply(&self, payload: &i32) -> Result<i32, StageError> {
        if self.0 == 0 {
            return Err("division by zero".into());
        }
        Ok(payload / self.0)
    }
}

struct ReturnZero;

impl Stage<i32> for ReturnZero {
    fn apply(&self, _payload: &i32) -> Result<i32, StageError> {
        Ok(0)
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Rescued pipeline ===");
    let rescued = Pipeline::new()
        .pipe(Double)
        .pipe_with(DivideBy(0), ReturnZero)
        .pipe(Double);

    match rescued.process(3) {
        Ok(result) => println!("3 → double → divide by 0 (rescued) → double = {result}"),
        Err(error) => println!("unexpected failure: {error}"),
    }

    println!();
    println!("=== Unrescued pipeline ===");
    let unrescued = Pipeline::new().pipe(Double).pipe(DivideBy(0));

    match unrescued.process(3) {
        Ok(result) => println!("unexpected success: {result}"),
        Err(error) => println!("propagated to the caller: {error}"),
    }
}
