//! Demonstrates the loyalty decorator: validating processed payloads and the
//! difference between interrupt and reset recovery, across a chained pipeline.
//!
//! Run with: cargo run --example loyalty_demo

use pipe_chains::{Direct, Loyal, LoyaltyMode, Pipeline, Stage, StageError};

struct Negate;

impl Stage<i32> for Negate {
    fn apply(&self, payload: &i32) -> Result<i32, StageError> {
        Ok(-payload)
    }
}

struct AddTen;

impl Stage<i32> for AddTen {
    fn apply(&self, payload: &i32) -> Result<i32, StageError> {
        Ok(payload + 10)
    }
}

fn non_negative(mode: LoyaltyMode) -> Loyal<i32, Direct> {
    Loyal::new(Direct, "non-negative i32", |payload: &i32| *payload >= 0, mode)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Interrupt on mismatch ===");
    let strict = Pipeline::with_invoker(non_negative(LoyaltyMode::Interrupt))
        .pipe(Negate)
        .pipe(AddTen);

    match strict.process(3) {
        Ok(result) => println!("unexpected success: {result}"),
        Err(error) => println!("3 → negate = -3, check fails: {error}"),
    }

    println!();
    println!("=== Reset on mismatch ===");
    let lenient = Pipeline::with_invoker(non_negative(LoyaltyMode::Reset))
        .pipe(Negate)
        .pipe(AddTen);

    match lenient.process(3) {
        Ok(result) => println!("3 → negate discarded (reset) → add ten = {result}"),
        Err(error) => println!("unexpected failure: {error}"),
    }

    println!();
    println!("=== Chained with a plain pipeline ===");
    let mode: LoyaltyMode = "reset".parse().expect("known mode");
    let front = Pipeline::with_invoker(non_negative(mode)).pipe(Negate);
    let back = Pipeline::new().pipe(AddTen);

    match front.chain(back).process(5) {
        Ok(result) => println!("5 → reset keeps 5 → add ten = {result}"),
        Err(error) => println!("unexpected failure: {error}"),
    }
}
