//! Turns a validated config into the shared runtime used to decode, sign
//! and verify transactions.

mod sequence;

pub use sequence::{run_startup_sequence, Runtime};
