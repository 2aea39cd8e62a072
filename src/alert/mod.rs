//! Operator reporting: turns a classification into a verdict and a log line.

mod engine;

pub use engine::{AlertPolicy, Verdict};
