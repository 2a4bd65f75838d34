//! Domain models for decoded dialysis-session logs.

mod record;

pub use record::*;
