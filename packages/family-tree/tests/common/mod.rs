// Common test utilities
#![allow(dead_code)]

pub mod fixtures;
pub mod gated;
pub mod harness;

pub use fixtures::*;
pub use gated::*;
pub use harness::*;
