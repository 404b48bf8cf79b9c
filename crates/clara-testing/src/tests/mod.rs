//! Unit and behaviour tests for the acceptance runner.

mod dsl_tests;
mod runner_tests;
pub(crate) mod support;
