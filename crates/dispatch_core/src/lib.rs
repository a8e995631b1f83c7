pub mod config;
pub mod matching;
pub mod model;
pub mod pricing;
pub mod spatial;
pub mod synthetic;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
