//! Crate-level tests exercising the public API end to end

mod canonical_tests;
mod property_tests;
