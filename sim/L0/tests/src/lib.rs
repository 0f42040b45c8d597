//! Integration test crate for `sim-spatial` and `sim-generalized`.
//!
//! All tests live under `integration/`; this library target is empty.
