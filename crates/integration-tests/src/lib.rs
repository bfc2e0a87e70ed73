//! Integration test crate; everything of interest lives under `tests/`.
