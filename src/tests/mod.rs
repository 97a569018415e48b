//! Scenario test suite for block composition
//!
//! Tests are grouped by concern: composition lifecycle, render-time assets,
//! registry orchestration, and property-based invariants. Recording doubles
//! for the host collaborators live in `support`.

#[cfg(test)]
mod support;
