//! # Ella Core Test Suite
//!
//! End-to-end scenarios that drive the full HTTP router over real
//! enforcer, audit log and store implementations.
//!
//! ## Structure
//!
//! - `integration/` - HTTP scenarios
//!   - `operator_scenarios` - identity, tracking and slice workflows
//!   - `secrets` - secret values never leave the service
//!   - `access` - authentication and role checks
//!   - `concurrency` - concurrent updates stay whole
//!   - `persistence` - file backend across restarts
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p ec-tests
//! ```

pub mod integration;
