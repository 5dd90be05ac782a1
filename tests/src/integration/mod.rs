//! # HTTP Integration Scenarios
//!
//! Every scenario goes through `build_router`, so requests cross the same
//! middleware stack (auth, timeout, tracing) as production traffic.

#[cfg(test)]
pub mod harness;

#[cfg(test)]
mod access;
#[cfg(test)]
mod concurrency;
#[cfg(test)]
mod operator_scenarios;
#[cfg(test)]
mod persistence;
#[cfg(test)]
mod secrets;
