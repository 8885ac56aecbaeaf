//! End-to-end and adversarial test suite for Dripwell.
//!
//! This crate drives the full engine through multi-day claim lifecycles and
//! attacker-perspective scenarios. Every accounting invariant is verified
//! under both well-behaved and adversarial inputs.

pub mod helpers;
