//! Ladder Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Ladder crates:
//!
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Workflow**: The workflow definition model ([`workflow`] module)

pub mod geometry;
pub mod workflow;
