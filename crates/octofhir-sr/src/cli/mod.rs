//! CLI functionality for the `sr` tool
//!
//! This module contains the command implementations:
//! - Dumping the content tree
//! - Profile validation
//! - SRPath queries
//! - Tree statistics
//! - Extraction views
//! - Re-encoding
//!
//! plus shared input loading and output formatting.

pub mod dump;
pub mod encode;
pub mod extract;
pub mod input;
pub mod output;
pub mod query;
pub mod stats;
pub mod validate;
