//! Utility functions for pipeline stages.

pub mod fs;
