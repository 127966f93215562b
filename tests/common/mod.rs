//! Common test utilities for rplot.
//!
//! This module provides shared utilities for the integration tests.
#![allow(dead_code)]

pub mod assertions;
pub mod image_utils;
pub mod test_data;
