//! Test helpers module
//!
//! Shared database bootstrap and request builders for the integration
//! suite. Tests that need a live Postgres skip themselves when neither
//! TEST_DATABASE_URL nor Docker is available.

#![allow(dead_code)]

pub mod database_helper;
pub mod test_data;

pub use database_helper::*;
pub use test_data::*;
