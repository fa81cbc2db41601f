//! Companies House integration.
//!
//! This module provides:
//! - Wire types for the profile, PSC, and capital endpoints
//! - The validated [`CompanyNumber`] identifier
//! - The paced, typed HTTP client implementing the
//!   [`Registry`](crate::resolver::Registry) seam

pub mod client;
pub mod types;

pub use client::CompaniesHouseClient;
pub use types::CompanyNumber;
