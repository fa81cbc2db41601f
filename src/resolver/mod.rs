//! Ownership resolution.
//!
//! This module provides:
//! - The domain model for ownership trees (profiles, controllers, nodes)
//! - The [`Registry`] seam the resolver fetches through
//! - The recursive, cycle-safe traversal itself

pub mod model;
pub mod traverse;

pub use model::{
    ChildStatus, CompanyProfile, CompanyStatus, ControlKind, ControllingParty, OwnershipNode,
    RegistryIdentification, ResolvedController, ShareClass,
};
pub use traverse::{OwnershipResolver, DEFAULT_MAX_DEPTH};

use async_trait::async_trait;

use crate::companies_house::types::CompanyNumber;
use crate::error::RegistryError;

/// Read-only access to a company registry.
///
/// The production implementation is
/// [`CompaniesHouseClient`](crate::companies_house::client::CompaniesHouseClient);
/// tests inject an in-memory fake so the traversal runs with zero network
/// access. Implementations perform no retries and no caching — every call is
/// a fresh read.
#[async_trait]
pub trait Registry: Send + Sync {
    /// Fetch a company's profile.
    async fn profile(&self, number: &CompanyNumber) -> Result<CompanyProfile, RegistryError>;

    /// Fetch a company's persons-with-significant-control list, in the
    /// registry's filing order.
    async fn controlling_parties(
        &self,
        number: &CompanyNumber,
    ) -> Result<Vec<ControllingParty>, RegistryError>;

    /// Fetch a company's structured share capital. Companies without a
    /// structured capital filing yield `Ok(vec![])`, not an error.
    async fn share_capital(
        &self,
        number: &CompanyNumber,
    ) -> Result<Vec<ShareClass>, RegistryError>;
}
