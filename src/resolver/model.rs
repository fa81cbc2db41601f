//! Domain model for ownership traversal.
//!
//! These types carry only the logical fields the resolver and renderer need;
//! the Companies House wire schema stays behind the client boundary.

use chrono::NaiveDate;

use crate::companies_house::types::CompanyNumber;
use crate::error::ErrorKind;

/// Company status from the registry's closed enumeration.
///
/// Unrecognised upstream values degrade to `Unknown` rather than failing
/// deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompanyStatus {
    Active,
    Dissolved,
    Liquidation,
    Receivership,
    Administration,
    VoluntaryArrangement,
    ConvertedClosed,
    InsolvencyProceedings,
    Open,
    Closed,
    Registered,
    Removed,
    Unknown,
}

impl CompanyStatus {
    pub fn from_wire(raw: Option<&str>) -> Self {
        match raw {
            Some("active") => Self::Active,
            Some("dissolved") => Self::Dissolved,
            Some("liquidation") => Self::Liquidation,
            Some("receivership") => Self::Receivership,
            Some("administration") => Self::Administration,
            Some("voluntary-arrangement") => Self::VoluntaryArrangement,
            Some("converted-closed") => Self::ConvertedClosed,
            Some("insolvency-proceedings") => Self::InsolvencyProceedings,
            Some("open") => Self::Open,
            Some("closed") => Self::Closed,
            Some("registered") => Self::Registered,
            Some("removed") => Self::Removed,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Dissolved => "dissolved",
            Self::Liquidation => "liquidation",
            Self::Receivership => "receivership",
            Self::Administration => "administration",
            Self::VoluntaryArrangement => "voluntary-arrangement",
            Self::ConvertedClosed => "converted-closed",
            Self::InsolvencyProceedings => "insolvency-proceedings",
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Registered => "registered",
            Self::Removed => "removed",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for CompanyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One share class from the structured capital filing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareClass {
    pub class: Option<String>,
    pub currency: Option<String>,
    pub shares_allotted: Option<String>,
    pub nominal_value_per_share: Option<String>,
    pub aggregate_nominal_value: Option<String>,
}

/// Immutable company snapshot, fetched once per company per traversal.
#[derive(Debug, Clone)]
pub struct CompanyProfile {
    pub number: CompanyNumber,
    pub name: String,
    pub status: CompanyStatus,
    pub jurisdiction: Option<String>,
    pub incorporated_on: Option<NaiveDate>,
    pub sic_codes: Vec<String>,
    /// Populated for the root company only; empty elsewhere.
    pub share_capital: Vec<ShareClass>,
}

/// PSC kind from the registry's `kind` discriminator.
///
/// Closed enumeration with an explicit catch-all so new upstream kinds
/// degrade to not-corporate instead of breaking the traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    Individual,
    CorporateEntity,
    LegalPerson,
    /// PSC statements ("no individual or entity with significant control").
    Statement,
    Other,
}

impl ControlKind {
    pub fn from_wire(raw: Option<&str>) -> Self {
        match raw {
            Some("individual-person-with-significant-control") => Self::Individual,
            Some("corporate-entity-person-with-significant-control") => Self::CorporateEntity,
            Some("legal-person-person-with-significant-control") => Self::LegalPerson,
            Some(s) if s.ends_with("-statement") => Self::Statement,
            _ => Self::Other,
        }
    }

    /// Whether this kind can, in principle, be resolved as a company.
    pub fn is_corporate(&self) -> bool {
        matches!(self, Self::CorporateEntity | Self::LegalPerson)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Individual => "Individual",
            Self::CorporateEntity => "Corporate Entity",
            Self::LegalPerson => "Legal Person",
            Self::Statement => "Statement",
            Self::Other => "Other",
        }
    }
}

/// Registry identification block attached to corporate PSCs.
#[derive(Debug, Clone, Default)]
pub struct RegistryIdentification {
    pub registration_number: Option<String>,
    pub legal_form: Option<String>,
    pub legal_authority: Option<String>,
    pub country_registered: Option<String>,
    pub place_registered: Option<String>,
}

const UK_KEYWORDS: &[&str] = &[
    "united kingdom",
    "england",
    "wales",
    "scotland",
    "northern ireland",
    "great britain",
    "companies house",
];

impl RegistryIdentification {
    /// Registration number usable for a Companies House lookup.
    ///
    /// Requires a well-formed number registered in the UK. Filings for UK
    /// parents commonly leave the jurisdiction fields blank, so absent
    /// country and place are treated as UK. Overseas registrations yield
    /// `None` and the controller degrades to not-corporate.
    pub fn uk_company_number(&self) -> Option<CompanyNumber> {
        let raw = self.registration_number.as_deref()?;
        if !self.is_uk_registered() {
            return None;
        }
        CompanyNumber::parse(raw).ok()
    }

    fn is_uk_registered(&self) -> bool {
        if self.country_registered.is_none() && self.place_registered.is_none() {
            return true;
        }
        [&self.country_registered, &self.place_registered]
            .into_iter()
            .filter_map(|field| field.as_deref())
            .any(|value| {
                let value = value.to_lowercase();
                UK_KEYWORDS.iter().any(|keyword| value.contains(keyword))
            })
    }
}

/// A person or entity with significant control over a company.
#[derive(Debug, Clone)]
pub struct ControllingParty {
    pub name: String,
    pub kind: ControlKind,
    pub nationality: Option<String>,
    pub country_of_residence: Option<String>,
    /// Registry filing order is preserved; entries are enumerated control
    /// types such as `ownership-of-shares-75-to-100-percent`.
    pub natures_of_control: Vec<String>,
    pub statement: Option<String>,
    pub identification: Option<RegistryIdentification>,
}

impl ControllingParty {
    /// The company number to recurse into, if this controller is a corporate
    /// entity with a usable UK registration.
    pub fn recursion_target(&self) -> Option<CompanyNumber> {
        if !self.kind.is_corporate() {
            return None;
        }
        self.identification
            .as_ref()
            .and_then(RegistryIdentification::uk_company_number)
    }
}

/// Why a controller entry does or does not carry a child node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildStatus {
    /// Corporate controller resolved into a child subtree.
    Resolved,
    /// Recursion stopped at the configured depth; no fetch was attempted.
    DepthLimitReached,
    /// The controller is already on the active root-to-node path.
    CycleDetected,
    /// Profile or PSC fetch for the controller failed; kind preserved.
    LookupFailed(ErrorKind),
    /// Natural person, statement, or corporate entity without a usable UK
    /// registration number.
    NotCorporate,
}

/// One controller entry under an [`OwnershipNode`], in registry order.
#[derive(Debug, Clone)]
pub struct ResolvedController {
    pub party: ControllingParty,
    pub status: ChildStatus,
    /// Present iff `status` is [`ChildStatus::Resolved`].
    pub child: Option<OwnershipNode>,
}

/// A company and its controllers, the unit of the ownership tree.
///
/// The tree is a path-rooted unfolding of a general graph: a company owning
/// two sibling branches appears once per branch. Constructed fresh per
/// traversal and discarded after rendering.
#[derive(Debug, Clone)]
pub struct OwnershipNode {
    pub profile: CompanyProfile,
    pub controllers: Vec<ResolvedController>,
}
