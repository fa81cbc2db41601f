//! Companies House API wire types.
//!
//! Serde mappings for the three read endpoints this crate consumes: company
//! profile, persons-with-significant-control list, and structured capital.
//! Fields use `#[serde(default)]` for resilience against schema evolution;
//! `deny_unknown_fields` is intentionally not used. The resolver never sees
//! these types — conversion into the domain model happens here.
//!
//! Reference: https://developer-specs.company-information.service.gov.uk

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

use crate::error::RegistryError;
use crate::resolver::model::{
    CompanyProfile, CompanyStatus, ControlKind, ControllingParty, RegistryIdentification,
    ShareClass,
};

/// Validated Companies House company number.
///
/// Accepted format after trimming and upper-casing: exactly 8 alphanumeric
/// characters, either all digits (`03877012`) or a two-letter jurisdiction
/// prefix followed by six digits (`SC123456`, `NI000123`). Malformed input
/// fails fast with [`RegistryError::InvalidIdentifier`] before any network
/// call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompanyNumber(String);

impl CompanyNumber {
    pub fn parse(raw: &str) -> Result<Self, RegistryError> {
        let normalised = raw.trim().to_ascii_uppercase();
        if Self::is_valid(&normalised) {
            Ok(Self(normalised))
        } else {
            Err(RegistryError::InvalidIdentifier {
                number: raw.trim().to_string(),
            })
        }
    }

    fn is_valid(s: &str) -> bool {
        let bytes = s.as_bytes();
        if bytes.len() != 8 || !bytes.iter().all(|b| b.is_ascii_alphanumeric()) {
            return false;
        }
        bytes.iter().all(|b| b.is_ascii_digit())
            || (bytes[0].is_ascii_uppercase()
                && bytes[1].is_ascii_uppercase()
                && bytes[2..].iter().all(|b| b.is_ascii_digit()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CompanyNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for CompanyNumber {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// -- GET /company/{number} ---------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileResponse {
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub company_status: Option<String>,
    #[serde(default)]
    pub date_of_creation: Option<NaiveDate>,
    #[serde(default)]
    pub jurisdiction: Option<String>,
    #[serde(default)]
    pub sic_codes: Vec<String>,
}

impl ProfileResponse {
    pub fn into_profile(self, number: CompanyNumber) -> CompanyProfile {
        CompanyProfile {
            number,
            name: self.company_name.unwrap_or_else(|| "N/A".to_string()),
            status: CompanyStatus::from_wire(self.company_status.as_deref()),
            jurisdiction: self.jurisdiction,
            incorporated_on: self.date_of_creation,
            sic_codes: self.sic_codes,
            share_capital: Vec::new(),
        }
    }
}

// -- GET /company/{number}/persons-with-significant-control ------------------

#[derive(Debug, Clone, Deserialize)]
pub struct PscList {
    #[serde(default)]
    pub items: Vec<PscItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PscItem {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub nationality: Option<String>,
    #[serde(default)]
    pub country_of_residence: Option<String>,
    #[serde(default)]
    pub natures_of_control: Vec<String>,
    #[serde(default)]
    pub statement: Option<String>,
    #[serde(default)]
    pub identification: Option<WireIdentification>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireIdentification {
    #[serde(default)]
    pub registration_number: Option<String>,
    #[serde(default)]
    pub legal_form: Option<String>,
    #[serde(default)]
    pub legal_authority: Option<String>,
    #[serde(default)]
    pub country_registered: Option<String>,
    #[serde(default)]
    pub place_registered: Option<String>,
}

impl PscItem {
    pub fn into_party(self) -> ControllingParty {
        ControllingParty {
            name: self.name.unwrap_or_else(|| "N/A".to_string()),
            kind: ControlKind::from_wire(self.kind.as_deref()),
            nationality: self.nationality,
            country_of_residence: self.country_of_residence,
            natures_of_control: self.natures_of_control,
            statement: self.statement,
            identification: self.identification.map(|id| RegistryIdentification {
                registration_number: id.registration_number,
                legal_form: id.legal_form,
                legal_authority: id.legal_authority,
                country_registered: id.country_registered,
                place_registered: id.place_registered,
            }),
        }
    }
}

// -- GET /company/{number}/capital -------------------------------------------

/// The capital endpoint has been observed returning `{"items": [...]}`,
/// `{"share_capital": [...]}`, and a bare list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CapitalResponse {
    Keyed {
        #[serde(default, alias = "share_capital")]
        items: Vec<CapitalItem>,
    },
    Bare(Vec<CapitalItem>),
}

impl CapitalResponse {
    pub fn into_items(self) -> Vec<CapitalItem> {
        match self {
            Self::Keyed { items } => items,
            Self::Bare(items) => items,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CapitalItem {
    #[serde(default, alias = "class_of_shares")]
    pub share_class: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    /// Numeric or string depending on filing vintage.
    #[serde(default, alias = "shares_allotted", alias = "number_of_shares")]
    pub number_allotted: Option<Value>,
    #[serde(default, alias = "value_per_share")]
    pub nominal_value_per_share: Option<Value>,
    /// Either a scalar or `{"value": ..., "currency": ...}`.
    #[serde(default)]
    pub aggregate_nominal_value: Option<Value>,
}

impl CapitalItem {
    pub fn into_share_class(self) -> ShareClass {
        ShareClass {
            class: self.share_class,
            currency: self.currency.clone(),
            shares_allotted: self.number_allotted.as_ref().and_then(scalar_string),
            nominal_value_per_share: self
                .nominal_value_per_share
                .as_ref()
                .and_then(scalar_string),
            aggregate_nominal_value: self
                .aggregate_nominal_value
                .as_ref()
                .and_then(aggregate_string),
        }
    }
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn aggregate_string(value: &Value) -> Option<String> {
    match value {
        Value::Object(map) => {
            let amount = map.get("value").and_then(scalar_string)?;
            Some(match map.get("currency").and_then(|c| c.as_str()) {
                Some(currency) => format!("{amount} {currency}"),
                None => amount,
            })
        }
        other => scalar_string(other),
    }
}
