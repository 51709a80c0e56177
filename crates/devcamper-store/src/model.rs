use std::fmt;
use std::str::FromStr;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StoreError;

/// Bootcamp identifier, rendered as 32 lowercase hex characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct BootcampId(Uuid);

impl BootcampId {
    /// Generate a fresh identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BootcampId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BootcampId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl FromStr for BootcampId {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let well_formed = s.len() == 32 && s.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if !well_formed {
            return Err(StoreError::Cast { value: s.to_owned() });
        }

        Uuid::try_parse(s)
            .map(Self)
            .map_err(|_| StoreError::Cast { value: s.to_owned() })
    }
}

impl From<BootcampId> for String {
    fn from(id: BootcampId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for BootcampId {
    type Error = StoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Career tracks a bootcamp may offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::EnumString, strum::Display)]
pub enum Career {
    #[serde(rename = "Web Development")]
    #[strum(serialize = "Web Development")]
    WebDevelopment,
    #[serde(rename = "Mobile Development")]
    #[strum(serialize = "Mobile Development")]
    MobileDevelopment,
    #[serde(rename = "UI/UX")]
    #[strum(serialize = "UI/UX")]
    UiUx,
    #[serde(rename = "Data Science")]
    #[strum(serialize = "Data Science")]
    DataScience,
    Business,
    Other,
}

/// Bootcamp fields as submitted by a client
///
/// Everything is optional here; schema validation decides what is required
/// so that every violation can be reported at once.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BootcampInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub careers: Option<Vec<String>>,
    pub average_rating: Option<f64>,
    pub average_cost: Option<f64>,
    pub housing: Option<bool>,
    pub job_assistance: Option<bool>,
    pub job_guarantee: Option<bool>,
    pub accept_gi: Option<bool>,
}

impl BootcampInput {
    /// Overlay `patch` onto `self`, keeping fields the patch leaves unset
    #[must_use]
    pub fn merged_with(self, patch: Self) -> Self {
        Self {
            name: patch.name.or(self.name),
            description: patch.description.or(self.description),
            website: patch.website.or(self.website),
            phone: patch.phone.or(self.phone),
            email: patch.email.or(self.email),
            address: patch.address.or(self.address),
            careers: patch.careers.or(self.careers),
            average_rating: patch.average_rating.or(self.average_rating),
            average_cost: patch.average_cost.or(self.average_cost),
            housing: patch.housing.or(self.housing),
            job_assistance: patch.job_assistance.or(self.job_assistance),
            job_guarantee: patch.job_guarantee.or(self.job_guarantee),
            accept_gi: patch.accept_gi.or(self.accept_gi),
        }
    }
}

/// A stored bootcamp
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bootcamp {
    #[serde(rename = "_id")]
    pub id: BootcampId,
    pub name: String,
    pub slug: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub address: String,
    pub careers: Vec<Career>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_cost: Option<f64>,
    pub photo: String,
    pub housing: bool,
    pub job_assistance: bool,
    pub job_guarantee: bool,
    pub accept_gi: bool,
    pub created_at: Timestamp,
}

impl Bootcamp {
    /// The fields of this bootcamp as an update baseline
    pub fn to_input(&self) -> BootcampInput {
        BootcampInput {
            name: Some(self.name.clone()),
            description: Some(self.description.clone()),
            website: self.website.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            address: Some(self.address.clone()),
            careers: Some(self.careers.iter().map(ToString::to_string).collect()),
            average_rating: self.average_rating,
            average_cost: self.average_cost,
            housing: Some(self.housing),
            job_assistance: Some(self.job_assistance),
            job_guarantee: Some(self.job_guarantee),
            accept_gi: Some(self.accept_gi),
        }
    }
}

/// URL-friendly form of a bootcamp name
///
/// Words split on whitespace and hyphens only, so `"ModernTech"` and
/// `"Web3"` stay whole.
pub fn slugify(name: &str) -> String {
    use convert_case::{Boundary, Case, Casing};

    let cleaned: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '-')
        .collect();

    cleaned
        .with_boundaries(&[Boundary::SPACE, Boundary::HYPHEN])
        .to_case(Case::Kebab)
}
