//! Core data models for Leads Console.
//!
//! These types are the records the store owns and persists: [`Lead`],
//! [`Opportunity`], and the [`LeadFilters`] view specification. JSON field
//! names match the shapes written by earlier versions of the console
//! (`accountName`, `leadId`, `sortBy`, `sortOrder`), so saved records load
//! unchanged.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Pipeline status of a lead.
///
/// The usual progression is `new → contacted → qualified → proposal →
/// won | lost`, but the store does not enforce it: any status may be set
/// at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    New,
    Contacted,
    Qualified,
    Proposal,
    Won,
    Lost,
}

impl LeadStatus {
    pub const ALL: [LeadStatus; 6] = [
        LeadStatus::New,
        LeadStatus::Contacted,
        LeadStatus::Qualified,
        LeadStatus::Proposal,
        LeadStatus::Won,
        LeadStatus::Lost,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Contacted => "contacted",
            LeadStatus::Qualified => "qualified",
            LeadStatus::Proposal => "proposal",
            LeadStatus::Won => "won",
            LeadStatus::Lost => "lost",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            LeadStatus::New => "New",
            LeadStatus::Contacted => "Contacted",
            LeadStatus::Qualified => "Qualified",
            LeadStatus::Proposal => "Proposal",
            LeadStatus::Won => "Won",
            LeadStatus::Lost => "Lost",
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeadStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LeadStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown status: '{}'", s))
    }
}

/// Acquisition channel of a lead.
///
/// [`LeadSource::ConvertedBack`] is produced only when an opportunity is
/// reverted into a lead; it is not accepted by CSV import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadSource {
    Website,
    Referral,
    SocialMedia,
    EmailCampaign,
    ColdCall,
    TradeShow,
    Partnership,
    ConvertedBack,
}

impl LeadSource {
    /// Sources a CSV import may carry.
    pub const IMPORTABLE: [LeadSource; 7] = [
        LeadSource::Website,
        LeadSource::Referral,
        LeadSource::SocialMedia,
        LeadSource::EmailCampaign,
        LeadSource::ColdCall,
        LeadSource::TradeShow,
        LeadSource::Partnership,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeadSource::Website => "website",
            LeadSource::Referral => "referral",
            LeadSource::SocialMedia => "social_media",
            LeadSource::EmailCampaign => "email_campaign",
            LeadSource::ColdCall => "cold_call",
            LeadSource::TradeShow => "trade_show",
            LeadSource::Partnership => "partnership",
            LeadSource::ConvertedBack => "converted_back",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LeadSource::Website => "Website",
            LeadSource::Referral => "Referral",
            LeadSource::SocialMedia => "Social Media",
            LeadSource::EmailCampaign => "Email Campaign",
            LeadSource::ColdCall => "Cold Call",
            LeadSource::TradeShow => "Trade Show",
            LeadSource::Partnership => "Partnership",
            LeadSource::ConvertedBack => "Converted Back",
        }
    }

    /// Parse one of the seven importable sources. `converted_back` is refused.
    pub fn parse_importable(s: &str) -> Option<LeadSource> {
        LeadSource::IMPORTABLE
            .into_iter()
            .find(|source| source.as_str() == s)
    }
}

impl fmt::Display for LeadSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeadSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == LeadSource::ConvertedBack.as_str() {
            return Ok(LeadSource::ConvertedBack);
        }
        LeadSource::parse_importable(s).ok_or_else(|| format!("unknown source: '{}'", s))
    }
}

/// Sales stage of an opportunity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OpportunityStage {
    Prospecting,
    Qualification,
    Proposal,
    Negotiation,
    ClosedWon,
    ClosedLost,
}

impl OpportunityStage {
    pub const ALL: [OpportunityStage; 6] = [
        OpportunityStage::Prospecting,
        OpportunityStage::Qualification,
        OpportunityStage::Proposal,
        OpportunityStage::Negotiation,
        OpportunityStage::ClosedWon,
        OpportunityStage::ClosedLost,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OpportunityStage::Prospecting => "prospecting",
            OpportunityStage::Qualification => "qualification",
            OpportunityStage::Proposal => "proposal",
            OpportunityStage::Negotiation => "negotiation",
            OpportunityStage::ClosedWon => "closed-won",
            OpportunityStage::ClosedLost => "closed-lost",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OpportunityStage::Prospecting => "Prospecting",
            OpportunityStage::Qualification => "Qualification",
            OpportunityStage::Proposal => "Proposal",
            OpportunityStage::Negotiation => "Negotiation",
            OpportunityStage::ClosedWon => "Closed - Won",
            OpportunityStage::ClosedLost => "Closed - Lost",
        }
    }
}

impl fmt::Display for OpportunityStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OpportunityStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OpportunityStage::ALL
            .into_iter()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| format!("unknown stage: '{}'", s))
    }
}

/// A prospective customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub id: String,
    pub name: String,
    pub company: String,
    pub email: String,
    pub source: LeadSource,
    /// Qualification score in `0..=100`.
    pub score: u8,
    pub status: LeadStatus,
}

/// A lead that has been converted into a sales opportunity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    pub id: String,
    /// `"<lead name> - <lead company>"` at conversion time.
    pub name: String,
    pub stage: OpportunityStage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    pub account_name: String,
    /// Id of the lead this opportunity was converted from. Provenance only;
    /// no live lead with this id is expected to exist.
    pub lead_id: String,
}

/// Field-level patch applied by [`LeadStore::update_lead`](crate::store::LeadStore::update_lead).
///
/// `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeadUpdate {
    pub name: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub source: Option<LeadSource>,
    pub score: Option<u8>,
    pub status: Option<LeadStatus>,
}

impl LeadUpdate {
    pub fn status(status: LeadStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == LeadUpdate::default()
    }

    /// Check the patch before it touches any lead.
    pub fn validate(&self) -> Result<(), StoreError> {
        if let Some(ref email) = self.email {
            if !crate::validation::validate_email(email) {
                return Err(StoreError::InvalidEmail(email.clone()));
            }
        }
        if let Some(score) = self.score {
            if score > 100 {
                return Err(StoreError::InvalidScore(score));
            }
        }
        Ok(())
    }

    /// Merge the set fields into `lead`.
    pub fn apply_to(&self, lead: &mut Lead) {
        if let Some(ref name) = self.name {
            lead.name = name.clone();
        }
        if let Some(ref company) = self.company {
            lead.company = company.clone();
        }
        if let Some(ref email) = self.email {
            lead.email = email.clone();
        }
        if let Some(source) = self.source {
            lead.source = source;
        }
        if let Some(score) = self.score {
            lead.score = score;
        }
        if let Some(status) = self.status {
            lead.status = status;
        }
    }
}

/// Caller-supplied fields for a lead → opportunity conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub stage: OpportunityStage,
    pub amount: Option<f64>,
}

/// Field the derived view is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Score,
    Name,
    Company,
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "score" => Ok(SortBy::Score),
            "name" => Ok(SortBy::Name),
            "company" => Ok(SortBy::Company),
            other => Err(format!("unknown sort field: '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("unknown sort order: '{}'", other)),
        }
    }
}

/// Filter and sort specification for the derived lead view.
///
/// Deserialization is partial: fields missing from a saved record keep
/// their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LeadFilters {
    /// Case-insensitive substring matched against name and company.
    pub search: String,
    /// Keep leads with any of these statuses. Empty means no filter.
    pub statuses: Vec<LeadStatus>,
    /// Keep leads from any of these sources. Empty means no filter.
    pub sources: Vec<LeadSource>,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
}

impl LeadFilters {
    pub fn add_status(&mut self, status: LeadStatus) {
        if !self.statuses.contains(&status) {
            self.statuses.push(status);
        }
    }

    pub fn remove_status(&mut self, status: LeadStatus) {
        self.statuses.retain(|s| *s != status);
    }

    pub fn add_source(&mut self, source: LeadSource) {
        if !self.sources.contains(&source) {
            self.sources.push(source);
        }
    }

    pub fn remove_source(&mut self, source: LeadSource) {
        self.sources.retain(|s| *s != source);
    }

    /// Number of status and source chips currently applied.
    pub fn active_filter_count(&self) -> usize {
        self.statuses.len() + self.sources.len()
    }

    pub fn has_active_filters(&self) -> bool {
        self.active_filter_count() > 0
    }

    /// Short description of the ordering, e.g. `"highest score first"`.
    pub fn sort_description(&self) -> &'static str {
        match (self.sort_by, self.sort_order) {
            (SortBy::Score, SortOrder::Desc) => "highest score first",
            (SortBy::Score, SortOrder::Asc) => "lowest score first",
            (SortBy::Name, SortOrder::Asc) => "name A-Z",
            (SortBy::Name, SortOrder::Desc) => "name Z-A",
            (SortBy::Company, SortOrder::Asc) => "company A-Z",
            (SortBy::Company, SortOrder::Desc) => "company Z-A",
        }
    }
}
