//! Request/response payloads for the campaign backend

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::Identity;

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct BalanceResponse {
    #[serde(default)]
    pub balance: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UploadRequest<'a> {
    pub file_name: &'a str,
    pub subject: &'a str,
    pub body: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct UploadUrlResponse {
    #[serde(rename = "uploadURL")]
    pub upload_url: String,
}

/// Stats as the backend reports them
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct RawStats {
    pub sent_count: Option<u64>,
    pub open_count: Option<u64>,
    pub click_count: Option<u64>,
    pub bounce_count: Option<u64>,
    pub file_name: Option<String>,
    pub subject: Option<String>,
    pub body: Option<String>,
}

/// Delivery statistics for one campaign
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignStats {
    pub sent: u64,
    pub opened: u64,
    pub clicked: u64,
    pub bounced: u64,
    pub file_name: Option<String>,
    pub subject: Option<String>,
    pub body: Option<String>,
}

impl From<RawStats> for CampaignStats {
    fn from(raw: RawStats) -> Self {
        CampaignStats {
            sent: raw.sent_count.unwrap_or(0),
            opened: raw.open_count.unwrap_or(0),
            clicked: raw.click_count.unwrap_or(0),
            bounced: raw.bounce_count.unwrap_or(0),
            file_name: raw.file_name,
            subject: raw.subject,
            body: raw.body,
        }
    }
}

impl CampaignStats {
    /// Opened / sent, 0 when nothing was sent
    pub fn open_rate(&self) -> f64 {
        ratio(self.opened, self.sent)
    }

    pub fn click_rate(&self) -> f64 {
        ratio(self.clicked, self.sent)
    }

    pub fn bounce_rate(&self) -> f64 {
        ratio(self.bounced, self.sent)
    }
}

fn ratio(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignSummary {
    pub name: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub sent: u64,
    #[serde(default)]
    pub opened: u64,
    #[serde(default)]
    pub clicked: u64,
    #[serde(default)]
    pub bounced: u64,
}

/// Dashboard totals across campaigns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CampaignTotals {
    pub sent: u64,
    pub opened: u64,
    pub clicked: u64,
    pub bounced: u64,
}

impl CampaignTotals {
    pub fn from_campaigns(campaigns: &[CampaignSummary]) -> Self {
        campaigns.iter().fold(Self::default(), |acc, c| CampaignTotals {
            sent: acc.sent + c.sent,
            opened: acc.opened + c.opened,
            clicked: acc.clicked + c.clicked,
            bounced: acc.bounced + c.bounced,
        })
    }
}

/// Verification status; values the console doesn't know are kept verbatim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DomainStatus {
    Verified,
    Pending,
    Failed,
    Other(String),
}

impl DomainStatus {
    pub fn as_str(&self) -> &str {
        match self {
            DomainStatus::Verified => "verified",
            DomainStatus::Pending => "pending",
            DomainStatus::Failed => "failed",
            DomainStatus::Other(status) => status,
        }
    }
}

impl From<String> for DomainStatus {
    fn from(status: String) -> Self {
        match status.as_str() {
            "verified" => DomainStatus::Verified,
            "pending" => DomainStatus::Pending,
            "failed" => DomainStatus::Failed,
            _ => DomainStatus::Other(status),
        }
    }
}

impl From<DomainStatus> for String {
    fn from(status: DomainStatus) -> Self {
        match status {
            DomainStatus::Other(status) => status,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for DomainStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRecord {
    pub id: u64,
    pub domain: String,
    pub status: DomainStatus,
}

/// Auth service login reply
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub user: Option<Identity>,
}

impl LoginResponse {
    /// Identity from the reply, or a bare one built from the login email
    pub fn identity_or(&self, email: &str) -> Identity {
        self.user
            .clone()
            .unwrap_or_else(|| Identity::new(email))
    }
}
