use serde::{Deserialize, Serialize};

/// Risk category assigned to a lead by [`crate::risk::classifier::classify`].
///
/// Ordering follows urgency: `High < Medium < Low`, which is also the order
/// categories are listed in statistics and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskCategory {
    High,
    Medium,
    Low,
}

impl RiskCategory {
    /// All categories in report order.
    pub const ALL: [RiskCategory; 3] = [RiskCategory::High, RiskCategory::Medium, RiskCategory::Low];
}

impl std::fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskCategory::High => write!(f, "High"),
            RiskCategory::Medium => write!(f, "Medium"),
            RiskCategory::Low => write!(f, "Low"),
        }
    }
}

/// Whether the lead shared contact details. `Unknown` covers absent and
/// unrecognized values and is never treated as favorable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactShared {
    Yes,
    No,
    Unknown,
}

impl ContactShared {
    /// `true` for `No` and `Unknown`.
    pub fn is_unfavorable(self) -> bool {
        !matches!(self, ContactShared::Yes)
    }
}

/// Who booked the demo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduledBy {
    Agent,
    #[serde(rename = "Self")]
    SelfBooked,
    Other,
}

/// Strongly typed lead attributes consumed by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadRecord {
    pub missed_demos: u32,
    pub last_interaction_days: u32,
    pub contact_shared: ContactShared,
    pub link_clicked: bool,
    pub scheduled_by: ScheduledBy,
    pub showed_up_for_demo: bool,
}

impl Default for LeadRecord {
    /// What an entirely empty input row normalizes to.
    fn default() -> Self {
        LeadRecord {
            missed_demos: 0,
            last_interaction_days: 0,
            contact_shared: ContactShared::Unknown,
            link_clicked: false,
            scheduled_by: ScheduledBy::Other,
            showed_up_for_demo: false,
        }
    }
}

/// Outcome of a WhatsApp Cloud API send for one lead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryReport {
    pub lead_name: String,
    pub success: bool,
    pub message_id: Option<String>,
    pub error: Option<String>,
}

/// One input row after classification and outreach preparation.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedLead {
    /// 0-based data row index in the input file.
    pub row: usize,
    pub name: String,
    pub channel: Option<String>,
    pub record: LeadRecord,
    pub risk: RiskCategory,
    /// Name of the classifier rule that decided `risk`; `None` for the catch-all.
    pub rule: Option<&'static str>,
    /// Digits-only contact number, `None` when it could not be derived.
    pub phone: Option<String>,
    /// Advisory validation findings; never block classification.
    pub issues: Vec<String>,
    pub message: Option<String>,
    pub link: Option<String>,
    pub delivery: Option<DeliveryReport>,
}

impl ProcessedLead {
    /// Label shown to users: the risk category, or `Invalid Phone` when no
    /// contact channel could be derived.
    pub fn label(&self) -> String {
        match self.phone {
            Some(_) => self.risk.to_string(),
            None => INVALID_PHONE_LABEL.to_string(),
        }
    }
}

pub const INVALID_PHONE_LABEL: &str = "Invalid Phone";
