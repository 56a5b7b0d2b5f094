use crate::configuration::EXPIRY_WARNING_DAYS;
use serde::Serialize;
use std::fmt;


#[derive(Debug, Copy, Clone, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
/// Certificate expiry state
pub enum ExpiryState {
    /// More than the warning period left
    Valid,

    /// Expires within the warning period
    ExpiringSoon,

    /// Expired, or expires today
    Expired,
}


impl ExpiryState {
    /// State for signed amount of days remaining
    pub fn from_days(days_remaining: i64) -> ExpiryState {
        match days_remaining {
            days if days <= 0 => ExpiryState::Expired,
            days if days <= EXPIRY_WARNING_DAYS => ExpiryState::ExpiringSoon,
            _ => ExpiryState::Valid,
        }
    }


    /// Host in this state should be notified about
    pub fn is_at_risk(self) -> bool {
        self != ExpiryState::Valid
    }
}


impl fmt::Display for ExpiryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpiryState::Valid => write!(f, "VALID"),
            ExpiryState::ExpiringSoon => write!(f, "EXPIRING SOON"),
            ExpiryState::Expired => write!(f, "EXPIRED"),
        }
    }
}


#[derive(Debug, Copy, Clone, Serialize, PartialEq, Eq, Hash)]
/// Expiry classification of a certificate
pub struct Classification {
    /// Expiry state
    pub state: ExpiryState,

    /// Whole days until expiry, negative once expired
    pub days_remaining: i64,
}


impl Classification {
    /// Short description of remaining validity, like "in 5 days" or "10 days ago"
    pub fn describe(&self) -> String {
        match self.days_remaining {
            0 => "today".to_string(),
            1 => "in 1 day".to_string(),
            -1 => "1 day ago".to_string(),
            days if days > 0 => format!("in {} days", days),
            days => format!("{} days ago", -days),
        }
    }
}
