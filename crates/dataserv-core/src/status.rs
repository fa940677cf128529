//! Human-readable farmer status for operator-facing listings

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::Farmer;

/// Render an elapsed time coarsely: seconds under a minute, minutes under
/// an hour, hours beyond
pub fn humanize_since(seconds: i64) -> String {
    let seconds = seconds.max(0);
    if seconds < 60 {
        format!("{} second(s)", seconds)
    } else if seconds < 3600 {
        format!("{} minute(s)", seconds / 60)
    } else {
        format!("{} hour(s)", seconds / 3600)
    }
}

/// One row of the online-farmers listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FarmerStatus {
    pub btc_addr: String,
    pub last_seen: DateTime<Utc>,
    pub last_audit: DateTime<Utc>,
    /// Seconds since `last_seen`, relative to the listing time
    pub seen_ago_secs: i64,
}

impl FarmerStatus {
    pub fn at(farmer: &Farmer, now: DateTime<Utc>) -> Self {
        Self {
            btc_addr: farmer.address().to_string(),
            last_seen: farmer.last_seen(),
            last_audit: farmer.last_audit(),
            seen_ago_secs: (now - farmer.last_seen()).num_seconds(),
        }
    }

    /// `<address> |  Last Seen: <elapsed>` line for text output
    pub fn summary_line(&self) -> String {
        format!(
            "{} |  Last Seen: {}",
            self.btc_addr,
            humanize_since(self.seen_ago_secs)
        )
    }
}
