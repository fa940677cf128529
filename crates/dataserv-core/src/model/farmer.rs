use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Farmer - an untrusted node renting out disk space for payment
///
/// A farmer is identified solely by its payout address, which never changes
/// after registration. Its state is the pair of liveness timestamps; how
/// stale a farmer may get before it counts as offline is caller policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Farmer {
    /// Payout address (unique across the registry)
    #[serde(rename = "btc_addr")]
    address: String,

    /// Last time the farmer proved it was online (ping or audit)
    last_seen: DateTime<Utc>,

    /// Last time the farmer completed an audit
    last_audit: DateTime<Utc>,
}

impl Farmer {
    /// Build a farmer record with explicit timestamps
    ///
    /// Address validity is not checked here; registration goes through
    /// `FarmerRegistry`, which owns that invariant.
    pub fn new(
        address: impl Into<String>,
        last_seen: DateTime<Utc>,
        last_audit: DateTime<Utc>,
    ) -> Self {
        Self {
            address: address.into(),
            last_seen,
            last_audit,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn last_seen(&self) -> DateTime<Utc> {
        self.last_seen
    }

    pub fn last_audit(&self) -> DateTime<Utc> {
        self.last_audit
    }

    /// Record a liveness signal
    pub fn mark_seen(&mut self, at: DateTime<Utc>) {
        self.last_seen = at;
    }

    /// Record a completed audit; an audit is also a liveness signal
    pub fn mark_audited(&mut self, at: DateTime<Utc>) {
        self.last_seen = at;
        self.last_audit = at;
    }

    /// Whether the farmer was seen strictly after `cutoff`
    pub fn seen_after(&self, cutoff: DateTime<Utc>) -> bool {
        self.last_seen > cutoff
    }
}
