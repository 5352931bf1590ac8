//! Administration dashboard counters.

use serde::{Deserialize, Serialize};

/// Counters shown on the administration dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[allow(missing_docs)]
pub struct DashboardStats {
    pub total_users: u64,
    pub total_lawyers: u64,
    pub total_clients: u64,
    pub total_cases: u64,
    pub active_cases: u64,
    pub pending_verifications: u64,
    pub upcoming_appointments: u64,
}
