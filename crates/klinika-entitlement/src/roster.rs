//! Staff usage counting.
//!
//! Derives the `activeStaffCount` input to the evaluator from a facility's
//! roster snapshot.

use klinika_types::{FacilityId, UserProfile};

/// Counts the roster members who occupy a staff seat at `facility_id`.
///
/// Every member of the facility counts except the owner, including members
/// whose role string failed to parse. No account-status filter is applied:
/// deactivated accounts still hold a seat, which is how billing has always
/// counted them. Members of other facilities, and members with no facility,
/// are ignored. An empty roster counts 0.
pub fn active_staff_count(roster: &[UserProfile], facility_id: &FacilityId) -> u32 {
    roster
        .iter()
        .filter(|member| member.facility_id.as_ref() == Some(facility_id))
        .filter(|member| member.role.is_none_or(|role| role.counts_toward_staff_cap()))
        .count() as u32
}

// ============================================================================
// Tests
// ============================================================================
