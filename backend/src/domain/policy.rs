//! Profile-edit authority model.
//!
//! The entire rule set: an admin may edit any profile, everyone else only
//! their own, and a request without a resolved identity may edit nothing.
//! There is no hierarchy, delegation, or authority decay.

use super::member::{AccountRole, Member, MemberId};

/// Decide whether `actor` may edit the profile identified by `target`.
///
/// `actor` is `None` when the request carried no usable credential, or when
/// the credential's member id no longer resolves to a stored record. Both
/// cases are denied.
pub fn can_edit(actor: Option<&Member>, target: &MemberId) -> bool {
    match actor {
        Some(actor) if actor.account_role() == AccountRole::Admin => true,
        Some(actor) => actor.id() == target,
        None => false,
    }
}
