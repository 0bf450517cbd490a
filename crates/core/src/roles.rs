//! Well-known role name constants.
//!
//! These must match the `CHECK` constraint on `user_roles.role`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_ORGANIZER: &str = "organizer";

/// Whether `role` may create venues, events and ticket types.
pub fn can_manage_listings(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_ORGANIZER
}
