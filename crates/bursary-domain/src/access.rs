//! Level-based access checks.

/// Role level: higher means more authority.
pub type RoleLevel = i32;

/// Monotonic capability check: a caller may act if their level reaches the required level.
pub fn is_authorized(caller_level: RoleLevel, required_level: RoleLevel) -> bool {
    caller_level >= required_level
}

/// Access decision for a resource that may be owned by the caller.
///
/// Ownership is checked before the level comparison, so an owner is always allowed.
pub fn is_authorized_for(caller_level: RoleLevel, required_level: RoleLevel, is_owner: bool) -> bool {
    is_owner || is_authorized(caller_level, required_level)
}
