//! Record identifier generation.

use uuid::Uuid;

/// Generate a new, globally unique record id.
///
/// Ids are time-ordered (UUID version 7) and rendered as 32 lowercase hex
/// characters without hyphens.
///
/// # Example
///
/// ```
/// use users_store::utils::generate_id;
///
/// let id = generate_id();
/// assert_eq!(id.len(), 32);
/// assert_ne!(id, generate_id());
/// ```
pub fn generate_id() -> String {
    Uuid::now_v7().simple().to_string()
}
