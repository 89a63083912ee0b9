//! Resource name normalization

use crate::error::ValidationError;
use crate::error::validation::require_value;

/// Suffix every resource name carries inside the native store
pub const RESOURCE_NAME_TAIL: &str = "/";

/// Complete a resource name so it ends with [`RESOURCE_NAME_TAIL`]
///
/// Names that already end with the tail are returned unchanged, so applying
/// this twice gives the same result as applying it once.
///
/// ```
/// use pwvault_core::security::complete_resource_name;
///
/// assert_eq!(complete_resource_name("intranet").unwrap(), "intranet/");
/// assert_eq!(complete_resource_name("intranet/").unwrap(), "intranet/");
/// assert!(complete_resource_name("  ").is_err());
/// ```
pub fn complete_resource_name(resource_name: &str) -> Result<String, ValidationError> {
    let resource_name = require_value("resource_name", resource_name)?;

    if has_tail(resource_name) {
        Ok(resource_name.to_string())
    } else {
        Ok(format!("{resource_name}{RESOURCE_NAME_TAIL}"))
    }
}

fn has_tail(resource_name: &str) -> bool {
    resource_name.len() >= RESOURCE_NAME_TAIL.len()
        && resource_name
            .get(resource_name.len() - RESOURCE_NAME_TAIL.len()..)
            .is_some_and(|tail| tail.eq_ignore_ascii_case(RESOURCE_NAME_TAIL))
}
