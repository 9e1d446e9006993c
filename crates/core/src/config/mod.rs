use serde::{Deserialize, Serialize};

/// Settings for the `key = value` option text format read by
/// [`crate::OptionStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Lines starting with this prefix (after leading whitespace) are skipped.
    pub comment_prefix: String,
    pub separator: char,
    /// Let a later definition of a key replace an earlier one instead of
    /// failing the load.
    pub allow_redefinition: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            comment_prefix: "#".to_string(),
            separator: '=',
            allow_redefinition: false,
        }
    }
}

impl StoreConfig {
    pub fn permissive() -> Self {
        Self {
            allow_redefinition: true,
            ..Self::default()
        }
    }
}
