//! The action table: per-column conversion rules.
//!
//! Each rule maps a CSV column name to an [`Action`] describing how its
//! values are coerced before upload. The table is built once from the
//! command-line `(field, action)` pairs and is read-only afterwards.

use std::collections::HashMap;

use tracing::warn;

use crate::error::{ConfigError, ConfigResult};

// =============================================================================
// Action
// =============================================================================

/// A conversion rule applied to one column's values.
///
/// A `date` rule always carries its format string, so a date action
/// without a format is not representable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Parse as a decimal floating point number.
    Float,
    /// Parse as a base-10 integer.
    Int,
    /// Parse as a datetime using a strftime-style format string.
    Date { format: String },
}

impl Action {
    /// The action name as written on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Float => "float",
            Self::Int => "int",
            Self::Date { .. } => "date",
        }
    }
}

// =============================================================================
// ActionTable
// =============================================================================

/// Validated, indexed set of per-column conversion rules.
///
/// Built once at startup; read-only during row processing.
#[derive(Debug, Clone, Default)]
pub struct ActionTable {
    rules: HashMap<String, Action>,
}

impl ActionTable {
    /// Build the table from `(field, action_name)` pairs and the ordered
    /// list of date format strings.
    ///
    /// Date actions consume format strings positionally: the i-th `date`
    /// action (counting duplicates) receives the i-th format string.
    ///
    /// If the same field appears more than once, the last rule wins; the
    /// overwrite is logged as a warning rather than silently applied.
    pub fn build(pairs: &[(String, String)], date_formats: &[String]) -> ConfigResult<Self> {
        let mut rules = HashMap::new();
        let mut next_format = 0usize;

        for (field, name) in pairs {
            let action = match name.as_str() {
                "float" => Action::Float,
                "int" => Action::Int,
                "date" => {
                    let format = date_formats.get(next_format).ok_or_else(|| {
                        ConfigError::MissingDateFormat {
                            field: field.clone(),
                        }
                    })?;
                    next_format += 1;
                    Action::Date {
                        format: format.clone(),
                    }
                }
                other => return Err(ConfigError::InvalidAction(other.to_string())),
            };

            if let Some(previous) = rules.insert(field.clone(), action) {
                warn!(
                    field = %field,
                    dropped = previous.name(),
                    "duplicate action for field, keeping the last one"
                );
            }
        }

        Ok(Self { rules })
    }

    /// Look up the rule for a column, if any.
    pub fn get(&self, field: &str) -> Option<&Action> {
        self.rules.get(field)
    }

    /// All ruled column names, sorted for deterministic reporting.
    pub fn fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        fields.sort_unstable();
        fields
    }

    /// Number of rules in the table.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the table holds no rules at all.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
