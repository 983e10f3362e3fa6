//! # taskboard-entity
//!
//! Domain entities for Taskboard. Every entity wraps [`RepositoryData`]
//! and implements [`Entity`] so the generic repository mixins can read
//! and write it by column name. Each module also declares the abstract
//! repository traits its entities are stored through.
//!
//! [`RepositoryData`]: taskboard_core::types::RepositoryData
//! [`Entity`]: taskboard_core::traits::Entity

/// Implements `FromStr`, `Display`, and `From<_> for SqlValue` for a
/// fieldless enum stored as lowercase text.
macro_rules! text_enum {
    ($name:ident, $label:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = taskboard_core::AppError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($text => Ok(Self::$variant),)+
                    _ => Err(taskboard_core::AppError::validation(format!(
                        "Invalid {}: '{s}'. Expected one of: {}",
                        $label,
                        [$($text),+].join(", ")
                    ))),
                }
            }
        }

        impl From<$name> for taskboard_core::types::SqlValue {
            fn from(value: $name) -> Self {
                taskboard_core::types::SqlValue::Text(value.as_str().to_string())
            }
        }

        impl From<$name> for taskboard_core::types::FilterValue {
            fn from(value: $name) -> Self {
                taskboard_core::types::FilterValue::String(value.as_str().to_string())
            }
        }
    };
}

pub(crate) use text_enum;

pub mod board;
pub mod task;
pub mod user;
