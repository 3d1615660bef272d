//! Input normalization shared by category and item constructors.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static COLOUR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("valid colour regex"));

/// Rejected user input. Hosts usually treat these as silent no-ops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Category name is blank after trim.
    EmptyName,
    /// Item title is blank after trim.
    EmptyTitle,
    /// Colour is not a `#RRGGBB` hex string.
    InvalidColour(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "category name must not be blank"),
            Self::EmptyTitle => write!(f, "item title must not be blank"),
            Self::InvalidColour(value) => {
                write!(f, "invalid colour `{value}`; expected #RRGGBB")
            }
        }
    }
}

impl Error for ValidationError {}

/// Trims a category name, rejecting blank input.
pub fn normalize_name(value: &str) -> Result<String, ValidationError> {
    non_blank(value).ok_or(ValidationError::EmptyName)
}

/// Trims an item title, rejecting blank input.
pub fn normalize_title(value: &str) -> Result<String, ValidationError> {
    non_blank(value).ok_or(ValidationError::EmptyTitle)
}

/// Validates a `#RRGGBB` colour and returns it upper-cased.
pub fn normalize_colour(value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if !COLOUR_RE.is_match(trimmed) {
        return Err(ValidationError::InvalidColour(value.to_string()));
    }
    Ok(trimmed.to_ascii_uppercase())
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_colour, normalize_name, normalize_title, ValidationError};

    #[test]
    fn names_and_titles_are_trimmed() {
        assert_eq!(normalize_name("  Work ").unwrap(), "Work");
        assert_eq!(normalize_title("\tBuy Eggos\n").unwrap(), "Buy Eggos");
    }

    #[test]
    fn blank_input_is_rejected() {
        assert_eq!(normalize_name("").unwrap_err(), ValidationError::EmptyName);
        assert_eq!(normalize_name("   ").unwrap_err(), ValidationError::EmptyName);
        assert_eq!(normalize_title(" \n ").unwrap_err(), ValidationError::EmptyTitle);
    }

    #[test]
    fn colour_is_validated_and_upper_cased() {
        assert_eq!(normalize_colour("#1abc9c").unwrap(), "#1ABC9C");
        assert!(matches!(
            normalize_colour("1abc9c"),
            Err(ValidationError::InvalidColour(_))
        ));
        assert!(matches!(
            normalize_colour("#12345G"),
            Err(ValidationError::InvalidColour(_))
        ));
    }
}
