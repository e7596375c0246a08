use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum InvalidInputError {
    #[error("Profile name must not be empty.")]
    EmptyProfileName(),

    #[error("Profile name '{0}' must not contain path separators.")]
    ProfileNameContainsPathSeparator(String),

    #[error("Profile name '{0}' is reserved.")]
    ReservedProfileName(String),

    #[error("Profile name '{0}' must not start or end with whitespace.")]
    ProfileNameHasSurroundingWhitespace(String),

    #[error("The {0} must not contain control characters.")]
    ControlCharacter(&'static str),

    #[error("The display name must not be empty.")]
    EmptyDisplayName(),

    #[error("'{0}' is not a valid email address.")]
    InvalidEmail(String),
}
