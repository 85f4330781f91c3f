//! Project configuration errors.

/// Raised when the build can't determine which config file governs it.
///
/// Ambiguity is a user-input problem, so callers should report it rather
/// than retry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProjectConfigurationError {
    #[error(
        "A configuration file was not found. Make sure you have a conf.py file in your repository."
    )]
    NotFound,

    #[error(
        "We found more than one conf.py and are not sure which one to use. \
         Please specify the correct file in the project's advanced settings."
    )]
    MultipleConfFiles,
}
