use thiserror::Error;

/// Errors raised by the logic engine.
///
/// A stale or incompatible ruleset surfaces as an unknown identifier at the
/// point of lookup; it is never silently defaulted. Pending results (an
/// analysis that has not finished yet) are not errors and are represented as
/// absent values instead.
#[derive(Error, Debug)]
pub enum TrackError {
    /// The check or item identifier is not part of the compiled ruleset
    #[error("unknown check '{0}'")]
    UnknownCheck(String),

    /// The bit index is outside the compiled requirement table
    #[error("bit {0} is not part of the requirement table")]
    UnknownBit(usize),

    /// The requirement text could not be parsed
    #[error("not a valid requirement: '{0}'")]
    InvalidRule(String),

    /// The identifier is empty or otherwise unusable
    #[error("the identifier '{0}' is invalid")]
    InvalidName(String),

    /// The area or location is not part of the area graph
    #[error("there is no area or location named '{0}'")]
    NoSuchArea(String),
}
