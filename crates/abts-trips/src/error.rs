use thiserror::Error;

/// Errors produced by place selection and trip generation.
///
/// All of these are configuration problems (a template or a traveler
/// refers to something that does not exist) and are fatal to the call.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TripError {
    #[error("category {0:?} has no place with positive weight")]
    EmptyCategory(String),

    #[error("category {0:?} is not defined")]
    UnknownCategory(String),

    #[error("place {name:?} in category {category:?} has invalid weight {weight}")]
    InvalidWeight { category: String, name: String, weight: f64 },

    #[error("weights in category {0:?} sum to a non-finite total")]
    WeightOverflow(String),

    #[error("traveler has no attribute {0:?}")]
    MissingAttribute(String),

    #[error("invalid trip template {label:?}: {reason}")]
    InvalidTemplate { label: String, reason: String },
}

pub type TripResult<T> = Result<T, TripError>;
