use {crate::units::FieldUnits, thiserror::Error};

pub type Result<T> = std::result::Result<T, ExtrapolationError>;

#[derive(Error, Debug)]
pub enum ExtrapolationError {
    #[error("target pressure level set is empty")]
    EmptyLevelSet,

    #[error("unit mismatch: expected {expected}, found {found}")]
    UnitMismatch {
        expected: FieldUnits,
        found: FieldUnits,
    },

    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("invalid pressure levels: {0}")]
    InvalidLevels(String),

    #[error("invalid lapse-rate table: {0}")]
    InvalidLapseTable(String),

    #[error("value out of range: {0}")]
    OutOfRange(String),

    #[error("namelist error: {0}")]
    Namelist(String),

    #[error("IO error {0}")]
    Io(#[from] std::io::Error),
}
