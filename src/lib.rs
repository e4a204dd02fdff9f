
pub mod atmosphere;
pub mod extrapolate;
pub mod field;
pub mod lapse;

pub mod namelist;
pub mod thermo;
pub mod vinterp;

pub mod constants;
pub mod error;
pub mod parameters;
pub mod units;
pub mod utils;
