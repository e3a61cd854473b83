pub mod analysis;
pub mod vital_sign;

pub use analysis::*;
pub use vital_sign::*;
