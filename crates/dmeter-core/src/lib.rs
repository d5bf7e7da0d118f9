pub mod constants;
pub mod error;
pub mod source;
pub mod submission;
pub mod types;
pub mod verification;

pub use constants::*;
pub use error::DmeterError;
pub use source::*;
pub use submission::*;
pub use types::*;
pub use verification::*;
