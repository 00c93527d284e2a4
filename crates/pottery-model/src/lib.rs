mod domain;
pub use domain::*;

mod operation;
pub use operation::*;

mod error;
pub use error::ModelError;
