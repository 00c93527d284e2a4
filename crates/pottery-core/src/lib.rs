pub mod error;
pub use error::BuildError;

pub mod catalog;
pub use catalog::Catalog;

pub mod request;
pub use request::{MultipartPart, RequestBody, RequestDescriptor, build_request};

pub mod outcome;
pub use outcome::{ErrorPayload, Payload, RequestOutcome};

pub mod state;
pub use state::{FieldSnapshot, FieldStore};

pub mod view;
pub use view::{Surfaces, SurfacesSnapshot, SyncReport, ViewSynchronizer};
