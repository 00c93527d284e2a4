mod config;
pub use config::{ClientConfig, DEFAULT_BASE_URL};

mod errors;
pub use errors::ClientError;

mod transport;
pub use transport::{HttpTransport, Transport};

mod dispatcher;
pub use dispatcher::{Dispatcher, Pending};

mod session;
pub use session::Session;
