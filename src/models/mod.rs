pub mod session;
pub mod session_status;

pub use session::{NewSession, WorkSession};
pub use session_status::SessionStatus;
