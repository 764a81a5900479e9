pub mod port;
pub mod recording;

pub use port::{DriverPort, Report};
pub use recording::{NullDriver, RecordingDriver};
