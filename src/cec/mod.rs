//! CEC daemon side of the bridge
//!
//! - `event`: classify a raw `cec-client` line
//! - `stream`: spawn the daemon and read its stdout line by line

pub mod event;
pub mod stream;

pub use event::{classify, CecAction};
pub use stream::{line_stream, CecEventStream, CecLineCodec, StreamError};
