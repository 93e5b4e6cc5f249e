//! Byte stream handling.
//!
//! # Data Flow
//! ```text
//! byte source (std::io::Read or tokio AsyncRead)
//!     → driver.rs (read loop, end-of-stream policy, limits)
//!     → buffer.rs (accumulate, trim consumed prefix)
//!     → http::RequestParser (consume validated lines)
//!     → Request returned to caller
//!
//! byte source
//!     → lines.rs (split on '\n') → caller
//! ```
//!
//! # Design Decisions
//! - A read of zero bytes is end-of-stream, distinct from a read error
//! - The driver blocks (or awaits) on each read; no internal parallelism

pub mod buffer;
pub mod driver;
pub mod lines;

pub use buffer::AccumulationBuffer;
pub use driver::{
    request_from_async_reader, request_from_reader, request_from_reader_with, StreamDriver,
    StreamId,
};
pub use lines::{spawn_lines, LineReader};
