//! Incremental HTTP/1.1 request parser for chunked byte streams.

pub mod config;
pub mod http;
pub mod observability;
pub mod stream;

pub use config::{AppConfig, EofPolicy, ParserConfig};
pub use http::{Headers, ParseError, ParserState, Request, RequestLine, RequestParser};
pub use stream::{request_from_async_reader, request_from_reader, request_from_reader_with};
