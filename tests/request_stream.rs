//! End-to-end parsing through the blocking stream driver.

use std::io;

use http_stream_parser::http::{ParseError, ParserState, RequestParser, RequestPart};
use http_stream_parser::{request_from_reader, request_from_reader_with, ParserConfig};

mod common;

use common::{ChunkReader, FailingReader, InterruptingReader, ScriptedReader, FULL_REQUEST};

#[test]
fn test_acceptance_example() {
    let request = request_from_reader(ChunkReader::new("GET /coffee HTTP/1.1\r\n\r\n", 3)).unwrap();
    assert_eq!(request.method(), "GET");
    assert_eq!(request.target(), "/coffee");
    assert_eq!(request.http_version(), "1.1");
    assert!(request.headers().is_empty());
}

#[test]
fn test_chunk_size_independence() {
    let reference = request_from_reader(ChunkReader::new(FULL_REQUEST, FULL_REQUEST.len())).unwrap();
    assert_eq!(reference.headers().len(), 3);

    for per_read in 1..=FULL_REQUEST.len() {
        let request = request_from_reader(ChunkReader::new(FULL_REQUEST, per_read)).unwrap();
        assert_eq!(request, reference, "per_read = {per_read}");
    }
}

#[test]
fn test_chunk_size_independence_with_read_size() {
    let reference = request_from_reader(ChunkReader::new(FULL_REQUEST, 1)).unwrap();
    for read_chunk_size in [1, 2, 8, 13, 1024] {
        let config = ParserConfig {
            read_chunk_size,
            ..ParserConfig::default()
        };
        let request =
            request_from_reader_with(ChunkReader::new(FULL_REQUEST, usize::MAX / 2), &config).unwrap();
        assert_eq!(request, reference, "read_chunk_size = {read_chunk_size}");
    }
}

#[test]
fn test_partial_line_across_reads() {
    let config = ParserConfig {
        read_chunk_size: 64,
        ..ParserConfig::default()
    };
    let split = request_from_reader_with(
        ScriptedReader::new(&[b"GET / HTTP", b"/1.1\r\n", b"\r\n"]),
        &config,
    )
    .unwrap();
    let whole = request_from_reader_with(ScriptedReader::new(&[b"GET / HTTP/1.1\r\n\r\n"]), &config)
        .unwrap();
    assert_eq!(split.request_line(), whole.request_line());
    assert_eq!(split.target(), "/");
}

#[test]
fn test_header_round_trip() {
    let input = "POST /submit HTTP/1.1\r\n\
Host:example.com\r\n\
   X-Padded:    value with spaces   \r\n\
Content-Type: text/plain\r\n\
X-Dup: first\r\n\
X-Dup: second\r\n\
\r\n";
    let request = request_from_reader(ChunkReader::new(input, 5)).unwrap();
    let headers = request.headers();
    assert_eq!(headers.len(), 4);
    assert_eq!(headers.get("Host"), Some("example.com"));
    assert_eq!(headers.get("X-Padded"), Some("value with spaces"));
    assert_eq!(headers.get("Content-Type"), Some("text/plain"));
    assert_eq!(headers.get("X-Dup"), Some("second"));
}

#[test]
fn test_rejection_set() {
    let cases: [(&str, fn(&ParseError) -> bool); 5] = [
        ("GET /\r\n", |e| matches!(e, ParseError::RequestLineParts(2))),
        ("GET / HTTP/1.1 extra\r\n", |e| matches!(e, ParseError::RequestLineParts(4))),
        ("get / HTTP/1.1\r\n", |e| {
            matches!(e, ParseError::InvalidMethodChar { byte: b'g', index: 0 })
        }),
        ("GET / ftp/1.1\r\n", |e| matches!(e, ParseError::ProtocolPrefix(_))),
        ("GET / HTTP/2.0\r\n", |e| matches!(e, ParseError::UnsupportedVersion(_))),
    ];

    for (input, expected) in cases {
        for per_read in [1, 4, input.len()] {
            let err = request_from_reader(ChunkReader::new(input, per_read)).unwrap_err();
            assert!(expected(&err), "{input:?} in {per_read}-byte reads gave {err:?}");
        }
    }
}

#[test]
fn test_malformed_header_rejected() {
    let err = request_from_reader(ChunkReader::new(
        "GET / HTTP/1.1\r\n       Host : localhost:42069       \r\n\r\n",
        8,
    ))
    .unwrap_err();
    assert!(matches!(err, ParseError::FieldNameWhitespace));
    assert_eq!(err.part(), RequestPart::Header);

    let err = request_from_reader(ChunkReader::new("GET / HTTP/1.1\r\nNoColon\r\n\r\n", 8)).unwrap_err();
    assert!(matches!(err, ParseError::MissingSeparator));
}

#[test]
fn test_read_failure_is_wrapped() {
    let err = request_from_reader(FailingReader::new(
        "GET / HTTP/1.1\r\n",
        io::ErrorKind::ConnectionReset,
    ))
    .unwrap_err();
    match err {
        ParseError::Read { stage, source } => {
            assert_eq!(stage, "reading request");
            assert_eq!(source.kind(), io::ErrorKind::ConnectionReset);
        }
        other => panic!("expected read failure, got {other:?}"),
    }
}

#[test]
fn test_empty_stream_is_unexpected_eof() {
    let err = request_from_reader(ChunkReader::new("", 8)).unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedEof(ParserState::Initialized)));
}

#[test]
fn test_idempotent_error_on_reuse() {
    let mut parser = RequestParser::new();
    parser.parse(FULL_REQUEST.as_bytes()).unwrap();
    assert!(parser.is_done());

    for input in ["", "GET / HTTP/1.1\r\n\r\n", "\r\n", "not http at all"] {
        let err = parser.parse(input.as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::AlreadyDone));
    }
}

#[test]
fn test_interrupted_reads_are_retried() {
    let reference = request_from_reader(ChunkReader::new(FULL_REQUEST, 8)).unwrap();

    let mut reader = InterruptingReader::new(FULL_REQUEST, 8);
    let request = request_from_reader(&mut reader).unwrap();
    assert_eq!(request, reference);
    assert!(reader.interruptions > 1);
}
