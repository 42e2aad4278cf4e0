use demorse::decoder::{self, DecodeError, DecodeOptions, OverlongRun, TrailingRun};
use demorse::stream::MorseDecoder;

#[derive(Debug)]
struct Vector {
    name: String,
    options: DecodeOptions,
    input: Vec<u8>,
    /// `None` when the vector must fail with `InvalidSequence`.
    expected: Option<Vec<u8>>,
}

fn hex_to_bytes(s: &str) -> Vec<u8> {
    let s = s.trim();
    if s.is_empty() {
        return Vec::new();
    }
    assert!(
        s.len().is_multiple_of(2),
        "hex string must have even length"
    );
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap())
        .collect()
}

fn parse_options(trailing: &str, overlong: &str) -> DecodeOptions {
    DecodeOptions {
        trailing: match trailing {
            "flush" => TrailingRun::Flush,
            "drop" => TrailingRun::Drop,
            other => panic!("unknown trailing policy {other}"),
        },
        overlong: match overlong {
            "reject" => OverlongRun::Reject,
            "substitute" => OverlongRun::Substitute,
            other => panic!("unknown overlong policy {other}"),
        },
    }
}

fn load_vectors() -> Vec<Vector> {
    let manifest = include_str!("vectors/manifest.tsv");
    manifest
        .lines()
        .filter(|line| !line.trim().is_empty() && !line.starts_with('#'))
        .map(|line| {
            let parts: Vec<_> = line.split('|').collect();
            assert_eq!(parts.len(), 5, "invalid vector row: {line}");
            Vector {
                name: parts[0].to_string(),
                options: parse_options(parts[1], parts[2]),
                input: hex_to_bytes(parts[3]),
                expected: (parts[4] != "ERR").then(|| hex_to_bytes(parts[4])),
            }
        })
        .collect()
}

#[test]
fn vector_database_is_non_empty() {
    let vectors = load_vectors();
    assert!(!vectors.is_empty());
    assert!(vectors.iter().any(|v| v.expected.is_none()));
}

#[test]
fn in_place_decode_all_vectors() {
    for v in load_vectors() {
        let mut buf = v.input.clone();
        let result = decoder::decode_in_place_with(&mut buf, &v.options);
        match (&v.expected, result) {
            (Some(expected), Ok(len)) => assert_eq!(&buf[..len], &expected[..], "vector {}", v.name),
            (None, Err(DecodeError::InvalidSequence { .. })) => {}
            (_, other) => panic!("vector {}: unexpected result {other:?}", v.name),
        }
    }
}

#[test]
fn stream_decode_all_vectors() {
    for v in load_vectors() {
        let mut out = Vec::new();
        let result = MorseDecoder::with_options(&v.input[..], v.options).decode_to(&mut out);
        match (&v.expected, result) {
            (Some(expected), Ok(total)) => {
                assert_eq!(&out, expected, "vector {}", v.name);
                assert_eq!(total, expected.len() as u64, "vector {}", v.name);
            }
            (None, Err(DecodeError::InvalidSequence { .. })) => {}
            (_, other) => panic!("vector {}: unexpected result {other:?}", v.name),
        }
    }
}

#[test]
fn nul_terminated_decode_all_vectors() {
    for v in load_vectors() {
        if v.input.contains(&0) {
            continue;
        }
        let mut buf = v.input.clone();
        buf.push(0);
        let result = decoder::decode_nul_terminated_with(&mut buf, &v.options);
        match (&v.expected, result) {
            (Some(expected), Ok(len)) => {
                assert_eq!(&buf[..len], &expected[..], "vector {}", v.name);
                assert_eq!(buf[len], 0, "vector {}", v.name);
            }
            (None, Err(DecodeError::InvalidSequence { .. })) => {}
            (_, other) => panic!("vector {}: unexpected result {other:?}", v.name),
        }
    }
}
