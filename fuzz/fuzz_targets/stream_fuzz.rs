#![no_main]
use libfuzzer_sys::fuzz_target;
use demorse::decoder::{self, DecodeOptions, OverlongRun, TrailingRun};
use demorse::stream::MorseDecoder;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    // Use first byte as control flags.
    let flags = data[0];
    let payload = &data[1..];
    let options = DecodeOptions {
        trailing: if flags & 1 != 0 {
            TrailingRun::Drop
        } else {
            TrailingRun::Flush
        },
        overlong: if flags & 2 != 0 {
            OverlongRun::Substitute
        } else {
            OverlongRun::Reject
        },
    };

    // The streaming and in-place decoders must agree byte for byte.
    let expected = decoder::decode_with(payload, &options);
    let mut out = Vec::new();
    let streamed = MorseDecoder::with_options(payload, options).decode_to(&mut out);

    match expected {
        Ok(expected) => {
            assert!(streamed.is_ok());
            assert_eq!(out, expected);
            assert!(out.len() <= payload.len());
        }
        Err(_) => assert!(streamed.is_err()),
    }
    if options.overlong == OverlongRun::Substitute {
        assert!(streamed.is_ok());
    }
});
