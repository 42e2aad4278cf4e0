#![no_main]
use libfuzzer_sys::fuzz_target;
use demorse::decoder;

fuzz_target!(|data: &[u8]| {
    // One spare byte for the terminator, so the input alone can never
    // push a write out of bounds.
    let mut buf = Vec::with_capacity(data.len() + 1);
    buf.extend_from_slice(data);
    buf.push(0);

    // The decoder must never panic; overlong runs come back as errors.
    if let Ok(len) = decoder::decode_nul_terminated(&mut buf) {
        assert!(len <= data.len());
        assert_eq!(buf[len], 0);
    }
});
