//! Envelope decode vector tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::fs;

use resma_core::format::envelope;

use vector_loader::TestVector;

fn load(name: &str) -> TestVector {
    let s = fs::read_to_string(format!("tests/vectors/{name}")).unwrap();
    serde_json::from_str(&s).unwrap()
}

#[test]
fn envelope_vectors() {
    let files = [
        "plain_map.json",
        "plain_nested.json",
        "too_short.json",
        "unknown_tag.json",
        "plain_corrupt_payload.json",
        "compressed_corrupt_payload.json",
    ];

    for f in files {
        let v = load(f);
        let raw = v.envelope.decode();
        let res = envelope::decode::<serde_json::Value>(&raw);

        if let Some(err) = v.expect_error {
            let e = res.expect_err("expected error");
            assert_eq!(e.client_code().as_str(), err.code, "vector={}", v.description);
            continue;
        }

        let value = res.expect("expected ok value");
        let expect = v.expect.expect("missing expect block");
        assert_eq!(value, expect, "vector={}", v.description);
    }
}
