//! JavaScript binding tests. Run with `wasm-pack test --node crates/vx-cipher`.
#![cfg(target_arch = "wasm32")]

use vx_cipher::{decode_cipher, encode_cipher};
use wasm_bindgen_test::wasm_bindgen_test;

#[wasm_bindgen_test]
fn encode_then_decode() {
    let text = encode_cipher(&[1, 2], &[0xAA; 32], &[0; 16], &[0xFF; 16])
        .unwrap_or_else(|_| panic!("encode failed"));
    assert_eq!(text.len(), 116);

    let decoded = decode_cipher(&text).unwrap_or_else(|_| panic!("decode failed"));
    assert_eq!(decoded.ciphertext(), vec![1, 2]);
    assert_eq!(decoded.public_key(), vec![0xAA; 32]);
    assert_eq!(decoded.mac(), vec![0; 16]);
    assert_eq!(decoded.tag(), vec![0xFF; 16]);
}

#[wasm_bindgen_test]
fn decode_rejects_empty() {
    assert!(decode_cipher("").is_err());
}

#[wasm_bindgen_test]
fn decode_rejects_garbage() {
    assert!(decode_cipher("not an envelope!").is_err());
}
