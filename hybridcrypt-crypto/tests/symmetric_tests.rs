//! AES-CBC envelope tests.
//!
//! Validates that:
//! - Only 128/192/256-bit keys can be generated
//! - Every key length round-trips arbitrary data
//! - IVs are fresh per call
//! - Tampered or truncated envelopes never yield the original plaintext

use hybridcrypt_crypto::{
    BLOCK_SIZE, CryptoError, Envelope, IV_SIZE, KeyLength, SymmetricCipher, SymmetricKey,
    decrypt, encrypt, generate_key,
};
use pretty_assertions::assert_eq;

#[test]
fn generate_key_accepts_supported_lengths() {
    for bits in [128, 192, 256] {
        let key = generate_key(bits).unwrap();
        assert_eq!(key.as_bytes().len(), bits / 8);
        assert_eq!(key.length().bits(), bits);
    }
}

#[test]
fn generate_key_rejects_other_lengths() {
    for bits in [0, 8, 64, 127, 129, 160, 255, 257, 384, 512] {
        match generate_key(bits) {
            Err(CryptoError::InvalidKeyLength { bits: reported }) => assert_eq!(reported, bits),
            other => panic!("expected InvalidKeyLength for {bits}, got {other:?}"),
        }
    }
}

#[test]
fn generated_keys_are_random() {
    let a = generate_key(256).unwrap();
    let b = generate_key(256).unwrap();
    assert_ne!(a.as_bytes(), b.as_bytes());
}

#[test]
fn key_from_bytes_validates_length() {
    assert!(SymmetricKey::from_bytes(vec![0u8; 24]).is_ok());
    assert!(matches!(
        SymmetricKey::from_bytes(vec![0u8; 20]),
        Err(CryptoError::InvalidKeyLength { bits: 160 })
    ));
}

#[test]
fn roundtrip_every_key_length() {
    for length in KeyLength::ALL {
        let key = generate_key(length.bits()).unwrap();
        let plaintext = b"The quick brown fox jumps over the lazy dog";
        let envelope = encrypt(&key, plaintext).unwrap();
        assert_eq!(decrypt(&key, &envelope).unwrap(), plaintext);
    }
}

#[test]
fn hello_world_envelope_is_two_blocks() {
    let key = generate_key(128).unwrap();
    let envelope = encrypt(&key, b"HELLO WORLD").unwrap();
    assert_eq!(envelope.encoded_len(), 32);
    assert_eq!(envelope.to_bytes().len(), IV_SIZE + BLOCK_SIZE);
}

#[test]
fn empty_plaintext_yields_one_padding_block() {
    let key = generate_key(192).unwrap();
    let envelope = encrypt(&key, b"").unwrap();
    assert_eq!(envelope.ciphertext.len(), BLOCK_SIZE);
    assert_eq!(decrypt(&key, &envelope).unwrap(), b"");
}

#[test]
fn ciphertext_is_block_aligned() {
    let key = generate_key(128).unwrap();
    for len in 0..64 {
        let envelope = encrypt(&key, &vec![0x5Au8; len]).unwrap();
        assert_eq!(envelope.ciphertext.len() % BLOCK_SIZE, 0);
        assert_eq!(envelope.ciphertext.len(), (len / BLOCK_SIZE + 1) * BLOCK_SIZE);
    }
}

#[test]
fn each_encrypt_uses_fresh_iv() {
    let key = generate_key(128).unwrap();
    let plaintext = b"same input every time";

    let first = encrypt(&key, plaintext).unwrap();
    let second = encrypt(&key, plaintext).unwrap();

    assert_ne!(first.iv, second.iv);
    assert_ne!(first.ciphertext, second.ciphertext);
}

#[test]
fn envelope_bytes_roundtrip() {
    let key = generate_key(256).unwrap();
    let envelope = encrypt(&key, b"persist me").unwrap();

    let raw = envelope.to_bytes();
    assert_eq!(&raw[..IV_SIZE], &envelope.iv);

    let parsed = Envelope::from_bytes(&raw).unwrap();
    assert_eq!(parsed, envelope);
    assert_eq!(decrypt(&key, &parsed).unwrap(), b"persist me");
}

#[test]
fn envelope_shorter_than_iv_is_rejected() {
    let err = Envelope::from_bytes(&[0u8; IV_SIZE - 1]).unwrap_err();
    assert!(matches!(err, CryptoError::Cipher(_)));
}

#[test]
fn empty_ciphertext_is_cipher_error() {
    let key = generate_key(128).unwrap();
    let envelope = Envelope::from_bytes(&[0u8; IV_SIZE]).unwrap();
    assert!(matches!(decrypt(&key, &envelope), Err(CryptoError::Cipher(_))));
}

#[test]
fn misaligned_ciphertext_is_cipher_error() {
    let key = generate_key(128).unwrap();
    let mut envelope = encrypt(&key, b"some text").unwrap();
    envelope.ciphertext.pop();
    assert!(matches!(decrypt(&key, &envelope), Err(CryptoError::Cipher(_))));
}

#[test]
fn flipped_bit_never_returns_original() {
    let key = generate_key(128).unwrap();
    let plaintext = b"attack at dawn, bring the maps and forty lanterns".to_vec();
    let envelope = encrypt(&key, &plaintext).unwrap();

    for byte in 0..envelope.ciphertext.len() {
        for bit in 0..8 {
            let mut tampered = envelope.clone();
            tampered.ciphertext[byte] ^= 1 << bit;
            match decrypt(&key, &tampered) {
                Err(CryptoError::Padding) => {}
                Ok(recovered) => assert_ne!(recovered, plaintext, "byte {byte} bit {bit}"),
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }
    }
}

#[test]
fn wrong_key_does_not_recover_plaintext() {
    let key = generate_key(256).unwrap();
    let other = generate_key(256).unwrap();
    let plaintext = b"only for the right key".to_vec();
    let envelope = encrypt(&key, &plaintext).unwrap();

    match decrypt(&other, &envelope) {
        Err(CryptoError::Padding) => {}
        Ok(recovered) => assert_ne!(recovered, plaintext),
        Err(other) => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn cipher_component_checks_unwrapped_length() {
    let cipher = SymmetricCipher::new(KeyLength::Aes192);
    assert!(cipher.key_from_bytes(vec![1u8; 24]).is_ok());
    assert!(matches!(
        cipher.key_from_bytes(vec![1u8; 16]),
        Err(CryptoError::InvalidKeyLength { bits: 128 })
    ));
}

#[test]
fn cipher_component_roundtrip() {
    let cipher = SymmetricCipher::new(KeyLength::Aes256);
    let key = cipher.generate_key().unwrap();
    assert_eq!(key.length(), KeyLength::Aes256);

    let envelope = cipher.encrypt(&key, b"component").unwrap();
    assert_eq!(cipher.decrypt(&key, &envelope).unwrap(), b"component");
}

#[test]
fn key_length_parsing() {
    assert_eq!(KeyLength::try_from(192).unwrap(), KeyLength::Aes192);
    assert_eq!(KeyLength::default(), KeyLength::Aes128);
    assert_eq!(KeyLength::Aes256.to_string(), "256");
    assert!(KeyLength::try_from(100).is_err());
}

// Property-based tests
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn encrypt_decrypt_always_roundtrips(
            plaintext in proptest::collection::vec(any::<u8>(), 0..4096),
            bits in prop::sample::select(vec![128usize, 192, 256]),
        ) {
            let key = generate_key(bits).unwrap();
            let envelope = encrypt(&key, &plaintext).unwrap();
            let parsed = Envelope::from_bytes(&envelope.to_bytes()).unwrap();
            prop_assert_eq!(decrypt(&key, &parsed).unwrap(), plaintext);
        }
    }
}
