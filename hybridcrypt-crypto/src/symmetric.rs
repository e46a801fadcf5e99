//! Bulk encryption with AES in CBC mode.
//!
//! The on-disk envelope is the 16-byte IV followed directly by the
//! PKCS#7-padded ciphertext. There is no length prefix and no
//! authentication tag.

use crate::error::{CryptoError, CryptoResult};
use aes::{Aes128, Aes192, Aes256};
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockCipher, BlockDecryptMut, BlockEncryptMut, KeyInit, KeyIvInit};
use rand::TryRngCore;
use rand::rngs::OsRng;
use std::fmt;
use zeroize::Zeroizing;

/// Size of the CBC initialization vector in bytes.
pub const IV_SIZE: usize = 16;

/// AES block size in bytes.
pub const BLOCK_SIZE: usize = 16;

/// Supported AES key lengths.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum KeyLength {
    #[default]
    Aes128,
    Aes192,
    Aes256,
}

impl KeyLength {
    pub const ALL: [KeyLength; 3] = [KeyLength::Aes128, KeyLength::Aes192, KeyLength::Aes256];

    /// Key length in bits.
    pub const fn bits(self) -> usize {
        match self {
            KeyLength::Aes128 => 128,
            KeyLength::Aes192 => 192,
            KeyLength::Aes256 => 256,
        }
    }

    /// Key length in bytes.
    pub const fn bytes(self) -> usize {
        self.bits() / 8
    }

    /// Parses a bit length, accepting only 128, 192 and 256.
    pub fn from_bits(bits: usize) -> CryptoResult<Self> {
        match bits {
            128 => Ok(KeyLength::Aes128),
            192 => Ok(KeyLength::Aes192),
            256 => Ok(KeyLength::Aes256),
            other => Err(CryptoError::InvalidKeyLength { bits: other }),
        }
    }
}

impl TryFrom<usize> for KeyLength {
    type Error = CryptoError;

    fn try_from(bits: usize) -> CryptoResult<Self> {
        Self::from_bits(bits)
    }
}

impl fmt::Display for KeyLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

/// Raw AES key. The bytes are zeroized when the key is dropped.
#[derive(Clone)]
pub struct SymmetricKey {
    length: KeyLength,
    bytes: Zeroizing<Vec<u8>>,
}

impl SymmetricKey {
    /// Wraps raw key bytes, rejecting anything that is not 16, 24 or 32 bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> CryptoResult<Self> {
        let bytes = Zeroizing::new(bytes);
        let length = KeyLength::from_bits(bytes.len() * 8)?;
        Ok(Self { length, bytes })
    }

    pub fn length(&self) -> KeyLength {
        self.length
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymmetricKey")
            .field("length", &self.length)
            .finish_non_exhaustive()
    }
}

/// An encrypted document: IV plus CBC ciphertext.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Envelope {
    pub iv: [u8; IV_SIZE],
    pub ciphertext: Vec<u8>,
}

impl Envelope {
    /// Serializes to the raw on-disk layout (`iv || ciphertext`).
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        out.extend_from_slice(&self.iv);
        out.extend_from_slice(&self.ciphertext);
        out
    }

    /// Splits raw bytes into IV and ciphertext.
    pub fn from_bytes(bytes: &[u8]) -> CryptoResult<Self> {
        if bytes.len() < IV_SIZE {
            return Err(CryptoError::Cipher(format!(
                "envelope too short: {} bytes, need at least {IV_SIZE}",
                bytes.len()
            )));
        }
        let (iv, ciphertext) = bytes.split_at(IV_SIZE);
        let mut iv_bytes = [0u8; IV_SIZE];
        iv_bytes.copy_from_slice(iv);
        Ok(Self {
            iv: iv_bytes,
            ciphertext: ciphertext.to_vec(),
        })
    }

    /// Length of the serialized envelope in bytes.
    pub fn encoded_len(&self) -> usize {
        IV_SIZE + self.ciphertext.len()
    }
}

/// Generates a random AES key of `bits` length (128, 192 or 256).
pub fn generate_key(bits: usize) -> CryptoResult<SymmetricKey> {
    let length = KeyLength::from_bits(bits)?;
    let mut bytes = Zeroizing::new(vec![0u8; length.bytes()]);
    fill_random(&mut bytes)?;
    Ok(SymmetricKey { length, bytes })
}

/// Encrypts `plaintext` under a fresh random IV.
///
/// PKCS#7 padding always adds 1..=16 bytes, so block-aligned input
/// grows by a full block.
pub fn encrypt(key: &SymmetricKey, plaintext: &[u8]) -> CryptoResult<Envelope> {
    let mut iv = [0u8; IV_SIZE];
    fill_random(&mut iv)?;

    let ciphertext = match key.length {
        KeyLength::Aes128 => cbc_encrypt::<Aes128>(key.as_bytes(), &iv, plaintext)?,
        KeyLength::Aes192 => cbc_encrypt::<Aes192>(key.as_bytes(), &iv, plaintext)?,
        KeyLength::Aes256 => cbc_encrypt::<Aes256>(key.as_bytes(), &iv, plaintext)?,
    };

    Ok(Envelope { iv, ciphertext })
}

/// Decrypts an envelope and strips its padding.
pub fn decrypt(key: &SymmetricKey, envelope: &Envelope) -> CryptoResult<Vec<u8>> {
    let len = envelope.ciphertext.len();
    if len == 0 || len % BLOCK_SIZE != 0 {
        return Err(CryptoError::Cipher(format!(
            "ciphertext length {len} is not a positive multiple of {BLOCK_SIZE}"
        )));
    }

    let (bytes, iv, ciphertext) = (key.as_bytes(), &envelope.iv, &envelope.ciphertext);
    match key.length {
        KeyLength::Aes128 => cbc_decrypt::<Aes128>(bytes, iv, ciphertext),
        KeyLength::Aes192 => cbc_decrypt::<Aes192>(bytes, iv, ciphertext),
        KeyLength::Aes256 => cbc_decrypt::<Aes256>(bytes, iv, ciphertext),
    }
}

fn cbc_encrypt<C>(key: &[u8], iv: &[u8; IV_SIZE], plaintext: &[u8]) -> CryptoResult<Vec<u8>>
where
    C: BlockEncryptMut + BlockCipher + KeyInit,
{
    let encryptor = cbc::Encryptor::<C>::new_from_slices(key, iv)
        .map_err(|e| CryptoError::Cipher(format!("cipher rejected key or IV: {e}")))?;
    Ok(encryptor.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
}

fn cbc_decrypt<C>(key: &[u8], iv: &[u8; IV_SIZE], ciphertext: &[u8]) -> CryptoResult<Vec<u8>>
where
    C: BlockDecryptMut + BlockCipher + KeyInit,
{
    let decryptor = cbc::Decryptor::<C>::new_from_slices(key, iv)
        .map_err(|e| CryptoError::Cipher(format!("cipher rejected key or IV: {e}")))?;
    decryptor
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| CryptoError::Padding)
}

fn fill_random(buf: &mut [u8]) -> CryptoResult<()> {
    OsRng
        .try_fill_bytes(buf)
        .map_err(|e| CryptoError::Cipher(format!("OS randomness unavailable: {e}")))
}

/// Injectable AES-CBC component bound to one configured key length.
#[derive(Clone, Copy, Debug, Default)]
pub struct SymmetricCipher {
    key_length: KeyLength,
}

impl SymmetricCipher {
    pub fn new(key_length: KeyLength) -> Self {
        Self { key_length }
    }

    pub fn key_length(&self) -> KeyLength {
        self.key_length
    }

    pub fn generate_key(&self) -> CryptoResult<SymmetricKey> {
        generate_key(self.key_length.bits())
    }

    /// Rebuilds a key from unwrapped bytes and checks it matches the configured length.
    pub fn key_from_bytes(&self, bytes: Vec<u8>) -> CryptoResult<SymmetricKey> {
        let key = SymmetricKey::from_bytes(bytes)?;
        if key.length != self.key_length {
            return Err(CryptoError::InvalidKeyLength {
                bits: key.length.bits(),
            });
        }
        Ok(key)
    }

    pub fn encrypt(&self, key: &SymmetricKey, plaintext: &[u8]) -> CryptoResult<Envelope> {
        encrypt(key, plaintext)
    }

    pub fn decrypt(&self, key: &SymmetricKey, envelope: &Envelope) -> CryptoResult<Vec<u8>> {
        decrypt(key, envelope)
    }
}
