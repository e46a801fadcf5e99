//! Command-line argument definitions.

use clap::{Args, Parser};
use hybridcrypt_core::{KeyLength, PathKey, PathOverrides};
use hybridcrypt_keystore::CONFIG_ENV_VAR;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "hybridcrypt",
    version,
    about = "Hybrid RSA/AES encryption of a text file"
)]
pub struct Cli {
    #[command(flatten)]
    pub mode: Mode,

    /// Symmetric key length in bits: 128, 192 or 256.
    #[arg(
        short = 'l',
        long,
        value_name = "BITS",
        default_value_t = KeyLength::Aes128,
        value_parser = parse_key_length
    )]
    pub key_length: KeyLength,

    /// JSON file mapping artifact names to paths.
    #[arg(short, long, value_name = "FILE", env = CONFIG_ENV_VAR)]
    pub config: Option<PathBuf>,

    /// Plaintext file to encrypt.
    #[arg(long, value_name = "FILE")]
    pub text_file: Option<PathBuf>,

    /// PEM public key.
    #[arg(long, value_name = "FILE")]
    pub public_key: Option<PathBuf>,

    /// PEM private key.
    #[arg(long, value_name = "FILE")]
    pub private_key: Option<PathBuf>,

    /// Base path of the wrapped symmetric key; the bit length is appended to the file name.
    #[arg(long, value_name = "FILE")]
    pub symmetric_key: Option<PathBuf>,

    /// Encrypted output (encrypt) or input (decrypt).
    #[arg(long, value_name = "FILE")]
    pub encrypted_file: Option<PathBuf>,

    /// Decrypted output.
    #[arg(long, value_name = "FILE")]
    pub decrypted_file: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Exactly one of the three operations.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct Mode {
    /// Generate the RSA key pair and the wrapped symmetric key.
    #[arg(short = 'g', long)]
    pub generate_keys: bool,

    /// Encrypt the text file.
    #[arg(short = 'e', long)]
    pub encrypt: bool,

    /// Decrypt the encrypted file.
    #[arg(short = 'd', long)]
    pub decrypt: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    GenerateKeys,
    Encrypt,
    Decrypt,
}

impl Operation {
    /// Paths this operation reads or writes.
    pub fn required_paths(self) -> &'static [PathKey] {
        match self {
            Operation::GenerateKeys => &[
                PathKey::PublicKey,
                PathKey::PrivateKey,
                PathKey::SymmetricKeyFile,
            ],
            Operation::Encrypt => &[
                PathKey::PublicKey,
                PathKey::PrivateKey,
                PathKey::SymmetricKeyFile,
                PathKey::TextFile,
                PathKey::EncryptedTextFile,
            ],
            Operation::Decrypt => &[
                PathKey::PublicKey,
                PathKey::PrivateKey,
                PathKey::SymmetricKeyFile,
                PathKey::EncryptedTextFile,
                PathKey::DecryptedTextFile,
            ],
        }
    }
}

impl Mode {
    pub fn operation(&self) -> Operation {
        if self.generate_keys {
            Operation::GenerateKeys
        } else if self.encrypt {
            Operation::Encrypt
        } else {
            Operation::Decrypt
        }
    }
}

impl Cli {
    /// Path options given on the command line.
    pub fn overrides(&self) -> PathOverrides {
        PathOverrides {
            text_file: self.text_file.clone(),
            public_key: self.public_key.clone(),
            private_key: self.private_key.clone(),
            symmetric_key_file: self.symmetric_key.clone(),
            encrypted_text_file: self.encrypted_file.clone(),
            decrypted_text_file: self.decrypted_file.clone(),
        }
    }
}

fn parse_key_length(raw: &str) -> Result<KeyLength, String> {
    let bits: usize = raw
        .parse()
        .map_err(|_| format!("`{raw}` is not a number of bits"))?;
    KeyLength::from_bits(bits).map_err(|e| e.to_string())
}
