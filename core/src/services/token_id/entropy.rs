//! Entropy sources feeding the identifier generator

use rand::rngs::{OsRng, SmallRng};
use rand::{CryptoRng, Rng, RngCore, SeedableRng};
use sha2::{Digest, Sha512};
use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::domain::entities::token::{TokenId, TOKEN_ID_LENGTH};
use crate::errors::TokenError;

/// Bytes returned by one draw, with the source's own strength claim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntropyDraw {
    pub bytes: Vec<u8>,
    pub strong: bool,
}

impl EntropyDraw {
    pub fn strong(bytes: Vec<u8>) -> Self {
        Self { bytes, strong: true }
    }

    pub fn weak(bytes: Vec<u8>) -> Self {
        Self { bytes, strong: false }
    }
}

/// A platform-provided generator of random bytes
pub trait EntropySource: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Draw up to `len` bytes
    fn draw(&self, len: usize) -> io::Result<EntropyDraw>;
}

/// Operating system CSPRNG (`getrandom`)
#[derive(Debug, Default, Clone, Copy)]
pub struct OsRngSource;

impl EntropySource for OsRngSource {
    fn name(&self) -> &'static str {
        "os_rng"
    }

    fn draw(&self, len: usize) -> io::Result<EntropyDraw> {
        let mut bytes = vec![0u8; len];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        Ok(EntropyDraw::strong(bytes))
    }
}

/// Thread-local user-space generator, periodically reseeded from the OS
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngSource;

fn is_crypto_rng<R: RngCore + CryptoRng>(_: &R) -> bool {
    true
}

impl EntropySource for ThreadRngSource {
    fn name(&self) -> &'static str {
        "thread_rng"
    }

    fn draw(&self, len: usize) -> io::Result<EntropyDraw> {
        let mut rng = rand::thread_rng();
        let mut bytes = vec![0u8; len];
        rng.try_fill_bytes(&mut bytes)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        Ok(EntropyDraw {
            bytes,
            strong: is_crypto_rng(&rng),
        })
    }
}

/// Character device such as `/dev/urandom`
#[derive(Debug, Clone)]
pub struct DeviceSource {
    path: PathBuf,
}

impl DeviceSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl EntropySource for DeviceSource {
    fn name(&self) -> &'static str {
        "device"
    }

    fn draw(&self, len: usize) -> io::Result<EntropyDraw> {
        let mut bytes = Vec::with_capacity(len);
        File::open(&self.path)?
            .take(len as u64)
            .read_to_end(&mut bytes)?;
        Ok(EntropyDraw::strong(bytes))
    }
}

/// The standard chain: OS CSPRNG, thread RNG, entropy device
pub fn default_sources(device: impl Into<PathBuf>) -> Vec<Box<dyn EntropySource>> {
    vec![
        Box::new(OsRngSource),
        Box::new(ThreadRngSource),
        Box::new(DeviceSource::new(device)),
    ]
}

/// SHA-512 of a small non-cryptographic random number, truncated to 40 hex chars.
///
/// Only 61 distinct seeds exist, so the result is trivially guessable.
pub fn weak_token_id() -> Result<TokenId, TokenError> {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default();
    let seed: u32 = SmallRng::seed_from_u64(nanos).gen_range(40..=100);
    let digest = hex::encode(Sha512::digest(seed.to_string().as_bytes()));
    TokenId::parse(&digest[..TOKEN_ID_LENGTH])
}
