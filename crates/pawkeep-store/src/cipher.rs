//! Authenticated encryption for snapshot files
//!
//! File framing is `[IV][ciphertext][tag]`: a fresh 12-byte IV leads every
//! file, and AES-256-GCM appends a 16-byte authentication tag to the
//! ciphertext. The IV travels with the file, so decryption needs no external
//! IV storage; the tag means corruption is detected, never silently decoded.
//!
//! GCM authenticates the whole message at once, so the sink buffers
//! plaintext until `finish` seals it and the source verifies the tag before
//! releasing any plaintext to its reader.

use crate::errors::CipherError;
use aead::Aead;
use aes_gcm::aead::{AeadCore, OsRng};
use aes_gcm::{Aes256Gcm, Key, KeyInit, Nonce};
use std::io::{self, Read, Write};

/// IV length in bytes, fixed by the file format
pub const IV_LEN: usize = 12;
/// Authentication tag length in bytes (128-bit GCM tag)
pub const TAG_LEN: usize = 16;
/// Key length in bytes (AES-256)
pub const KEY_LEN: usize = 32;

/// Authenticated stream transform over an opaque 256-bit key
///
/// The key is supplied at construction by an external provisioning
/// mechanism; no key material is generated or stored here.
#[derive(Clone)]
pub struct SaveCipher {
    cipher: Aes256Gcm,
}

impl SaveCipher {
    /// Build from a caller-provided key
    pub fn new(key: &[u8; KEY_LEN]) -> Self {
        Self {
            cipher: Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key)),
        }
    }

    /// Open an encrypting sink over `out`
    ///
    /// Generates a fresh random IV for this call only (never reused under
    /// the same key) and writes it as the first [`IV_LEN`] bytes of `out`.
    /// Bytes written to the sink are buffered; `finish` seals them and
    /// appends the authentication tag.
    pub fn encrypt_to<W: Write>(&self, mut out: W) -> io::Result<EncryptingWriter<W>> {
        let iv = Aes256Gcm::generate_nonce(&mut OsRng);
        out.write_all(&iv)?;
        Ok(EncryptingWriter {
            cipher: self.cipher.clone(),
            iv: iv.into(),
            plaintext: Vec::new(),
            out,
        })
    }

    /// Open a decrypting source over `input`
    ///
    /// Reads exactly [`IV_LEN`] bytes up front. Fewer available is a
    /// [`CipherError::TruncatedIv`] (kind `UnexpectedEof`), distinct from an
    /// authentication failure. The remaining bytes decrypt lazily as the
    /// source is read; tag verification failure surfaces there as an
    /// `io::Error` of kind `InvalidData` wrapping
    /// [`CipherError::AuthFailed`].
    pub fn decrypt_from<R: Read>(&self, mut input: R) -> io::Result<DecryptingReader<R>> {
        let mut iv = [0u8; IV_LEN];
        let mut filled = 0;
        while filled < IV_LEN {
            match input.read(&mut iv[filled..]) {
                Ok(0) => {
                    return Err(CipherError::TruncatedIv {
                        expected: IV_LEN,
                        found: filled,
                    }
                    .into_io())
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(DecryptingReader {
            cipher: self.cipher.clone(),
            iv,
            input: Some(input),
            plaintext: Vec::new(),
            pos: 0,
        })
    }
}

/// Write sink returned by [`SaveCipher::encrypt_to`]
///
/// The file is incomplete until `finish` runs; dropping the writer without
/// calling it leaves only the IV behind.
pub struct EncryptingWriter<W: Write> {
    cipher: Aes256Gcm,
    iv: [u8; IV_LEN],
    plaintext: Vec<u8>,
    out: W,
}

impl<W: Write> EncryptingWriter<W> {
    /// Seal the buffered plaintext, writing ciphertext and tag to the inner
    /// writer and flushing it
    pub fn finish(mut self) -> io::Result<W> {
        let sealed = self
            .cipher
            .encrypt(Nonce::from_slice(&self.iv), self.plaintext.as_slice())
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "AES-GCM encryption failed"))?;
        self.out.write_all(&sealed)?;
        self.out.flush()?;
        Ok(self.out)
    }
}

impl<W: Write> Write for EncryptingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.plaintext.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // Nothing reaches the inner writer until finish seals the payload.
        Ok(())
    }
}

/// Read source returned by [`SaveCipher::decrypt_from`]
pub struct DecryptingReader<R: Read> {
    cipher: Aes256Gcm,
    iv: [u8; IV_LEN],
    input: Option<R>,
    plaintext: Vec<u8>,
    pos: usize,
}

impl<R: Read> Read for DecryptingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if let Some(mut input) = self.input.take() {
            let mut sealed = Vec::new();
            input.read_to_end(&mut sealed)?;
            self.plaintext = self
                .cipher
                .decrypt(Nonce::from_slice(&self.iv), sealed.as_slice())
                .map_err(|_| CipherError::AuthFailed.into_io())?;
        }
        let remaining = &self.plaintext[self.pos..];
        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.pos += n;
        Ok(n)
    }
}
