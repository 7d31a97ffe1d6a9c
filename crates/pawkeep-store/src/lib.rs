//! Pawkeep Store - encrypted snapshot persistence
//!
//! Provides:
//! - `SaveCipher`: authenticated stream transform (AES-256-GCM, 12-byte IV,
//!   16-byte tag) over an opaque caller-supplied key
//! - `SaveStore`: capture → encode → encrypt → write orchestration and the
//!   reverse, the only component that touches the filesystem
//! - `PersistError`: the single wrapping point for persistence failures

pub mod cipher;
pub mod errors;
pub mod store;

pub use cipher::{SaveCipher, IV_LEN, KEY_LEN, TAG_LEN};
pub use errors::{CipherError, PersistError, Result};
pub use store::SaveStore;
