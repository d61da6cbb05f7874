//! Streaming content digests for change detection

use mirrcp_types::{ContentDigest, DigestState, EventSink};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Default read chunk size, in bytes
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Computes content fingerprints for single files.
///
/// Files are read in fixed-size chunks and folded into a streaming BLAKE3
/// hasher, so memory use is bounded regardless of file size. A read failure
/// is a local event: it is reported through the sink and surfaces as
/// [`DigestState::Unavailable`], never as a propagated error.
#[derive(Debug, Clone)]
pub struct DigestProvider {
    chunk_size: usize,
}

impl DigestProvider {
    /// Create a provider reading in chunks of `chunk_size` bytes
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    /// The configured read chunk size
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Digest the contents of the file at `path`.
    ///
    /// Identical byte content always yields an identical digest, independent
    /// of how the reads happen to align with chunk boundaries.
    pub fn digest(&self, path: &Path, events: &dyn EventSink) -> DigestState {
        match self.digest_file(path) {
            Ok(digest) => DigestState::Ready(digest),
            Err(error) => {
                events.error(&format!(
                    "Failed to digest '{}': {}",
                    path.display(),
                    error
                ));
                DigestState::Unavailable {
                    reason: error.to_string(),
                }
            }
        }
    }

    fn digest_file(&self, path: &Path) -> std::io::Result<ContentDigest> {
        let mut file = File::open(path)?;
        let mut hasher = blake3::Hasher::new();
        let mut buffer = vec![0u8; self.chunk_size];

        loop {
            let read = file.read(&mut buffer)?;
            if read == 0 {
                break;
            }
            hasher.update(&buffer[..read]);
        }

        Ok(ContentDigest::from_bytes(*hasher.finalize().as_bytes()))
    }
}

impl Default for DigestProvider {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE)
    }
}
