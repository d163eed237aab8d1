use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use tracing::debug;

const BUFFER_SIZE: usize = 8192;

#[derive(Debug, thiserror::Error)]
pub enum ChecksumError {
    #[error("No such file: {0}")]
    NotFound(PathBuf),
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl ChecksumError {
    fn from_io(path: &Path, e: std::io::Error) -> Self {
        match e.kind() {
            ErrorKind::NotFound => ChecksumError::NotFound(path.to_path_buf()),
            ErrorKind::PermissionDenied => ChecksumError::PermissionDenied(path.to_path_buf()),
            _ => ChecksumError::Io {
                path: path.to_path_buf(),
                source: e,
            },
        }
    }
}

/// Computes the hex encoded SHA-256 checksum of a file's content.
///
/// The file is streamed through a fixed size buffer, so memory use does not
/// depend on file size. Only content is hashed; the path and metadata never
/// affect the result.
///
/// # Errors
/// - `ChecksumError::NotFound`: the file does not exist at open time
/// - `ChecksumError::PermissionDenied`: insufficient permissions to read the file
/// - `ChecksumError::Io`: any other failure while opening or reading (including
///   attempting to read a directory)
///
/// Failures are not retried.
pub fn checksum_file(path: &Path) -> Result<String, ChecksumError> {
    let mut file = File::open(path).map_err(|e| ChecksumError::from_io(path, e))?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; BUFFER_SIZE];

    loop {
        let bytes_read = match file.read(&mut buffer) {
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(ChecksumError::from_io(path, e)),
        };
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    let sha256 = format!("{:x}", hasher.finalize());

    debug!("Checksum of {} is {}", path.display(), sha256);

    Ok(sha256)
}

/// Whether `s` has the shape of a digest produced by `checksum_file`
/// (64 lowercase hex characters).
pub fn is_sha256_hex(s: &str) -> bool {
    s.len() == 64 && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
