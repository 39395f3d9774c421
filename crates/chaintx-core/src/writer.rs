//! Persisting unsent transactions next to their source file.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::codec::encode_records;
use crate::error::WriteError;
use crate::record::SignedTxnRecord;

/// Appended to the input path to name the output file.
pub const OUTPUT_SUFFIX: &str = ".unsent";

/// Unix permissions of a written output file.
pub const OUTPUT_MODE: u32 = 0o600;

/// `<input>.unsent`
pub fn unsent_path(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_owned();
    name.push(OUTPUT_SUFFIX);
    PathBuf::from(name)
}

/// Write `records` back-to-back to `path` in a single write.
///
/// Returns `Ok(false)` without touching the filesystem when there is nothing
/// to write. An existing file is truncated.
pub fn write_records(path: &Path, records: &[SignedTxnRecord]) -> Result<bool, WriteError> {
    if records.is_empty() {
        return Ok(false);
    }

    let bytes = encode_records(records);
    let wrap = |source| WriteError {
        path: path.to_path_buf(),
        source,
    };

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(OUTPUT_MODE);
    }

    let mut file = options.open(path).map_err(wrap)?;
    file.write_all(&bytes).map_err(wrap)?;
    Ok(true)
}
