// DaocLog - platform/fs.rs
//
// Filesystem access for combat logs.

use crate::util::error::ParseError;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

/// Open a combat log for sequential line reading.
///
/// A missing file is reported as `ParseError::FileNotFound` so callers can
/// tell it apart from permission or device failures.
pub fn open_log(path: &Path) -> Result<BufReader<File>, ParseError> {
    match File::open(path) {
        Ok(file) => {
            tracing::debug!(path = %path.display(), "Opened combat log");
            Ok(BufReader::new(file))
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(ParseError::FileNotFound {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(ParseError::Io {
            file: path.to_path_buf(),
            source: e,
        }),
    }
}
