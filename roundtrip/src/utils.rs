use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub const ENCODED_SUFFIX: &str = ".lzw";
pub const DECODED_SUFFIX: &str = ".lzw_decoded";

/// Appends `suffix` to the whole file name, keeping any existing extension.
pub fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

pub fn encoded_path(source: &Path) -> PathBuf {
    with_suffix(source, ENCODED_SUFFIX)
}

pub fn decoded_path(source: &Path) -> PathBuf {
    with_suffix(source, DECODED_SUFFIX)
}
