use std::io::Write;

use tempfile::{NamedTempFile, TempPath};

pub fn create_file(contents: &[u8]) -> TempPath {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents).unwrap();
    file.into_temp_path()
}
