use std::path::{Path, PathBuf};

use crate::error::{convert_io_error, CliError};

pub fn read_file(path: PathBuf) -> Result<String, CliError> {
    let contents = std::fs::read_to_string(&path).map_err(|e| convert_io_error(e, path))?;
    Ok(contents)
}

/// Writes to `path`, or to stdout when there is none.
pub fn write_output(path: Option<&Path>, contents: &str) -> Result<(), CliError> {
    match path {
        Some(path) => std::fs::write(path, contents).map_err(|source| CliError::WriteError {
            path: path.to_path_buf(),
            source,
        }),
        None => {
            print!("{}", contents);
            Ok(())
        }
    }
}
