use miette::{Diagnostic, Result};
use std::{
    io::Read,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum InputError {
    #[error("Path {} does not exist", path.display())]
    FileDoesNotExist { path: PathBuf },

    #[error("{} is not a file", path.display())]
    NotAFile { path: PathBuf },

    #[error("Cannot read file {}: {}", path.display(), err)]
    CannotReadFile { path: PathBuf, err: std::io::Error },

    #[error("Cannot read from stdin: {}", err)]
    CannotReadStdIn { err: std::io::Error },
}

pub fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    let Some(path) = path else {
        tracing::info!("No input file provided, read from stdin");
        let mut buffer = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buffer)
            .map_err(|err| InputError::CannotReadStdIn { err })?;
        return Ok(buffer);
    };
    if !path.exists() {
        return Err(InputError::FileDoesNotExist { path: path.to_path_buf() }.into());
    }
    if !path.is_file() {
        return Err(InputError::NotAFile { path: path.to_path_buf() }.into());
    }
    let contents = std::fs::read(path)
        .map_err(|err| InputError::CannotReadFile { path: path.to_path_buf(), err })?;
    Ok(contents)
}
