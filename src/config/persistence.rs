use crate::config::table::ConfigTable;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("Must write over an existing config file: {}", path.display())]
    TargetMustExist { path: PathBuf },
    #[error("No destination path given and the table has no stored path")]
    MissingPath,
    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Serialize `table` to `writer`, one `key = value` line per entry.
pub fn write_table<W: Write>(table: &ConfigTable, writer: &mut W) -> io::Result<()> {
    for (key, value) in table.iter() {
        writeln!(writer, "{} = {}", key, value)?;
    }
    Ok(())
}

/// Create or truncate `path` and write the table into it.
pub fn dump_table(table: &ConfigTable, path: &Path) -> Result<(), WriteError> {
    let io_error = |source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    };

    // The handle is dropped on every return path below
    let file = File::create(path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    write_table(table, &mut writer).map_err(io_error)?;
    writer.flush().map_err(io_error)?;

    info!(path = %path.display(), parameters = table.len(), "Dumped config file");
    Ok(())
}

/// Replace the contents of an existing file with the table.
pub fn overwrite_existing(table: &ConfigTable, path: &Path) -> Result<(), WriteError> {
    if !path.exists() {
        return Err(WriteError::TargetMustExist {
            path: path.to_path_buf(),
        });
    }

    dump_table(table, path)
}
