//! Fragment delivery to stdout and an optional file.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::info;

#[derive(Debug, Default)]
pub(crate) struct OutputOptions {
    pub suppress_stdout: bool,
    pub file_name: Option<PathBuf>,
}

/// Write the fragment to the file first, then to `stdout`, so a failed file
/// write leaves nothing on stdout.
pub(crate) fn write_fragment<W: Write>(
    fragment: &str,
    stdout: &mut W,
    options: &OutputOptions,
) -> Result<()> {
    if let Some(path) = &options.file_name {
        std::fs::write(path, fragment)
            .with_context(|| format!("Failed to write fragment to {}", path.display()))?;
        info!("Wrote fragment to {}", path.display());
    }

    if !options.suppress_stdout {
        stdout
            .write_all(fragment.as_bytes())
            .and_then(|()| stdout.flush())
            .context("Failed to write fragment to stdout")?;
    }

    Ok(())
}
