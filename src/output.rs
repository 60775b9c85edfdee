//! Publishing the decided version to the CI runner.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use tracing::info;

use crate::error::Result;

/// Version string with `/` replaced so it can be used in file names
pub fn safe_version(version: &str) -> String {
    version.replace('/', "-")
}

/// Where the decided version is written
///
/// Without a path the version is only logged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputSink {
    pub path: Option<PathBuf>,
}

impl OutputSink {
    pub fn new(path: Option<PathBuf>) -> Self {
        OutputSink { path }
    }

    /// Append `version=` and `safe_version=` lines to the output file
    pub fn emit(&self, version: &str) -> Result<()> {
        info!("Release version: {}", version);

        let Some(path) = &self.path else {
            return Ok(());
        };

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "version={}", version)?;
        writeln!(file, "safe_version={}", safe_version(version))?;

        Ok(())
    }
}
