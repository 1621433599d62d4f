//! Atomic writing of generated artifacts.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tempfile::NamedTempFile;

use crate::error::{OutputError, Result};
use crate::operations::Netlist;

/// Writes `<stem>.gds` and `<stem>.inp` into an output directory.
///
/// Every artifact is encoded in memory and written to a temporary sibling
/// before any of them is renamed into place. If a rename fails, the
/// artifacts already renamed are removed again.
#[derive(Debug, Clone)]
pub struct OutputWriter {
    dir: PathBuf,
    stem: String,
    timestamp: NaiveDateTime,
}

impl OutputWriter {
    /// Creates a writer stamped with the current local time. Without an
    /// explicit stem, files are named `inductor_<YYYYmmddHHMMSS>`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, stem: Option<String>) -> Self {
        Self::with_timestamp(dir, stem, chrono::Local::now().naive_local())
    }

    /// Creates a writer with a fixed timestamp.
    #[must_use]
    pub fn with_timestamp(
        dir: impl Into<PathBuf>,
        stem: Option<String>,
        timestamp: NaiveDateTime,
    ) -> Self {
        let stem = stem.unwrap_or_else(|| default_stem(&timestamp));
        Self {
            dir: dir.into(),
            stem,
            timestamp,
        }
    }

    #[must_use]
    pub fn stem(&self) -> &str {
        &self.stem
    }

    #[must_use]
    pub fn gds_path(&self) -> PathBuf {
        self.dir.join(format!("{}.gds", self.stem))
    }

    #[must_use]
    pub fn netlist_path(&self) -> PathBuf {
        self.dir.join(format!("{}.inp", self.stem))
    }

    /// Writes the given artifacts and returns the paths written.
    ///
    /// # Errors
    ///
    /// Returns [`OutputError::Gds`] if the library cannot be encoded, in
    /// which case nothing is written, or an I/O [`OutputError`] if the
    /// directory or a file cannot be written.
    pub fn write(
        &self,
        gds: Option<gds21::GdsLibrary>,
        netlist: Option<&Netlist>,
    ) -> Result<Vec<PathBuf>> {
        let mut files: Vec<(PathBuf, Vec<u8>)> = Vec::new();
        if let Some(mut lib) = gds {
            let path = self.gds_path();
            lib.set_all_dates(self.timestamp);
            let mut bytes = Vec::new();
            lib.write(&mut bytes).map_err(|e| OutputError::Gds {
                path: path.clone(),
                message: e.to_string(),
            })?;
            files.push((path, bytes));
        }
        if let Some(netlist) = netlist {
            files.push((self.netlist_path(), netlist.text.clone().into_bytes()));
        }

        std::fs::create_dir_all(&self.dir).map_err(|source| OutputError::Directory {
            path: self.dir.clone(),
            source,
        })?;

        // Every temporary is filled before the first one is renamed.
        let staged = files
            .into_iter()
            .map(|(path, bytes)| -> Result<_> {
                let tmp = stage(&self.dir, &path, &bytes)?;
                Ok((path, tmp, bytes.len()))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut written: Vec<PathBuf> = Vec::with_capacity(staged.len());
        for (path, tmp, bytes) in staged {
            if let Err(e) = tmp.persist(&path) {
                for done in &written {
                    if let Err(err) = std::fs::remove_file(done) {
                        tracing::warn!(path = %done.display(), %err, "failed to roll back artifact");
                    }
                }
                return Err(OutputError::Write {
                    path,
                    source: e.error,
                }
                .into());
            }
            tracing::debug!(path = %path.display(), bytes, "wrote artifact");
            written.push(path);
        }
        Ok(written)
    }
}

fn default_stem(timestamp: &NaiveDateTime) -> String {
    format!("inductor_{}", timestamp.format("%Y%m%d%H%M%S"))
}

fn stage(dir: &Path, path: &Path, bytes: &[u8]) -> Result<NamedTempFile> {
    let write_err = |source| OutputError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(bytes).map_err(write_err)?;
    tmp.flush().map_err(write_err)?;
    Ok(tmp)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::ProcessConfig;
    use crate::error::CoilgenError;
    use crate::geometry::{InductorKind, InductorSpec};
    use crate::pipeline::generate;
    use chrono::NaiveDate;

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 7)
            .unwrap()
            .and_hms_opt(9, 5, 1)
            .unwrap()
    }

    #[test]
    fn default_stem_is_timestamped() {
        let writer = OutputWriter::with_timestamp("out", None, timestamp());
        assert_eq!(writer.stem(), "inductor_20240307090501");
        assert_eq!(writer.gds_path(), Path::new("out/inductor_20240307090501.gds"));
        assert_eq!(writer.netlist_path(), Path::new("out/inductor_20240307090501.inp"));
    }

    #[test]
    fn writes_both_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested");
        let config = ProcessConfig::default();
        let spec = InductorSpec::new(20.0, 2.0, 2.0, 2, 0.854, 20.0, 2.0);
        let generated = generate(InductorKind::Spiral, spec, &config).unwrap();
        let lib = generated.mask.to_gds_library("coilgen").unwrap();

        let writer = OutputWriter::with_timestamp(&out, Some("ind".into()), timestamp());
        let written = writer.write(Some(lib), Some(&generated.netlist)).unwrap();
        assert_eq!(written, vec![out.join("ind.gds"), out.join("ind.inp")]);

        let text = std::fs::read_to_string(out.join("ind.inp")).unwrap();
        assert_eq!(text, generated.netlist.text);
        let lib = gds21::GdsLibrary::open(out.join("ind.gds")).unwrap();
        assert_eq!(lib.structs.len(), 2);
        // Only the two artifacts remain; temporaries were renamed.
        assert_eq!(std::fs::read_dir(&out).unwrap().count(), 2);
    }

    #[test]
    fn nothing_requested_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let writer = OutputWriter::with_timestamp(dir.path(), None, timestamp());
        assert!(writer.write(None, None).unwrap().is_empty());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn failed_rename_leaves_no_partial_output() {
        let dir = tempfile::tempdir().unwrap();
        // A directory in the netlist's place makes its rename fail.
        std::fs::create_dir(dir.path().join("ind.inp")).unwrap();
        let config = ProcessConfig::default();
        let spec = InductorSpec::new(20.0, 2.0, 2.0, 2, 0.854, 20.0, 2.0);
        let generated = generate(InductorKind::Spiral, spec, &config).unwrap();
        let lib = generated.mask.to_gds_library("coilgen").unwrap();

        let writer = OutputWriter::with_timestamp(dir.path(), Some("ind".into()), timestamp());
        let err = writer.write(Some(lib), Some(&generated.netlist)).unwrap_err();
        assert!(matches!(
            err,
            CoilgenError::Output(OutputError::Write { ref path, .. }) if path == &dir.path().join("ind.inp")
        ));
        assert!(!dir.path().join("ind.gds").exists());
        // Only the blocking directory remains; temporaries were dropped.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn unusable_directory_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();
        let config = ProcessConfig::default();
        let spec = InductorSpec::new(20.0, 2.0, 2.0, 1, 0.854, 20.0, 2.0);
        let generated = generate(InductorKind::Symmetric, spec, &config).unwrap();

        let writer = OutputWriter::with_timestamp(blocker.join("sub"), None, timestamp());
        let err = writer.write(None, Some(&generated.netlist)).unwrap_err();
        assert!(matches!(
            err,
            CoilgenError::Output(OutputError::Directory { .. })
        ));
    }
}
