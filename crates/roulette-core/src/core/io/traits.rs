use crate::core::models::model::Model;
use crate::core::models::sample::Sample;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::warn;

/// Defines the interface for reading and writing structure file formats.
///
/// Implementors handle the format-specific parsing and serialization; the
/// path-based helpers take care of opening files and of writing them
/// atomically.
pub trait StructureFile {
    /// Options that control how lenient parsing is.
    type ReadOptions: Default;

    /// The error type for I/O operations.
    type Error: Error + From<io::Error>;

    /// Reads every model from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if a record is malformed or reading fails.
    fn read_from(
        reader: &mut impl BufRead,
        options: &Self::ReadOptions,
    ) -> Result<Vec<Model>, Self::Error>;

    /// Writes one model block per sample, followed by an end-of-file marker.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_samples_to(samples: &[Sample], writer: &mut impl Write) -> Result<(), Self::Error>;

    /// Writes a single model followed by an end-of-file marker.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_model_to(model: &Model, writer: &mut impl Write) -> Result<(), Self::Error>;

    /// Reads every model from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(
        path: P,
        options: &Self::ReadOptions,
    ) -> Result<Vec<Model>, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader, options)
    }

    /// Writes the samples to a file path atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails. The
    /// destination is left untouched in that case.
    fn write_samples_to_path<P: AsRef<Path>>(
        samples: &[Sample],
        path: P,
    ) -> Result<(), Self::Error> {
        write_atomically(path, |writer| Self::write_samples_to(samples, writer))
    }

    /// Writes a single model to a file path atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails. The
    /// destination is left untouched in that case.
    fn write_model_to_path<P: AsRef<Path>>(model: &Model, path: P) -> Result<(), Self::Error> {
        write_atomically(path, |writer| Self::write_model_to(model, writer))
    }
}

/// A fully written temporary file waiting to replace its destination.
pub struct StagedFile {
    file: NamedTempFile,
    path: PathBuf,
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Moves the file over its destination.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the rename fails; the temporary file is removed.
    pub fn persist(self) -> io::Result<PathBuf> {
        self.file.persist(&self.path).map_err(io::Error::from)?;
        Ok(self.path)
    }
}

/// Runs `write` against a temporary file next to `path` without touching
/// `path` itself.
///
/// # Errors
///
/// Returns the error produced by `write`, or an I/O error if the temporary
/// file cannot be created or flushed. The temporary file is removed.
pub fn stage<P, F, E>(path: P, write: F) -> Result<StagedFile, E>
where
    P: AsRef<Path>,
    F: FnOnce(&mut BufWriter<&mut NamedTempFile>) -> Result<(), E>,
    E: From<io::Error>,
{
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(&mut file);
        write(&mut writer)?;
        writer.flush()?;
    }
    Ok(StagedFile {
        file,
        path: path.to_path_buf(),
    })
}

/// Moves every staged file into place, in order. When one of them cannot be
/// moved, the files already moved are deleted again, so the destinations are
/// either all written or none are.
///
/// # Errors
///
/// Returns the I/O error of the first rename that fails.
pub fn persist_all(staged: Vec<StagedFile>) -> io::Result<()> {
    let mut persisted: Vec<PathBuf> = Vec::with_capacity(staged.len());
    for file in staged {
        match file.persist() {
            Ok(path) => persisted.push(path),
            Err(e) => {
                for path in &persisted {
                    if let Err(cleanup) = std::fs::remove_file(path) {
                        warn!("Could not remove {}: {}", path.display(), cleanup);
                    }
                }
                return Err(e);
            }
        }
    }
    Ok(())
}

/// Runs `write` against a temporary file next to `path` and moves it into
/// place only once everything has been written and flushed.
///
/// The temporary file is removed when `write` fails, so a truncated output
/// file never appears at `path`.
///
/// # Errors
///
/// Returns the error produced by `write`, or an I/O error if the temporary
/// file cannot be created, flushed or persisted.
pub fn write_atomically<P, F, E>(path: P, write: F) -> Result<(), E>
where
    P: AsRef<Path>,
    F: FnOnce(&mut BufWriter<&mut NamedTempFile>) -> Result<(), E>,
    E: From<io::Error>,
{
    stage(path, write)?.persist()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn write_atomically_persists_complete_output() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");

        write_atomically(&path, |w| -> Result<(), io::Error> {
            writeln!(w, "first")?;
            writeln!(w, "second")
        })
        .unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn write_atomically_leaves_no_file_on_failure() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");

        let result = write_atomically(&path, |w| -> Result<(), io::Error> {
            writeln!(w, "partial")?;
            Err(io::Error::other("interrupted"))
        });

        assert!(result.is_err());
        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn write_atomically_keeps_existing_file_on_failure() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");
        std::fs::write(&path, "previous run\n").unwrap();

        let result = write_atomically(&path, |_| -> Result<(), io::Error> {
            Err(io::Error::other("interrupted"))
        });

        assert!(result.is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "previous run\n");
    }

    fn staged(path: &Path, text: &'static str) -> StagedFile {
        stage(path, |w| -> Result<(), io::Error> { write!(w, "{text}") }).unwrap()
    }

    #[test]
    fn staging_does_not_touch_the_destination() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");

        let file = staged(&path, "content");

        assert_eq!(file.path(), path.as_path());
        assert!(!path.exists());
        drop(file);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn persist_all_writes_every_destination() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("a.txt");
        let second = dir.path().join("b.txt");

        persist_all(vec![staged(&first, "a"), staged(&second, "b")]).unwrap();

        assert_eq!(std::fs::read_to_string(&first).unwrap(), "a");
        assert_eq!(std::fs::read_to_string(&second).unwrap(), "b");
    }

    #[test]
    fn persist_all_rolls_back_when_a_later_rename_fails() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("a.txt");
        let blocked = dir.path().join("b.txt");
        std::fs::create_dir(&blocked).unwrap();
        std::fs::write(blocked.join("keep"), "").unwrap();

        let result = persist_all(vec![staged(&first, "a"), staged(&blocked, "b")]);

        assert!(result.is_err());
        assert!(!first.exists());
        assert!(blocked.join("keep").exists());
    }
}
