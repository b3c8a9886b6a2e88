use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use fs2::FileExt;
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

pub const CALENDAR_DAYS_FILE: &str = "calendar_days.csv";
pub const VOUCHERS_FILE: &str = "vouchers.csv";
pub const MESSAGES_FILE: &str = "messages.csv";
pub const PUZZLE_ATTEMPTS_FILE: &str = "puzzle_attempts.csv";
pub const VOUCHER_OPTIONS_FILE: &str = "voucher_options.yaml";
pub const PROMPTS_FILE: &str = "prompts.yaml";
/// Advisory lock file taken by every writer, in any process
pub const LOCK_FILE: &str = ".advent.lock";

/// CsvConnection owns the data directory and serialises writes to it.
///
/// Clones share the same in-process write lock. On top of that every writer
/// holds an exclusive advisory lock on [`LOCK_FILE`], so separate processes
/// pointed at the same directory also take turns.
#[derive(Clone, Debug)]
pub struct CsvConnection {
    base_directory: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl CsvConnection {
    /// Create a new CSV connection with a base directory
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .with_context(|| format!("Failed to create data directory {}", base_path.display()))?;
            info!("Created advent data directory: {}", base_path.display());
        }

        Ok(Self {
            base_directory: base_path,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    pub fn file_path(&self, file_name: &str) -> PathBuf {
        self.base_directory.join(file_name)
    }

    /// Hold this guard across any read-modify-write of the data files
    pub fn write_guard(&self) -> Result<WriteGuard<'_>> {
        let process = self
            .write_lock
            .lock()
            .map_err(|_| anyhow::anyhow!("CSV store write lock poisoned"))?;

        let lock_path = self.file_path(LOCK_FILE);
        let lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(&lock_path)
            .with_context(|| format!("Failed to open lock file {}", lock_path.display()))?;
        lock_file
            .lock_exclusive()
            .with_context(|| format!("Failed to lock {}", lock_path.display()))?;

        Ok(WriteGuard {
            _lock_file: lock_file,
            _process: process,
        })
    }

    /// Ensure a CSV file exists with the given header row
    pub fn ensure_csv_file(&self, file_name: &str, header: &[&str]) -> Result<PathBuf> {
        let path = self.file_path(file_name);
        if !path.exists() {
            let mut writer = WriterBuilder::new().has_headers(false).from_path(&path)?;
            writer.write_record(header)?;
            writer.flush()?;
            debug!("Created CSV file: {:?}", path);
        }
        Ok(path)
    }

    /// Read every row of a CSV file, skipping rows that fail to parse
    pub fn read_rows<T: DeserializeOwned>(&self, file_name: &str, header: &[&str]) -> Result<Vec<T>> {
        self.read_rows_with(file_name, header, false)
    }

    /// Read every row of a CSV file, failing on the first row that does not parse.
    ///
    /// Anything that rewrites a file or derives new ids from its contents
    /// reads through here, so a damaged row is never silently dropped.
    pub fn read_rows_strict<T: DeserializeOwned>(&self, file_name: &str, header: &[&str]) -> Result<Vec<T>> {
        self.read_rows_with(file_name, header, true)
    }

    fn read_rows_with<T: DeserializeOwned>(&self, file_name: &str, header: &[&str], strict: bool) -> Result<Vec<T>> {
        let path = self.ensure_csv_file(file_name, header)?;
        let file = File::open(&path).with_context(|| format!("Failed to open {}", path.display()))?;
        let mut reader = ReaderBuilder::new().from_reader(BufReader::new(file));

        let mut rows = Vec::new();
        for result in reader.deserialize::<T>() {
            match result {
                Ok(row) => rows.push(row),
                Err(e) if strict => {
                    let line = e.position().map(|position| position.line()).unwrap_or_default();
                    return Err(anyhow::Error::new(e)
                        .context(format!("Unparseable row at line {} of {}", line, path.display())));
                }
                Err(e) => {
                    warn!("Failed to parse row in {}: {}. Skipping.", file_name, e);
                    continue;
                }
            }
        }
        Ok(rows)
    }

    /// Replace a CSV file with the given rows (temp file + rename)
    pub fn write_rows<T: Serialize>(&self, file_name: &str, header: &[&str], rows: &[T]) -> Result<()> {
        let path = self.file_path(file_name);
        let temp_path = path.with_extension("csv.tmp");

        {
            let temp_file = File::create(&temp_path)?;
            let mut writer = WriterBuilder::new()
                .has_headers(false)
                .from_writer(BufWriter::new(temp_file));
            writer.write_record(header)?;
            for row in rows {
                writer.serialize(row)?;
            }
            writer.flush()?;
        }

        fs::rename(&temp_path, &path).with_context(|| format!("Failed to replace {}", path.display()))?;
        debug!("Wrote {} rows to {:?}", rows.len(), path);
        Ok(())
    }

    /// Append one row to a CSV file without rewriting it
    pub fn append_row<T: Serialize>(&self, file_name: &str, header: &[&str], row: &T) -> Result<()> {
        let path = self.ensure_csv_file(file_name, header)?;
        let file = OpenOptions::new().append(true).open(&path)?;
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        writer.serialize(row)?;
        writer.flush()?;
        debug!("Appended row to {:?}", path);
        Ok(())
    }

    /// Write a YAML document atomically
    pub fn write_yaml<T: Serialize>(&self, file_name: &str, value: &T) -> Result<()> {
        let path = self.file_path(file_name);
        let temp_path = path.with_extension("yaml.tmp");
        let yaml_content = serde_yaml::to_string(value)?;
        fs::write(&temp_path, yaml_content)?;
        fs::rename(&temp_path, &path).with_context(|| format!("Failed to replace {}", path.display()))?;
        debug!("Saved {:?}", path);
        Ok(())
    }

    /// Read a YAML document, or `None` if the file does not exist
    pub fn read_yaml<T: DeserializeOwned>(&self, file_name: &str) -> Result<Option<T>> {
        let path = self.file_path(file_name);
        if !path.exists() {
            return Ok(None);
        }
        let yaml_content = fs::read_to_string(&path)?;
        let value = serde_yaml::from_str(&yaml_content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(Some(value))
    }
}

/// Held for the duration of a write; dropping it releases both locks
pub struct WriteGuard<'a> {
    _lock_file: File,
    _process: MutexGuard<'a, ()>,
}
