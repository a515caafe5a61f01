//! File system persister implementation.

use std::io;
use std::path::{Component, Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use reqwest::Url;
use tokio::fs;
use tracing::{debug, warn};

use super::error::PersistError;
use super::fetcher::FileFetcher;
use super::types::{PersistReport, SkippedFile, WrittenFile};
use crate::lookup::FileDescriptor;
use crate::metrics::{BYTES_WRITTEN, FILES_TOTAL};
use crate::source::WorkOrderId;

/// Extension used when none can be derived, and for inline content.
pub const DEFAULT_EXTENSION: &str = ".bin";

/// Writes work-order files to a flat output directory.
///
/// Output names are `{work_order}_{ordinal}{ext}`, so concurrent writers for
/// different work orders never collide. Existing files are overwritten.
pub struct FilePersister<F: FileFetcher> {
    fetcher: F,
    output_dir: PathBuf,
}

impl<F: FileFetcher> FilePersister<F> {
    pub fn new(fetcher: F, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            fetcher,
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Persists every descriptor of a work order, in list order.
    ///
    /// Per-file failures are recorded in the report and never abort the
    /// remaining descriptors.
    pub async fn persist(&self, work_order: &WorkOrderId, files: &[FileDescriptor]) -> PersistReport {
        let mut report = PersistReport::new(work_order.clone());

        for descriptor in files {
            let (source, result) = if let Some(url) = &descriptor.url {
                ("url", self.persist_url(work_order, descriptor.ordinal, url).await)
            } else if let Some(content) = &descriptor.content {
                (
                    "inline",
                    self.persist_inline(work_order, descriptor.ordinal, content)
                        .await,
                )
            } else {
                FILES_TOTAL.with_label_values(&["none", "empty"]).inc();
                report.empty += 1;
                continue;
            };

            match result {
                Ok(written) => {
                    FILES_TOTAL.with_label_values(&[source, "written"]).inc();
                    BYTES_WRITTEN.inc_by(written.bytes);
                    debug!(
                        work_order = %work_order,
                        ordinal = written.ordinal,
                        path = %written.path.display(),
                        bytes = written.bytes,
                        "File written"
                    );
                    report.written.push(written);
                }
                Err(error) => {
                    FILES_TOTAL.with_label_values(&[source, "skipped"]).inc();
                    warn!(
                        work_order = %work_order,
                        ordinal = descriptor.ordinal,
                        kind = error.kind(),
                        "Skipping file: {}",
                        error
                    );
                    report.skipped.push(SkippedFile {
                        ordinal: descriptor.ordinal,
                        error,
                    });
                }
            }
        }

        report
    }

    async fn persist_url(
        &self,
        work_order: &WorkOrderId,
        ordinal: usize,
        url: &str,
    ) -> Result<WrittenFile, PersistError> {
        let path = output_path(&self.output_dir, work_order, ordinal, &extension_from_url(url))?;
        let bytes = self.fetcher.fetch(url).await?;
        write_file(path, ordinal, &bytes).await
    }

    async fn persist_inline(
        &self,
        work_order: &WorkOrderId,
        ordinal: usize,
        content: &str,
    ) -> Result<WrittenFile, PersistError> {
        let path = output_path(&self.output_dir, work_order, ordinal, DEFAULT_EXTENSION)?;
        let bytes = BASE64_STANDARD
            .decode(content.trim())
            .map_err(|e| PersistError::Decode(e.to_string()))?;
        write_file(path, ordinal, &bytes).await
    }
}

async fn write_file(path: PathBuf, ordinal: usize, bytes: &[u8]) -> Result<WrittenFile, PersistError> {
    fs::write(&path, bytes)
        .await
        .map_err(|source| PersistError::Write {
            path: path.clone(),
            source,
        })?;

    Ok(WrittenFile {
        ordinal,
        path,
        bytes: bytes.len() as u64,
    })
}

/// Output location of a work order's file.
///
/// The file name must be a single plain component, so the result always
/// lies directly inside `dir`.
pub fn output_path(
    dir: &Path,
    work_order: &WorkOrderId,
    ordinal: usize,
    extension: &str,
) -> Result<PathBuf, PersistError> {
    let name = format!("{}_{}{}", work_order, ordinal, extension);

    let mut components = Path::new(&name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(part)), None) if part == name.as_str() => Ok(dir.join(name)),
        _ => Err(PersistError::UnsafeName(name)),
    }
}

/// Derives a file extension (with leading dot) from a URL's path.
///
/// Query string and fragment are ignored, as are leading dots of the final
/// segment. Falls back to `.bin` when the suffix is missing or not
/// alphanumeric.
pub fn extension_from_url(url: &str) -> String {
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    };

    let file_name = path.rsplit('/').next().unwrap_or_default();
    let stem_start = file_name.len() - file_name.trim_start_matches('.').len();

    file_name[stem_start..]
        .rfind('.')
        .map(|idx| &file_name[stem_start + idx + 1..])
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| format!(".{}", ext))
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}

/// Creates the output directory and its parents if absent.
///
/// Fails if the path exists but is not a directory.
pub async fn prepare_output_dir(path: &Path) -> io::Result<()> {
    match fs::metadata(path).await {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(io::Error::new(
            io::ErrorKind::NotADirectory,
            format!("{} exists and is not a directory", path.display()),
        )),
        Err(e) if e.kind() == io::ErrorKind::NotFound => fs::create_dir_all(path).await,
        Err(e) => Err(e),
    }
}
