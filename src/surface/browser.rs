//! Print surfaces shown by the system web browser

use crate::surface::{PrintSurfaceHost, PrintWindow};
use crate::{Error, Result};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, SystemTime};
use tempfile::NamedTempFile;

const SPOOL_PREFIX: &str = "label-print-";
const SPOOL_SUFFIX: &str = ".html";

/// Opens each print document as a new page in the default browser.
///
/// The document is spooled to `spool_dir` and handed to the platform opener
/// (`xdg-open`, `open`, or `start`) when its stream is closed. Handed-off
/// documents stay on disk so the browser can load them; ones older than the
/// retention period are pruned the next time a window is opened. A window
/// dropped before `close` removes its partial document.
#[derive(Debug, Clone)]
pub struct BrowserSurfaceHost {
    spool_dir: PathBuf,
    opener: Vec<String>,
    retention: Duration,
}

impl BrowserSurfaceHost {
    pub fn new(spool_dir: impl Into<PathBuf>) -> Self {
        Self {
            spool_dir: spool_dir.into(),
            opener: default_opener(),
            retention: Duration::from_secs(60 * 60),
        }
    }

    /// Use a custom opener command line; the document path is appended.
    pub fn with_opener(mut self, command: &str) -> Self {
        self.opener = command.split_whitespace().map(str::to_string).collect();
        self
    }

    /// How long handed-off documents are kept before pruning.
    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = retention;
        self
    }

    pub fn spool_dir(&self) -> &Path {
        &self.spool_dir
    }

    /// Remove spooled documents older than the retention period.
    ///
    /// Returns how many were removed. Files not named like a spooled
    /// document are left alone.
    pub fn prune_spool(&self) -> Result<usize> {
        let now = SystemTime::now();
        let mut removed = 0;
        for entry in std::fs::read_dir(&self.spool_dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if !name.starts_with(SPOOL_PREFIX) || !name.ends_with(SPOOL_SUFFIX) {
                continue;
            }
            let expired = entry
                .metadata()
                .and_then(|m| m.modified())
                .ok()
                .and_then(|modified| now.duration_since(modified).ok())
                .is_some_and(|age| age >= self.retention);
            if !expired {
                continue;
            }
            match std::fs::remove_file(entry.path()) {
                Ok(()) => removed += 1,
                Err(e) => log::warn!("could not prune {}: {}", entry.path().display(), e),
            }
        }
        if removed > 0 {
            log::debug!("pruned {} spooled print documents", removed);
        }
        Ok(removed)
    }
}

impl Default for BrowserSurfaceHost {
    fn default() -> Self {
        Self::new(std::env::temp_dir().join("labelpress"))
    }
}

fn default_opener() -> Vec<String> {
    let parts: &[&str] = if cfg!(target_os = "windows") {
        &["cmd", "/C", "start", ""]
    } else if cfg!(target_os = "macos") {
        &["open"]
    } else {
        &["xdg-open"]
    };
    parts.iter().map(|s| s.to_string()).collect()
}

impl PrintSurfaceHost for BrowserSurfaceHost {
    type Window = BrowserWindow;

    fn open_window(&mut self) -> Result<BrowserWindow> {
        if self.opener.is_empty() {
            return Err(Error::PrintSurfaceError("no browser opener configured".into()));
        }
        std::fs::create_dir_all(&self.spool_dir).map_err(|e| {
            Error::PrintSurfaceError(format!("cannot create spool dir {}: {}", self.spool_dir.display(), e))
        })?;
        if let Err(e) = self.prune_spool() {
            log::warn!("could not prune spool dir {}: {}", self.spool_dir.display(), e);
        }

        let file = tempfile::Builder::new()
            .prefix(SPOOL_PREFIX)
            .suffix(SPOOL_SUFFIX)
            .tempfile_in(&self.spool_dir)
            .map_err(|e| {
                Error::PrintSurfaceError(format!("cannot create spool file in {}: {}", self.spool_dir.display(), e))
            })?;
        let path = file.path().to_path_buf();

        log::debug!("spooling print document to {}", path.display());
        Ok(BrowserWindow {
            writer: Some(BufWriter::new(file)),
            path,
            opener: self.opener.clone(),
        })
    }
}

/// A spooled document waiting to be shown
#[derive(Debug)]
pub struct BrowserWindow {
    writer: Option<BufWriter<NamedTempFile>>,
    path: PathBuf,
    opener: Vec<String>,
}

impl BrowserWindow {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PrintWindow for BrowserWindow {
    fn write(&mut self, html: &str) -> Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| Error::Other("document stream already closed".into()))?;
        writer.write_all(html.as_bytes())?;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        let Some(writer) = self.writer.take() else {
            return Ok(());
        };
        let file = writer.into_inner().map_err(|e| e.into_error())?;

        let (program, args) = self
            .opener
            .split_first()
            .ok_or_else(|| Error::PrintSurfaceError("no browser opener configured".into()))?;

        // persist before launching; the opener may read the file after we return
        file.keep()
            .map_err(|e| Error::PrintSurfaceError(format!("cannot keep {}: {}", self.path.display(), e.error)))?;

        match Command::new(program)
            .args(args)
            .arg(&self.path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(_child) => {
                log::info!("opened {} with {}", self.path.display(), program);
                Ok(())
            }
            Err(e) => {
                if let Err(re) = std::fs::remove_file(&self.path) {
                    log::warn!("could not remove {}: {}", self.path.display(), re);
                }
                Err(Error::PrintSurfaceError(format!(
                    "could not launch '{}': {}; set a different opener or open the browser manually",
                    program, e
                )))
            }
        }
    }
}
