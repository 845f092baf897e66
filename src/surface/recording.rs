//! A host that records documents instead of showing them

use crate::surface::{PrintSurfaceHost, PrintWindow};
use crate::{Error, Result};
use std::sync::{Arc, Mutex, MutexGuard};

/// What ended up in one recorded window
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordedWindow {
    pub html: String,
    pub closed: bool,
}

#[derive(Debug, Default)]
struct Recording {
    windows: Vec<RecordedWindow>,
    refused: usize,
}

/// Records every document written to it.
///
/// A blocked host refuses to open windows, like a browser with pop-ups
/// disabled. Clones share the same recording.
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    state: Arc<Mutex<Recording>>,
    blocked: bool,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blocked() -> Self {
        Self { blocked: true, ..Self::default() }
    }

    pub fn windows(&self) -> Vec<RecordedWindow> {
        lock(&self.state).windows.clone()
    }

    /// Number of open attempts that were refused
    pub fn refused(&self) -> usize {
        lock(&self.state).refused
    }
}

fn lock(state: &Mutex<Recording>) -> MutexGuard<'_, Recording> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl PrintSurfaceHost for RecordingHost {
    type Window = RecordingWindow;

    fn open_window(&mut self) -> Result<RecordingWindow> {
        let mut state = lock(&self.state);
        if self.blocked {
            state.refused += 1;
            return Err(Error::PrintSurfaceError(
                "the window was blocked; allow pop-ups for this application".into(),
            ));
        }
        state.windows.push(RecordedWindow::default());
        Ok(RecordingWindow {
            state: self.state.clone(),
            index: state.windows.len() - 1,
        })
    }
}

/// Window handed out by [`RecordingHost`]
#[derive(Debug)]
pub struct RecordingWindow {
    state: Arc<Mutex<Recording>>,
    index: usize,
}

impl PrintWindow for RecordingWindow {
    fn write(&mut self, html: &str) -> Result<()> {
        let mut state = lock(&self.state);
        let window = &mut state.windows[self.index];
        if window.closed {
            return Err(Error::Other("document stream already closed".into()));
        }
        window.html.push_str(html);
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        lock(&self.state).windows[self.index].closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_recording() {
        let mut host = RecordingHost::new();
        let observer = host.clone();
        let mut w = host.open_window().unwrap();
        w.write("<p>a</p>").unwrap();
        w.write("<p>b</p>").unwrap();
        w.close().unwrap();
        assert_eq!(observer.windows()[0].html, "<p>a</p><p>b</p>");
        assert!(w.write("late").is_err());
    }
}
