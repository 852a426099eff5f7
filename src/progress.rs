// src/progress.rs
use std::path::Path;

use crate::config::options::Section;

/// Human-facing progress for a run. Diagnostics go through `tracing`; this is
/// the "what is it doing now" channel. Every method defaults to a no-op.
pub trait Progress {
    /// Called once with the number of sections about to run.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line.
    fn log(&mut self, _msg: &str) {}

    fn file_written(&mut self, _path: &Path) {}

    /// Called when a section completes, successful or not.
    fn section_done(&mut self, _section: Section, _ok: bool) {}

    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}

/// Prints status lines to stdout.
#[derive(Default)]
pub struct StdoutProgress {
    total: usize,
    done: usize,
}

impl Progress for StdoutProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        self.done = 0;
    }

    fn log(&mut self, msg: &str) {
        println!("{msg}");
    }

    fn file_written(&mut self, path: &Path) {
        println!("  wrote {}", path.display());
    }

    fn section_done(&mut self, section: Section, ok: bool) {
        self.done += 1;
        let status = if ok { "done" } else { "FAILED" };
        println!("[{}/{}] {} {status}", self.done, self.total, section.title());
    }

    fn finish(&mut self) {
        println!("Finished in {}", crate::log::elapsed());
    }
}
