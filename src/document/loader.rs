//! Background materialization of table content
//!
//! Sources run on worker threads and report back over a channel. Results
//! are only applied to the document when the owning thread polls, so the
//! document itself is never touched from a worker.

use super::import;
use super::table::{TableContent, TableId};
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

type LoadFn = Box<dyn FnOnce() -> Result<TableContent, String> + Send + 'static>;

/// Deferred table content
pub struct TableSource {
    label: String,
    load: LoadFn,
}

impl std::fmt::Debug for TableSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableSource")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl TableSource {
    pub fn new(
        label: impl Into<String>,
        load: impl FnOnce() -> Result<TableContent, String> + Send + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            load: Box::new(load),
        }
    }

    /// Content read from a delimited file.
    pub fn file(path: PathBuf) -> Self {
        let label = path.display().to_string();
        Self::new(label, move || {
            import::read_file(&path).map_err(|e| e.to_string())
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Run the source on the current thread. A panicking source is
    /// reported as a failure.
    pub fn run(self) -> Result<TableContent, String> {
        let label = self.label;
        let load = self.load;
        match panic::catch_unwind(AssertUnwindSafe(load)) {
            Ok(result) => result,
            Err(_) => Err(format!("loading {} panicked", label)),
        }
    }
}

/// Completed load for one placeholder table
#[derive(Debug)]
pub struct Loaded {
    pub table: TableId,
    pub result: Result<TableContent, String>,
}

/// Runs sources off-thread and collects their results
#[derive(Debug)]
pub struct Loader {
    tx: Sender<Loaded>,
    rx: Receiver<Loaded>,
    pending: usize,
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

impl Loader {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx, pending: 0 }
    }

    /// Number of loads spawned but not yet collected
    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn spawn(&mut self, table: TableId, source: TableSource) {
        tracing::debug!("materializing {} for table {:?}", source.label(), table);
        let tx = self.tx.clone();
        self.pending += 1;
        std::thread::spawn(move || {
            let result = source.run();
            let _ = tx.send(Loaded { table, result });
        });
    }

    /// Drain finished loads without blocking.
    pub fn poll(&mut self) -> Vec<Loaded> {
        let mut done = Vec::new();
        while let Ok(loaded) = self.rx.try_recv() {
            done.push(loaded);
        }
        self.pending -= done.len().min(self.pending);
        done
    }

    /// Wait up to `timeout` for at least one load, then drain the rest.
    pub fn wait(&mut self, timeout: Duration) -> Vec<Loaded> {
        if self.pending == 0 {
            return Vec::new();
        }
        let mut done = Vec::new();
        if let Ok(first) = self.rx.recv_timeout(timeout) {
            done.push(first);
        }
        while let Ok(loaded) = self.rx.try_recv() {
            done.push(loaded);
        }
        self.pending -= done.len().min(self.pending);
        done
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loads_arrive_on_poll() {
        let mut loader = Loader::new();
        let id = TableId::next();
        loader.spawn(id, TableSource::new("empty", || Ok(TableContent::default())));
        assert_eq!(loader.pending(), 1);

        let done = loader.wait(Duration::from_secs(5));
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].table, id);
        assert!(done[0].result.is_ok());
        assert_eq!(loader.pending(), 0);
    }

    #[test]
    fn test_panicking_source_reports_error() {
        let source = TableSource::new("bad", || panic!("boom"));
        let err = source.run().unwrap_err();
        assert!(err.contains("bad"));
    }
}
