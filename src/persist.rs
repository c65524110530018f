use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, mpsc};
use std::thread::JoinHandle;
use std::time::Duration;

use anyhow::Context;

use crate::store::{Snapshot, to_pretty_json};

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Client shared by the save endpoint and remote image fetches.
pub fn http_client() -> anyhow::Result<reqwest::blocking::Client> {
    let client = reqwest::blocking::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .user_agent(concat!("phototag/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// Destination for a serialized gallery.
pub trait GallerySink: Send {
    fn describe(&self) -> String;
    fn write(&self, body: &str) -> anyhow::Result<()>;
}

/// Overwrites the gallery file with the received body.
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl GallerySink for FileSink {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn write(&self, body: &str) -> anyhow::Result<()> {
        let document: serde_json::Value =
            serde_json::from_str(body).context("save body is not a gallery document")?;
        let formatted = serde_json::to_string_pretty(&document)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, formatted)
            .with_context(|| format!("failed to write {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("failed to replace {}", self.path.display()))?;
        Ok(())
    }
}

/// POSTs the body to a save endpoint.
pub struct HttpSink {
    url: String,
    client: reqwest::blocking::Client,
}

impl HttpSink {
    pub fn new(url: impl Into<String>, client: reqwest::blocking::Client) -> Self {
        Self {
            url: url.into(),
            client,
        }
    }
}

impl GallerySink for HttpSink {
    fn describe(&self) -> String {
        self.url.clone()
    }

    fn write(&self, body: &str) -> anyhow::Result<()> {
        let resp = self
            .client
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body.to_owned())
            .send()
            .with_context(|| format!("POST {} failed", self.url))?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().unwrap_or_default();
            anyhow::bail!("{} returned {}: {}", self.url, status, text.trim());
        }
        Ok(())
    }
}

/// Serializes gallery writes on one background thread.
///
/// Each request carries the snapshot taken when it was enqueued. After the
/// settle delay the writer keeps only the newest pending snapshot, so the
/// last enqueued state is always the last one written. Failures are logged
/// and dropped.
pub struct SaveQueue {
    tx: Option<mpsc::Sender<Snapshot>>,
    worker: Option<JoinHandle<()>>,
    /// Snapshots enqueued but not yet written or superseded.
    pending: Arc<AtomicUsize>,
}

impl SaveQueue {
    pub fn spawn(sink: Box<dyn GallerySink>, settle: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        let pending = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&pending);
        let worker = std::thread::spawn(move || run_writer(rx, sink, settle, counter));
        Self {
            tx: Some(tx),
            worker: Some(worker),
            pending,
        }
    }

    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }

    pub fn enqueue(&self, snapshot: Snapshot) {
        let Some(tx) = self.tx.as_ref() else { return };
        let revision = snapshot.revision;
        self.pending.fetch_add(1, Ordering::AcqRel);
        if tx.send(snapshot).is_err() {
            self.pending.fetch_sub(1, Ordering::AcqRel);
            tracing::error!(revision, "save writer is gone; snapshot dropped");
        }
    }
}

impl Drop for SaveQueue {
    fn drop(&mut self) {
        // Closing the channel lets the writer finish what is queued and exit.
        self.tx.take();
        if let Some(worker) = self.worker.take() {
            let pending = self.pending();
            if pending > 0 {
                tracing::info!(pending, "waiting for pending gallery saves");
            }
            if worker.join().is_err() {
                tracing::error!("save writer panicked");
            }
        }
    }
}

fn run_writer(
    rx: mpsc::Receiver<Snapshot>,
    sink: Box<dyn GallerySink>,
    settle: Duration,
    pending: Arc<AtomicUsize>,
) {
    let target = sink.describe();
    while let Ok(mut snapshot) = rx.recv() {
        if !settle.is_zero() {
            std::thread::sleep(settle);
        }
        let mut superseded = 0usize;
        while let Ok(newer) = rx.try_recv() {
            snapshot = newer;
            superseded += 1;
        }
        if superseded > 0 {
            tracing::debug!(superseded, revision = snapshot.revision, "coalesced pending saves");
        }

        let result = to_pretty_json(&snapshot.photos).and_then(|body| sink.write(&body));
        match result {
            Ok(()) => tracing::info!(
                sink = %target,
                revision = snapshot.revision,
                photos = snapshot.photos.len(),
                "gallery saved"
            ),
            Err(err) => tracing::error!(
                sink = %target,
                revision = snapshot.revision,
                "save failed: {:#}",
                err
            ),
        }
        pending.fetch_sub(superseded + 1, Ordering::AcqRel);
    }
    tracing::debug!("save writer stopped");
}
