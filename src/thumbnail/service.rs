//! Thumbnail service - renders catalog thumbnails on worker threads

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use flume::{Receiver, RecvTimeoutError, Sender};
use log::debug;

use super::{Thumbnail, render_thumbnail};
use crate::pdf::DocumentLoader;

/// Default number of thumbnail worker threads
pub const DEFAULT_THUMBNAIL_WORKERS: usize = 2;

/// Request sent to thumbnail workers
#[derive(Debug)]
pub enum ThumbnailRequest {
    /// Render page 1 of `url` for catalog item `index`
    Render {
        index: usize,
        url: String,
        container_width: f32,
    },

    /// Shutdown the worker
    Shutdown,
}

/// Response from thumbnail workers
#[derive(Debug)]
pub struct ThumbnailResponse {
    pub index: usize,
    pub thumbnail: Thumbnail,
}

/// Renders thumbnails off the UI thread.
///
/// Items are independent: a failing document yields a placeholder for that
/// item and nothing else.
pub struct ThumbnailService {
    request_tx: Sender<ThumbnailRequest>,
    response_rx: Receiver<ThumbnailResponse>,
    num_workers: usize,
    pending: HashSet<usize>,
}

impl ThumbnailService {
    #[must_use]
    pub fn new(loader: Arc<dyn DocumentLoader>, num_workers: usize) -> Self {
        // Workers share one request queue, which needs an MPMC channel.
        let (request_tx, request_rx) = flume::unbounded();
        let (response_tx, response_rx) = flume::unbounded();

        let num_workers = num_workers.max(1);
        for _ in 0..num_workers {
            let loader = Arc::clone(&loader);
            let rx = request_rx.clone();
            let tx = response_tx.clone();
            std::thread::spawn(move || thumbnail_worker(loader.as_ref(), &rx, &tx));
        }

        Self {
            request_tx,
            response_rx,
            num_workers,
            pending: HashSet::new(),
        }
    }

    /// Queue a thumbnail render for catalog item `index`
    pub fn request(&mut self, index: usize, url: &str, container_width: f32) {
        let _ = self.request_tx.send(ThumbnailRequest::Render {
            index,
            url: url.to_string(),
            container_width,
        });
        self.pending.insert(index);
    }

    /// Number of requested thumbnails not yet received
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Collect finished thumbnails without blocking
    pub fn poll_responses(&mut self) -> Vec<ThumbnailResponse> {
        let mut responses = vec![];
        while let Ok(response) = self.response_rx.try_recv() {
            self.pending.remove(&response.index);
            responses.push(response);
        }
        responses
    }

    /// Block until every pending thumbnail arrives or `timeout` elapses
    pub fn wait_all(&mut self, timeout: Duration) -> Vec<ThumbnailResponse> {
        let deadline = Instant::now() + timeout;
        let mut responses = vec![];
        while !self.pending.is_empty() {
            match self.response_rx.recv_deadline(deadline) {
                Ok(response) => {
                    self.pending.remove(&response.index);
                    responses.push(response);
                }
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => break,
            }
        }
        responses
    }

    /// Shutdown all workers
    pub fn shutdown(&self) {
        for _ in 0..self.num_workers {
            let _ = self.request_tx.send(ThumbnailRequest::Shutdown);
        }
    }
}

impl Drop for ThumbnailService {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn thumbnail_worker(
    loader: &dyn DocumentLoader,
    requests: &Receiver<ThumbnailRequest>,
    responses: &Sender<ThumbnailResponse>,
) {
    for request in requests.iter() {
        match request {
            ThumbnailRequest::Render {
                index,
                url,
                container_width,
            } => {
                let thumbnail = render_thumbnail(loader, &url, container_width);
                debug!("Thumbnail {index} ready ({:?})", thumbnail.status);
                if responses.send(ThumbnailResponse { index, thumbnail }).is_err() {
                    break;
                }
            }
            ThumbnailRequest::Shutdown => break,
        }
    }
}
