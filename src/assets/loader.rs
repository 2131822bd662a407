//! Asynchronous asset loaders
//!
//! A load returns an [`AssetHandle`] straight away. The handle is completed
//! later, either by the [`FileLoader`] worker thread or by hand through a
//! [`ManualLoader`], and is polled without blocking.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::mpsc;
use std::thread;

use futures::channel::oneshot;
use log::{debug, warn};

use crate::error::AssetError;

type LoadResult = Result<Vec<u8>, AssetError>;

/// State of an in-flight load
#[derive(Debug)]
pub enum LoadStatus {
    Pending,
    Ready(Vec<u8>),
    Failed(AssetError),
}

/// Receiving end of one asset load
#[derive(Debug)]
pub struct AssetHandle {
    path: String,
    receiver: oneshot::Receiver<LoadResult>,
}

impl AssetHandle {
    /// Creates a handle with the sender that completes it
    pub fn channel(path: &str) -> (oneshot::Sender<LoadResult>, AssetHandle) {
        let (sender, receiver) = oneshot::channel();
        (
            sender,
            AssetHandle {
                path: path.to_string(),
                receiver,
            },
        )
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Checks for completion without blocking
    ///
    /// A loader that drops its sender reports [`AssetError::Cancelled`].
    pub fn poll(&mut self) -> LoadStatus {
        match self.receiver.try_recv() {
            Ok(None) => LoadStatus::Pending,
            Ok(Some(Ok(bytes))) => LoadStatus::Ready(bytes),
            Ok(Some(Err(e))) => LoadStatus::Failed(e),
            Err(oneshot::Canceled) => LoadStatus::Failed(AssetError::Cancelled(self.path.clone())),
        }
    }

    /// Blocks until the load finishes
    pub fn wait(self) -> LoadResult {
        let path = self.path;
        futures::executor::block_on(self.receiver).unwrap_or(Err(AssetError::Cancelled(path)))
    }
}

pub trait AssetLoader {
    /// Starts loading `path`; never blocks
    fn load(&self, path: &str) -> AssetHandle;
}

struct Job {
    path: String,
    resolved: PathBuf,
    sender: oneshot::Sender<LoadResult>,
}

/// Reads files relative to a root directory on a background thread
pub struct FileLoader {
    root: PathBuf,
    jobs: mpsc::Sender<Job>,
}

impl FileLoader {
    /// Spawns the worker thread; it exits once the loader is dropped
    pub fn new(root: impl Into<PathBuf>) -> std::io::Result<Self> {
        let (jobs, queue) = mpsc::channel::<Job>();
        thread::Builder::new()
            .name("vista-asset-loader".to_string())
            .spawn(move || {
                for job in queue {
                    let result = read_asset(&job.path, &job.resolved);
                    if job.sender.send(result).is_err() {
                        debug!("Load of `{}` finished after its handle was dropped", job.path);
                    }
                }
            })?;

        Ok(Self {
            root: root.into(),
            jobs,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn read_asset(path: &str, resolved: &Path) -> LoadResult {
    std::fs::read(resolved).map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => AssetError::NotFound(path.to_string()),
        _ => AssetError::Io {
            path: path.to_string(),
            source,
        },
    })
}

impl AssetLoader for FileLoader {
    fn load(&self, path: &str) -> AssetHandle {
        let (sender, handle) = AssetHandle::channel(path);
        let job = Job {
            path: path.to_string(),
            resolved: self.root.join(path),
            sender,
        };
        // A dead worker drops the job, which cancels the handle
        if self.jobs.send(job).is_err() {
            warn!("Asset worker is gone, `{}` will not load", path);
        }
        handle
    }
}

/// Loader completed by hand, for tests
///
/// Clones share their pending requests.
#[derive(Clone, Default)]
pub struct ManualLoader {
    pending: Rc<RefCell<HashMap<String, Vec<oneshot::Sender<LoadResult>>>>>,
    requested: Rc<RefCell<Vec<String>>>,
}

impl ManualLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every path requested so far, in request order
    pub fn requested(&self) -> Vec<String> {
        self.requested.borrow().clone()
    }

    /// Completes all outstanding loads of `path`, returning how many
    pub fn complete(&self, path: &str, bytes: Vec<u8>) -> usize {
        self.finish(path, |_| Ok(bytes.clone()))
    }

    /// Fails all outstanding loads of `path` with [`AssetError::NotFound`]
    pub fn fail(&self, path: &str) -> usize {
        self.finish(path, |p| Err(AssetError::NotFound(p.to_string())))
    }

    /// Drops all outstanding loads of `path` without an answer
    pub fn cancel(&self, path: &str) -> usize {
        self.pending
            .borrow_mut()
            .remove(path)
            .map(|senders| senders.len())
            .unwrap_or(0)
    }

    fn finish(&self, path: &str, result: impl Fn(&str) -> LoadResult) -> usize {
        let senders = self.pending.borrow_mut().remove(path).unwrap_or_default();
        let count = senders.len();
        for sender in senders {
            let _ = sender.send(result(path));
        }
        count
    }
}

impl AssetLoader for ManualLoader {
    fn load(&self, path: &str) -> AssetHandle {
        let (sender, handle) = AssetHandle::channel(path);
        self.pending
            .borrow_mut()
            .entry(path.to_string())
            .or_default()
            .push(sender);
        self.requested.borrow_mut().push(path.to_string());
        handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_handle_pending_until_completed() {
        let loader = ManualLoader::new();
        let mut handle = loader.load("textures/door/color.jpg");
        assert!(matches!(handle.poll(), LoadStatus::Pending));

        assert_eq!(loader.complete("textures/door/color.jpg", vec![1, 2, 3]), 1);
        match handle.poll() {
            LoadStatus::Ready(bytes) => assert_eq!(bytes, vec![1, 2, 3]),
            other => panic!("unexpected status {:?}", other),
        }
    }

    #[test]
    fn test_manual_failure_and_cancel() {
        let loader = ManualLoader::new();
        let mut failed = loader.load("missing.png");
        let mut dropped = loader.load("dropped.png");
        loader.fail("missing.png");
        loader.cancel("dropped.png");

        assert!(matches!(failed.poll(), LoadStatus::Failed(AssetError::NotFound(_))));
        assert!(matches!(dropped.poll(), LoadStatus::Failed(AssetError::Cancelled(_))));
        assert_eq!(loader.requested(), vec!["missing.png", "dropped.png"]);
    }

    #[test]
    fn test_file_loader_reads_from_root() {
        let dir = std::env::temp_dir().join(format!("vista-loader-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("tex.bin"), [7u8, 8, 9]).unwrap();

        let loader = FileLoader::new(dir.clone()).unwrap();
        assert_eq!(loader.load("tex.bin").wait().unwrap(), vec![7, 8, 9]);
        assert!(matches!(
            loader.load("absent.bin").wait(),
            Err(AssetError::NotFound(_))
        ));

        std::fs::remove_dir_all(&dir).ok();
    }
}
