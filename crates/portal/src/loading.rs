//! Background scene loading.
//!
//! The loader runs once on its own thread; the result comes back over a
//! bounded channel and is picked up by the render thread with
//! [`SceneLoadHandle::try_take`]. Until then only the fireflies draw.

use std::fmt;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, TryRecvError};
use portal_rendering::{RenderError, RenderResult, SceneGraph, SceneLoader};
use tracing::info;

use crate::error::{AppError, AppResult};

/// Where the scene is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneState {
    /// The loader has not reported back yet.
    Loading,
    /// The scene is uploaded and drawing.
    Ready {
        /// Uploaded nodes.
        nodes: usize,
        /// Special nodes the materials could not find.
        missing_nodes: usize,
    },
    /// Loading failed; only the fireflies draw.
    Failed(String),
}

impl SceneState {
    /// Whether the scene is drawing.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }

    /// Whether loading failed.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl fmt::Display for SceneState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loading => f.write_str("loading scene"),
            Self::Ready {
                missing_nodes: 0, ..
            } => f.write_str("ready"),
            Self::Ready { missing_nodes, .. } => write!(f, "ready ({missing_nodes} nodes missing)"),
            Self::Failed(reason) => write!(f, "scene failed: {reason}"),
        }
    }
}

/// A scene load in flight.
#[derive(Debug)]
pub struct SceneLoadHandle {
    path: String,
    receiver: Receiver<RenderResult<SceneGraph>>,
}

impl SceneLoadHandle {
    /// Starts `loader` on a background thread.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Spawn`] when the thread cannot be created.
    pub fn spawn<L>(loader: L, path: impl Into<String>) -> AppResult<Self>
    where
        L: SceneLoader + Send + 'static,
    {
        let path = path.into();
        let (sender, receiver) = bounded(1);
        let thread_path = path.clone();

        thread::Builder::new()
            .name("scene-loader".into())
            .spawn(move || {
                let start = Instant::now();
                let result = loader.load(&thread_path);
                info!(
                    path = %thread_path,
                    ok = result.is_ok(),
                    elapsed_ms = start.elapsed().as_millis(),
                    "scene loader finished"
                );
                // The receiver may already be gone if the app shut down.
                let _ = sender.send(result);
            })
            .map_err(|e| AppError::Spawn {
                name: "scene-loader",
                reason: e.to_string(),
            })?;

        info!(path = %path, "scene load started");
        Ok(Self { path, receiver })
    }

    /// Path handed to the loader.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The load result if it has arrived.
    ///
    /// A loader thread that exits without reporting (it panicked) yields a
    /// [`RenderError::SceneLoad`].
    #[must_use]
    pub fn try_take(&self) -> Option<RenderResult<SceneGraph>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(self.vanished())),
        }
    }

    /// Blocks up to `timeout` for the result.
    #[must_use]
    pub fn wait(&self, timeout: Duration) -> Option<RenderResult<SceneGraph>> {
        match self.receiver.recv_timeout(timeout) {
            Ok(result) => Some(result),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => Some(Err(self.vanished())),
        }
    }

    fn vanished(&self) -> RenderError {
        RenderError::SceneLoad {
            path: self.path.clone(),
            reason: "loader thread exited without a result".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_rendering::ProceduralPortalScene;

    struct FailingLoader;

    impl SceneLoader for FailingLoader {
        fn load(&self, path: &str) -> RenderResult<SceneGraph> {
            Err(RenderError::SceneLoad {
                path: path.to_string(),
                reason: "file not found".into(),
            })
        }
    }

    struct PanickingLoader;

    impl SceneLoader for PanickingLoader {
        fn load(&self, _: &str) -> RenderResult<SceneGraph> {
            panic!("loader crashed");
        }
    }

    #[test]
    fn test_procedural_load_arrives() {
        let handle = SceneLoadHandle::spawn(ProceduralPortalScene::default(), "portal.glb").unwrap();
        let scene = handle.wait(Duration::from_secs(5)).unwrap().unwrap();
        assert!(scene.node("portalLight").is_some());
        assert_eq!(handle.path(), "portal.glb");
    }

    #[test]
    fn test_failure_is_reported() {
        let handle = SceneLoadHandle::spawn(FailingLoader, "missing.glb").unwrap();
        let error = handle.wait(Duration::from_secs(5)).unwrap().unwrap_err();
        assert_eq!(
            error,
            RenderError::SceneLoad {
                path: "missing.glb".into(),
                reason: "file not found".into()
            }
        );
    }

    #[test]
    fn test_panicking_loader_becomes_error() {
        let handle = SceneLoadHandle::spawn(PanickingLoader, "boom.glb").unwrap();
        let error = handle.wait(Duration::from_secs(5)).unwrap().unwrap_err();
        assert!(matches!(error, RenderError::SceneLoad { .. }));
    }

    #[test]
    fn test_state_display() {
        assert_eq!(SceneState::Loading.to_string(), "loading scene");
        assert_eq!(
            SceneState::Ready {
                nodes: 7,
                missing_nodes: 0
            }
            .to_string(),
            "ready"
        );
        assert_eq!(
            SceneState::Failed("no such file".into()).to_string(),
            "scene failed: no such file"
        );
    }
}
