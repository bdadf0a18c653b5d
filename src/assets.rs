//! Block model loading
//!
//! The host loads the block model however it likes and exposes progress
//! through [`ModelProvider`]. The game never waits on it: until the load
//! resolves, and for good if it fails, blocks are drawn as primitive boxes.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::sim::scene::NodeGeometry;

/// A loaded block model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualTemplate {
    /// Host-side identifier for the model
    pub name: String,
    /// Native size of the model (scaled to each block's size)
    pub extents: Vec3,
}

/// Why a model could not be loaded
#[derive(Debug, Clone, PartialEq)]
pub enum AssetError {
    NotFound(String),
    Decode(String),
}

impl std::fmt::Display for AssetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetError::NotFound(path) => write!(f, "model not found: {path}"),
            AssetError::Decode(msg) => write!(f, "model decode failed: {msg}"),
        }
    }
}

impl std::error::Error for AssetError {}

/// Progress of an asynchronous model load
#[derive(Debug, Clone, PartialEq)]
pub enum ModelLoad {
    Pending,
    Ready(Result<VisualTemplate, AssetError>),
}

/// Host-provided model loader, polled by the game loop
pub trait ModelProvider {
    fn poll(&mut self) -> ModelLoad;
}

/// A provider whose result is known up front
#[derive(Debug, Clone)]
pub struct ReadyModel {
    result: Option<Result<VisualTemplate, AssetError>>,
}

impl ReadyModel {
    pub fn loaded(template: VisualTemplate) -> Self {
        Self {
            result: Some(Ok(template)),
        }
    }

    pub fn failed(error: AssetError) -> Self {
        Self {
            result: Some(Err(error)),
        }
    }
}

impl ModelProvider for ReadyModel {
    fn poll(&mut self) -> ModelLoad {
        match self.result.take() {
            Some(result) => ModelLoad::Ready(result),
            // Already handed out; the slot keeps the resolved value
            None => ModelLoad::Pending,
        }
    }
}

/// Resolved block visual
#[derive(Debug, Clone, PartialEq)]
pub enum BlockVisual {
    Loaded(VisualTemplate),
    Fallback,
}

/// Caches the outcome of a model load
#[derive(Debug, Clone, Default)]
pub struct ModelSlot {
    resolved: Option<BlockVisual>,
}

impl ModelSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }

    pub fn visual(&self) -> Option<&BlockVisual> {
        self.resolved.as_ref()
    }

    /// Poll the provider until it resolves. Failures switch to fallback boxes.
    pub fn refresh(&mut self, provider: &mut dyn ModelProvider) {
        if self.resolved.is_some() {
            return;
        }
        match provider.poll() {
            ModelLoad::Pending => {}
            ModelLoad::Ready(Ok(template)) => {
                log::info!("Block model '{}' loaded", template.name);
                self.resolved = Some(BlockVisual::Loaded(template));
            }
            ModelLoad::Ready(Err(e)) => {
                log::warn!("Block model unavailable ({}), using box geometry", e);
                self.resolved = Some(BlockVisual::Fallback);
            }
        }
    }

    /// Geometry for new block nodes right now
    pub fn geometry(&self) -> NodeGeometry {
        match &self.resolved {
            Some(BlockVisual::Loaded(template)) => NodeGeometry::Model(template.clone()),
            _ => NodeGeometry::Box,
        }
    }
}

/// Node scale that makes `geometry` span `size`
pub fn block_scale(geometry: &NodeGeometry, size: Vec3) -> Vec3 {
    match geometry {
        NodeGeometry::Model(template) => size / template.extents.max(Vec3::splat(f32::EPSILON)),
        _ => size,
    }
}
