use trailmap_track::ObservableId;

use crate::identifiers::LayerId;

/// Failures reported by a [`MapSurface`](crate::surface::MapSurface).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SurfaceError {
    #[error("Style is not loaded")]
    StyleNotLoaded,

    #[error("Source already exists: {0}")]
    SourceExists(String),

    #[error("Source not found: {0}")]
    SourceNotFound(String),

    #[error("Layer already exists: {0}")]
    LayerExists(String),

    #[error("Layer not found: {0}")]
    LayerNotFound(String),

    #[error("Source {source_id} is still used by layer {layer_id}")]
    SourceInUse { source_id: String, layer_id: String },
}

#[derive(Debug, thiserror::Error)]
pub enum LayerError {
    #[error("Map surface error: {0}")]
    Surface(#[from] SurfaceError),

    #[error("Track is already registered: {0}")]
    AlreadyRegistered(ObservableId),

    #[error("Layer is not registered with this manager: {0}")]
    UnknownLayer(LayerId),

    #[error("Color palette is empty")]
    EmptyPalette,

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Configuration parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LayerError>;
