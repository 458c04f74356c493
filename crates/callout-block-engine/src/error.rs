use thiserror::Error;

use crate::dom::BoundaryPoint;

#[derive(Debug, Error)]
pub enum BlockError {
    #[error("No editable surface found inside <{root_tag}>")]
    SurfaceNotFound { root_tag: String },

    #[error("Range boundary {point:?} does not resolve inside the editable surface")]
    InvalidRange { point: BoundaryPoint },

    #[error("Failed to decode block data: {source}")]
    Decode {
        #[from]
        source: serde_json::Error,
    },
}
