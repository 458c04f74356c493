pub mod block;
pub mod dom;
pub mod error;
pub mod host;

// Re-export key types for easier usage
pub use block::{
    BlockConfig, BlockState, BlockTool, CalloutBlock, Key, KeyEvent, KeyOutcome, PasteEvent,
    PasteSync, ViewSync, metadata,
};
pub use dom::{BoundaryPoint, Element, Node, Range};
pub use error::BlockError;
pub use host::{Catalog, HostApi, I18n, StaticHost, Styles};
