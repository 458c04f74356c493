use super::metadata::{self, PasteConfig, SanitizeConfig, Toolbox};
use super::{BlockState, CalloutBlock, PasteEvent, ViewSync};
use crate::dom::Element;
use crate::error::BlockError;

/// Contract between a block type and the host's block registry.
///
/// The associated functions are capability lookups the registry performs
/// per block type; the methods operate on a constructed instance.
pub trait BlockTool {
    type Data;

    fn toolbox() -> Toolbox
    where
        Self: Sized;

    fn paste_config() -> PasteConfig
    where
        Self: Sized;

    fn sanitize() -> SanitizeConfig
    where
        Self: Sized;

    fn enable_line_breaks() -> bool
    where
        Self: Sized,
    {
        false
    }

    fn render(&self) -> &Element;

    fn save(&self, root: &Element) -> Result<Self::Data, BlockError>;

    fn on_paste(&mut self, event: &PasteEvent) -> ViewSync;
}

impl BlockTool for CalloutBlock {
    type Data = BlockState;

    fn toolbox() -> Toolbox {
        metadata::toolbox()
    }

    fn paste_config() -> PasteConfig {
        metadata::paste_config()
    }

    fn sanitize() -> SanitizeConfig {
        metadata::sanitize()
    }

    fn enable_line_breaks() -> bool {
        metadata::enable_line_breaks()
    }

    fn render(&self) -> &Element {
        CalloutBlock::render(self)
    }

    fn save(&self, root: &Element) -> Result<BlockState, BlockError> {
        CalloutBlock::save(self, root)
    }

    fn on_paste(&mut self, event: &PasteEvent) -> ViewSync {
        CalloutBlock::on_paste(self, event)
    }
}
