//! Paste events routed to the block by the host.

use serde::{Deserialize, Serialize};

use super::metadata;
use crate::dom::{Element, Node, html};

/// Pasted content the host matched against [`metadata::paste_config`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasteEvent {
    pub data: Element,
}

impl PasteEvent {
    pub fn new(data: Element) -> Self {
        Self { data }
    }

    /// Route a pasted HTML fragment: the first top-level element the block
    /// claims becomes the event, anything else is left to other blocks
    pub fn route(markup: &str) -> Option<Self> {
        let config = metadata::paste_config();
        html::parse_fragment(markup)
            .into_iter()
            .filter_map(|node| match node {
                Node::Element(element) => Some(element),
                Node::Text(_) | Node::Comment(_) => None,
            })
            .find(|element| config.claims(element))
            .map(Self::new)
    }

    pub fn text_content(&self) -> String {
        self.data.text_content()
    }
}

/// Whether a paste also rewrites the mounted surface or only the state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PasteSync {
    /// Replace state only; the host is expected to remount the block
    StateOnly,
    /// Replace state and write the pasted text into the surface
    #[default]
    StateAndView,
}
