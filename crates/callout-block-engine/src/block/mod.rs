/*!
 * # Callout Block
 *
 * The block a host editor instantiates: an emoji-prefixed, free-form editable
 * region persisted as a single `{ code }` record.
 *
 * ## Data/View Contract
 *
 * - **Construction** builds the view eagerly from [`BlockState`]
 * - **Between saves** the mounted surface is authoritative; user edits go
 *   straight into the DOM and [`CalloutBlock::data`] is not updated
 * - **Save** re-locates the surface inside whatever root the host hands back
 *   (it may be a clone) and reads its markup
 * - **`set_data`** is the only path that pushes state back into the DOM
 *
 * ## Module Structure
 *
 * - **`view`**: holder construction and surface lookup
 * - **`keys`**: Tab interception policy
 * - **`paste`**: paste events and the paste sync mode
 * - **`metadata`**: static capability records (toolbox, paste tags, sanitize)
 * - **`tool`**: the [`BlockTool`] trait a host registry drives blocks through
 */

pub mod keys;
pub mod metadata;
pub mod paste;
pub mod tool;
pub mod view;

use serde::{Deserialize, Deserializer, Serialize};

pub use keys::{Key, KeyEvent, KeyOutcome, TAB_RUN};
pub use metadata::{PasteConfig, SanitizeConfig, Toolbox};
pub use paste::{PasteEvent, PasteSync};
pub use tool::BlockTool;

use crate::dom::{Element, Node, Range, html};
use crate::error::BlockError;
use crate::host::HostApi;

pub const DEFAULT_PLACEHOLDER: &str = "Enter Your Callout!";
pub const DEFAULT_EMOJI: &str = "💡";

/// Persisted block content: an opaque HTML fragment
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BlockState {
    #[serde(default, deserialize_with = "lenient_code")]
    pub code: String,
}

impl BlockState {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }

    /// Decode a host record; see [`lenient_code`] for non-string `code`
    pub fn from_json(json: &str) -> Result<Self, BlockError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> String {
        serde_json::json!({ "code": self.code }).to_string()
    }
}

/// Hosts hand over loosely typed records: falsy values (`null`, `false`, `0`)
/// and containers become empty, other numbers and `true` are stringified
fn lenient_code<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(code) => code,
        serde_json::Value::Number(number) if number.as_f64() != Some(0.0) => number.to_string(),
        serde_json::Value::Bool(true) => "true".to_string(),
        _ => String::new(),
    })
}

/// Per-tool configuration, fixed at construction
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockConfig {
    pub placeholder: Option<String>,
    pub emoji: Option<String>,
    pub paste_sync: PasteSync,
}

/// What happened to the mounted view when state was replaced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewSync {
    /// The surface now shows the new content
    Synced,
    /// State replaced; no mounted surface to write into
    Detached,
    /// State replaced; the view was left alone on purpose
    StateOnly,
}

pub struct CalloutBlock {
    data: BlockState,
    placeholder: String,
    paste_sync: PasteSync,
    holder: Element,
    surface_path: Vec<usize>,
}

impl CalloutBlock {
    pub fn new(data: BlockState, config: &BlockConfig, api: &dyn HostApi) -> Self {
        let placeholder = api.i18n().t(
            config
                .placeholder
                .as_deref()
                .filter(|placeholder| !placeholder.is_empty())
                .unwrap_or(DEFAULT_PLACEHOLDER),
        );
        let emoji = config.emoji.as_deref().unwrap_or(DEFAULT_EMOJI);

        let (holder, surface_path) = view::draw_view(&view::ViewParts {
            styles: api.styles(),
            emoji,
            placeholder: &placeholder,
            code: &data.code,
        });
        log::debug!(
            "constructed callout block ({} bytes of code)",
            data.code.len()
        );

        Self {
            data,
            placeholder,
            paste_sync: config.paste_sync,
            holder,
            surface_path,
        }
    }

    /// Construct from a JSON record as persisted by the host
    pub fn from_json(
        json: &str,
        config: &BlockConfig,
        api: &dyn HostApi,
    ) -> Result<Self, BlockError> {
        Ok(Self::new(BlockState::from_json(json)?, config, api))
    }

    /// The holder handed to the host; always the same tree
    pub fn render(&self) -> &Element {
        &self.holder
    }

    /// Mutable access to the mounted tree, used by hosts applying user edits
    pub fn holder_mut(&mut self) -> &mut Element {
        &mut self.holder
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// The mounted editable surface, if the host has not removed it
    pub fn surface(&self) -> Option<&Element> {
        self.holder
            .element_at_path(&self.surface_path)
            .filter(|element| view::is_surface(element))
    }

    pub fn surface_mut(&mut self) -> Option<&mut Element> {
        self.holder
            .element_at_path_mut(&self.surface_path)
            .filter(|element| view::is_surface(element))
    }

    /// Read `{ code }` from the surface found inside `root`
    pub fn save(&self, root: &Element) -> Result<BlockState, BlockError> {
        let path = view::locate_surface(root).ok_or_else(|| BlockError::SurfaceNotFound {
            root_tag: root.tag().to_string(),
        })?;
        let surface = root
            .element_at_path(&path)
            .ok_or_else(|| BlockError::SurfaceNotFound {
                root_tag: root.tag().to_string(),
            })?;
        Ok(BlockState::new(surface.inner_html()))
    }

    pub fn data(&self) -> &BlockState {
        &self.data
    }

    /// Replace state and write its code into the mounted surface
    pub fn set_data(&mut self, data: BlockState) -> ViewSync {
        let sync = match self.surface_mut() {
            Some(surface) => {
                surface.set_inner_html(&data.code);
                ViewSync::Synced
            }
            None => {
                log::debug!("surface detached, keeping new state without a view write");
                ViewSync::Detached
            }
        };
        self.data = data;
        sync
    }

    /// Replace state with the pasted plain text; markup is discarded.
    ///
    /// `code` is markup, so the text is stored escaped: `<b>` typed into the
    /// source document comes back as text, never as an element.
    pub fn on_paste(&mut self, event: &PasteEvent) -> ViewSync {
        let text = Node::text(event.text_content());
        let data = BlockState::new(html::serialize_children(&[text]));
        log::debug!("paste replaced callout content ({:?})", self.paste_sync);
        match self.paste_sync {
            PasteSync::StateAndView => self.set_data(data),
            PasteSync::StateOnly => {
                self.data = data;
                ViewSync::StateOnly
            }
        }
    }

    /// Keydown inside the surface; see [`keys::intercept_keydown`]
    pub fn handle_key_down(
        &mut self,
        event: &mut KeyEvent,
        selection: Option<&mut Range>,
    ) -> Result<KeyOutcome, BlockError> {
        match self.surface_mut() {
            Some(surface) => keys::intercept_keydown(surface, event, selection),
            None => Ok(KeyOutcome::Ignored),
        }
    }
}
