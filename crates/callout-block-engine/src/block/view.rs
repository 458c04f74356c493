//! Builds the callout's DOM and finds its editable surface again on save.

use crate::dom::{Element, Node};
use crate::host::Styles;

/// Marks the editable surface so it can be found without a stored reference
pub const ROLE_ATTRIBUTE: &str = "block-role";
pub const EDITABLE_ROLE: &str = "editable";

pub const WRAPPER_CLASS: &str = "ce-callout";
pub const BODY_CLASS: &str = "ce-callout__body";
pub const EMOJI_CLASS: &str = "ce-callout__emoji";
pub const SURFACE_CLASS: &str = "ce-callout__text";

/// Surface element tag; also what `paste_config` claims
pub const SURFACE_TAG: &str = "pre";

pub struct ViewParts<'a> {
    pub styles: &'a Styles,
    pub emoji: &'a str,
    pub placeholder: &'a str,
    pub code: &'a str,
}

/// Build the holder tree:
///
/// ```text
/// div.{block}.ce-callout
/// └── div.ce-callout__body.{input}
///     ├── div.ce-callout__emoji      (emoji, not editable)
///     └── pre[data-block-role=editable][contenteditable]   (code)
/// ```
///
/// Returns the holder and the child-index path to the surface inside it.
pub fn draw_view(parts: &ViewParts<'_>) -> (Element, Vec<usize>) {
    let mut emoji = Element::new("div");
    emoji.add_class(EMOJI_CLASS);
    emoji.set_attribute("contenteditable", "false");
    emoji.append_child(Node::text(parts.emoji));

    let mut surface = Element::new(SURFACE_TAG);
    surface.add_class(SURFACE_CLASS);
    surface.set_attribute("contenteditable", "true");
    surface.set_attribute("spellcheck", "false");
    surface.set_attribute("autocomplete", "off");
    surface.set_attribute("autocorrect", "off");
    surface.set_attribute("autocapitalize", "off");
    surface.set_data("placeholder", parts.placeholder);
    surface.set_data(ROLE_ATTRIBUTE, EDITABLE_ROLE);
    surface.set_inner_html(parts.code);

    let mut body = Element::new("div");
    body.add_class(BODY_CLASS);
    body.add_class(&parts.styles.input);
    body.append_child(emoji);
    body.append_child(surface);

    let mut wrapper = Element::new("div");
    wrapper.add_class(&parts.styles.block);
    wrapper.add_class(WRAPPER_CLASS);
    wrapper.append_child(body);

    (wrapper, vec![0, 1])
}

pub fn is_surface(element: &Element) -> bool {
    element.data(ROLE_ATTRIBUTE) == Some(EDITABLE_ROLE)
}

/// Path to the editable surface inside `root`: the role-marked element,
/// else the first `pre` (markup from before the role marker existed)
pub fn locate_surface(root: &Element) -> Option<Vec<usize>> {
    root.find_path(&is_surface)
        .or_else(|| root.find_path(&|element: &Element| element.tag() == SURFACE_TAG))
}
