//! Static capability records a host registry reads without an instance.

use crate::dom::Element;

pub const TOOLBOX_TITLE: &str = "Callout";

pub const TOOLBOX_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" x="0px" y="0px" viewBox="0 0 30 30" style=" fill:currentColor;" width="20" height="20"><path d="M 15 0 C 13.35499 0 12 1.3549904 12 3 L 8 3 C 6.3550302 3 5 4.3550302 5 6 L 5 24 C 5 25.64497 6.3550302 27 8 27 L 22 27 C 23.64497 27 25 25.64497 25 24 L 25 6 C 25 4.3550302 23.64497 3 22 3 L 18 3 C 18 1.3549904 16.64501 0 15 0 z M 15 2 C 15.564129 2 16 2.4358706 16 3 C 16 3.5641294 15.564129 4 15 4 C 14.435871 4 14 3.5641294 14 3 C 14 2.4358706 14.435871 2 15 2 z M 8 5 L 12 5 L 12 6 C 12 6.552 12.448 7 13 7 L 17 7 C 17.552 7 18 6.552 18 6 L 18 5 L 22 5 C 22.56503 5 23 5.4349698 23 6 L 23 24 C 23 24.56503 22.56503 25 22 25 L 8 25 C 7.4349698 25 7 24.56503 7 24 L 7 6 C 7 5.4349698 7.4349698 5 8 5 z M 13.859375 10 L 14.046875 17 L 15.953125 17 L 16.140625 10 L 13.859375 10 z M 15.003906 19.373047 C 14.117906 19.373047 13.589844 19.846297 13.589844 20.654297 C 13.589844 21.447297 14.117906 21.919922 15.003906 21.919922 C 15.882906 21.919922 16.412109 21.448297 16.412109 20.654297 C 16.412109 19.846297 15.882906 19.373047 15.003906 19.373047 z"></path></svg>"#;

/// Pasted HTML tags this block claims
pub const PASTE_TAGS: &[&str] = &["pre"];

/// Block-insertion affordance shown in the host toolbox
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toolbox {
    pub icon: &'static str,
    pub title: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasteConfig {
    pub tags: &'static [&'static str],
}

impl PasteConfig {
    /// Whether a pasted element is one this block takes ownership of
    pub fn claims(&self, element: &Element) -> bool {
        self.tags.contains(&element.tag())
    }
}

/// Per-field sanitize policy; `true` keeps markup unfiltered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SanitizeConfig {
    pub code: bool,
}

pub fn toolbox() -> Toolbox {
    Toolbox {
        icon: TOOLBOX_ICON,
        title: TOOLBOX_TITLE,
    }
}

pub fn paste_config() -> PasteConfig {
    PasteConfig { tags: PASTE_TAGS }
}

pub fn sanitize() -> SanitizeConfig {
    SanitizeConfig { code: true }
}

/// Enter inserts a line break inside the block instead of splitting it
pub fn enable_line_breaks() -> bool {
    true
}
