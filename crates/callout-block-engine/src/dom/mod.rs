/*!
 * # DOM Model
 *
 * A small owned element/text tree standing in for the host's live document.
 * Blocks build their view out of [`Element`]s, hosts mount them (or mirror
 * them into a real DOM) and hand them back on save.
 *
 * The model only covers what a content block needs:
 *
 * - **Tree**: elements with ordered attributes and child nodes, plus text and
 *   comment nodes
 * - **Markup**: `inner_html` / `set_inner_html` / `outer_html` via the [`html`] module
 * - **Queries**: depth-first `find` over descendants, index paths into the tree
 * - **Caret editing**: DOM-style boundary points and ranges via the [`range`] module
 *
 * Cloning an element deep-copies its subtree, which is how a host relocating
 * or cloning a mounted block is modelled.
 */

pub mod html;
pub mod range;

pub use range::{BoundaryPoint, Range};

/// A node in the tree: an element, a run of text or a comment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    /// Kept so markup survives a parse/serialize cycle; contributes no text
    Comment(String),
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text(_) | Node::Comment(_) => None,
        }
    }

    /// Concatenated text of this node and all its descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) => {
                for child in &element.children {
                    child.collect_text(out);
                }
            }
            Node::Comment(_) => {}
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

/// An element with a lowercase tag name, ordered attributes and children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Set an attribute, replacing any existing value in place
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        let name = name.to_ascii_lowercase();
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Read a `data-*` attribute; `key` is given without the prefix
    pub fn data(&self, key: &str) -> Option<&str> {
        self.attribute(&format!("data-{key}"))
    }

    pub fn set_data(&mut self, key: &str, value: impl Into<String>) {
        self.set_attribute(&format!("data-{key}"), value);
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attribute("class").unwrap_or_default().split_whitespace()
    }

    pub fn has_class(&self, token: &str) -> bool {
        self.classes().any(|class| class == token)
    }

    /// Add class tokens; blank and duplicate tokens are ignored
    pub fn add_class(&mut self, tokens: &str) {
        let mut classes: Vec<String> = self.classes().map(str::to_string).collect();
        for token in tokens.split_whitespace() {
            if !classes.iter().any(|class| class == token) {
                classes.push(token.to_string());
            }
        }
        if !classes.is_empty() {
            self.set_attribute("class", classes.join(" "));
        }
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<Node> {
        &mut self.children
    }

    pub fn append_child(&mut self, node: impl Into<Node>) {
        self.children.push(node.into());
    }

    /// Builder-style [`Element::append_child`]
    pub fn with_child(mut self, node: impl Into<Node>) -> Self {
        self.append_child(node);
        self
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.collect_text(&mut out);
        }
        out
    }

    /// Replace all children with a single text node (or nothing for empty text)
    pub fn set_text_content(&mut self, text: &str) {
        self.children.clear();
        if !text.is_empty() {
            self.children.push(Node::text(text));
        }
    }

    pub fn inner_html(&self) -> String {
        html::serialize_children(&self.children)
    }

    /// Replace all children with the parsed fragment
    pub fn set_inner_html(&mut self, markup: &str) {
        self.children = html::parse_fragment(markup);
    }

    pub fn outer_html(&self) -> String {
        html::serialize_element(self)
    }

    /// First descendant (depth-first, pre-order, excluding `self`) matching `predicate`
    pub fn find(&self, predicate: impl Fn(&Element) -> bool) -> Option<&Element> {
        let path = self.find_path(&predicate)?;
        self.element_at_path(&path)
    }

    pub fn find_mut(&mut self, predicate: impl Fn(&Element) -> bool) -> Option<&mut Element> {
        let path = self.find_path(&predicate)?;
        self.element_at_path_mut(&path)
    }

    /// Child-index path to the first descendant matching `predicate`
    pub fn find_path(&self, predicate: &impl Fn(&Element) -> bool) -> Option<Vec<usize>> {
        for (index, child) in self.children.iter().enumerate() {
            if let Node::Element(element) = child {
                if predicate(element) {
                    return Some(vec![index]);
                }
                if let Some(mut rest) = element.find_path(predicate) {
                    rest.insert(0, index);
                    return Some(rest);
                }
            }
        }
        None
    }

    pub fn node_at_path(&self, path: &[usize]) -> Option<&Node> {
        let (first, rest) = path.split_first()?;
        let node = self.children.get(*first)?;
        if rest.is_empty() {
            return Some(node);
        }
        node.as_element()?.node_at_path(rest)
    }

    pub fn node_at_path_mut(&mut self, path: &[usize]) -> Option<&mut Node> {
        let (first, rest) = path.split_first()?;
        let node = self.children.get_mut(*first)?;
        if rest.is_empty() {
            return Some(node);
        }
        match node {
            Node::Element(element) => element.node_at_path_mut(rest),
            Node::Text(_) | Node::Comment(_) => None,
        }
    }

    /// Element at `path`; the empty path is `self`
    pub fn element_at_path(&self, path: &[usize]) -> Option<&Element> {
        if path.is_empty() {
            return Some(self);
        }
        self.node_at_path(path)?.as_element()
    }

    pub fn element_at_path_mut(&mut self, path: &[usize]) -> Option<&mut Element> {
        if path.is_empty() {
            return Some(self);
        }
        match self.node_at_path_mut(path)? {
            Node::Element(element) => Some(element),
            Node::Text(_) | Node::Comment(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Element {
        Element::new("div")
            .with_child(Element::new("span").with_child(Node::text("one")))
            .with_child(
                Element::new("p")
                    .with_child(Node::text("two "))
                    .with_child(Element::new("b").with_child(Node::text("three"))),
            )
    }

    #[test]
    fn test_tag_names_are_lowercased() {
        assert_eq!(Element::new("PRE").tag(), "pre");
    }

    #[test]
    fn test_add_class_skips_blank_and_duplicate_tokens() {
        let mut element = Element::new("div");
        element.add_class("a b");
        element.add_class("");
        element.add_class("b c");

        assert_eq!(element.attribute("class"), Some("a b c"));
        assert!(element.has_class("c"));
        assert!(!element.has_class("d"));
    }

    #[test]
    fn test_blank_class_leaves_no_attribute() {
        let mut element = Element::new("div");
        element.add_class("   ");
        assert_eq!(element.attribute("class"), None);
    }

    #[test]
    fn test_set_attribute_replaces_in_place() {
        let mut element = Element::new("pre");
        element.set_attribute("spellcheck", "true");
        element.set_data("placeholder", "Type");
        element.set_attribute("spellcheck", "false");

        let attributes: Vec<_> = element.attributes().collect();
        assert_eq!(
            attributes,
            vec![("spellcheck", "false"), ("data-placeholder", "Type")]
        );
        assert_eq!(element.data("placeholder"), Some("Type"));
    }

    #[test]
    fn test_text_content_concatenates_descendants() {
        assert_eq!(sample().text_content(), "onetwo three");
    }

    #[test]
    fn test_find_is_depth_first_and_excludes_self() {
        let root = sample();
        assert_eq!(root.find(|e| e.tag() == "div"), None);
        assert_eq!(root.find_path(&|e| e.tag() == "b"), Some(vec![1, 1]));
        assert_eq!(
            root.find(|e| e.tag() == "b").map(Element::text_content),
            Some("three".to_string())
        );
    }

    #[test]
    fn test_path_lookup() {
        let root = sample();
        assert_eq!(root.node_at_path(&[1, 0]), Some(&Node::text("two ")));
        assert_eq!(root.element_at_path(&[]).map(Element::tag), Some("div"));
        assert!(root.element_at_path(&[1, 0]).is_none());
        assert!(root.node_at_path(&[5]).is_none());
        assert!(root.node_at_path(&[1, 0, 0]).is_none());
    }

    #[test]
    fn test_comments_carry_no_text() {
        let root = Element::new("pre")
            .with_child(Node::text("a"))
            .with_child(Node::Comment(" note ".to_string()))
            .with_child(Node::text("b"));

        assert_eq!(root.text_content(), "ab");
        assert!(root.element_at_path(&[1]).is_none());
        assert!(root.node_at_path(&[1, 0]).is_none());
    }

    #[test]
    fn test_set_text_content_replaces_children() {
        let mut root = sample();
        root.set_text_content("plain");
        assert_eq!(root.children(), &[Node::text("plain")]);

        root.set_text_content("");
        assert!(root.children().is_empty());
    }

    #[test]
    fn test_clone_is_deep() {
        let original = sample();
        let mut copy = original.clone();
        copy.find_mut(|e| e.tag() == "b")
            .expect("b element")
            .set_text_content("changed");

        assert_eq!(original.text_content(), "onetwo three");
        assert_eq!(copy.text_content(), "onetwo changed");
    }
}
