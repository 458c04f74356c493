//! HTML fragment parsing and serialization for the DOM model.
//!
//! Parsing is forgiving the way `innerHTML` assignment is: stray end tags are
//! dropped, unclosed elements are closed at the end of the fragment, a `/>`
//! on a non-void tag is ignored, the first of duplicate attributes wins and
//! character references are decoded. Comments are kept as comment nodes.
//! Raw text elements (`script`, `style` and friends) take everything up to
//! their end tag as one undecoded text node; `textarea` and `title` do the
//! same but decode character references.
//!
//! Serialization follows the fragment serialization rules, so text escapes
//! `&`, `<`, `>` and writes U+00A0 as `&nbsp;`, except inside raw text
//! elements where text is written as is.

use std::sync::LazyLock;

use regex::Regex;

use super::{Element, Node};

/// Elements that never have children or an end tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Content is literal text up to the end tag, serialized unescaped
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "xmp", "iframe", "noembed", "noframes"];

/// Content is text up to the end tag, with character references decoded
const ESCAPABLE_RAW_TEXT_ELEMENTS: &[&str] = &["textarea", "title"];

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)<!--(?P<comment>.*?)-->|<(?P<end>/)?(?P<name>[A-Za-z][A-Za-z0-9-]*)(?P<attrs>(?:\s+[^\s/>="']+(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s"'>]+))?)*)\s*/?>"#,
    )
    .expect("tag pattern is valid")
});

static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([^\s/>="']+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+)))?"#)
        .expect("attribute pattern is valid")
});

pub fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

pub fn is_raw_text(tag: &str) -> bool {
    RAW_TEXT_ELEMENTS.contains(&tag)
}

fn is_escapable_raw_text(tag: &str) -> bool {
    ESCAPABLE_RAW_TEXT_ELEMENTS.contains(&tag)
}

/// Parse an HTML fragment into a list of sibling nodes
pub fn parse_fragment(markup: &str) -> Vec<Node> {
    let mut roots = Vec::new();
    let mut open: Vec<Element> = Vec::new();
    let mut cursor = 0;

    while let Some(captures) = TAG_RE.captures_at(markup, cursor) {
        let Some(whole) = captures.get(0) else {
            break;
        };
        push_text(&mut open, &mut roots, &markup[cursor..whole.start()]);
        cursor = whole.end();

        if let Some(comment) = captures.name("comment") {
            push_node(&mut open, &mut roots, Node::Comment(comment.as_str().to_string()));
            continue;
        }
        let Some(name) = captures.name("name") else {
            continue;
        };
        let tag = name.as_str().to_ascii_lowercase();

        if captures.name("end").is_some() {
            close_element(&mut open, &mut roots, &tag);
            continue;
        }

        let mut element = Element::new(&tag);
        if let Some(attrs) = captures.name("attrs") {
            for attr in ATTR_RE.captures_iter(attrs.as_str()) {
                let name = attr[1].to_ascii_lowercase();
                if element.attribute(&name).is_some() {
                    continue;
                }
                let value = attr
                    .get(2)
                    .or_else(|| attr.get(3))
                    .or_else(|| attr.get(4))
                    .map(|m| html_escape::decode_html_entities(m.as_str()).into_owned())
                    .unwrap_or_default();
                element.set_attribute(&name, value);
            }
        }

        if is_void(&tag) {
            push_node(&mut open, &mut roots, element.into());
        } else if is_raw_text(&tag) || is_escapable_raw_text(&tag) {
            let (content, resume) = match find_end_tag(markup, cursor, &tag) {
                Some((start, end)) => (&markup[cursor..start], end),
                None => (&markup[cursor..], markup.len()),
            };
            if !content.is_empty() {
                let text = if is_raw_text(&tag) {
                    content.to_string()
                } else {
                    html_escape::decode_html_entities(content).into_owned()
                };
                element.append_child(Node::Text(text));
            }
            cursor = resume;
            push_node(&mut open, &mut roots, element.into());
        } else {
            open.push(element);
        }
    }

    push_text(&mut open, &mut roots, &markup[cursor..]);
    while let Some(element) = open.pop() {
        push_node(&mut open, &mut roots, element.into());
    }
    roots
}

/// Byte span of the first `</tag` end tag at or after `from`, matched
/// case-insensitively and running through its closing `>`
fn find_end_tag(markup: &str, from: usize, tag: &str) -> Option<(usize, usize)> {
    let haystack = markup[from..].to_ascii_lowercase();
    let needle = format!("</{tag}");
    let mut search = 0;
    while let Some(found) = haystack[search..].find(&needle) {
        let start = search + found;
        let after = start + needle.len();
        if haystack[after..].starts_with(|c: char| c == '>' || c == '/' || c.is_ascii_whitespace())
        {
            let end = haystack[after..]
                .find('>')
                .map_or(haystack.len(), |index| after + index + 1);
            return Some((from + start, from + end));
        }
        search = after;
    }
    None
}

fn push_node(open: &mut [Element], roots: &mut Vec<Node>, node: Node) {
    match open.last_mut() {
        Some(parent) => parent.append_child(node),
        None => roots.push(node),
    }
}

fn push_text(open: &mut [Element], roots: &mut Vec<Node>, raw: &str) {
    if raw.is_empty() {
        return;
    }
    let text = html_escape::decode_html_entities(raw).into_owned();
    push_node(open, roots, Node::Text(text));
}

fn close_element(open: &mut Vec<Element>, roots: &mut Vec<Node>, tag: &str) {
    if !open.iter().any(|element| element.tag() == tag) {
        return;
    }
    while let Some(element) = open.pop() {
        let done = element.tag() == tag;
        push_node(open, roots, element.into());
        if done {
            break;
        }
    }
}

pub fn serialize_children(children: &[Node]) -> String {
    let mut out = String::new();
    for child in children {
        write_node(child, &mut out);
    }
    out
}

pub fn serialize_element(element: &Element) -> String {
    let mut out = String::new();
    write_element(element, &mut out);
    out
}

fn write_node(node: &Node, out: &mut String) {
    match node {
        Node::Text(text) => write_text(text, out),
        Node::Element(element) => write_element(element, out),
        Node::Comment(comment) => {
            out.push_str("<!--");
            out.push_str(comment);
            out.push_str("-->");
        }
    }
}

fn write_element(element: &Element, out: &mut String) {
    out.push('<');
    out.push_str(element.tag());
    for (name, value) in element.attributes() {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&html_escape::encode_double_quoted_attribute(value).replace('\u{a0}', "&nbsp;"));
        out.push('"');
    }
    out.push('>');
    if is_void(element.tag()) {
        return;
    }
    let raw = is_raw_text(element.tag());
    for child in element.children() {
        match child {
            Node::Text(text) if raw => out.push_str(text),
            _ => write_node(child, out),
        }
    }
    out.push_str("</");
    out.push_str(element.tag());
    out.push('>');
}

fn write_text(text: &str, out: &mut String) {
    out.push_str(&html_escape::encode_text(text).replace('\u{a0}', "&nbsp;"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("plain text")]
    #[case("")]
    #[case("<b>bold</b> and <i>italic</i>")]
    #[case("line one<br>line two")]
    #[case(r#"<a href="https://example.com/?a=1&amp;b=2">link</a>"#)]
    #[case("a &amp; b &lt; c")]
    #[case("tab&nbsp;&nbsp;&nbsp;&nbsp;stop")]
    #[case("<span class=\"x y\"><em>nested</em> text</span>")]
    #[case("a<!-- keep -->b")]
    #[case("<b><!---->x</b>")]
    #[case("<style>a>b{}</style>")]
    #[case("<script>if (a < b && c) { x = '<b>'; }</script>")]
    fn test_canonical_markup_survives_parse_and_serialize(#[case] markup: &str) {
        assert_eq!(serialize_children(&parse_fragment(markup)), markup);
    }

    #[test]
    fn test_entities_decode_into_text_nodes() {
        let nodes = parse_fragment("a&nbsp;&amp;&lt;b");
        assert_eq!(nodes, vec![Node::text("a\u{a0}&<b")]);
    }

    #[test]
    fn test_unclosed_elements_close_at_end() {
        let nodes = parse_fragment("<b>bold <i>both");
        assert_eq!(serialize_children(&nodes), "<b>bold <i>both</i></b>");
    }

    #[test]
    fn test_stray_end_tags_are_dropped() {
        let nodes = parse_fragment("one</div>two");
        assert_eq!(serialize_children(&nodes), "onetwo");
    }

    #[test]
    fn test_end_tag_closes_intermediate_elements() {
        let nodes = parse_fragment("<b><i>x</b>y");
        assert_eq!(serialize_children(&nodes), "<b><i>x</i></b>y");
    }

    #[test]
    fn test_comments_become_comment_nodes() {
        let nodes = parse_fragment("a<!-- <b>not markup</b> -->b");
        assert_eq!(
            nodes,
            vec![
                Node::text("a"),
                Node::Comment(" <b>not markup</b> ".to_string()),
                Node::text("b"),
            ]
        );
    }

    #[test]
    fn test_raw_text_content_is_not_parsed() {
        let nodes = parse_fragment("<style>p > <b>{}</style>x");
        let style = nodes[0].as_element().expect("style element");

        assert_eq!(style.children(), &[Node::text("p > <b>{}")]);
        assert_eq!(nodes[1], Node::text("x"));
    }

    #[test]
    fn test_raw_text_end_tag_is_case_insensitive() {
        let nodes = parse_fragment("<script>a</scripts></SCRIPT >b");
        assert_eq!(serialize_children(&nodes), "<script>a</scripts></script>b");
    }

    #[test]
    fn test_unterminated_raw_text_runs_to_the_end() {
        let nodes = parse_fragment("<style>a<b");
        assert_eq!(serialize_children(&nodes), "<style>a<b</style>");
    }

    #[test]
    fn test_escapable_raw_text_decodes_references() {
        let nodes = parse_fragment("<textarea><b>&amp;</b></textarea>");
        let textarea = nodes[0].as_element().expect("textarea element");

        assert_eq!(textarea.children(), &[Node::text("<b>&</b>")]);
        assert_eq!(
            serialize_children(&nodes),
            "<textarea>&lt;b&gt;&amp;&lt;/b&gt;</textarea>"
        );
    }

    #[test]
    fn test_self_closing_slash_is_ignored_on_non_void_tags() {
        let nodes = parse_fragment("<span/>x");
        assert_eq!(serialize_children(&nodes), "<span>x</span>");
    }

    #[test]
    fn test_first_duplicate_attribute_wins() {
        let nodes = parse_fragment(r#"<b class="a" CLASS="b" title=t title=u>x</b>"#);
        let bold = nodes[0].as_element().expect("b element");

        let attributes: Vec<_> = bold.attributes().collect();
        assert_eq!(attributes, vec![("class", "a"), ("title", "t")]);
    }

    #[test]
    fn test_bare_angle_bracket_is_text() {
        let nodes = parse_fragment("1 < 2");
        assert_eq!(nodes, vec![Node::text("1 < 2")]);
        assert_eq!(serialize_children(&nodes), "1 &lt; 2");
    }

    #[test]
    fn test_attribute_forms() {
        let nodes = parse_fragment(r#"<input type=checkbox checked data-x='1'/>"#);
        let input = nodes[0].as_element().expect("input element");

        assert_eq!(input.attribute("type"), Some("checkbox"));
        assert_eq!(input.attribute("checked"), Some(""));
        assert_eq!(input.data("x"), Some("1"));
        assert!(input.children().is_empty());
    }

    #[test]
    fn test_uppercase_tags_are_normalised() {
        let nodes = parse_fragment("<PRE>code</PRE>");
        assert_eq!(serialize_children(&nodes), "<pre>code</pre>");
    }
}
