//! DOM-style boundary points and ranges, plus text edits at a caret.
//!
//! A [`BoundaryPoint`] is a child-index path from a container element (the
//! block's editable surface) to a node, and an offset in that node. For text
//! nodes the offset counts chars; for elements it is a child index, exactly
//! like a DOM `Range` boundary.

use super::{Element, Node};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BoundaryPoint {
    pub path: Vec<usize>,
    pub offset: usize,
}

impl BoundaryPoint {
    pub fn new(path: Vec<usize>, offset: usize) -> Self {
        Self { path, offset }
    }
}

/// Selection range relative to a container element
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Range {
    pub start: BoundaryPoint,
    pub end: BoundaryPoint,
}

impl Range {
    pub fn new(start: BoundaryPoint, end: BoundaryPoint) -> Self {
        Self { start, end }
    }

    pub fn collapsed(point: BoundaryPoint) -> Self {
        Self {
            start: point.clone(),
            end: point,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    pub fn collapse_to(&mut self, point: BoundaryPoint) {
        self.start = point.clone();
        self.end = point;
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn byte_index(text: &str, char_offset: usize) -> Option<usize> {
    if char_offset == char_len(text) {
        return Some(text.len());
    }
    text.char_indices().nth(char_offset).map(|(index, _)| index)
}

impl Element {
    /// Insert `text` at `at`, returning the point immediately after it.
    ///
    /// Inside a text node the characters are spliced in; at an element
    /// boundary a new text node is inserted at that child index. Returns
    /// `None` when `at` does not resolve inside `self`.
    pub fn insert_text(&mut self, at: &BoundaryPoint, text: &str) -> Option<BoundaryPoint> {
        let inserted = char_len(text);
        if at.path.is_empty() {
            return self.insert_text_node(&[], at.offset, text, inserted);
        }
        if let Node::Element(_) = self.node_at_path(&at.path)? {
            return self.insert_text_node(&at.path, at.offset, text, inserted);
        }
        let Node::Text(existing) = self.node_at_path_mut(&at.path)? else {
            return None;
        };
        let index = byte_index(existing, at.offset)?;
        existing.insert_str(index, text);
        Some(BoundaryPoint::new(at.path.clone(), at.offset + inserted))
    }

    fn insert_text_node(
        &mut self,
        parent: &[usize],
        index: usize,
        text: &str,
        inserted: usize,
    ) -> Option<BoundaryPoint> {
        let element = self.element_at_path_mut(parent)?;
        if index > element.children().len() {
            return None;
        }
        element.children_mut().insert(index, Node::text(text));
        let mut path = parent.to_vec();
        path.push(index);
        Some(BoundaryPoint::new(path, inserted))
    }

    /// Delete the character before `at` inside a text node
    pub fn delete_backward(&mut self, at: &BoundaryPoint) -> Option<BoundaryPoint> {
        if at.offset == 0 {
            return None;
        }
        let Node::Text(existing) = self.node_at_path_mut(&at.path)? else {
            return None;
        };
        let start = byte_index(existing, at.offset - 1)?;
        let end = byte_index(existing, at.offset)?;
        existing.replace_range(start..end, "");
        Some(BoundaryPoint::new(at.path.clone(), at.offset - 1))
    }

    /// Paths and char lengths of every descendant text node, in document order
    pub fn text_runs(&self) -> Vec<(Vec<usize>, usize)> {
        let mut runs = Vec::new();
        self.collect_runs(&mut Vec::new(), &mut runs);
        runs
    }

    fn collect_runs(&self, prefix: &mut Vec<usize>, runs: &mut Vec<(Vec<usize>, usize)>) {
        for (index, child) in self.children().iter().enumerate() {
            prefix.push(index);
            match child {
                Node::Text(text) => runs.push((prefix.clone(), char_len(text))),
                Node::Element(element) => element.collect_runs(prefix, runs),
                Node::Comment(_) => {}
            }
            prefix.pop();
        }
    }

    /// Map a char offset into `text_content()` to a boundary point.
    ///
    /// Offsets on a node boundary resolve to the end of the earlier text run.
    /// With no text at all, offset zero maps to the start of `self`.
    pub fn point_at_char_offset(&self, offset: usize) -> Option<BoundaryPoint> {
        let mut consumed = 0;
        for (path, len) in self.text_runs() {
            if offset <= consumed + len {
                return Some(BoundaryPoint::new(path, offset - consumed));
            }
            consumed += len;
        }
        (offset == 0).then(BoundaryPoint::default)
    }

    /// Char offset into `text_content()` of a boundary point
    pub fn char_offset_of(&self, point: &BoundaryPoint) -> Option<usize> {
        match self.node_at_path(&point.path) {
            Some(Node::Text(text)) => {
                if point.offset > char_len(text) {
                    return None;
                }
                let before: usize = self
                    .text_runs()
                    .into_iter()
                    .take_while(|(path, _)| *path != point.path)
                    .map(|(_, len)| len)
                    .sum();
                Some(before + point.offset)
            }
            Some(Node::Comment(_)) => None,
            Some(Node::Element(_)) | None => {
                let element = self.element_at_path(&point.path)?;
                if point.offset > element.children().len() {
                    return None;
                }
                let mut limit = point.path.clone();
                limit.push(point.offset);
                Some(
                    self.text_runs()
                        .into_iter()
                        .filter(|(path, _)| *path < limit)
                        .map(|(_, len)| len)
                        .sum(),
                )
            }
        }
    }
}
