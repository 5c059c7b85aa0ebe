//! Host document abstraction.
//!
//! The notifier only needs a small slice of a DOM: element creation, class
//! lists, inline styles, raw inner markup and tree mutation. [`Document`]
//! captures that slice; [`MemoryDocument`] is a headless implementation that
//! can render itself to HTML.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::{self, Display, Write as _};
use std::rc::Rc;

use crate::error::DomError;

type DomResult<T> = std::result::Result<T, DomError>;

/// Opaque handle to an element of a [`Document`].
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ElementId(u64);

impl ElementId {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

pub trait Document {
    fn create_element(&mut self, tag: &str) -> ElementId;

    /// Adds one class token; adding a token already present is a no-op.
    ///
    /// # Errors
    ///
    /// Fails when `el` is unknown.
    fn add_class(&mut self, el: ElementId, class: &str) -> DomResult<()>;

    /// Sets the class attribute to `class_name` verbatim. The class list
    /// becomes its whitespace-separated tokens.
    ///
    /// # Errors
    ///
    /// Fails when `el` is unknown.
    fn set_class_name(&mut self, el: ElementId, class_name: &str) -> DomResult<()>;

    /// # Errors
    ///
    /// Fails when `el` is unknown.
    fn set_style(&mut self, el: ElementId, property: &str, value: &str) -> DomResult<()>;

    /// Stores `markup` as the element's inner HTML, verbatim.
    ///
    /// # Errors
    ///
    /// Fails when `el` is unknown.
    fn set_inner_html(&mut self, el: ElementId, markup: &str) -> DomResult<()>;

    /// # Errors
    ///
    /// Fails when either element is unknown or `child` already has a parent.
    fn append_child(&mut self, parent: ElementId, child: ElementId) -> DomResult<()>;

    /// # Errors
    ///
    /// Fails when `el` is unknown or already attached.
    fn append_to_body(&mut self, el: ElementId) -> DomResult<()>;

    /// # Errors
    ///
    /// Fails when `child` is not a direct child of `parent`.
    fn remove_child(&mut self, parent: ElementId, child: ElementId) -> DomResult<()>;

    /// Detaches `el` from wherever it is attached. Detached elements are left
    /// alone.
    fn remove(&mut self, el: ElementId);

    /// Forgets a detached element and its whole subtree.
    fn discard(&mut self, el: ElementId);

    fn parent(&self, el: ElementId) -> Option<ElementId>;

    fn previous_sibling(&self, el: ElementId) -> Option<ElementId>;

    fn child_count(&self, el: ElementId) -> usize;

    fn contains(&self, el: ElementId) -> bool;
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Parent {
    Body,
    Element(ElementId),
}

#[derive(Debug)]
struct Node {
    tag: String,
    /// Raw class attribute, as last written.
    class_attr: String,
    classes: Vec<String>,
    style: Vec<(String, String)>,
    inner_html: String,
    children: Vec<ElementId>,
    parent: Option<Parent>,
}

/// In-memory document with a flat element arena.
#[derive(Debug, Default)]
pub struct MemoryDocument {
    next_id: u64,
    nodes: HashMap<ElementId, Node>,
    body: Vec<ElementId>,
}

impl MemoryDocument {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn node(&self, el: ElementId) -> DomResult<&Node> {
        self.nodes.get(&el).ok_or(DomError::UnknownElement(el))
    }

    fn node_mut(&mut self, el: ElementId) -> DomResult<&mut Node> {
        self.nodes.get_mut(&el).ok_or(DomError::UnknownElement(el))
    }

    fn siblings(&self, parent: Parent) -> &[ElementId] {
        match parent {
            Parent::Body => &self.body,
            Parent::Element(id) => self.nodes.get(&id).map_or(&[], |node| &node.children),
        }
    }

    /// Elements attached directly to the body, in insertion order.
    #[must_use]
    pub fn body_children(&self) -> &[ElementId] {
        &self.body
    }

    #[must_use]
    pub fn children(&self, el: ElementId) -> &[ElementId] {
        self.nodes.get(&el).map_or(&[], |node| &node.children)
    }

    #[must_use]
    pub fn tag(&self, el: ElementId) -> Option<&str> {
        self.nodes.get(&el).map(|node| node.tag.as_str())
    }

    #[must_use]
    pub fn classes(&self, el: ElementId) -> &[String] {
        self.nodes.get(&el).map_or(&[], |node| &node.classes)
    }

    #[must_use]
    pub fn class_name(&self, el: ElementId) -> Option<String> {
        self.nodes.get(&el).map(|node| node.class_attr.clone())
    }

    #[must_use]
    pub fn has_class(&self, el: ElementId, class: &str) -> bool {
        self.classes(el).iter().any(|c| c == class)
    }

    #[must_use]
    pub fn style(&self, el: ElementId, property: &str) -> Option<&str> {
        self.nodes.get(&el).and_then(|node| {
            node.style
                .iter()
                .find(|(name, _)| name == property)
                .map(|(_, value)| value.as_str())
        })
    }

    #[must_use]
    pub fn inner_html(&self, el: ElementId) -> Option<&str> {
        self.nodes.get(&el).map(|node| node.inner_html.as_str())
    }

    /// Whether `el` is reachable from the body.
    #[must_use]
    pub fn is_connected(&self, el: ElementId) -> bool {
        let mut current = el;
        loop {
            match self.nodes.get(&current).and_then(|node| node.parent) {
                Some(Parent::Body) => return true,
                Some(Parent::Element(parent)) => current = parent,
                None => return false,
            }
        }
    }

    /// Connected elements carrying `class`, in document order.
    #[must_use]
    pub fn find_by_class(&self, class: &str) -> Vec<ElementId> {
        let mut found = Vec::new();
        let mut stack: Vec<ElementId> = self.body.iter().rev().copied().collect();
        while let Some(el) = stack.pop() {
            if self.has_class(el, class) {
                found.push(el);
            }
            stack.extend(self.children(el).iter().rev().copied());
        }
        found
    }

    /// Number of elements still held by the arena, attached or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Renders the body as single-line HTML.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for el in &self.body {
            self.render(*el, &mut out);
        }
        out
    }

    fn render(&self, el: ElementId, out: &mut String) {
        let Some(node) = self.nodes.get(&el) else {
            return;
        };
        let _ = write!(out, "<{}", node.tag);
        if !node.class_attr.is_empty() {
            let _ = write!(out, " class=\"{}\"", node.class_attr);
        }
        if !node.style.is_empty() {
            let style = node
                .style
                .iter()
                .map(|(name, value)| format!("{name}: {value}"))
                .collect::<Vec<_>>()
                .join("; ");
            let _ = write!(out, " style=\"{style}\"");
        }
        out.push('>');
        out.push_str(&node.inner_html);
        for child in &node.children {
            self.render(*child, out);
        }
        let _ = write!(out, "</{}>", node.tag);
    }
}

impl Document for MemoryDocument {
    fn create_element(&mut self, tag: &str) -> ElementId {
        self.next_id += 1;
        let id = ElementId(self.next_id);
        self.nodes.insert(
            id,
            Node {
                tag: tag.to_ascii_lowercase(),
                class_attr: String::new(),
                classes: Vec::new(),
                style: Vec::new(),
                inner_html: String::new(),
                children: Vec::new(),
                parent: None,
            },
        );
        id
    }

    fn add_class(&mut self, el: ElementId, class: &str) -> DomResult<()> {
        let node = self.node_mut(el)?;
        if !class.is_empty() && !node.classes.iter().any(|c| c == class) {
            node.classes.push(class.to_string());
            node.class_attr = node.classes.join(" ");
        }
        Ok(())
    }

    fn set_class_name(&mut self, el: ElementId, class_name: &str) -> DomResult<()> {
        let node = self.node_mut(el)?;
        node.class_attr = class_name.to_string();
        node.classes.clear();
        for token in class_name.split_whitespace() {
            if !node.classes.iter().any(|c| c == token) {
                node.classes.push(token.to_string());
            }
        }
        Ok(())
    }

    fn set_style(&mut self, el: ElementId, property: &str, value: &str) -> DomResult<()> {
        let node = self.node_mut(el)?;
        match node.style.iter_mut().find(|(name, _)| name == property) {
            Some(entry) => entry.1 = value.to_string(),
            None => node.style.push((property.to_string(), value.to_string())),
        }
        Ok(())
    }

    fn set_inner_html(&mut self, el: ElementId, markup: &str) -> DomResult<()> {
        self.node_mut(el)?.inner_html = markup.to_string();
        Ok(())
    }

    fn append_child(&mut self, parent: ElementId, child: ElementId) -> DomResult<()> {
        self.node(parent)?;
        let node = self.node_mut(child)?;
        if node.parent.is_some() {
            return Err(DomError::AlreadyAttached(child));
        }
        node.parent = Some(Parent::Element(parent));
        self.node_mut(parent)?.children.push(child);
        Ok(())
    }

    fn append_to_body(&mut self, el: ElementId) -> DomResult<()> {
        let node = self.node_mut(el)?;
        if node.parent.is_some() {
            return Err(DomError::AlreadyAttached(el));
        }
        node.parent = Some(Parent::Body);
        self.body.push(el);
        Ok(())
    }

    fn remove_child(&mut self, parent: ElementId, child: ElementId) -> DomResult<()> {
        if self.node(child)?.parent != Some(Parent::Element(parent)) {
            return Err(DomError::NotAChild { parent, child });
        }
        self.node_mut(parent)?.children.retain(|c| *c != child);
        self.node_mut(child)?.parent = None;
        Ok(())
    }

    fn remove(&mut self, el: ElementId) {
        let Some(parent) = self.nodes.get_mut(&el).and_then(|node| node.parent.take()) else {
            return;
        };
        match parent {
            Parent::Body => self.body.retain(|c| *c != el),
            Parent::Element(id) => {
                if let Some(node) = self.nodes.get_mut(&id) {
                    node.children.retain(|c| *c != el);
                }
            }
        }
    }

    fn discard(&mut self, el: ElementId) {
        if self.nodes.get(&el).is_some_and(|node| node.parent.is_some()) {
            return;
        }
        let mut stack = vec![el];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.nodes.remove(&id) {
                stack.extend(node.children);
            }
        }
    }

    fn parent(&self, el: ElementId) -> Option<ElementId> {
        match self.nodes.get(&el)?.parent? {
            Parent::Element(id) => Some(id),
            Parent::Body => None,
        }
    }

    fn previous_sibling(&self, el: ElementId) -> Option<ElementId> {
        let parent = self.nodes.get(&el)?.parent?;
        let siblings = self.siblings(parent);
        let index = siblings.iter().position(|c| *c == el)?;
        index.checked_sub(1).map(|i| siblings[i])
    }

    fn child_count(&self, el: ElementId) -> usize {
        self.children(el).len()
    }

    fn contains(&self, el: ElementId) -> bool {
        self.nodes.contains_key(&el)
    }
}

/// A document shared between several notifiers on one thread.
impl<D: Document> Document for Rc<RefCell<D>> {
    fn create_element(&mut self, tag: &str) -> ElementId {
        self.borrow_mut().create_element(tag)
    }

    fn add_class(&mut self, el: ElementId, class: &str) -> DomResult<()> {
        self.borrow_mut().add_class(el, class)
    }

    fn set_class_name(&mut self, el: ElementId, class_name: &str) -> DomResult<()> {
        self.borrow_mut().set_class_name(el, class_name)
    }

    fn set_style(&mut self, el: ElementId, property: &str, value: &str) -> DomResult<()> {
        self.borrow_mut().set_style(el, property, value)
    }

    fn set_inner_html(&mut self, el: ElementId, markup: &str) -> DomResult<()> {
        self.borrow_mut().set_inner_html(el, markup)
    }

    fn append_child(&mut self, parent: ElementId, child: ElementId) -> DomResult<()> {
        self.borrow_mut().append_child(parent, child)
    }

    fn append_to_body(&mut self, el: ElementId) -> DomResult<()> {
        self.borrow_mut().append_to_body(el)
    }

    fn remove_child(&mut self, parent: ElementId, child: ElementId) -> DomResult<()> {
        self.borrow_mut().remove_child(parent, child)
    }

    fn remove(&mut self, el: ElementId) {
        self.borrow_mut().remove(el);
    }

    fn discard(&mut self, el: ElementId) {
        self.borrow_mut().discard(el);
    }

    fn parent(&self, el: ElementId) -> Option<ElementId> {
        self.borrow().parent(el)
    }

    fn previous_sibling(&self, el: ElementId) -> Option<ElementId> {
        self.borrow().previous_sibling(el)
    }

    fn child_count(&self, el: ElementId) -> usize {
        self.borrow().child_count(el)
    }

    fn contains(&self, el: ElementId) -> bool {
        self.borrow().contains(el)
    }
}

#[cfg(test)]
mod tests {
    use super::{Document, MemoryDocument};
    use crate::error::DomError;

    #[test]
    fn renders_nested_markup_on_one_line() {
        let mut doc = MemoryDocument::new();
        let outer = doc.create_element("DIV");
        let inner = doc.create_element("span");
        doc.add_class(outer, "a").unwrap();
        doc.add_class(outer, "b").unwrap();
        doc.set_style(outer, "opacity", "0").unwrap();
        doc.set_inner_html(inner, "<b>hi</b>").unwrap();
        doc.append_child(outer, inner).unwrap();
        doc.append_to_body(outer).unwrap();

        assert_eq!(
            doc.to_html(),
            r#"<div class="a b" style="opacity: 0"><span><b>hi</b></span></div>"#
        );
    }

    #[test]
    fn set_style_overwrites_existing_property() {
        let mut doc = MemoryDocument::new();
        let el = doc.create_element("div");
        doc.set_style(el, "opacity", "1").unwrap();
        doc.set_style(el, "cursor", "pointer").unwrap();
        doc.set_style(el, "opacity", "0").unwrap();

        assert_eq!(doc.style(el, "opacity"), Some("0"));
        assert_eq!(doc.style(el, "cursor"), Some("pointer"));
    }

    #[test]
    fn set_class_name_replaces_the_list() {
        let mut doc = MemoryDocument::new();
        let el = doc.create_element("i");
        doc.add_class(el, "old").unwrap();
        doc.set_class_name(el, "  fa-solid   fa-bell ").unwrap();

        assert_eq!(doc.classes(el), &["fa-solid", "fa-bell"]);
        assert!(!doc.has_class(el, "old"));
    }

    #[test]
    fn set_class_name_keeps_the_attribute_verbatim() {
        let mut doc = MemoryDocument::new();
        let el = doc.create_element("i");
        doc.set_class_name(el, "fa-solid  fa-bell fa-bell").unwrap();
        doc.append_to_body(el).unwrap();

        assert_eq!(
            doc.class_name(el).as_deref(),
            Some("fa-solid  fa-bell fa-bell")
        );
        assert_eq!(doc.classes(el), &["fa-solid", "fa-bell"]);
        assert_eq!(doc.to_html(), r#"<i class="fa-solid  fa-bell fa-bell"></i>"#);
    }

    #[test]
    fn previous_sibling_follows_insertion_order() {
        let mut doc = MemoryDocument::new();
        let parent = doc.create_element("div");
        let first = doc.create_element("span");
        let second = doc.create_element("span");
        doc.append_child(parent, first).unwrap();
        doc.append_child(parent, second).unwrap();

        assert_eq!(doc.previous_sibling(second), Some(first));
        assert_eq!(doc.previous_sibling(first), None);
    }

    #[test]
    fn append_rejects_attached_child() {
        let mut doc = MemoryDocument::new();
        let a = doc.create_element("div");
        let b = doc.create_element("div");
        let child = doc.create_element("span");
        doc.append_child(a, child).unwrap();

        assert_eq!(
            doc.append_child(b, child),
            Err(DomError::AlreadyAttached(child))
        );
    }

    #[test]
    fn remove_child_checks_parentage() {
        let mut doc = MemoryDocument::new();
        let a = doc.create_element("div");
        let b = doc.create_element("div");
        let child = doc.create_element("span");
        doc.append_child(a, child).unwrap();

        assert_eq!(
            doc.remove_child(b, child),
            Err(DomError::NotAChild { parent: b, child })
        );
        assert!(doc.remove_child(a, child).is_ok());
        assert_eq!(doc.child_count(a), 0);
    }

    #[test]
    fn discard_drops_detached_subtree_only() {
        let mut doc = MemoryDocument::new();
        let root = doc.create_element("div");
        let leaf = doc.create_element("span");
        doc.append_child(root, leaf).unwrap();
        doc.append_to_body(root).unwrap();

        doc.discard(root);
        assert!(doc.contains(root), "attached elements survive discard");

        doc.remove(root);
        doc.discard(root);
        assert!(!doc.contains(root));
        assert!(!doc.contains(leaf));
        assert!(doc.is_empty());
    }

    #[test]
    fn find_by_class_skips_detached_elements() {
        let mut doc = MemoryDocument::new();
        let attached = doc.create_element("div");
        let detached = doc.create_element("div");
        doc.add_class(attached, "toast").unwrap();
        doc.add_class(detached, "toast").unwrap();
        doc.append_to_body(attached).unwrap();

        assert_eq!(doc.find_by_class("toast"), vec![attached]);
        assert!(doc.is_connected(attached));
        assert!(!doc.is_connected(detached));
    }
}
