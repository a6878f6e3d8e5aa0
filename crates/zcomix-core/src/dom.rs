//! DOM adapter
//!
//! Widgets never touch a document directly; every read and write goes
//! through the [`Dom`] trait. [`Page`] is an in-memory implementation used by
//! the command line driver and the tests.

use std::collections::BTreeMap;

/// Handle to an element of a [`Dom`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Intrinsic size of an image element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

/// CSS `display` states the widgets produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
    /// Stylesheet default
    #[default]
    Default,
    /// `display: none`
    None,
    /// `display: inline-block`
    InlineBlock,
}

/// Element-level access to a document
pub trait Dom {
    /// The node standing in for the window and document
    fn root(&self) -> NodeId;

    /// Current window width in pixels
    fn window_width(&self) -> u32;

    /// First descendant of `scope` (or `scope` itself) with the given id
    fn element_by_id(&self, scope: NodeId, id: &str) -> Option<NodeId>;

    /// Descendants of `scope` carrying `class`, in document order
    fn elements_by_class(&self, scope: NodeId, class: &str) -> Vec<NodeId>;

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    fn children(&self, node: NodeId) -> Vec<NodeId>;

    /// Siblings after `node`, in document order
    fn next_siblings(&self, node: NodeId) -> Vec<NodeId>;

    fn tag(&self, node: NodeId) -> Option<String>;

    fn id(&self, node: NodeId) -> Option<String>;

    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;

    fn has_class(&self, node: NodeId, class: &str) -> bool;

    fn add_class(&mut self, node: NodeId, class: &str);

    fn remove_class(&mut self, node: NodeId, class: &str);

    fn display(&self, node: NodeId) -> Display;

    fn set_display(&mut self, node: NodeId, display: Display);

    fn style(&self, node: NodeId, property: &str) -> Option<String>;

    fn set_style(&mut self, node: NodeId, property: &str, value: &str);

    /// Form control value
    fn value(&self, node: NodeId) -> String;

    fn set_value(&mut self, node: NodeId, value: &str);

    /// Text or markup content
    fn content(&self, node: NodeId) -> String;

    fn set_content(&mut self, node: NodeId, content: &str);

    fn image_size(&self, node: NodeId) -> Option<ImageSize>;

    fn focus(&mut self, node: NodeId);

    fn focused(&self) -> Option<NodeId>;

    /// Whether the node and all its ancestors are displayed
    fn is_visible(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if self.display(n) == Display::None {
                return false;
            }
            current = self.parent(n);
        }
        true
    }

    /// `node` followed by its ancestors up to the root
    fn ancestor_path(&self, node: NodeId) -> Vec<NodeId> {
        let mut path = vec![node];
        let mut current = self.parent(node);
        while let Some(n) = current {
            path.push(n);
            current = self.parent(n);
        }
        path
    }
}

/// Description of an element to append to a [`Page`]
#[derive(Debug, Clone, Default)]
pub struct Element {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    display: Display,
    value: String,
    content: String,
    image: Option<ImageSize>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Self::default()
        }
    }

    pub fn id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.display = Display::None;
        self
    }

    pub fn value(mut self, value: &str) -> Self {
        self.value = value.to_string();
        self
    }

    pub fn content(mut self, content: &str) -> Self {
        self.content = content.to_string();
        self
    }

    /// An `<img>` with the given intrinsic size
    pub fn image(width: u32, height: u32) -> Self {
        Self {
            image: Some(ImageSize { width, height }),
            ..Self::new("img")
        }
    }
}

#[derive(Debug, Clone)]
struct Node {
    element: Element,
    styles: BTreeMap<String, String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// In-memory document tree
#[derive(Debug, Clone)]
pub struct Page {
    nodes: Vec<Node>,
    window_width: u32,
    focused: Option<NodeId>,
}

impl Page {
    /// Create a page whose root node plays the window and document
    pub fn new(window_width: u32) -> Self {
        Self {
            nodes: vec![Node {
                element: Element::new("html"),
                styles: BTreeMap::new(),
                parent: None,
                children: Vec::new(),
            }],
            window_width,
            focused: None,
        }
    }

    /// Append `element` as the last child of `parent`
    pub fn append(&mut self, parent: NodeId, element: Element) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            element,
            styles: BTreeMap::new(),
            parent: Some(parent),
            children: Vec::new(),
        });
        if let Some(node) = self.nodes.get_mut(parent.0) {
            node.children.push(id);
        }
        id
    }

    pub fn set_window_width(&mut self, width: u32) {
        self.window_width = width;
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Depth-first, document-ordered descendants of `scope`
    fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self
            .node(scope)
            .map(|n| n.children.iter().rev().copied().collect())
            .unwrap_or_default();
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(node) = self.node(id) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }
}

impl Dom for Page {
    fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn window_width(&self) -> u32 {
        self.window_width
    }

    fn element_by_id(&self, scope: NodeId, id: &str) -> Option<NodeId> {
        std::iter::once(scope)
            .chain(self.descendants(scope))
            .find(|n| self.node(*n).and_then(|node| node.element.id.as_deref()) == Some(id))
    }

    fn elements_by_class(&self, scope: NodeId, class: &str) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|n| self.has_class(*n, class))
            .collect()
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).and_then(|n| n.parent)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.node(node).map(|n| n.children.clone()).unwrap_or_default()
    }

    fn next_siblings(&self, node: NodeId) -> Vec<NodeId> {
        let Some(parent) = self.parent(node) else {
            return Vec::new();
        };
        let siblings = self.children(parent);
        match siblings.iter().position(|s| *s == node) {
            Some(pos) => siblings[pos + 1..].to_vec(),
            None => Vec::new(),
        }
    }

    fn tag(&self, node: NodeId) -> Option<String> {
        self.node(node).map(|n| n.element.tag.clone())
    }

    fn id(&self, node: NodeId) -> Option<String> {
        self.node(node).and_then(|n| n.element.id.clone())
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.node(node).and_then(|n| n.element.attributes.get(name).cloned())
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.node(node)
            .map(|n| n.element.classes.iter().any(|c| c == class))
            .unwrap_or(false)
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(n) = self.node_mut(node) {
            if !n.element.classes.iter().any(|c| c == class) {
                n.element.classes.push(class.to_string());
            }
        }
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(n) = self.node_mut(node) {
            n.element.classes.retain(|c| c != class);
        }
    }

    fn display(&self, node: NodeId) -> Display {
        self.node(node).map(|n| n.element.display).unwrap_or_default()
    }

    fn set_display(&mut self, node: NodeId, display: Display) {
        if let Some(n) = self.node_mut(node) {
            n.element.display = display;
        }
    }

    fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.node(node).and_then(|n| n.styles.get(property).cloned())
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        if let Some(n) = self.node_mut(node) {
            n.styles.insert(property.to_string(), value.to_string());
        }
    }

    fn value(&self, node: NodeId) -> String {
        self.node(node).map(|n| n.element.value.clone()).unwrap_or_default()
    }

    fn set_value(&mut self, node: NodeId, value: &str) {
        if let Some(n) = self.node_mut(node) {
            n.element.value = value.to_string();
        }
    }

    fn content(&self, node: NodeId) -> String {
        self.node(node).map(|n| n.element.content.clone()).unwrap_or_default()
    }

    fn set_content(&mut self, node: NodeId, content: &str) {
        if let Some(n) = self.node_mut(node) {
            n.element.content = content.to_string();
        }
    }

    fn image_size(&self, node: NodeId) -> Option<ImageSize> {
        self.node(node).and_then(|n| n.element.image)
    }

    fn focus(&mut self, node: NodeId) {
        self.focused = Some(node);
    }

    fn focused(&self) -> Option<NodeId> {
        self.focused
    }
}
