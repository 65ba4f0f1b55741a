//! In-memory element tree shared by the integration tests and benchmarks.

#![allow(dead_code, reason = "Each test binary uses a different subset of the helpers")]

use css_selectors::{Namespace, SelectorModel};

/// Index of an element in a [`Document`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Default)]
struct Node {
    tag: String,
    namespace: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    /// `(namespace, name, value)`
    attributes: Vec<(Option<String>, String, String)>,
    pseudo_classes: Vec<String>,
    parent: Option<NodeId>,
    previous_sibling: Option<NodeId>,
    last_child: Option<NodeId>,
}

/// An arena of elements linked by parent and previous-sibling pointers.
#[derive(Debug, Default)]
pub struct Document {
    nodes: Vec<Node>,
    last_root: Option<NodeId>,
}

fn namespace_matches(constraint: &Namespace, actual: Option<&String>) -> bool {
    match constraint {
        Namespace::Any => true,
        Namespace::None => actual.is_none(),
        Namespace::Named(prefix) => actual == Some(prefix),
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a `tag` element as the last child of `parent`, or as a new root.
    pub fn append(&mut self, parent: Option<NodeId>, tag: &str) -> NodeId {
        let node = NodeId(self.nodes.len());
        let previous_sibling = match parent {
            Some(NodeId(index)) => self
                .nodes
                .get_mut(index)
                .and_then(|owner| owner.last_child.replace(node)),
            None => self.last_root.replace(node),
        };
        self.nodes.push(Node {
            tag: tag.to_owned(),
            parent,
            previous_sibling,
            ..Node::default()
        });
        node
    }

    fn node_mut(&mut self, NodeId(index): NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(index)
    }

    fn node(&self, NodeId(index): NodeId) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn set_namespace(&mut self, node: NodeId, namespace: &str) -> &mut Self {
        if let Some(target) = self.node_mut(node) {
            target.namespace = Some(namespace.to_owned());
        }
        self
    }

    pub fn set_id(&mut self, node: NodeId, id: &str) -> &mut Self {
        if let Some(target) = self.node_mut(node) {
            target.id = Some(id.to_owned());
        }
        self
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) -> &mut Self {
        if let Some(target) = self.node_mut(node) {
            target.classes.push(class.to_owned());
        }
        self
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> &mut Self {
        if let Some(target) = self.node_mut(node) {
            target
                .attributes
                .push((None, name.to_owned(), value.to_owned()));
        }
        self
    }

    pub fn set_attribute_ns(
        &mut self,
        node: NodeId,
        namespace: &str,
        name: &str,
        value: &str,
    ) -> &mut Self {
        if let Some(target) = self.node_mut(node) {
            target.attributes.push((
                Some(namespace.to_owned()),
                name.to_owned(),
                value.to_owned(),
            ));
        }
        self
    }

    pub fn set_pseudo_class(&mut self, node: NodeId, name: &str) -> &mut Self {
        if let Some(target) = self.node_mut(node) {
            target.pseudo_classes.push(name.to_owned());
        }
        self
    }

    /// Local name of `node`, as a selector map lookup key.
    pub fn tag(&self, node: NodeId) -> &str {
        self.node(node).map_or("", |found| found.tag.as_str())
    }

    /// Every element in document order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }
}

impl SelectorModel for Document {
    type Element = NodeId;

    fn has_type(&self, element: NodeId, namespace: &Namespace, name: &str) -> bool {
        self.node(element).is_some_and(|node| {
            node.tag == name && namespace_matches(namespace, node.namespace.as_ref())
        })
    }

    fn has_id(&self, element: NodeId, id: &str) -> bool {
        self.node(element)
            .is_some_and(|node| node.id.as_deref() == Some(id))
    }

    fn has_style_class(&self, element: NodeId, class: &str) -> bool {
        self.node(element)
            .is_some_and(|node| node.classes.iter().any(|own| own == class))
    }

    fn has_pseudo_class(&self, element: NodeId, name: &str) -> bool {
        self.node(element)
            .is_some_and(|node| node.pseudo_classes.iter().any(|own| own == name))
    }

    fn attribute_value(&self, element: NodeId, namespace: &Namespace, name: &str) -> Option<&str> {
        self.node(element)?
            .attributes
            .iter()
            .find(|(own_namespace, own_name, _)| {
                own_name == name && namespace_matches(namespace, own_namespace.as_ref())
            })
            .map(|(_, _, value)| value.as_str())
    }

    fn parent(&self, element: NodeId) -> Option<NodeId> {
        self.node(element)?.parent
    }

    fn previous_sibling(&self, element: NodeId) -> Option<NodeId> {
        self.node(element)?.previous_sibling
    }
}

/// `html > body > div#main.card[data-state="open"]`, plus an `<a>` and an
/// `<a class="external">` inside the div. Returns `(document, div, a, external)`.
pub fn card_page() -> (Document, NodeId, NodeId, NodeId) {
    let mut document = Document::new();
    let html = document.append(None, "html");
    let body = document.append(Some(html), "body");
    let div = document.append(Some(body), "div");
    document
        .set_id(div, "main")
        .add_class(div, "card")
        .set_attribute(div, "data-state", "open");
    let link = document.append(Some(div), "a");
    let external = document.append(Some(div), "a");
    document.add_class(external, "external");
    (document, div, link, external)
}

/// Install the test logger once per binary.
pub fn init_logging() {
    let _already_installed = env_logger::builder().is_test(true).try_init();
}
