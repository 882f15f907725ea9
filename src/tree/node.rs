use core::any::TypeId;
use core::fmt;
use core::fmt::Write as _;

use crate::context::Context;
use crate::directive::Directive;
use crate::shape::{Expansion, FieldShape, NewValueFn, Shape};

pub(crate) type NodeId = usize;

// -----------------------------------------------------------------------------
// Node storage

/// How child values are assembled into this node's output value.
#[derive(Clone, Copy)]
pub(crate) enum Assembly {
    /// Opaque leaf, no children.
    Leaf,
    /// The node's type is directly the record; children write straight
    /// into the output value. Always the case for the root.
    Direct(&'static Shape),
    /// The record sits behind one level of indirection; children assemble
    /// into a separate inner value which is then attached.
    Indirect(Expansion),
}

pub(crate) struct NodeData {
    pub(crate) type_name: &'static str,
    pub(crate) ty_id: TypeId,
    /// `None` for the root sentinel.
    pub(crate) field: Option<&'static FieldShape>,
    pub(crate) assembly: Assembly,
    pub(crate) new_value: NewValueFn,
    pub(crate) path: Vec<&'static str>,
    pub(crate) directives: Vec<Directive>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) context: Context,
}

impl NodeData {
    /// Clones the node for a fresh tree instance, discarding its context.
    fn bare_clone(&self) -> Self {
        Self {
            type_name: self.type_name,
            ty_id: self.ty_id,
            field: self.field,
            assembly: self.assembly,
            new_value: self.new_value,
            path: self.path.clone(),
            directives: self.directives.clone(),
            parent: self.parent,
            children: self.children.clone(),
            context: Context::new(),
        }
    }
}

/// The node arena. Parent/child links are arena indices, so deep-copying
/// the tree is a plain element-wise clone with no link rebinding.
///
/// Invariant: nodes are stored in depth-first pre-order; index 0 is the
/// root.
pub(crate) struct Tree {
    pub(crate) nodes: Vec<NodeData>,
}

impl Tree {
    pub(crate) fn root(&self) -> Node<'_> {
        Node { tree: self, id: 0 }
    }

    /// A structurally identical tree with every context reset to empty.
    /// The clone shares no mutable state with `self`.
    pub(crate) fn bare_clone(&self) -> Self {
        Self {
            nodes: self.nodes.iter().map(NodeData::bare_clone).collect(),
        }
    }
}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("root", &self.root().type_name())
            .field("nodes", &self.nodes.len())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Node handle

/// A borrowed view of one resolver-tree node.
///
/// The root node represents the record itself; every other node represents
/// one visible field. Handles are cheap copies; all navigation goes through
/// them.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use rigging::derive::Record;
/// use rigging::{Namespace, Resolver, with_namespace};
///
/// #[derive(Record)]
/// struct Pagination {
///     page: u32,
///     size: u32,
/// }
///
/// #[derive(Record)]
/// struct Query {
///     keyword: String,
///     pagination: Pagination,
/// }
///
/// let ns = Arc::new(Namespace::new());
/// let resolver = Resolver::new::<Query>([with_namespace(ns)])?;
///
/// let root = resolver.root();
/// assert!(root.is_root());
/// assert_eq!(root.child_len(), 2);
///
/// let page = root.lookup("pagination.page").unwrap();
/// assert_eq!(page.path_string(), "pagination.page");
/// assert!(page.is_leaf());
/// assert_eq!(page.index(), Some(0));
/// # Ok::<(), rigging::NewError>(())
/// ```
#[derive(Clone, Copy)]
pub struct Node<'a> {
    tree: &'a Tree,
    id: NodeId,
}

impl<'a> Node<'a> {
    pub(crate) fn data(&self) -> &'a NodeData {
        &self.tree.nodes[self.id]
    }

    /// `true` for the sentinel node representing the record itself.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.data().parent.is_none()
    }

    /// `true` when the node has no children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.data().children.is_empty()
    }

    /// The full type name of the node's value.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.data().type_name
    }

    /// The `TypeId` of the node's value type.
    #[inline]
    pub fn ty_id(&self) -> TypeId {
        self.data().ty_id
    }

    /// The field descriptor, or `None` for the root.
    #[inline]
    pub fn field(&self) -> Option<&'static FieldShape> {
        self.data().field
    }

    /// The field name, or `None` for the root.
    #[inline]
    pub fn field_name(&self) -> Option<&'static str> {
        self.data().field.map(FieldShape::name)
    }

    /// The field's ordinal position in its declaring record, or `None`
    /// for the root.
    #[inline]
    pub fn index(&self) -> Option<usize> {
        self.data().field.map(FieldShape::index)
    }

    /// The field-name path from the root. Empty for the root;
    /// `path().len()` equals the node's depth.
    #[inline]
    pub fn path(&self) -> &'a [&'static str] {
        &self.data().path
    }

    /// The dot-joined path, e.g. `pagination.page`. Empty for the root.
    pub fn path_string(&self) -> String {
        self.path().join(".")
    }

    /// The node's directives, in declaration order.
    #[inline]
    pub fn directives(&self) -> &'a [Directive] {
        &self.data().directives
    }

    /// The first directive named `name`, if present.
    pub fn directive(&self, name: &str) -> Option<&'a Directive> {
        self.directives().iter().find(|d| d.name == name)
    }

    /// The node's context (build-option state, bound namespace).
    #[inline]
    pub fn context(&self) -> &'a Context {
        &self.data().context
    }

    /// The parent node; `None` for the root.
    pub fn parent(&self) -> Option<Node<'a>> {
        self.data().parent.map(|id| Node {
            tree: self.tree,
            id,
        })
    }

    /// The children, in field declaration order.
    pub fn children(&self) -> impl ExactSizeIterator<Item = Node<'a>> + use<'a> {
        let tree = self.tree;
        self.data().children.iter().map(move |&id| Node { tree, id })
    }

    /// The number of children.
    #[inline]
    pub fn child_len(&self) -> usize {
        self.data().children.len()
    }

    /// The `position`-th child, if present.
    pub fn child_at(&self, position: usize) -> Option<Node<'a>> {
        self.data().children.get(position).map(|&id| Node {
            tree: self.tree,
            id,
        })
    }

    /// Descends by matching each `.`-separated segment of `path` against a
    /// child's field name. Returns `None` as soon as a segment fails to
    /// match; never a partial result.
    pub fn lookup(&self, path: &str) -> Option<Node<'a>> {
        let mut current = *self;
        for segment in path.split('.') {
            current = current
                .children()
                .find(|child| child.field_name() == Some(segment))?;
        }
        Some(current)
    }

    /// Descends by numeric child position instead of field name.
    /// An empty path yields the node itself.
    pub fn lookup_by_index(&self, path: &[usize]) -> Option<Node<'a>> {
        let mut current = *self;
        for &position in path {
            current = current.child_at(position)?;
        }
        Some(current)
    }

    /// Depth-first pre-order traversal of this subtree. The first error
    /// returned by `visitor` stops the walk and is propagated.
    pub fn iterate<E, F>(&self, visitor: &mut F) -> Result<(), E>
    where
        F: FnMut(Node<'a>) -> Result<(), E>,
    {
        visitor(*self)?;
        for child in self.children() {
            child.iterate(visitor)?;
        }
        Ok(())
    }

    /// An indented multi-line rendering of the subtree for diagnostics.
    ///
    /// One line per node: `path (type)  index`, children prefixed by their
    /// ordinal (`0# `, `1# `, ...) and indented four spaces per level. The
    /// root line is the record type name alone. The format is stable for
    /// tooling and tests.
    pub fn debug_layout_text(&self) -> String {
        self.layout(0)
    }

    fn layout(&self, depth: usize) -> String {
        let mut out = self.to_string();
        if let Some(index) = self.index() {
            let _ = write!(out, "  {index}");
        }
        for (ordinal, child) in self.children().enumerate() {
            out.push('\n');
            out.push_str(&"    ".repeat(depth + 1));
            let _ = write!(out, "{ordinal}# ");
            out.push_str(&child.layout(depth + 1));
        }
        out
    }
}

impl fmt::Display for Node<'_> {
    /// `path (type)`, or the type name alone for the root.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            f.write_str(self.type_name())
        } else {
            write!(f, "{} ({})", self.path_string(), self.type_name())
        }
    }
}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({self})")
    }
}

#[cfg(test)]
mod tests {
    use core::any::type_name;
    use core::convert::Infallible;

    use crate::derive::Record;
    use crate::shape::Record as _;
    use crate::tree::build;

    #[derive(Record)]
    struct Pagination {
        page: u32,
        size: u32,
    }

    #[derive(Record)]
    struct Query {
        keyword: String,
        pagination: Pagination,
    }

    #[test]
    fn lookup_is_all_or_nothing() {
        let tree = build::build(Query::shape()).unwrap();
        let root = tree.root();

        assert!(root.lookup("keyword").is_some());
        assert!(root.lookup("pagination.size").is_some());
        assert!(root.lookup("pagination.nope").is_none());
        assert!(root.lookup("keyword.too_deep").is_none());
        assert!(root.lookup("").is_none());

        // Relative to an inner node.
        let pagination = root.lookup("pagination").unwrap();
        assert_eq!(
            pagination.lookup("page").map(|n| n.path_string()),
            Some("pagination.page".to_owned())
        );
    }

    #[test]
    fn lookup_by_index_walks_child_positions() {
        let tree = build::build(Query::shape()).unwrap();
        let root = tree.root();

        assert!(root.lookup_by_index(&[]).unwrap().is_root());
        let size = root.lookup_by_index(&[1, 1]).unwrap();
        assert_eq!(size.path_string(), "pagination.size");
        assert!(root.lookup_by_index(&[9]).is_none());
        assert!(root.lookup_by_index(&[0, 0]).is_none());
    }

    #[test]
    fn parent_links_point_back() {
        let tree = build::build(Query::shape()).unwrap();
        let root = tree.root();

        assert!(root.parent().is_none());
        let page = root.lookup("pagination.page").unwrap();
        let parent = page.parent().unwrap();
        assert_eq!(parent.field_name(), Some("pagination"));
        assert!(parent.parent().unwrap().is_root());
    }

    #[test]
    fn iterate_visits_preorder_and_stops_on_error() {
        let tree = build::build(Query::shape()).unwrap();
        let root = tree.root();

        let mut paths = Vec::new();
        root.iterate(&mut |node| -> Result<(), Infallible> {
            paths.push(node.path_string());
            Ok(())
        })
        .unwrap();
        assert_eq!(
            paths,
            vec!["", "keyword", "pagination", "pagination.page", "pagination.size"]
        );

        let mut visited = 0;
        let err = root.iterate(&mut |node| {
            visited += 1;
            if node.field_name() == Some("pagination") {
                Err("stop")
            } else {
                Ok(())
            }
        });
        assert_eq!(err, Err("stop"));
        assert_eq!(visited, 3);
    }

    #[test]
    fn display_shows_path_and_type() {
        let tree = build::build(Query::shape()).unwrap();
        let root = tree.root();

        assert_eq!(root.to_string(), type_name::<Query>());
        let page = root.lookup("pagination.page").unwrap();
        assert_eq!(page.to_string(), "pagination.page (u32)");
        assert_eq!(format!("{page:?}"), "Node(pagination.page (u32))");
    }

    #[test]
    fn debug_layout_text_is_stable() {
        let tree = build::build(Query::shape()).unwrap();

        let expected = format!(
            "{query}\n    \
             0# keyword ({string})  0\n    \
             1# pagination ({pagination})  1\n        \
             0# pagination.page (u32)  0\n        \
             1# pagination.size (u32)  1",
            query = type_name::<Query>(),
            string = type_name::<String>(),
            pagination = type_name::<Pagination>(),
        );
        assert_eq!(tree.root().debug_layout_text(), expected);
    }
}
