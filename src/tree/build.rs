//! Builds a bare resolver tree from a record's descriptor table.

use crate::context::Context;
use crate::directive::parse_tag;
use crate::shape::{FieldShape, Shape};
use crate::tree::error::BuildError;
use crate::tree::node::{Assembly, NodeData, NodeId, Tree};

/// Builds the bare tree for `shape`: no options applied, fresh contexts.
///
/// Fails on the first malformed tag or duplicate directive; the error
/// names the dotted path of the offending field.
pub(crate) fn build(shape: &'static Shape) -> Result<Tree, BuildError> {
    let mut nodes = Vec::new();
    nodes.push(NodeData {
        type_name: shape.type_name(),
        ty_id: shape.ty_id(),
        field: None,
        assembly: Assembly::Direct(shape),
        new_value: shape.new_value_fn(),
        path: Vec::new(),
        directives: Vec::new(),
        parent: None,
        children: Vec::new(),
        context: Context::new(),
    });
    build_children(&mut nodes, 0, shape)?;

    log::trace!(
        "built resolver tree for `{}` ({} nodes)",
        shape.type_name(),
        nodes.len()
    );
    Ok(Tree { nodes })
}

fn build_children(
    nodes: &mut Vec<NodeData>,
    parent: NodeId,
    shape: &'static Shape,
) -> Result<(), BuildError> {
    for field in shape.fields() {
        build_field(nodes, parent, field)?;
    }
    Ok(())
}

fn build_field(
    nodes: &mut Vec<NodeData>,
    parent: NodeId,
    field: &'static FieldShape,
) -> Result<(), BuildError> {
    let mut path = nodes[parent].path.clone();
    path.push(field.name());

    let directives = parse_tag(field.tag()).map_err(|err| BuildError::new(&path, err))?;

    // Record-shaped after at most one level of indirection; everything
    // else is an opaque leaf.
    let assembly = if let Some(shape) = field.record_shape() {
        Assembly::Direct(shape)
    } else if let Some(expansion) = field.expansion() {
        Assembly::Indirect(expansion)
    } else {
        Assembly::Leaf
    };

    // Pre-order: the node goes in before its subtree.
    let id = nodes.len();
    nodes.push(NodeData {
        type_name: field.type_name(),
        ty_id: field.ty_id(),
        field: Some(field),
        assembly,
        new_value: field.new_value_fn(),
        path,
        directives,
        parent: Some(parent),
        children: Vec::new(),
        context: Context::new(),
    });
    nodes[parent].children.push(id);

    match assembly {
        Assembly::Direct(shape) => build_children(nodes, id, shape)?,
        Assembly::Indirect(expansion) => build_children(nodes, id, expansion.shape)?,
        Assembly::Leaf => {}
    }
    Ok(())
}
