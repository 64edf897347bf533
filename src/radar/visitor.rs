//! Depth-first traversal
//!
//! [walk] visits every node in source order, handing each one to the [Visitor] together
//! with its parent. The parent is what lets a visitor tell an `if` that heads a chain from
//! one that is the `else if` link of another.

use super::ast::{Node, NodeKind};

pub trait Visitor {
    /// Called before the children of `node` are visited
    fn enter(&mut self, node: &Node, parent: Option<&Node>);
}

pub fn walk<V: Visitor + ?Sized>(root: &Node, visitor: &mut V) {
    visit(root, None, visitor);
}

fn visit<V: Visitor + ?Sized>(node: &Node, parent: Option<&Node>, visitor: &mut V) {
    visitor.enter(node, parent);
    for child in node.children() {
        visit(child, Some(node), visitor);
    }
}

/// Whether `node` is the `else` branch of the `if` statement `parent`
pub fn is_else_branch(node: &Node, parent: Option<&Node>) -> bool {
    match parent.map(|parent| &parent.kind) {
        Some(NodeKind::If {
            alternate: Some(alternate),
            ..
        }) => std::ptr::eq(alternate.as_ref(), node),
        _ => false,
    }
}
