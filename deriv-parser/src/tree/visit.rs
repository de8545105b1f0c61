use super::{node::{NodeData, NodeId}, op::OpCode, symbol::SymbolId, Tree};

/// Read-only callbacks for each kind of node, driven by [`Tree::accept`].
///
/// Every method defaults to doing nothing, so implementors only override the node kinds they care
/// about. Nodes are visited in pre-order.
pub trait Visitor {
    /// Called for each constant node.
    fn visit_constant(&mut self, _id: NodeId, _value: f64) {}

    /// Called for each variable node.
    fn visit_variable(&mut self, _id: NodeId, _symbol: SymbolId) {}

    /// Called for each operator node, before its children are visited.
    fn visit_operator(&mut self, _id: NodeId, _op: OpCode, _left: Option<NodeId>, _right: NodeId) {}
}

impl Tree {
    /// Walks the whole tree in pre-order, calling the matching method of the visitor on each node.
    pub fn accept(&self, visitor: &mut impl Visitor) {
        self.accept_from(self.root(), visitor);
    }

    /// Walks the subtree rooted at `start` in pre-order.
    pub fn accept_from(&self, start: Option<NodeId>, visitor: &mut impl Visitor) {
        for node_ref in self.pre_order_iter_from(start) {
            match node_ref.node.data {
                NodeData::Constant(value) => visitor.visit_constant(node_ref.id, value),
                NodeData::Variable(symbol) => visitor.visit_variable(node_ref.id, symbol),
                NodeData::Operator { op, left, right } => {
                    visitor.visit_operator(node_ref.id, op, left, right)
                },
            }
        }
    }
}
