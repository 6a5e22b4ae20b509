//! CSG tree nodes.

use std::fmt;

use unitrack_math::LocalSurfaceId;

use crate::logic::{LogicInt, LAND, LOR};

/// Index of a node in a [`CsgTree`](crate::CsgTree).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// Construct from a raw index.
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Raw index.
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Index for slicing.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Binary boolean operator of a [`Node::Joined`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum JoinOp {
    /// All children must be true.
    And,
    /// Any child must be true.
    Or,
}

impl JoinOp {
    /// The De Morgan dual.
    pub fn opposite(self) -> Self {
        match self {
            JoinOp::And => JoinOp::Or,
            JoinOp::Or => JoinOp::And,
        }
    }

    /// Logic token for this operator.
    pub fn token(self) -> LogicInt {
        match self {
            JoinOp::And => LAND,
            JoinOp::Or => LOR,
        }
    }

    /// Operator from a logic token.
    pub fn from_token(token: LogicInt) -> Option<Self> {
        match token {
            LAND => Some(JoinOp::And),
            LOR => Some(JoinOp::Or),
            _ => None,
        }
    }
}

/// One node of a CSG expression.
///
/// Children are referenced by [`NodeId`] and always precede their parent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Node {
    /// Everywhere.
    True,
    /// Nowhere. Stored in a tree as the negation of [`Node::True`].
    False,
    /// Stand-in for another node after simplification.
    Aliased(NodeId),
    /// Complement of a node.
    Negated(NodeId),
    /// Outside (positive half-space) of a surface.
    Surface(LocalSurfaceId),
    /// Intersection or union of two or more nodes.
    Joined(JoinOp, Vec<NodeId>),
}

impl Node {
    /// Whether this is a constant.
    pub fn is_boolean(&self) -> bool {
        matches!(self, Node::True | Node::False)
    }
}

impl From<LocalSurfaceId> for Node {
    fn from(id: LocalSurfaceId) -> Self {
        Node::Surface(id)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::True => f.write_str("true"),
            Node::False => f.write_str("false"),
            Node::Aliased(n) => write!(f, "->{{{n}}}"),
            Node::Negated(n) => write!(f, "not{{{n}}}"),
            Node::Surface(s) => write!(f, "surface {s}"),
            Node::Joined(op, nodes) => {
                f.write_str(match op {
                    JoinOp::And => "all{",
                    JoinOp::Or => "any{",
                })?;
                for (i, n) in nodes.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{n}")?;
                }
                f.write_str("}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let n = Node::Joined(JoinOp::And, vec![NodeId::new(2), NodeId::new(4)]);
        assert_eq!(n.to_string(), "all{2,4}");
        assert_eq!(Node::Negated(NodeId::new(3)).to_string(), "not{3}");
        assert_eq!(Node::Surface(LocalSurfaceId::new(7)).to_string(), "surface 7");
        assert!(Node::False.is_boolean());
    }

    #[test]
    fn test_join_op() {
        assert_eq!(JoinOp::And.opposite(), JoinOp::Or);
        assert_eq!(JoinOp::from_token(LOR), Some(JoinOp::Or));
        assert_eq!(JoinOp::from_token(0), None);
        assert_eq!(JoinOp::from_token(JoinOp::And.token()), Some(JoinOp::And));
    }
}
