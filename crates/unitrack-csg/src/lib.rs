#![warn(missing_docs)]

//! CSG region logic for the unitrack tracker.
//!
//! Regions are boolean combinations of surface half-spaces. This crate holds
//! the deduplicating expression tree used while building a universe and the
//! flattened token vectors ("logic") evaluated at trace time.
//!
//! # Example
//!
//! ```
//! use unitrack_csg::{convert_logic, format_logic, parse_logic, LogicNotation};
//!
//! let postfix = parse_logic("0 1 | ~ 2 &").unwrap();
//! let infix = convert_logic(&postfix, LogicNotation::Postfix, LogicNotation::Infix).unwrap();
//! assert_eq!(format_logic(&infix), "~ 0 & ~ 1 & 2");
//! ```

mod build;
mod convert;
mod demorgan;
mod logic;
mod node;
mod simplify;
mod tree;

pub use build::{build_logic, BuildLogicResult};
pub use convert::{build_tree_from_postfix, convert_logic, convert_to_infix, convert_to_postfix};
pub use demorgan::{transform_negated_joins, TransformedTree};
pub use logic::{
    format_logic, is_operand_token, is_operator_token, logic_depth, operator_char, parse_logic,
    LogicDisplay, LogicInt, LogicNotation, LAND, LCLOSE, LNOT, LOPEN, LOR, LTRUE,
};
pub use node::{JoinOp, Node, NodeId};
pub use simplify::NodeSimplifier;
pub use tree::CsgTree;

use thiserror::Error;

/// Errors from parsing, validating or converting region logic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogicError {
    /// Character outside the logic alphabet.
    #[error("invalid character '{ch}' at position {pos}")]
    InvalidCharacter {
        /// Offending character.
        ch: char,
        /// Byte offset in the input.
        pos: usize,
    },
    /// Face index that collides with the operator range.
    #[error("face index {0} is too large")]
    FaceOutOfRange(u64),
    /// Face index beyond the region's face list.
    #[error("face index {face} is out of range for {num_faces} faces")]
    FaceNotInList {
        /// Offending face index.
        face: LogicInt,
        /// Length of the face list.
        num_faces: usize,
    },
    /// Operator without enough operands on the stack.
    #[error("operator at position {pos} is missing an operand")]
    MissingOperand {
        /// Token index.
        pos: usize,
    },
    /// Operand where an operator was required, or vice versa.
    #[error("unexpected token {token} at position {pos}")]
    UnexpectedToken {
        /// Offending token.
        token: LogicInt,
        /// Token index.
        pos: usize,
    },
    /// Parenthesis without a partner.
    #[error("mismatched parenthesis at position {pos}")]
    MismatchedParen {
        /// Token index.
        pos: usize,
    },
    /// Expression that leaves other than exactly one value.
    #[error("logic leaves {depth} values on the stack (expected 1)")]
    Unbalanced {
        /// Final stack depth.
        depth: usize,
    },
}

/// Result type for logic operations.
pub type Result<T> = std::result::Result<T, LogicError>;
