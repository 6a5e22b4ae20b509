//! Evaluation of flattened region logic against per-face senses.
//!
//! A face token is true when the point is on the outside (positive side) of
//! that face, so the interior of a sphere is `0 ~` in postfix.

use unitrack_csg::{is_operator_token, LogicInt, LAND, LCLOSE, LNOT, LOPEN, LOR, LTRUE};
use unitrack_math::FaceId;
use unitrack_surf::Sense;

/// Source of per-face senses for one point.
pub trait SenseSource {
    /// Side of a face the point is on.
    fn sense(&mut self, face: FaceId) -> Sense;
}

impl<F: FnMut(FaceId) -> Sense> SenseSource for F {
    fn sense(&mut self, face: FaceId) -> Sense {
        self(face)
    }
}

/// Boolean value of a face sense in region logic.
#[inline]
fn face_value(sense: Sense) -> bool {
    sense == Sense::Outside
}

/// Fixed-capacity stack of booleans packed into one word.
///
/// The top of the stack is the lowest bit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogicStack {
    data: u64,
    size: u32,
}

impl LogicStack {
    /// Deepest stack supported.
    pub const MAX_DEPTH: usize = u64::BITS as usize;

    /// Empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of values on the stack.
    #[inline]
    pub fn len(&self) -> usize {
        self.size as usize
    }

    /// Whether the stack holds no values.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Push a value.
    ///
    /// # Panics
    ///
    /// If the stack already holds [`MAX_DEPTH`](Self::MAX_DEPTH) values.
    #[inline]
    pub fn push(&mut self, value: bool) {
        assert!(self.len() < Self::MAX_DEPTH, "logic stack overflow");
        self.data = (self.data << 1) | u64::from(value);
        self.size += 1;
    }

    /// Remove and return the top value.
    #[inline]
    pub fn pop(&mut self) -> bool {
        assert!(!self.is_empty(), "logic stack underflow");
        let result = self.data & 1 != 0;
        self.data >>= 1;
        self.size -= 1;
        result
    }

    /// Top value.
    #[inline]
    pub fn top(&self) -> bool {
        assert!(!self.is_empty(), "logic stack underflow");
        self.data & 1 != 0
    }

    /// Negate the top value.
    #[inline]
    pub fn apply_not(&mut self) {
        assert!(!self.is_empty(), "logic stack underflow");
        self.data ^= 1;
    }

    /// Replace the top two values with their conjunction.
    #[inline]
    pub fn apply_and(&mut self) {
        assert!(self.len() >= 2, "logic stack underflow");
        self.data = (self.data >> 1) & (self.data | !1);
        self.size -= 1;
    }

    /// Replace the top two values with their disjunction.
    #[inline]
    pub fn apply_or(&mut self) {
        assert!(self.len() >= 2, "logic stack underflow");
        self.data = (self.data >> 1) | (self.data & 1);
        self.size -= 1;
    }
}

/// Stack machine over postfix logic.
///
/// Every face in the expression is queried exactly once per evaluation.
#[derive(Debug, Clone, Copy)]
pub struct LogicEvaluator<'a> {
    logic: &'a [LogicInt],
}

impl<'a> LogicEvaluator<'a> {
    /// Evaluate the given postfix logic.
    pub fn new(logic: &'a [LogicInt]) -> Self {
        Self { logic }
    }

    /// Whether the point described by `senses` satisfies the logic.
    pub fn evaluate<S: SenseSource + ?Sized>(&self, senses: &mut S) -> bool {
        let mut stack = LogicStack::new();
        for &token in self.logic {
            if !is_operator_token(token) {
                stack.push(face_value(senses.sense(FaceId::new(token))));
                continue;
            }
            match token {
                LTRUE => stack.push(true),
                LOR => stack.apply_or(),
                LAND => stack.apply_and(),
                LNOT => stack.apply_not(),
                other => panic!("token {other} is not valid in postfix logic"),
            }
        }
        assert_eq!(stack.len(), 1, "postfix logic did not reduce to one value");
        stack.top()
    }
}

/// Recursive-descent evaluator over infix logic.
///
/// `|` and `&` short-circuit: faces in an operand whose value cannot change
/// the result are never queried. `~` binds tighter than `&`, which binds
/// tighter than `|`.
#[derive(Debug, Clone, Copy)]
pub struct InfixEvaluator<'a> {
    logic: &'a [LogicInt],
}

impl<'a> InfixEvaluator<'a> {
    /// Evaluate the given infix logic.
    pub fn new(logic: &'a [LogicInt]) -> Self {
        Self { logic }
    }

    /// Whether the point described by `senses` satisfies the logic.
    pub fn evaluate<S: SenseSource + ?Sized>(&self, senses: &mut S) -> bool {
        let mut cursor = Cursor {
            logic: self.logic,
            pos: 0,
        };
        let result = cursor.expr(senses, true);
        assert_eq!(cursor.pos, self.logic.len(), "trailing tokens in infix logic");
        result
    }
}

struct Cursor<'a> {
    logic: &'a [LogicInt],
    pos: usize,
}

impl Cursor<'_> {
    fn peek(&self) -> Option<LogicInt> {
        self.logic.get(self.pos).copied()
    }

    fn next(&mut self) -> LogicInt {
        match self.peek() {
            Some(token) => {
                self.pos += 1;
                token
            }
            None => panic!("infix logic ends before an operand"),
        }
    }

    /// `term ('|' term)*`; operands are skipped once the result is true.
    fn expr<S: SenseSource + ?Sized>(&mut self, senses: &mut S, active: bool) -> bool {
        let mut result = self.term(senses, active);
        while self.peek() == Some(LOR) {
            self.pos += 1;
            let rhs = self.term(senses, active && !result);
            result = result || rhs;
        }
        result
    }

    /// `factor ('&' factor)*`; operands are skipped once the result is false.
    fn term<S: SenseSource + ?Sized>(&mut self, senses: &mut S, active: bool) -> bool {
        let mut result = self.factor(senses, active);
        while self.peek() == Some(LAND) {
            self.pos += 1;
            let rhs = self.factor(senses, active && result);
            result = result && rhs;
        }
        result
    }

    fn factor<S: SenseSource + ?Sized>(&mut self, senses: &mut S, active: bool) -> bool {
        match self.next() {
            LNOT => !self.factor(senses, active),
            LOPEN => {
                let result = self.expr(senses, active);
                let close = self.next();
                assert_eq!(close, LCLOSE, "unclosed parenthesis in infix logic");
                result
            }
            LTRUE => true,
            token if !is_operator_token(token) => {
                active && face_value(senses.sense(FaceId::new(token)))
            }
            other => panic!("token {other} cannot start an infix operand"),
        }
    }
}
