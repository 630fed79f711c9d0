//! Bracket tree over PDDL text.
//!
//! The tree is built in a single pass and never fails: unterminated brackets are closed at the end
//! of the input and stray closing brackets become tokens of the document. Nodes live in a flat
//! arena owned by the [`SyntaxTree`]; a [`SyntaxNode`] is a lightweight handle used for navigation.

mod builder;
mod tree;

pub use tree::{NodeId, NodeKind, SyntaxNode, SyntaxTree, TerminalKind};
