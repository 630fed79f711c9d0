use derive_more::Display;
use std::fmt::{Debug, Formatter};

use crate::errors::SyntaxError;
use crate::position::{PddlRange, PositionResolver};

/// Index of a node in the arena of its [`SyntaxTree`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(super) usize);

impl NodeId {
    /// The document node, root of every tree.
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display)]
pub enum TerminalKind {
    #[display("token")]
    Token,
    #[display("whitespace")]
    Whitespace,
    #[display("comment")]
    Comment,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display)]
pub enum NodeKind {
    #[display("document")]
    Document,
    #[display("bracket")]
    Bracket,
    #[display("{_0}")]
    Terminal(TerminalKind),
}

#[derive(Clone, Debug)]
pub(super) struct NodeData {
    pub kind: NodeKind,
    pub start: usize,
    pub end: usize,
    /// Navigation only: the parent is owned by the tree, not by this node.
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// For brackets, whether the closing bracket was found.
    pub closed: bool,
}

impl NodeData {
    pub fn new(kind: NodeKind, start: usize, parent: Option<NodeId>) -> Self {
        NodeData {
            kind,
            start,
            end: start,
            parent,
            children: Vec::new(),
            closed: false,
        }
    }
}

/// Bracket tree of a text snapshot. The tree owns the text it was built from.
#[derive(Clone)]
pub struct SyntaxTree {
    text: String,
    nodes: Vec<NodeData>,
}

impl SyntaxTree {
    /// Builds the tree of `text`. This never fails, whatever the content.
    pub fn parse(text: impl Into<String>) -> Self {
        super::builder::build(text.into())
    }

    pub(super) fn from_parts(text: String, nodes: Vec<NodeData>) -> Self {
        SyntaxTree { text, nodes }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn root(&self) -> SyntaxNode<'_> {
        self.node(NodeId::ROOT)
    }

    pub fn node(&self, id: NodeId) -> SyntaxNode<'_> {
        assert!(id.0 < self.nodes.len(), "node {id:?} does not belong to this tree");
        SyntaxNode { tree: self, id }
    }

    /// Total number of nodes, including the document.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Most deeply nested node whose span contains `offset`.
    pub fn node_at(&self, offset: usize) -> SyntaxNode<'_> {
        self.root().node_at(offset)
    }

    fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }
}

impl Debug for SyntaxTree {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "SyntaxTree({} nodes)", self.nodes.len())
    }
}

/// Handle on a node of a [`SyntaxTree`], exposing the structural navigation API.
#[derive(Copy, Clone)]
pub struct SyntaxNode<'t> {
    tree: &'t SyntaxTree,
    id: NodeId,
}

impl<'t> SyntaxNode<'t> {
    fn data(&self) -> &'t NodeData {
        self.tree.data(self.id)
    }

    fn wrap(&self, id: NodeId) -> SyntaxNode<'t> {
        SyntaxNode { tree: self.tree, id }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn tree(&self) -> &'t SyntaxTree {
        self.tree
    }

    pub fn kind(&self) -> NodeKind {
        self.data().kind
    }

    pub fn is_document(&self) -> bool {
        self.kind() == NodeKind::Document
    }

    pub fn is_bracket(&self) -> bool {
        self.kind() == NodeKind::Bracket
    }

    pub fn is_token(&self) -> bool {
        self.kind() == NodeKind::Terminal(TerminalKind::Token)
    }

    pub fn is_whitespace(&self) -> bool {
        self.kind() == NodeKind::Terminal(TerminalKind::Whitespace)
    }

    pub fn is_comment(&self) -> bool {
        self.kind() == NodeKind::Terminal(TerminalKind::Comment)
    }

    /// Offset of the first character of the node.
    pub fn start(&self) -> usize {
        self.data().start
    }

    /// Offset right after the last character of the node.
    pub fn end(&self) -> usize {
        self.data().end
    }

    pub fn span(&self) -> std::ops::Range<usize> {
        self.start()..self.end()
    }

    /// False only for brackets whose closing bracket is missing.
    pub fn is_closed(&self) -> bool {
        match self.kind() {
            NodeKind::Bracket => self.data().closed,
            _ => true,
        }
    }

    pub fn range(&self, resolver: &dyn PositionResolver) -> PddlRange {
        resolver.resolve_to_range(self.start(), self.end())
    }

    pub fn parent(&self) -> Option<SyntaxNode<'t>> {
        self.data().parent.map(|p| self.wrap(p))
    }

    /// Parent, grand-parent, ... up to the document.
    pub fn ancestors(&self) -> impl Iterator<Item = SyntaxNode<'t>> + 't {
        let tree = self.tree;
        std::iter::successors(self.parent(), move |n| n.data().parent.map(|p| tree.node(p)))
    }

    pub fn children(&self) -> impl ExactSizeIterator<Item = SyntaxNode<'t>> + 't {
        let tree = self.tree;
        self.data().children.iter().map(move |id| tree.node(*id))
    }

    pub fn has_children(&self) -> bool {
        !self.data().children.is_empty()
    }

    pub fn non_whitespace_children(&self) -> impl Iterator<Item = SyntaxNode<'t>> + 't {
        self.children().filter(|c| !c.is_whitespace())
    }

    /// Children that are neither whitespace nor comments.
    pub fn significant_children(&self) -> impl Iterator<Item = SyntaxNode<'t>> + 't {
        self.children().filter(|c| !c.is_whitespace() && !c.is_comment())
    }

    pub fn child_brackets(&self) -> impl Iterator<Item = SyntaxNode<'t>> + 't {
        self.children().filter(|c| c.is_bracket())
    }

    /// Exact source text spanned by the node, delimiters included.
    pub fn text(&self) -> &'t str {
        &self.tree.text[self.span()]
    }

    /// Text strictly between the brackets. For an unterminated bracket, everything after the
    /// opening bracket. For other nodes, the same as [`SyntaxNode::text`].
    pub fn nested_text(&self) -> &'t str {
        match self.kind() {
            NodeKind::Bracket => {
                let end = if self.is_closed() { self.end() - 1 } else { self.end() };
                &self.tree.text[self.start() + 1..end]
            }
            _ => self.text(),
        }
    }

    /// Text of the node with every comment removed. All other characters, including whitespace
    /// and line breaks, are kept verbatim.
    pub fn non_comment_text(&self) -> String {
        let text = self.text();
        let offset = self.start();
        let mut result = String::with_capacity(text.len());
        let mut last = 0;
        for comment in self.find_descendants(|n| n.is_comment()) {
            result.push_str(&text[last..comment.start() - offset]);
            last = comment.end() - offset;
        }
        result.push_str(&text[last..]);
        result
    }

    /// Text between the brackets, without comments and without the leading keyword token.
    /// For `(:types a b - c)`, this is ` a b - c`.
    pub fn non_comment_text_after_keyword(&self) -> String {
        let from = self.first_token().map(|t| t.end()).unwrap_or(self.start() + 1);
        let end = if self.is_closed() { self.end() - 1 } else { self.end() };
        let text = &self.tree.text;
        let mut result = String::new();
        let mut last = from.min(end);
        for comment in self.find_descendants(|n| n.is_comment()) {
            if comment.start() < last {
                continue;
            }
            result.push_str(&text[last..comment.start()]);
            last = comment.end();
        }
        result.push_str(&text[last..end]);
        result
    }

    pub fn single_child(&self) -> Result<SyntaxNode<'t>, SyntaxError> {
        single(self.children(), "child")
    }

    pub fn single_non_whitespace_child(&self) -> Result<SyntaxNode<'t>, SyntaxError> {
        single(self.non_whitespace_children(), "non-whitespace")
    }

    /// First token among the children of the node, e.g. the keyword of a bracket such as `:types`.
    pub fn first_token(&self) -> Option<SyntaxNode<'t>> {
        self.children().find(|c| c.is_token())
    }

    /// Text of the first token of a bracket, if any.
    pub fn keyword(&self) -> Option<&'t str> {
        self.first_token().map(|t| t.text())
    }

    /// First child bracket whose keyword is (case-sensitively) `keyword`.
    pub fn first_open_bracket(&self, keyword: &str) -> Option<SyntaxNode<'t>> {
        self.child_brackets().find(|b| b.keyword() == Some(keyword))
    }

    /// Like [`SyntaxNode::first_open_bracket`] but for constructs that are known to be present.
    pub fn first_open_bracket_or_throw(&self, keyword: &str) -> Result<SyntaxNode<'t>, SyntaxError> {
        self.first_open_bracket(keyword)
            .ok_or_else(|| SyntaxError::not_found(keyword))
    }

    /// First child bracket whose keyword matches `keyword`, ignoring ASCII case.
    pub fn first_open_bracket_ignore_case(&self, keyword: &str) -> Option<SyntaxNode<'t>> {
        self.child_brackets()
            .find(|b| b.keyword().is_some_and(|k| k.eq_ignore_ascii_case(keyword)))
    }

    /// All descendants (excluding self) satisfying the predicate, in document order.
    pub fn find_descendants(&self, predicate: impl Fn(&SyntaxNode<'t>) -> bool) -> Vec<SyntaxNode<'t>> {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = self.data().children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let node = self.wrap(id);
            if predicate(&node) {
                found.push(node);
            }
            stack.extend(node.data().children.iter().rev().copied());
        }
        found
    }

    /// Most deeply nested node (possibly self) whose span contains `offset`.
    ///
    /// Spans are half-open, except that the offset right after the last child of a node still
    /// belongs to that child when nothing closes it: a terminal or an unterminated bracket
    /// reaching the end of its parent. The end of a document being typed thus resolves to the
    /// innermost open construct.
    pub fn node_at(&self, offset: usize) -> SyntaxNode<'t> {
        let mut current = *self;
        'descend: loop {
            let last = current.data().children.last().copied();
            for child in current.children() {
                let inside = child.start() <= offset && offset < child.end();
                let at_open_end = offset == child.end()
                    && Some(child.id) == last
                    && child.end() == current.end()
                    && !(child.is_bracket() && child.is_closed());
                if inside || at_open_end {
                    current = child;
                    continue 'descend;
                }
            }
            return current;
        }
    }
}

fn single<'t>(
    mut nodes: impl Iterator<Item = SyntaxNode<'t>>,
    expected: &'static str,
) -> Result<SyntaxNode<'t>, SyntaxError> {
    match (nodes.next(), nodes.next()) {
        (Some(node), None) => Ok(node),
        (None, _) => Err(SyntaxError::NotSingleChild { expected, found: 0 }),
        (Some(_), Some(_)) => Err(SyntaxError::NotSingleChild {
            expected,
            found: 2 + nodes.count(),
        }),
    }
}

impl PartialEq for SyntaxNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for SyntaxNode<'_> {}

impl Debug for SyntaxNode<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}..{}]{:?}", self.kind(), self.start(), self.end(), self.text())
    }
}

impl std::fmt::Display for SyntaxNode<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text())
    }
}
