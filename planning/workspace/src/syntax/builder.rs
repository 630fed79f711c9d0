use super::tree::{NodeData, NodeId, NodeKind, SyntaxTree, TerminalKind};

/// Builds the tree of `text` in a single left to right pass.
///
/// The builder maintains the stack of currently open brackets, with the document at its bottom.
/// Anything that is neither a bracket nor a comment is split into maximal runs of whitespace and
/// non-whitespace characters.
pub(super) fn build(text: String) -> SyntaxTree {
    let mut builder = Builder {
        nodes: vec![NodeData::new(NodeKind::Document, 0, None)],
        open: vec![NodeId::ROOT],
    };

    let mut chars = text.char_indices().peekable();
    while let Some((start, c)) = chars.next() {
        match c {
            '(' => builder.open_bracket(start),
            ')' => builder.close_bracket(start),
            ';' => {
                // comment up to (excluding) the end of line
                let mut end = text.len();
                while let Some(&(i, c)) = chars.peek() {
                    if c == '\n' || (c == '\r' && text[i..].starts_with("\r\n")) {
                        end = i;
                        break;
                    }
                    chars.next();
                }
                builder.terminal(TerminalKind::Comment, start, end);
            }
            c if c.is_whitespace() => {
                let mut end = start + c.len_utf8();
                while let Some(&(i, c)) = chars.peek() {
                    if !c.is_whitespace() {
                        break;
                    }
                    end = i + c.len_utf8();
                    chars.next();
                }
                builder.terminal(TerminalKind::Whitespace, start, end);
            }
            c => {
                let mut end = start + c.len_utf8();
                while let Some(&(i, c)) = chars.peek() {
                    if c.is_whitespace() || c == '(' || c == ')' {
                        break;
                    }
                    end = i + c.len_utf8();
                    chars.next();
                }
                builder.terminal(TerminalKind::Token, start, end);
            }
        }
    }
    builder.finish(text)
}

struct Builder {
    nodes: Vec<NodeData>,
    /// Currently open nodes, innermost last. The document is always at the bottom.
    open: Vec<NodeId>,
}

impl Builder {
    fn current(&self) -> NodeId {
        // the document is never popped
        self.open[self.open.len() - 1]
    }

    fn push(&mut self, kind: NodeKind, start: usize) -> NodeId {
        let parent = self.current();
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData::new(kind, start, Some(parent)));
        self.nodes[parent.0].children.push(id);
        id
    }

    fn open_bracket(&mut self, start: usize) {
        let id = self.push(NodeKind::Bracket, start);
        self.open.push(id);
    }

    fn close_bracket(&mut self, start: usize) {
        if self.open.len() > 1 {
            let id = self.current();
            self.open.pop();
            let node = &mut self.nodes[id.0];
            node.end = start + 1;
            node.closed = true;
        } else {
            tracing::trace!("unmatched closing bracket at offset {start}");
            self.terminal(TerminalKind::Token, start, start + 1);
        }
    }

    fn terminal(&mut self, kind: TerminalKind, start: usize, end: usize) {
        let id = self.push(NodeKind::Terminal(kind), start);
        self.nodes[id.0].end = end;
    }

    fn finish(mut self, text: String) -> SyntaxTree {
        // brackets left open extend to the end of the input, as does the document
        for id in self.open.drain(..) {
            self.nodes[id.0].end = text.len();
        }
        SyntaxTree::from_parts(text, self.nodes)
    }
}
