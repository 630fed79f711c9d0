//! Pluggable recognition of files.
//!
//! A parser receives the already built syntax tree of a file and either returns the typed content
//! of the file or declines with `Ok(None)`. Candidate parsers are awaited one at a time, in
//! priority order, and the first one producing a content wins.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::Instrument;

use crate::Res;
use crate::files::{FileKind, PddlLanguage};
use crate::position::PositionResolver;
use crate::syntax::SyntaxTree;

/// Everything a parser may look at. Parsers must be deterministic for a given input and should
/// navigate the syntax tree rather than re-scanning the text.
pub struct ParseInput<'a> {
    pub uri: &'a str,
    pub version: i64,
    pub language: PddlLanguage,
    pub text: &'a str,
    pub syntax_tree: &'a SyntaxTree,
    pub position_resolver: &'a dyn PositionResolver,
}

impl<'a> ParseInput<'a> {
    pub fn new(
        uri: &'a str,
        version: i64,
        language: PddlLanguage,
        syntax_tree: &'a SyntaxTree,
        position_resolver: &'a dyn PositionResolver,
    ) -> Self {
        ParseInput {
            uri,
            version,
            language,
            text: syntax_tree.text(),
            syntax_tree,
            position_resolver,
        }
    }
}

#[async_trait]
pub trait PddlFileParser: Send + Sync {
    /// Name used to identify the parser in logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Returns the content of the file if this parser recognizes it, `Ok(None)` otherwise.
    /// An error is reported and handled as if the parser did not recognize the file.
    async fn try_parse(&self, input: &ParseInput<'_>) -> Res<Option<FileKind>>;
}

/// A plugin contributing parsers to a workspace.
pub trait PddlWorkspaceExtension: Send + Sync {
    /// Parsers of this extension, in the order in which they should be tried.
    fn pddl_parsers(&self) -> Option<Vec<Arc<dyn PddlFileParser>>> {
        None
    }
}

/// Tries each parser in turn and returns the content produced by the first one that recognizes
/// the file, or [`FileKind::Unknown`] if none does.
pub(crate) async fn dispatch(parsers: &[Arc<dyn PddlFileParser>], input: &ParseInput<'_>) -> FileKind {
    let span = tracing::debug_span!("dispatch", uri = input.uri, version = input.version);
    async {
        for parser in parsers {
            match parser.try_parse(input).await {
                Ok(Some(kind)) => {
                    tracing::debug!("recognized as {} by parser {}", kind.name(), parser.name());
                    return kind;
                }
                Ok(None) => tracing::trace!("declined by parser {}", parser.name()),
                Err(err) => tracing::warn!("parser {} failed on {}: {err:#}", parser.name(), input.uri),
            }
        }
        tracing::debug!("no parser recognized {}", input.uri);
        FileKind::Unknown
    }
    .instrument(span)
    .await
}
