//! Versioned records of the files known to a workspace.

mod domain;
mod plan;
mod problem;

pub use domain::{DomainInfo, DomainParser};
pub use plan::{HappeningsInfo, PlanInfo, PlanMeta, PlanParser};
pub use problem::{ProblemInfo, ProblemParser};

use derive_more::Display;
use std::any::Any;
use std::fmt::{Debug, Formatter};
use std::str::FromStr;

use crate::position::PositionResolver;
use crate::syntax::SyntaxTree;

/// Language in which a file is written, as announced by the host (e.g. the editor).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display)]
pub enum PddlLanguage {
    #[display("pddl")]
    Pddl,
    #[display("plan")]
    Plan,
    #[display("happenings")]
    Happenings,
}

impl PddlLanguage {
    /// Guesses the language from the extension of a file name or URI.
    pub fn from_file_name(name: &str) -> Option<PddlLanguage> {
        let name = name.to_ascii_lowercase();
        let (_, ext) = name.rsplit_once('.')?;
        ext.parse().ok()
    }
}

impl FromStr for PddlLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pddl" => Ok(PddlLanguage::Pddl),
            "plan" => Ok(PddlLanguage::Plan),
            "happenings" => Ok(PddlLanguage::Happenings),
            _ => Err(format!("Unknown language `{s}`")),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display)]
pub enum FileStatus {
    /// Structure extracted, not yet confirmed as parsed.
    #[display("new")]
    New,
    #[display("parsed")]
    Parsed,
    /// Parsed, but a file it depends on changed since.
    #[display("dirty")]
    Dirty,
    /// No parser recognized the content.
    #[display("unknown")]
    Unknown,
}

/// Content model of a file kind that is not built into the workspace (e.g. a dialect-specific
/// format recognized by an extension parser).
pub trait CustomFileInfo: Any + Debug + Send + Sync {
    /// Short name of the kind of file, used for logging.
    fn kind_name(&self) -> &str;

    fn as_any(&self) -> &dyn Any;
}

/// The typed content of a file, as produced by the parser that recognized it.
#[derive(Debug)]
pub enum FileKind {
    Domain(DomainInfo),
    Problem(ProblemInfo),
    Plan(PlanInfo),
    Happenings(HappeningsInfo),
    Custom(Box<dyn CustomFileInfo>),
    Unknown,
}

impl FileKind {
    pub fn name(&self) -> &str {
        match self {
            FileKind::Domain(_) => "domain",
            FileKind::Problem(_) => "problem",
            FileKind::Plan(_) => "plan",
            FileKind::Happenings(_) => "happenings",
            FileKind::Custom(custom) => custom.kind_name(),
            FileKind::Unknown => "unknown",
        }
    }
}

/// A file of the workspace at a given version.
///
/// The record exclusively owns its syntax tree (and thus its text) and its position resolver.
/// Accepting a newer version of the file replaces the whole record.
pub struct FileInfo {
    uri: String,
    version: i64,
    name: String,
    language: PddlLanguage,
    status: FileStatus,
    syntax_tree: SyntaxTree,
    position_resolver: Box<dyn PositionResolver>,
    kind: FileKind,
}

impl FileInfo {
    pub(crate) fn new(
        uri: impl Into<String>,
        version: i64,
        language: PddlLanguage,
        status: FileStatus,
        syntax_tree: SyntaxTree,
        position_resolver: Box<dyn PositionResolver>,
        kind: FileKind,
    ) -> Self {
        let uri = uri.into();
        FileInfo {
            name: crate::uri::file_name(&uri),
            uri,
            version,
            language,
            status,
            syntax_tree,
            position_resolver,
            kind,
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn version(&self) -> i64 {
        self.version
    }

    /// Display name of the file (last segment of its URI).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn language(&self) -> PddlLanguage {
        self.language
    }

    pub fn status(&self) -> FileStatus {
        self.status
    }

    pub(crate) fn set_status(&mut self, status: FileStatus) {
        self.status = status;
    }

    pub fn text(&self) -> &str {
        self.syntax_tree.text()
    }

    pub fn syntax_tree(&self) -> &SyntaxTree {
        &self.syntax_tree
    }

    pub fn position_resolver(&self) -> &dyn PositionResolver {
        self.position_resolver.as_ref()
    }

    pub fn kind(&self) -> &FileKind {
        &self.kind
    }

    pub fn is_domain(&self) -> bool {
        matches!(self.kind, FileKind::Domain(_))
    }

    pub fn is_problem(&self) -> bool {
        matches!(self.kind, FileKind::Problem(_))
    }

    pub fn is_plan(&self) -> bool {
        matches!(self.kind, FileKind::Plan(_))
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self.kind, FileKind::Unknown)
    }

    pub fn as_domain(&self) -> Option<&DomainInfo> {
        match &self.kind {
            FileKind::Domain(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_problem(&self) -> Option<&ProblemInfo> {
        match &self.kind {
            FileKind::Problem(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_plan(&self) -> Option<&PlanInfo> {
        match &self.kind {
            FileKind::Plan(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_happenings(&self) -> Option<&HappeningsInfo> {
        match &self.kind {
            FileKind::Happenings(h) => Some(h),
            _ => None,
        }
    }

    /// Content of a file recognized by a custom parser, if it is of type `T`.
    pub fn as_custom<T: CustomFileInfo>(&self) -> Option<&T> {
        match &self.kind {
            FileKind::Custom(c) => c.as_any().downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl Debug for FileInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileInfo")
            .field("uri", &self.uri)
            .field("version", &self.version)
            .field("language", &self.language)
            .field("status", &self.status)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Name of the `(define (<keyword> <name>) ...)` construct of a PDDL document, e.g. the domain name
/// for `keyword = "domain"`. Keywords are matched ignoring case.
///
/// Returns `None` if there is no such construct, `Some(None)` if the construct is there but the
/// name is not (yet) written.
pub(crate) fn declared_name<'t>(
    tree: &'t SyntaxTree,
    keyword: &str,
) -> Option<Option<crate::syntax::SyntaxNode<'t>>> {
    let define = tree.root().first_open_bracket_ignore_case("define")?;
    let header = define.first_open_bracket_ignore_case(keyword)?;
    Some(header.significant_children().filter(|c| c.is_token()).nth(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_from_extension() {
        assert_eq!(PddlLanguage::from_file_name("file:///a/domain.PDDL"), Some(PddlLanguage::Pddl));
        assert_eq!(PddlLanguage::from_file_name("p01.plan"), Some(PddlLanguage::Plan));
        assert_eq!(PddlLanguage::from_file_name("p01.happenings"), Some(PddlLanguage::Happenings));
        assert_eq!(PddlLanguage::from_file_name("README.md"), None);
        assert_eq!(PddlLanguage::from_file_name("noextension"), None);
    }

    #[test]
    fn declared_names() {
        let tree = SyntaxTree::parse("(define (DOMAIN Blocks) (:requirements :strips))");
        let name = declared_name(&tree, "domain").unwrap().unwrap();
        assert_eq!(name.text(), "Blocks");
        assert!(declared_name(&tree, "problem").is_none());

        let tree = SyntaxTree::parse("(define (problem ");
        assert!(declared_name(&tree, "problem").unwrap().is_none());
    }
}
