use async_trait::async_trait;

use crate::Res;
use crate::config::DEFAULT_TYPE_ROOT;
use crate::files::{FileKind, PddlLanguage, declared_name};
use crate::graph::DirectionalGraph;
use crate::parsers::{ParseInput, PddlFileParser};
use crate::position::PddlRange;
use crate::types::{TypeObjectMap, parse_inheritance_with_root, parse_type_objects};

/// Structure of a PDDL domain file.
///
/// Only the parts needed to relate files to each other are extracted here; the content of
/// predicates, actions, ... is left to the consumers of the syntax tree.
#[derive(Clone, Debug, Default)]
pub struct DomainInfo {
    /// Declared name, absent while being typed.
    pub name: Option<String>,
    pub name_range: Option<PddlRange>,
    /// Requirement flags, e.g. `:strips`, in declaration order.
    pub requirements: Vec<String>,
    /// Type hierarchy, with an edge from each type to its parent.
    pub types: DirectionalGraph,
    pub constants: TypeObjectMap,
}

impl DomainInfo {
    /// True if this domain's declared name is `name`, ignoring case.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.as_deref().is_some_and(|n| n.eq_ignore_ascii_case(name))
    }

    pub fn has_requirement(&self, requirement: &str) -> bool {
        self.requirements.iter().any(|r| r.eq_ignore_ascii_case(requirement))
    }

    /// All declared types, in declaration order.
    pub fn type_names(&self) -> Vec<&str> {
        self.types.vertices().collect()
    }

    /// Types that (transitively) inherit from `tpe`.
    pub fn subtypes_of(&self, tpe: &str) -> Vec<&str> {
        self.types.subtree_pointing_to(tpe)
    }

    pub fn is_subtype_of(&self, tpe: &str, parent: &str) -> bool {
        tpe == parent || self.types.is_connected(tpe, parent)
    }
}

/// Built-in parser recognizing `(define (domain ...) ...)` documents.
#[derive(Clone, Debug)]
pub struct DomainParser {
    type_root: String,
}

impl DomainParser {
    pub fn new(type_root: impl Into<String>) -> Self {
        Self {
            type_root: type_root.into(),
        }
    }

    pub fn read(&self, input: &ParseInput<'_>) -> Option<DomainInfo> {
        let name = declared_name(input.syntax_tree, "domain")?;
        // declared_name succeeded, hence `define` is present
        let define = input.syntax_tree.root().first_open_bracket_ignore_case("define")?;

        let requirements = define
            .first_open_bracket_ignore_case(":requirements")
            .map(|req| {
                req.significant_children()
                    .filter(|c| c.is_token())
                    .skip(1)
                    .map(|c| c.text().to_string())
                    .collect()
            })
            .unwrap_or_default();
        let types = define
            .first_open_bracket_ignore_case(":types")
            .map(|types| parse_inheritance_with_root(&types.non_comment_text_after_keyword(), &self.type_root))
            .unwrap_or_default();
        let constants = define
            .first_open_bracket_ignore_case(":constants")
            .map(|c| parse_type_objects(&c.non_comment_text_after_keyword()))
            .unwrap_or_default();

        Some(DomainInfo {
            name: name.map(|n| n.text().to_string()),
            name_range: name.map(|n| n.range(input.position_resolver)),
            requirements,
            types,
            constants,
        })
    }
}

impl Default for DomainParser {
    fn default() -> Self {
        Self::new(DEFAULT_TYPE_ROOT)
    }
}

#[async_trait]
impl PddlFileParser for DomainParser {
    fn name(&self) -> &str {
        "domain"
    }

    async fn try_parse(&self, input: &ParseInput<'_>) -> Res<Option<FileKind>> {
        if input.language != PddlLanguage::Pddl {
            return Ok(None);
        }
        Ok(self.read(input).map(FileKind::Domain))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::{DocumentPositionResolver, Position};
    use crate::syntax::SyntaxTree;

    fn read(text: &str) -> Option<DomainInfo> {
        let tree = SyntaxTree::parse(text);
        let resolver = DocumentPositionResolver::new(text);
        let input = ParseInput::new("file:///tmp/domain.pddl", 1, PddlLanguage::Pddl, &tree, &resolver);
        DomainParser::default().read(&input)
    }

    #[test]
    fn full_domain() {
        let domain = read(
            "(define (domain logistics)
  (:requirements :strips :TYPING)
  (:types truck airplane - vehicle ; comment - ignored
     package vehicle - physobj location)
  (:constants hq - location)
  (:predicates (at ?x - physobj ?l - location)))",
        )
        .unwrap();
        assert_eq!(domain.name.as_deref(), Some("logistics"));
        assert!(domain.is_named("LOGISTICS"));
        assert_eq!(domain.name_range.unwrap().start, Position::new(0, 16));
        assert_eq!(domain.requirements, vec![":strips", ":TYPING"]);
        assert!(domain.has_requirement(":typing"));
        assert_eq!(domain.types.vertices_with_edges_from("truck"), vec!["vehicle"]);
        assert_eq!(domain.types.vertices_with_edges_from("physobj"), vec!["object"]);
        assert_eq!(domain.types.vertices_with_edges_from("location"), vec!["object"]);
        assert!(!domain.types.has_vertex("ignored"));
        assert!(domain.is_subtype_of("truck", "physobj"));
        assert!(!domain.is_subtype_of("location", "physobj"));
        let mut subtypes = domain.subtypes_of("physobj");
        subtypes.sort();
        assert_eq!(subtypes, vec!["airplane", "package", "truck", "vehicle"]);
        assert_eq!(domain.constants.objects_of("location"), vec!["hq"]);
    }

    #[test]
    fn partial_domain() {
        let domain = read("(define (domain ").unwrap();
        assert!(domain.name.is_none());
        assert!(domain.requirements.is_empty());
        assert_eq!(domain.types.vertices().count(), 0);
    }

    #[test]
    fn not_a_domain() {
        assert!(read("(define (problem p1) (:domain d))").is_none());
        assert!(read("(move a b)").is_none());
    }
}
