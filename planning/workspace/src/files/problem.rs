use async_trait::async_trait;

use crate::Res;
use crate::files::{FileKind, PddlLanguage, declared_name};
use crate::parsers::{ParseInput, PddlFileParser};
use crate::position::PddlRange;
use crate::types::{TypeObjectMap, parse_type_objects};

/// Structure of a PDDL problem file.
#[derive(Clone, Debug, Default)]
pub struct ProblemInfo {
    pub name: Option<String>,
    pub name_range: Option<PddlRange>,
    /// Name of the domain given in the `(:domain ...)` section.
    pub domain_name: Option<String>,
    pub objects: TypeObjectMap,
}

impl ProblemInfo {
    pub fn is_named(&self, name: &str) -> bool {
        self.name.as_deref().is_some_and(|n| n.eq_ignore_ascii_case(name))
    }

    /// True if the problem declares that it belongs to the domain `domain_name` (ignoring case).
    pub fn refers_to_domain(&self, domain_name: &str) -> bool {
        self.domain_name
            .as_deref()
            .is_some_and(|d| d.eq_ignore_ascii_case(domain_name))
    }
}

/// Built-in parser recognizing `(define (problem ...) ...)` documents.
#[derive(Clone, Debug, Default)]
pub struct ProblemParser;

impl ProblemParser {
    pub fn read(&self, input: &ParseInput<'_>) -> Option<ProblemInfo> {
        let name = declared_name(input.syntax_tree, "problem")?;
        let define = input.syntax_tree.root().first_open_bracket_ignore_case("define")?;

        let domain_name = define
            .first_open_bracket_ignore_case(":domain")
            .and_then(|d| d.significant_children().filter(|c| c.is_token()).nth(1))
            .map(|d| d.text().to_string());
        let objects = define
            .first_open_bracket_ignore_case(":objects")
            .map(|o| parse_type_objects(&o.non_comment_text_after_keyword()))
            .unwrap_or_default();

        Some(ProblemInfo {
            name: name.map(|n| n.text().to_string()),
            name_range: name.map(|n| n.range(input.position_resolver)),
            domain_name,
            objects,
        })
    }
}

#[async_trait]
impl PddlFileParser for ProblemParser {
    fn name(&self) -> &str {
        "problem"
    }

    async fn try_parse(&self, input: &ParseInput<'_>) -> Res<Option<FileKind>> {
        if input.language != PddlLanguage::Pddl {
            return Ok(None);
        }
        Ok(self.read(input).map(FileKind::Problem))
    }
}
