use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::Res;
use crate::files::{FileKind, PddlLanguage};
use crate::parsers::{ParseInput, PddlFileParser};
use crate::syntax::SyntaxTree;

/// Matches meta-data comments such as `;;!domain: logistics`.
static META_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^;+\s*!\s*(domain|problem)\s*:\s*(\S+)").unwrap());

/// Domain and problem a plan (or happenings) file declares to be a solution for.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlanMeta {
    pub domain_name: Option<String>,
    pub problem_name: Option<String>,
}

impl PlanMeta {
    /// Reads the meta-data comments of the document. The first occurrence of each field wins.
    pub fn read(tree: &SyntaxTree) -> PlanMeta {
        let mut meta = PlanMeta::default();
        for comment in tree.root().find_descendants(|n| n.is_comment()) {
            let Some(captures) = META_COMMENT.captures(comment.text()) else {
                continue;
            };
            let field = match captures[1].to_ascii_lowercase().as_str() {
                "domain" => &mut meta.domain_name,
                _ => &mut meta.problem_name,
            };
            if field.is_none() {
                *field = Some(captures[2].to_string());
            }
        }
        meta
    }
}

/// Number of lines holding something else than whitespace or comments.
fn count_content_lines(tree: &SyntaxTree) -> usize {
    tree.root()
        .non_comment_text()
        .lines()
        .filter(|l| !l.trim().is_empty())
        .count()
}

/// A plan: a sequence of (possibly timed) action instances, one per line.
#[derive(Clone, Debug, Default)]
pub struct PlanInfo {
    pub meta: PlanMeta,
    /// Number of lines describing plan steps.
    pub steps: usize,
}

/// A sequence of happenings (action starts/ends and instantaneous actions), one per line.
#[derive(Clone, Debug, Default)]
pub struct HappeningsInfo {
    pub meta: PlanMeta,
    pub happenings: usize,
}

/// Built-in parser for line-oriented files: plans and happenings.
#[derive(Clone, Debug, Default)]
pub struct PlanParser;

impl PlanParser {
    fn starts_with_define(tree: &SyntaxTree) -> bool {
        tree.root()
            .significant_children()
            .next()
            .is_some_and(|first| first.is_bracket() && first.keyword().is_some_and(|k| k.eq_ignore_ascii_case("define")))
    }
}

#[async_trait]
impl PddlFileParser for PlanParser {
    fn name(&self) -> &str {
        "plan"
    }

    async fn try_parse(&self, input: &ParseInput<'_>) -> Res<Option<FileKind>> {
        if Self::starts_with_define(input.syntax_tree) {
            return Ok(None);
        }
        let looks_like_plan = PddlLanguage::from_file_name(input.uri) == Some(PddlLanguage::Plan);
        let kind = match input.language {
            PddlLanguage::Plan => FileKind::Plan(PlanInfo {
                meta: PlanMeta::read(input.syntax_tree),
                steps: count_content_lines(input.syntax_tree),
            }),
            PddlLanguage::Happenings => FileKind::Happenings(HappeningsInfo {
                meta: PlanMeta::read(input.syntax_tree),
                happenings: count_content_lines(input.syntax_tree),
            }),
            PddlLanguage::Pddl if looks_like_plan => FileKind::Plan(PlanInfo {
                meta: PlanMeta::read(input.syntax_tree),
                steps: count_content_lines(input.syntax_tree),
            }),
            PddlLanguage::Pddl => return Ok(None),
        };
        Ok(Some(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::DocumentPositionResolver;

    const PLAN: &str = ";;!domain: Logistics
;;!problem: p01

0.001: (drive t1 l1 l2)  [10.000]
; Cost: 10.001
10.002: (unload t1 p1 l2)  [1.000]
";

    async fn parse(uri: &str, language: PddlLanguage, text: &str) -> Option<FileKind> {
        let tree = SyntaxTree::parse(text);
        let resolver = DocumentPositionResolver::new(text);
        let input = ParseInput::new(uri, 1, language, &tree, &resolver);
        PlanParser.try_parse(&input).await.unwrap()
    }

    #[test]
    fn meta_comments() {
        let meta = PlanMeta::read(&SyntaxTree::parse(PLAN));
        assert_eq!(meta.domain_name.as_deref(), Some("Logistics"));
        assert_eq!(meta.problem_name.as_deref(), Some("p01"));
        assert_eq!(PlanMeta::read(&SyntaxTree::parse("(a b)")), PlanMeta::default());
    }

    #[tokio::test]
    async fn plan_lines() {
        let Some(FileKind::Plan(plan)) = parse("file:///p01.plan", PddlLanguage::Plan, PLAN).await else {
            panic!("expected a plan");
        };
        assert_eq!(plan.steps, 2);
        assert_eq!(plan.meta.problem_name.as_deref(), Some("p01"));
    }

    #[tokio::test]
    async fn happenings() {
        let text = ";;!problem: p01\n0.001: start (a)\n1.000: end (a)\n";
        let Some(FileKind::Happenings(h)) = parse("file:///p01.happenings", PddlLanguage::Happenings, text).await else {
            panic!("expected happenings");
        };
        assert_eq!(h.happenings, 2);
    }

    #[tokio::test]
    async fn define_forms_are_not_plans() {
        assert!(parse("file:///d.plan", PddlLanguage::Plan, "(define (domain d))").await.is_none());
        assert!(parse("file:///x.pddl", PddlLanguage::Pddl, "(move a b)").await.is_none());
        assert!(parse("file:///x.plan", PddlLanguage::Pddl, "(move a b)").await.is_some());
    }
}
