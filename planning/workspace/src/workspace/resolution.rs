//! Relations between the files of a workspace.

use itertools::Itertools;

use super::Workspace;
use crate::files::FileInfo;
use crate::uri;

/// Picks a candidate for `file` among the files matching by name: the first one in the same
/// folder if any, otherwise the first one.
fn closest<'a>(file: &FileInfo, candidates: Vec<&'a FileInfo>, what: &str) -> Option<&'a FileInfo> {
    let folder = uri::folder_path(file.uri());
    if let Some(local) = candidates.iter().find(|c| uri::folder_path(c.uri()) == folder) {
        return Some(*local);
    }
    let first = *candidates.first()?;
    if candidates.len() > 1 {
        tracing::warn!(
            "ambiguous {what} for {}: candidates [{}], none in folder '{folder}', picking {}",
            file.uri(),
            candidates.iter().map(|c| c.uri()).join(", "),
            first.uri()
        );
    }
    Some(first)
}

impl Workspace {
    /// Domain file whose declared name matches the `(:domain ...)` reference of the problem.
    ///
    /// When several domains share that name, one in the folder of the problem is preferred.
    pub fn get_domain_file_for(&self, problem: &FileInfo) -> Option<&FileInfo> {
        let domain_name = problem.as_problem()?.domain_name.as_deref()?;
        let candidates = self
            .files
            .values()
            .filter(|f| f.as_domain().is_some_and(|d| d.is_named(domain_name)))
            .collect_vec();
        closest(problem, candidates, "domain")
    }

    /// Problem files referring to the declared name of `domain`.
    pub fn get_problem_files_for(&self, domain: &FileInfo) -> Vec<&FileInfo> {
        let Some(domain_name) = domain.as_domain().and_then(|d| d.name.as_deref()) else {
            return Vec::new();
        };
        self.files
            .values()
            .filter(|f| f.as_problem().is_some_and(|p| p.refers_to_domain(domain_name)))
            .collect()
    }

    /// Problem file named by the `;;!problem:` meta comment of a plan (or happenings) file.
    ///
    /// If the plan also names its domain, only problems of that domain are considered. Problems
    /// in the folder of the plan are preferred.
    pub fn get_problem_file_for_plan(&self, plan: &FileInfo) -> Option<&FileInfo> {
        let meta = match (plan.as_plan(), plan.as_happenings()) {
            (Some(p), _) => &p.meta,
            (None, Some(h)) => &h.meta,
            (None, None) => return None,
        };
        let problem_name = meta.problem_name.as_deref()?;
        let candidates = self
            .files
            .values()
            .filter(|f| {
                f.as_problem().is_some_and(|p| {
                    p.is_named(problem_name) && meta.domain_name.as_deref().is_none_or(|d| p.refers_to_domain(d))
                })
            })
            .collect_vec();
        closest(plan, candidates, "problem")
    }
}
