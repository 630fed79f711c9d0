//! The set of files of a planning project.
//!
//! A [`Workspace`] stores one record per URI, recognizes each new version of a file with the first
//! matching parser, relates files to each other (problem to domain, plan to problem) and notifies
//! subscribers of every change. It is a plain value: independent workspaces can coexist.

mod events;
mod resolution;

pub use events::WorkspaceEvent;

use indexmap::IndexMap;
use std::sync::Arc;

use crate::config::WorkspaceConfig;
use crate::files::{DomainParser, FileInfo, FileKind, FileStatus, PddlLanguage, PlanParser, ProblemParser};
use crate::parsers::{self, ParseInput, PddlFileParser, PddlWorkspaceExtension};
use crate::position::{DocumentPositionResolver, PositionResolver};
use crate::syntax::SyntaxTree;
use events::{Subscriber, emit};

pub struct Workspace {
    config: WorkspaceConfig,
    /// Current record of each file, in order of first insertion.
    files: IndexMap<String, FileInfo>,
    extensions: Vec<Arc<dyn PddlWorkspaceExtension>>,
    /// Parsers contributed by the extensions, in registration order.
    extension_parsers: Vec<Arc<dyn PddlFileParser>>,
    /// Parsers registered directly on the workspace.
    parsers: Vec<Arc<dyn PddlFileParser>>,
    builtin_parsers: Vec<Arc<dyn PddlFileParser>>,
    subscribers: Vec<Subscriber>,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

impl Workspace {
    pub fn new() -> Self {
        Self::with_config(WorkspaceConfig::default())
    }

    pub fn with_config(config: WorkspaceConfig) -> Self {
        let builtin_parsers: Vec<Arc<dyn PddlFileParser>> = if config.builtin_parsers {
            vec![
                Arc::new(DomainParser::new(config.type_root.clone())),
                Arc::new(ProblemParser),
                Arc::new(PlanParser),
            ]
        } else {
            Vec::new()
        };
        Workspace {
            config,
            files: IndexMap::new(),
            extensions: Vec::new(),
            extension_parsers: Vec::new(),
            parsers: Vec::new(),
            builtin_parsers,
            subscribers: Vec::new(),
        }
    }

    pub fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    /// Registers an extension. Its parsers are tried after those of previously registered
    /// extensions and before any directly registered parser.
    pub fn add_extension(&mut self, extension: Arc<dyn PddlWorkspaceExtension>) {
        if let Some(parsers) = extension.pddl_parsers() {
            tracing::debug!("registering {} parser(s) from extension", parsers.len());
            self.extension_parsers.extend(parsers);
        }
        self.extensions.push(extension);
    }

    pub fn extensions(&self) -> &[Arc<dyn PddlWorkspaceExtension>] {
        &self.extensions
    }

    /// Registers a parser, tried after the extension parsers and the previously added parsers but
    /// before the built-in ones.
    pub fn add_pddl_file_parser(&mut self, parser: Arc<dyn PddlFileParser>) {
        self.parsers.push(parser);
    }

    pub fn add_pddl_file_parsers(&mut self, parsers: impl IntoIterator<Item = Arc<dyn PddlFileParser>>) {
        self.parsers.extend(parsers);
    }

    /// Registers a callback invoked synchronously on every [`WorkspaceEvent`], after the
    /// previously registered callbacks.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&WorkspaceEvent<'_>) + Send + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// All parsers in priority order.
    fn parser_chain(&self) -> Vec<Arc<dyn PddlFileParser>> {
        self.extension_parsers
            .iter()
            .chain(self.parsers.iter())
            .chain(self.builtin_parsers.iter())
            .cloned()
            .collect()
    }

    /// Stores a new version of a file.
    ///
    /// If the workspace already holds the same or a newer version of the file, nothing happens and
    /// the existing record is returned. Otherwise the file is tree-built and recognized by the
    /// first matching parser, the new record replaces the previous one and an
    /// [`WorkspaceEvent::Inserted`] event is emitted before returning.
    ///
    /// If no position resolver is given, one is built from the text.
    pub async fn upsert_file(
        &mut self,
        uri: &str,
        language: PddlLanguage,
        version: i64,
        text: impl Into<String>,
        position_resolver: Option<Box<dyn PositionResolver>>,
    ) -> &FileInfo {
        if let Some(index) = self.stale_index(uri, version) {
            return &self.files[index];
        }
        self.insert(uri, language, version, text.into(), position_resolver, FileStatus::New)
            .await
    }

    /// Like [`Workspace::upsert_file`], but the returned record is marked as parsed.
    ///
    /// Parsers run at most once for a given URI and version: calling this again with an already
    /// seen version returns the existing record, only promoting it to [`FileStatus::Parsed`] if it
    /// was [`FileStatus::New`] or [`FileStatus::Dirty`]. Files that no parser recognizes stay
    /// [`FileStatus::Unknown`].
    pub async fn upsert_and_parse_file(
        &mut self,
        uri: &str,
        language: PddlLanguage,
        version: i64,
        text: impl Into<String>,
        position_resolver: Option<Box<dyn PositionResolver>>,
    ) -> &FileInfo {
        if let Some(index) = self.stale_index(uri, version) {
            let status = self.files[index].status();
            if self.files[index].version() == version && matches!(status, FileStatus::New | FileStatus::Dirty) {
                self.files[index].set_status(FileStatus::Parsed);
                emit(&mut self.subscribers, WorkspaceEvent::Updated(&self.files[index]));
            }
            return &self.files[index];
        }
        self.insert(uri, language, version, text.into(), position_resolver, FileStatus::Parsed)
            .await
    }

    /// Index of the record of `uri` if it is at least as recent as `version`.
    fn stale_index(&self, uri: &str, version: i64) -> Option<usize> {
        let index = self.files.get_index_of(uri)?;
        let existing = self.files[index].version();
        if existing >= version {
            tracing::trace!("ignoring version {version} of {uri}: version {existing} is already known");
            Some(index)
        } else {
            None
        }
    }

    async fn insert(
        &mut self,
        uri: &str,
        language: PddlLanguage,
        version: i64,
        text: String,
        position_resolver: Option<Box<dyn PositionResolver>>,
        status: FileStatus,
    ) -> &FileInfo {
        let tree = SyntaxTree::parse(text);
        let resolver = position_resolver.unwrap_or_else(|| Box::new(DocumentPositionResolver::new(tree.text())));

        let parsers = self.parser_chain();
        let input = ParseInput::new(uri, version, language, &tree, resolver.as_ref());
        let kind = parsers::dispatch(&parsers, &input).await;

        let status = match kind {
            FileKind::Unknown => FileStatus::Unknown,
            _ => status,
        };
        let file = FileInfo::new(uri, version, language, status, tree, resolver, kind);
        tracing::debug!("storing {} v{} as {} ({})", uri, version, file.kind().name(), status);
        let (index, previous) = self.files.insert_full(uri.to_string(), file);
        emit(&mut self.subscribers, WorkspaceEvent::Inserted(&self.files[index]));

        // only a new version of a known domain invalidates its problems
        if self.config.dirty_dependents && previous.is_some() && self.files[index].is_domain() {
            self.mark_dependents_dirty(index);
        }
        &self.files[index]
    }

    /// Marks as dirty the parsed problems that refer to the domain stored at `domain_index`.
    fn mark_dependents_dirty(&mut self, domain_index: usize) {
        let Some(domain_name) = self.files[domain_index].as_domain().and_then(|d| d.name.clone()) else {
            return;
        };
        let dependents: Vec<usize> = self
            .files
            .values()
            .enumerate()
            .filter(|(_, f)| f.status() == FileStatus::Parsed)
            .filter(|(_, f)| f.as_problem().is_some_and(|p| p.refers_to_domain(&domain_name)))
            .map(|(i, _)| i)
            .collect();
        for i in dependents {
            tracing::debug!("{} is dirty: domain {domain_name} changed", self.files[i].uri());
            self.files[i].set_status(FileStatus::Dirty);
            emit(&mut self.subscribers, WorkspaceEvent::Updated(&self.files[i]));
        }
    }

    /// Removes the file from the workspace. A [`WorkspaceEvent::Removed`] event is emitted
    /// before the record is dropped. Returns false if the file was unknown.
    pub fn remove_file(&mut self, uri: &str) -> bool {
        let Some(index) = self.files.get_index_of(uri) else {
            return false;
        };
        emit(&mut self.subscribers, WorkspaceEvent::Removed(&self.files[index]));
        self.files.shift_remove_index(index);
        true
    }

    pub fn has_file(&self, uri: &str) -> bool {
        self.files.contains_key(uri)
    }

    pub fn get_file(&self, uri: &str) -> Option<&FileInfo> {
        self.files.get(uri)
    }

    /// All files, in the order in which they were first inserted.
    pub fn get_all_files(&self) -> Vec<&FileInfo> {
        self.files.values().collect()
    }

    pub fn get_domain_files(&self) -> Vec<&FileInfo> {
        self.files.values().filter(|f| f.is_domain()).collect()
    }

    pub fn get_problem_files(&self) -> Vec<&FileInfo> {
        self.files.values().filter(|f| f.is_problem()).collect()
    }

    pub fn get_plan_files(&self) -> Vec<&FileInfo> {
        self.files.values().filter(|f| f.is_plan()).collect()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Last segment of the path of `uri`, whatever its scheme.
    pub fn file_name(uri: &str) -> String {
        crate::uri::file_name(uri)
    }

    /// Path of the folder containing `uri`, whatever its scheme.
    pub fn folder_path(uri: &str) -> String {
        crate::uri::folder_path(uri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[tokio::test]
    async fn stale_versions_are_ignored() {
        let mut ws = Workspace::new();
        let uri = "file:///tmp/domain.pddl";
        ws.upsert_file(uri, PddlLanguage::Pddl, 2, "(define (domain a))", None).await;
        let file = ws.upsert_file(uri, PddlLanguage::Pddl, 1, "(define (domain b))", None).await;
        assert_eq!(file.version(), 2);
        assert_eq!(file.as_domain().unwrap().name.as_deref(), Some("a"));
        let file = ws.upsert_file(uri, PddlLanguage::Pddl, 3, "(define (domain c))", None).await;
        assert_eq!(file.as_domain().unwrap().name.as_deref(), Some("c"));
        assert_eq!(ws.len(), 1);
    }

    #[tokio::test]
    async fn statuses() {
        let mut ws = Workspace::new();
        let uri = "file:///tmp/p.pddl";
        let file = ws.upsert_file(uri, PddlLanguage::Pddl, 1, "(define (problem p))", None).await;
        assert_eq!(file.status(), FileStatus::New);
        let file = ws.upsert_and_parse_file(uri, PddlLanguage::Pddl, 1, "(define (problem p))", None).await;
        assert_eq!(file.status(), FileStatus::Parsed);

        let file = ws.upsert_and_parse_file("file:///tmp/x.pddl", PddlLanguage::Pddl, 1, "hello", None).await;
        assert_eq!(file.status(), FileStatus::Unknown);
        assert!(file.is_unknown());
    }

    #[tokio::test]
    async fn events_are_emitted_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut ws = Workspace::new();
        for tag in ["first", "second"] {
            let log = log.clone();
            ws.subscribe(move |e| log.lock().unwrap().push(format!("{tag}:{}:{}", e.name(), e.file().version())));
        }
        let uri = "file:///tmp/domain.pddl";
        ws.upsert_file(uri, PddlLanguage::Pddl, 1, "(define (domain d))", None).await;
        ws.upsert_file(uri, PddlLanguage::Pddl, 1, "(define (domain d))", None).await;
        ws.upsert_and_parse_file(uri, PddlLanguage::Pddl, 1, "(define (domain d))", None).await;
        assert!(ws.remove_file(uri));
        assert!(!ws.remove_file(uri));
        assert_eq!(
            *log.lock().unwrap(),
            vec![
                "first:inserted:1",
                "second:inserted:1",
                "first:updated:1",
                "second:updated:1",
                "first:removed:1",
                "second:removed:1",
            ]
        );
    }

    #[tokio::test]
    async fn replaced_files_keep_their_rank() {
        let mut ws = Workspace::new();
        ws.upsert_file("file:///a.pddl", PddlLanguage::Pddl, 1, "(define (domain a))", None).await;
        ws.upsert_file("file:///b.pddl", PddlLanguage::Pddl, 1, "(define (domain b))", None).await;
        ws.upsert_file("file:///a.pddl", PddlLanguage::Pddl, 2, "(define (domain a2))", None).await;
        let uris: Vec<&str> = ws.get_all_files().iter().map(|f| f.uri()).collect();
        assert_eq!(uris, vec!["file:///a.pddl", "file:///b.pddl"]);
        ws.remove_file("file:///a.pddl");
        assert_eq!(ws.get_all_files().len(), 1);
        assert!(!ws.has_file("file:///a.pddl"));
    }

    #[tokio::test]
    async fn without_builtin_parsers() {
        let config = WorkspaceConfig {
            builtin_parsers: false,
            ..WorkspaceConfig::default()
        };
        let mut ws = Workspace::with_config(config);
        let file = ws.upsert_file("file:///a.pddl", PddlLanguage::Pddl, 1, "(define (domain a))", None).await;
        assert!(file.is_unknown());
    }

    #[tokio::test]
    async fn domain_update_marks_problems_dirty() {
        let mut ws = Workspace::new();
        let problem = "file:///ws/p01.pddl";
        ws.upsert_and_parse_file(problem, PddlLanguage::Pddl, 1, "(define (problem p01) (:domain d))", None)
            .await;
        ws.upsert_and_parse_file("file:///ws/other.pddl", PddlLanguage::Pddl, 1, "(define (problem o) (:domain x))", None)
            .await;
        ws.upsert_file("file:///ws/domain.pddl", PddlLanguage::Pddl, 1, "(define (domain D))", None).await;
        assert_eq!(ws.get_file(problem).unwrap().status(), FileStatus::Parsed);
        ws.upsert_file("file:///ws/domain.pddl", PddlLanguage::Pddl, 2, "(define (domain D))", None).await;
        assert_eq!(ws.get_file(problem).unwrap().status(), FileStatus::Dirty);
        assert_eq!(ws.get_file("file:///ws/other.pddl").unwrap().status(), FileStatus::Parsed);

        // re-parsing the same version does not run parsers again, but clears the flag
        let file = ws.upsert_and_parse_file(problem, PddlLanguage::Pddl, 1, "", None).await;
        assert_eq!(file.status(), FileStatus::Parsed);
        assert_eq!(file.as_problem().unwrap().name.as_deref(), Some("p01"));
    }

    #[tokio::test]
    async fn first_domain_version_leaves_problems_parsed() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let mut ws = Workspace::new();
        let problem = "file:///ws/p01.pddl";
        ws.upsert_and_parse_file(problem, PddlLanguage::Pddl, 1, "(define (problem p01) (:domain d))", None)
            .await;
        let log = events.clone();
        ws.subscribe(move |e| log.lock().unwrap().push(e.name()));

        ws.upsert_and_parse_file("file:///ws/domain.pddl", PddlLanguage::Pddl, 1, "(define (domain d))", None)
            .await;
        assert_eq!(ws.get_file(problem).unwrap().status(), FileStatus::Parsed);
        assert_eq!(*events.lock().unwrap(), vec!["inserted"]);

        // a domain under another uri is not a new version of the first one
        ws.upsert_file("file:///other/domain.pddl", PddlLanguage::Pddl, 1, "(define (domain d))", None)
            .await;
        assert_eq!(ws.get_file(problem).unwrap().status(), FileStatus::Parsed);
    }

    #[tokio::test]
    async fn custom_position_resolver() {
        struct Fixed;
        impl PositionResolver for Fixed {
            fn resolve_to_position(&self, _offset: usize) -> crate::Position {
                crate::Position::new(42, 0)
            }
            fn resolve_to_offset(&self, _position: crate::Position) -> usize {
                0
            }
        }
        let mut ws = Workspace::new();
        let file = ws
            .upsert_file("file:///d.pddl", PddlLanguage::Pddl, 1, "(define (domain d))", Some(Box::new(Fixed)))
            .await;
        assert_eq!(file.as_domain().unwrap().name_range.unwrap().start.line, 42);
        assert_eq!(file.position_resolver().resolve_to_position(3).line, 42);
    }
}
