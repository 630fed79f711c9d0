//! Syntax tree engine and incremental multi-file workspace for PDDL projects.
//!
//! The crate turns (possibly malformed) PDDL text into a bracket tree that never fails to build,
//! maps offsets to line/column positions, and keeps a versioned model of every file of a planning
//! project (domains, problems, plans, ...). Files are recognized by a chain of parsers: parsers
//! contributed by extensions first, then directly registered parsers, then the built-in ones.

pub mod config;
pub mod errors;
pub mod files;
pub mod graph;
pub mod parsers;
pub mod position;
pub mod syntax;
pub mod types;
pub mod uri;
pub(crate) mod utils;
pub mod workspace;

pub use config::WorkspaceConfig;
pub use errors::SyntaxError;
pub use files::*;
pub use graph::DirectionalGraph;
pub use parsers::{ParseInput, PddlFileParser, PddlWorkspaceExtension};
pub use position::{DocumentPositionResolver, PddlRange, Position, PositionResolver};
pub use syntax::{NodeId, NodeKind, SyntaxNode, SyntaxTree, TerminalKind};
pub use types::{TypeObjectMap, TypeObjects};
pub use workspace::{Workspace, WorkspaceEvent};

pub type Res<T> = anyhow::Result<T>;
