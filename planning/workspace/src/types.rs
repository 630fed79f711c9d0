//! Type inheritance and typed object declarations.
//!
//! Both `(:types ...)` and `(:objects ...)`/`(:constants ...)` sections use the same typed-list
//! syntax: `a b - t1 c - t2 d`, where `a` and `b` are of type `t1`, `c` of type `t2` and `d` has
//! no declared type.

use indexmap::{IndexMap, IndexSet};
use std::fmt::{Display, Formatter};

use crate::config::DEFAULT_TYPE_ROOT;
use crate::graph::DirectionalGraph;
use crate::utils::canonical;

/// A group of names sharing the same declared parent (`None` for names declared without one).
struct TypedGroup<'a> {
    names: Vec<&'a str>,
    parent: Option<&'a str>,
}

/// Splits a typed list into its groups. Whitespace and line breaks are plain separators.
fn typed_groups(declaration: &str) -> Vec<TypedGroup<'_>> {
    let mut groups = Vec::new();
    let mut pending = Vec::new();
    let mut tokens = declaration.split_whitespace();
    while let Some(token) = tokens.next() {
        if token == "-" {
            // a dangling `-` at the end of the text (e.g. while typing) leaves the group untyped
            let parent = tokens.next();
            groups.push(TypedGroup {
                names: std::mem::take(&mut pending),
                parent,
            });
        } else {
            pending.push(token);
        }
    }
    if !pending.is_empty() {
        groups.push(TypedGroup {
            names: pending,
            parent: None,
        });
    }
    groups
}

/// Parses a type declaration into its inheritance graph, rooted in `object`.
pub fn parse_inheritance(declaration: &str) -> DirectionalGraph {
    parse_inheritance_with_root(declaration, DEFAULT_TYPE_ROOT)
}

/// Parses a type declaration (e.g. `child1 child2 - parent orphan`) into a graph with an edge
/// `child -> parent` for each declared inheritance.
///
/// Every type that is not declared as a child of another type (declared parents and orphans)
/// additionally inherits from `root`. The root itself never inherits from anything.
pub fn parse_inheritance_with_root(declaration: &str, root: &str) -> DirectionalGraph {
    let mut graph = DirectionalGraph::new();
    for group in typed_groups(declaration) {
        for child in group.names {
            if child == root {
                graph.add_vertex(child);
                continue;
            }
            match group.parent {
                Some(parent) => graph.add_edge(child, parent),
                None => {
                    graph.add_vertex(child);
                }
            }
        }
    }
    let top_types: Vec<String> = graph
        .vertices()
        .filter(|v| *v != root && graph.vertices_with_edges_from(v).is_empty())
        .map(|v| v.to_string())
        .collect();
    for top in top_types {
        graph.add_edge(top, root);
    }
    graph
}

/// Parses object (or constant) declarations. Objects without a declared type are of type `object`.
pub fn parse_type_objects(declaration: &str) -> TypeObjectMap {
    let mut map = TypeObjectMap::new();
    for group in typed_groups(declaration) {
        let tpe = group.parent.unwrap_or(DEFAULT_TYPE_ROOT);
        map.add_all(tpe, group.names);
    }
    map
}

/// The objects declared for a given type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeObjects {
    /// Type name, as first declared.
    pub tpe: String,
    objects: IndexSet<String>,
}

impl TypeObjects {
    pub fn new(tpe: impl Into<String>) -> Self {
        Self {
            tpe: tpe.into(),
            objects: IndexSet::new(),
        }
    }

    pub fn add_object(&mut self, object: impl Into<String>) {
        self.objects.insert(object.into());
    }

    pub fn objects(&self) -> impl Iterator<Item = &str> {
        self.objects.iter().map(|o| o.as_str())
    }

    pub fn has_object(&self, object: &str) -> bool {
        self.objects.iter().any(|o| o.eq_ignore_ascii_case(object))
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

/// Map from type names (case-insensitive) to the objects declared with that type.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeObjectMap {
    types: IndexMap<String, TypeObjects>,
}

impl TypeObjectMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Groups each vertex of an object-to-type graph under its direct parent(s).
    pub fn from_graph(graph: &DirectionalGraph) -> Self {
        let mut map = Self::new();
        for (object, tpe) in graph.edges() {
            map.add(tpe, object);
        }
        map
    }

    pub fn add(&mut self, tpe: &str, object: impl Into<String>) {
        self.entry(tpe).add_object(object);
    }

    pub fn add_all<S: Into<String>>(&mut self, tpe: &str, objects: impl IntoIterator<Item = S>) {
        let entry = self.entry(tpe);
        for o in objects {
            entry.add_object(o);
        }
    }

    fn entry(&mut self, tpe: &str) -> &mut TypeObjects {
        self.types
            .entry(canonical(tpe))
            .or_insert_with(|| TypeObjects::new(tpe))
    }

    pub fn get(&self, tpe: &str) -> Option<&TypeObjects> {
        self.types.get(&canonical(tpe))
    }

    /// Objects of the given type, empty if the type is unknown.
    pub fn objects_of(&self, tpe: &str) -> Vec<&str> {
        self.get(tpe).map(|t| t.objects().collect()).unwrap_or_default()
    }

    /// Type under which `object` was declared, if any.
    pub fn type_of(&self, object: &str) -> Option<&str> {
        self.types
            .values()
            .find(|t| t.has_object(object))
            .map(|t| t.tpe.as_str())
    }

    /// Union of both maps. Types are matched case-insensitively; objects of `self` come first.
    pub fn merge(&self, other: &TypeObjectMap) -> TypeObjectMap {
        let mut merged = self.clone();
        for t in other.types.values() {
            merged.add_all(&t.tpe, t.objects());
        }
        merged
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeObjects> {
        self.types.values()
    }
}

impl Display for TypeObjectMap {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        crate::utils::disp_iter(
            f,
            self.iter()
                .map(|t| format!("{}: {}", t.tpe, itertools::join(t.objects(), " "))),
            "\n",
        )
    }
}
