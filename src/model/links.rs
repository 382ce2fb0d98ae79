// ABOUTME: Creation-time dependency graph between containers.
// ABOUTME: Maps a container name to the names of containers it links to.

use serde::Deserialize;
use std::collections::HashMap;

/// Multimap from container name to its link targets.
///
/// Only consulted while building create requests; the daemon keeps no memory
/// of this structure beyond the link entries it produces.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct DependencyGraph {
    edges: HashMap<String, Vec<String>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn link(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.edges.entry(from.into()).or_default().push(to.into());
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Link targets for `name`, deduplicated preserving first occurrence.
    pub fn targets(&self, name: &str) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        if let Some(targets) = self.edges.get(name) {
            for target in targets {
                if !out.contains(&target.as_str()) {
                    out.push(target.as_str());
                }
            }
        }
        out
    }

    /// All (source, targets) pairs, for reference validation.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.edges.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Order `names` so every container comes after the containers it links
    /// to. Targets outside `names` are ignored (manifest validation rejects
    /// them before this runs). Fails on a link cycle.
    pub fn creation_order(&self, names: &[String]) -> Result<Vec<String>, String> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            InProgress,
            Done,
        }

        fn visit(
            name: &str,
            graph: &DependencyGraph,
            known: &[String],
            marks: &mut HashMap<String, Mark>,
            out: &mut Vec<String>,
        ) -> Result<(), String> {
            match marks.get(name) {
                Some(Mark::Done) => return Ok(()),
                Some(Mark::InProgress) => {
                    return Err(format!("link cycle involving container {}", name));
                }
                None => {}
            }
            marks.insert(name.to_string(), Mark::InProgress);
            for target in graph.targets(name) {
                if known.iter().any(|n| n == target) {
                    visit(target, graph, known, marks, out)?;
                }
            }
            marks.insert(name.to_string(), Mark::Done);
            out.push(name.to_string());
            Ok(())
        }

        let mut marks = HashMap::new();
        let mut out = Vec::with_capacity(names.len());
        for name in names {
            visit(name, self, names, &mut marks, &mut out)?;
        }
        Ok(out)
    }
}
