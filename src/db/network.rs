// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Network extraction: nodes joined by arcs form one net.

use std::collections::BTreeMap;

use super::{ArcId, Cell, NodeId, Technology};
use crate::natural::natural_cmp;

#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    pub name: String,
    pub nodes: Vec<NodeId>,
    pub arcs: Vec<ArcId>,
}

struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
        }
    }

    fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            self.parent[rb] = ra;
        }
    }
}

/// Enumerates the electrical networks of `cell`.
///
/// A net is named after its first export (numeric-aware order), else its first
/// arc, else `net@<n>`. Non-electrical nodes (artwork) only form a net when an
/// arc or export touches them.
pub fn networks(cell: &Cell, tech: &Technology) -> Vec<Network> {
    let mut sets = DisjointSet::new(cell.nodes.len());
    for arc in &cell.arcs {
        if arc.head.0 < cell.nodes.len() && arc.tail.0 < cell.nodes.len() {
            sets.union(arc.head.0, arc.tail.0);
        }
    }

    let mut groups: BTreeMap<usize, Network> = BTreeMap::new();
    for (i, node) in cell.nodes.iter().enumerate() {
        let touched = cell.arcs.iter().any(|a| a.head.0 == i || a.tail.0 == i)
            || cell.exports.iter().any(|e| e.node.0 == i);
        if !tech.is_electrical(&node.proto) && !touched {
            continue;
        }
        let root = sets.find(i);
        groups
            .entry(root)
            .or_insert_with(|| Network {
                name: String::new(),
                nodes: Vec::new(),
                arcs: Vec::new(),
            })
            .nodes
            .push(NodeId(i));
    }
    for (i, arc) in cell.arcs.iter().enumerate() {
        if arc.head.0 >= cell.nodes.len() {
            continue;
        }
        let root = sets.find(arc.head.0);
        if let Some(net) = groups.get_mut(&root) {
            net.arcs.push(ArcId(i));
        }
    }

    let mut unnamed = 0;
    let mut result = Vec::with_capacity(groups.len());
    for (_, mut net) in groups {
        let export_name = cell
            .exports
            .iter()
            .filter(|e| net.nodes.contains(&e.node))
            .map(|e| e.name.as_str())
            .min_by(|a, b| natural_cmp(a, b));
        let arc_name = net
            .arcs
            .iter()
            .filter_map(|id| cell.arc(*id))
            .map(|a| a.name.as_str())
            .filter(|name| !name.is_empty())
            .min_by(|a, b| natural_cmp(a, b));
        net.name = match export_name.or(arc_name) {
            Some(name) => name.to_string(),
            None => {
                unnamed += 1;
                format!("net@{}", unnamed)
            }
        };
        result.push(net);
    }
    result
}
