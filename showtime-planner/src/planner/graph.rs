//! Forward feasibility graph over scheduled instances.
//!
//! Nodes are positions in the sorted instance list. An edge `i -> j`
//! (always `i < j`) means instance `j` can follow instance `i`. Edges are
//! stored compressed: one flat list, sliced per node by an offsets array.

use super::config::PlannerSettings;
use super::schedule::ScheduledInstance;
use super::transition::evaluate;

/// An outgoing edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    /// Position of the successor in the sorted instance list.
    pub to: u32,
    pub travel_mins: u32,
}

/// Compressed forward adjacency.
#[derive(Debug, Clone, Default)]
pub struct FeasibilityGraph {
    /// `offsets[i]..offsets[i + 1]` indexes the edges leaving node `i`.
    offsets: Vec<usize>,
    edges: Vec<Edge>,
}

impl FeasibilityGraph {
    /// Evaluate every ordered pair `(i, j)` with `i < j`.
    ///
    /// Quadratic in the number of instances; a few hundred is comfortable.
    pub fn build(instances: &[ScheduledInstance], settings: &PlannerSettings) -> Self {
        let n = instances.len();
        let mut offsets = Vec::with_capacity(n + 1);
        let mut edges = Vec::new();

        offsets.push(0);
        for (i, from) in instances.iter().enumerate() {
            for (j, to) in instances.iter().enumerate().skip(i + 1) {
                let transition = evaluate(from, to, settings);
                if transition.feasible {
                    edges.push(Edge {
                        to: j as u32,
                        travel_mins: transition.travel_mins,
                    });
                }
            }
            offsets.push(edges.len());
        }

        Self { offsets, edges }
    }

    /// Edges leaving node `node`, ascending by target.
    pub fn successors(&self, node: usize) -> &[Edge] {
        match (self.offsets.get(node), self.offsets.get(node + 1)) {
            (Some(&start), Some(&end)) => &self.edges[start..end],
            _ => &[],
        }
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EventEntry, Movie};
    use crate::planner::schedule::Schedule;

    fn schedule() -> Schedule {
        let movies = vec![
            Movie::new("a", "A", 60),
            Movie::new("b", "B", 60),
            Movie::new("c", "C", 60),
        ];
        let events = vec![
            EventEntry::new("e1", "a", "t1", "2024-03-15T10:00"),
            EventEntry::new("e2", "b", "t1", "2024-03-15T11:00"),
            EventEntry::new("e3", "c", "t2", "2024-03-15T11:10"),
        ];
        Schedule::build(&movies, &events)
    }

    #[test]
    fn builds_forward_edges_only() {
        let schedule = schedule();
        // No leeway, 15 minutes between theaters
        let graph = FeasibilityGraph::build(schedule.instances(), &PlannerSettings::new(0, 15, 5, 5));

        // e1 -> e2 (same theater, back to back); e1 -> e3 needs 11:15 <= 11:10
        assert_eq!(
            graph.successors(0),
            &[Edge {
                to: 1,
                travel_mins: 0
            }]
        );
        // e2 ends 12:00, long after e3 starts
        assert!(graph.successors(1).is_empty());
        assert!(graph.successors(2).is_empty());
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn leeway_adds_edges() {
        let schedule = schedule();
        let graph = FeasibilityGraph::build(schedule.instances(), &PlannerSettings::new(5, 15, 5, 5));

        assert_eq!(
            graph.successors(0),
            &[
                Edge {
                    to: 1,
                    travel_mins: 0
                },
                Edge {
                    to: 2,
                    travel_mins: 15
                },
            ]
        );
    }

    #[test]
    fn out_of_range_node_has_no_successors() {
        let graph = FeasibilityGraph::build(&[], &PlannerSettings::default());

        assert_eq!(graph.edge_count(), 0);
        assert!(graph.successors(0).is_empty());
        assert!(graph.successors(7).is_empty());
    }
}
