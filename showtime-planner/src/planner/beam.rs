//! Beam search over feasible chains.
//!
//! Search proceeds in layers, one per chain length. Layer 1 holds a chain
//! for every instance, unpruned, so each showing is always a candidate on
//! its own. Each later layer extends the previous beam by one showing and
//! keeps only the best `beam_width` extensions. Every chain that makes
//! it into a beam is itself a finished candidate, so shorter days compete
//! with longer ones at ranking time.
//!
//! Chains live in an arena as parent-linked nodes, so extending a chain
//! costs one small node rather than a copy of its path.

use std::cmp::Ordering;

use fixedbitset::FixedBitSet;
use tracing::trace;

use super::graph::FeasibilityGraph;
use super::schedule::Schedule;
use super::score::preference;

/// One chain, stored as its last showing plus a link to its prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ChainNode {
    /// Position of the last showing in the sorted instance list.
    pub instance: u32,
    /// Arena index of the chain without its last showing.
    pub parent: Option<u32>,
    pub len: u32,
    pub score: i64,
    pub travel_mins: u32,
}

/// Every chain that entered a beam, in the order it did.
#[derive(Debug, Clone, Default)]
pub(crate) struct ChainArena {
    nodes: Vec<ChainNode>,
}

impl ChainArena {
    pub fn nodes(&self) -> &[ChainNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Instance positions of the chain ending at `node`, first to last.
    pub fn path(&self, node: u32) -> Vec<u32> {
        let mut path = Vec::with_capacity(self.nodes[node as usize].len as usize);
        let mut cursor = Some(node);
        while let Some(idx) = cursor {
            let n = &self.nodes[idx as usize];
            path.push(n.instance);
            cursor = n.parent;
        }
        path.reverse();
        path
    }

    fn push(&mut self, node: ChainNode) -> u32 {
        self.nodes.push(node);
        (self.nodes.len() - 1) as u32
    }
}

/// Result of a search run.
#[derive(Debug, Clone, Default)]
pub(crate) struct SearchOutcome {
    pub chains: ChainArena,
    /// Layers that produced a non-empty beam.
    pub layers: usize,
    /// Extensions generated before beam pruning.
    pub expansions: usize,
}

/// Beam search over one schedule's feasibility graph.
pub(crate) struct BeamSearch<'a> {
    schedule: &'a Schedule,
    graph: &'a FeasibilityGraph,
    beam_width: usize,
}

impl<'a> BeamSearch<'a> {
    pub fn new(schedule: &'a Schedule, graph: &'a FeasibilityGraph, beam_width: usize) -> Self {
        Self {
            schedule,
            graph,
            beam_width,
        }
    }

    pub fn run(&self) -> SearchOutcome {
        let instances = self.schedule.instances();
        let max_len = instances.len();
        let mut outcome = SearchOutcome::default();

        let mut candidates: Vec<ChainNode> = instances
            .iter()
            .enumerate()
            .map(|(i, instance)| ChainNode {
                instance: i as u32,
                parent: None,
                len: 1,
                score: preference(instance.rank),
                travel_mins: 0,
            })
            .collect();
        // Seeds are ordered, never truncated.
        candidates.sort_unstable_by(|a, b| self.compare(a, b));

        // Scratch membership sets, refilled for each chain we expand.
        let mut used_movies = FixedBitSet::with_capacity(self.schedule.movie_slots());
        let mut used_events = FixedBitSet::with_capacity(self.schedule.event_slots());

        while !candidates.is_empty() {
            let beam: Vec<u32> = candidates
                .drain(..)
                .map(|node| outcome.chains.push(node))
                .collect();
            outcome.layers += 1;
            trace!(layer = outcome.layers, beam = beam.len(), "beam layer");

            if outcome.layers >= max_len {
                break;
            }

            for &idx in &beam {
                let node = outcome.chains.nodes[idx as usize];
                self.mark_used(&outcome.chains, idx, &mut used_movies, &mut used_events);

                for edge in self.graph.successors(node.instance as usize) {
                    let next = &instances[edge.to as usize];
                    if used_movies.contains(next.movie_slot as usize)
                        || used_events.contains(next.event_slot as usize)
                    {
                        continue;
                    }

                    candidates.push(ChainNode {
                        instance: edge.to,
                        parent: Some(idx),
                        len: node.len + 1,
                        score: node.score + preference(next.rank),
                        travel_mins: node.travel_mins.saturating_add(edge.travel_mins),
                    });
                }
            }
            outcome.expansions += candidates.len();
            self.keep_best(&mut candidates);
        }

        outcome
    }

    /// Fill the scratch sets with the movies and events on a chain.
    fn mark_used(
        &self,
        chains: &ChainArena,
        node: u32,
        movies: &mut FixedBitSet,
        events: &mut FixedBitSet,
    ) {
        let instances = self.schedule.instances();
        movies.clear();
        events.clear();

        let mut cursor = Some(node);
        while let Some(idx) = cursor {
            let n = &chains.nodes[idx as usize];
            let instance = &instances[n.instance as usize];
            movies.insert(instance.movie_slot as usize);
            events.insert(instance.event_slot as usize);
            cursor = n.parent;
        }
    }

    /// Keep the best `beam_width` candidates, best first.
    fn keep_best(&self, candidates: &mut Vec<ChainNode>) {
        if self.beam_width == 0 {
            candidates.clear();
            return;
        }
        if candidates.len() > self.beam_width {
            candidates.select_nth_unstable_by(self.beam_width - 1, |a, b| self.compare(a, b));
            candidates.truncate(self.beam_width);
        }
        candidates.sort_unstable_by(|a, b| self.compare(a, b));
    }

    /// Beam order: score desc, length desc, finish asc, travel asc.
    ///
    /// The trailing `(parent, instance)` comparison reproduces creation
    /// order, which makes this a total order and the selection
    /// deterministic.
    fn compare(&self, a: &ChainNode, b: &ChainNode) -> Ordering {
        let instances = self.schedule.instances();
        let a_end = instances[a.instance as usize].end;
        let b_end = instances[b.instance as usize].end;

        b.score
            .cmp(&a.score)
            .then_with(|| b.len.cmp(&a.len))
            .then_with(|| a_end.cmp(&b_end))
            .then_with(|| a.travel_mins.cmp(&b.travel_mins))
            .then_with(|| a.parent.cmp(&b.parent))
            .then_with(|| a.instance.cmp(&b.instance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EventEntry, Movie};
    use crate::planner::config::PlannerSettings;

    fn run(movies: &[Movie], events: &[EventEntry], settings: &PlannerSettings) -> (Schedule, SearchOutcome) {
        let schedule = Schedule::build(movies, events);
        let graph = FeasibilityGraph::build(schedule.instances(), settings);
        let outcome = BeamSearch::new(&schedule, &graph, settings.beam_width).run();
        (schedule, outcome)
    }

    /// Three back-to-back showings at one theater.
    fn line_of_three() -> (Vec<Movie>, Vec<EventEntry>) {
        let movies = vec![
            Movie::new("a", "A", 60),
            Movie::new("b", "B", 60),
            Movie::new("c", "C", 60),
        ];
        let events = vec![
            EventEntry::new("e1", "a", "t1", "2024-03-15T10:00"),
            EventEntry::new("e2", "b", "t1", "2024-03-15T11:00"),
            EventEntry::new("e3", "c", "t1", "2024-03-15T12:00"),
        ];
        (movies, events)
    }

    #[test]
    fn explores_every_prefix_when_beam_is_wide() {
        let (movies, events) = line_of_three();
        let (_, outcome) = run(&movies, &events, &PlannerSettings::new(0, 0, 10, 10));

        // 3 singles, 3 pairs (e1e2, e1e3, e2e3), 1 triple
        assert_eq!(outcome.chains.len(), 7);
        assert_eq!(outcome.layers, 3);

        let longest = outcome
            .chains
            .nodes()
            .iter()
            .position(|n| n.len == 3)
            .unwrap();
        assert_eq!(outcome.chains.path(longest as u32), vec![0, 1, 2]);
    }

    #[test]
    fn beam_width_caps_expanded_layers() {
        let (movies, events) = line_of_three();
        let (_, outcome) = run(&movies, &events, &PlannerSettings::new(0, 0, 10, 1));

        // All three seeds, then one chain per longer layer
        let per_layer: Vec<u32> = outcome.chains.nodes().iter().map(|n| n.len).collect();
        assert_eq!(per_layer, vec![1, 1, 1, 2, 3]);
        assert_eq!(outcome.chains.path(3), vec![0, 1]);
        assert_eq!(outcome.expansions, 4);
    }

    #[test]
    fn zero_width_beam_keeps_only_seeds() {
        let (movies, events) = line_of_three();
        let (_, outcome) = run(&movies, &events, &PlannerSettings::new(0, 0, 10, 0));

        assert_eq!(outcome.chains.len(), 3);
        assert!(outcome.chains.nodes().iter().all(|n| n.len == 1));
        assert_eq!(outcome.layers, 1);
    }

    #[test]
    fn narrow_beam_still_expands_every_seed() {
        // A ranked showing that can't chain, and an unranked pair that can
        let movies = vec![
            Movie::new("a", "A", 60).with_rank(1),
            Movie::new("b", "B", 60),
            Movie::new("c", "C", 60),
        ];
        let events = vec![
            EventEntry::new("ea", "a", "t2", "2024-03-15T10:00"),
            EventEntry::new("eb", "b", "t1", "2024-03-15T10:00"),
            EventEntry::new("ec", "c", "t1", "2024-03-15T11:00"),
        ];
        let (schedule, outcome) = run(&movies, &events, &PlannerSettings::new(0, 1000, 10, 1));

        let pair = outcome
            .chains
            .nodes()
            .iter()
            .position(|n| n.len == 2)
            .unwrap();
        let path: Vec<&str> = outcome
            .chains
            .path(pair as u32)
            .into_iter()
            .map(|i| schedule.instances()[i as usize].event_id.as_str())
            .collect();
        assert_eq!(path, vec!["eb", "ec"]);
    }

    #[test]
    fn never_repeats_a_movie() {
        let movies = vec![Movie::new("a", "A", 60), Movie::new("b", "B", 60)];
        let events = vec![
            EventEntry::new("e1", "a", "t1", "2024-03-15T10:00"),
            EventEntry::new("e2", "a", "t1", "2024-03-15T11:00"),
            EventEntry::new("e3", "b", "t1", "2024-03-15T12:00"),
        ];
        let (schedule, outcome) = run(&movies, &events, &PlannerSettings::new(0, 0, 10, 10));

        for node in 0..outcome.chains.len() as u32 {
            let path = outcome.chains.path(node);
            let mut slots: Vec<u32> = path
                .iter()
                .map(|&i| schedule.instances()[i as usize].movie_slot)
                .collect();
            slots.sort_unstable();
            slots.dedup();
            assert_eq!(slots.len(), path.len());
        }
    }

    #[test]
    fn seeds_are_ordered_by_preference() {
        let movies = vec![
            Movie::new("a", "A", 60),
            Movie::new("b", "B", 60).with_rank(2),
            Movie::new("c", "C", 60).with_rank(1),
        ];
        let events = vec![
            EventEntry::new("e1", "a", "t1", "2024-03-15T10:00"),
            EventEntry::new("e2", "b", "t2", "2024-03-15T10:00"),
            EventEntry::new("e3", "c", "t3", "2024-03-15T10:00"),
        ];
        let (schedule, outcome) = run(&movies, &events, &PlannerSettings::new(0, 0, 10, 10));

        let seeds: Vec<&str> = outcome
            .chains
            .nodes()
            .iter()
            .filter(|n| n.len == 1)
            .map(|n| schedule.instances()[n.instance as usize].event_id.as_str())
            .collect();
        assert_eq!(seeds, vec!["e3", "e2", "e1"]);
    }
}
