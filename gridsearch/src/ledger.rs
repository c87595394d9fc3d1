use std::marker::PhantomData;

use crate::path::reconstruct;
use crate::space::{NodeReference, NodeStorage};

/// g-score of a node that has not been reached yet
pub const UNREACHABLE: usize = usize::MAX;

/// Best known scores of a single node
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Score<R> {
    /// cost of the best known path from the start
    pub g: usize,
    /// `g` plus the heuristic estimate to the goal
    pub f: f64,
    /// the node just before this one on the best known path
    pub from: Option<R>,
}

impl<R> Default for Score<R> {
    fn default() -> Self {
        Self {
            g: UNREACHABLE,
            f: f64::INFINITY,
            from: None,
        }
    }
}

/// Per-node g-score, f-score and predecessor for one search.
///
/// A node's g only ever goes down, and its predecessor only changes together with it,
/// so following predecessors always walks to strictly cheaper nodes and ends at the start.
#[derive(Debug)]
pub struct ScoreLedger<R, S> {
    scores: S,
    _reference: PhantomData<R>,
}

impl<R: NodeReference, S: NodeStorage<Score<R>, Reference = R>> ScoreLedger<R, S> {
    /// `scores` must be freshly created (every entry at its default)
    pub fn new(mut scores: S, start: R, start_estimate: f64) -> Self {
        *scores.get_mut(start) = Score {
            g: 0,
            f: start_estimate,
            from: None,
        };

        Self {
            scores,
            _reference: PhantomData,
        }
    }

    pub fn score(&self, node: R) -> Score<R> {
        self.scores.get(node)
    }

    pub fn g(&self, node: R) -> usize {
        self.scores.get(node).g
    }

    pub fn f(&self, node: R) -> f64 {
        self.scores.get(node).f
    }

    pub fn predecessor(&self, node: R) -> Option<R> {
        self.scores.get(node).from
    }

    /// Record `from` as the way into `node` if `g` beats the best known cost.
    ///
    /// Returns whether anything changed. Equal costs keep the earlier predecessor.
    pub fn relax(&mut self, node: R, from: R, g: usize, estimate: f64) -> bool {
        let score = self.scores.get_mut(node);
        if g >= score.g {
            return false;
        }

        *score = Score {
            g,
            f: g as f64 + estimate,
            from: Some(from),
        };
        true
    }

    /// The best known path from the start to `target`, both included.
    ///
    /// Only meaningful once `target` has been reached.
    pub fn path_to(&self, target: R) -> Vec<R> {
        reconstruct(|node| self.predecessor(node), target)
    }
}
