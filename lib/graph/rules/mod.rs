//! Rewrite rules for diagram simplification.
//!
//! Application of particular rules is facilitated through the [`RuleFinder`]
//! and [`Rule`] traits. Usually their methods are not called as such; a
//! particular rule is instead represented by a type implementing `RuleFinder`,
//! which is passed to [`Diagram::find_rule`], [`Diagram::simplify_rule`], or
//! [`Diagram::simplify_rule_n`].
//!
//! Rules that look for one local structure at a time additionally implement
//! [`RuleSeeker`], which picks up a search where the previous one left off.
//! [`Diagram::simplify_rule_scan`] drives such a rule to a fixed point while
//! visiting each spider or wire a bounded number of times, rather than
//! restarting from the front of the diagram after every application.
//!
//! Every rule that removes a spider only tombstones it; the full passes in
//! [`rewrite`][crate::rewrite] compact the diagram once the rule has reached
//! a fixed point.
//!
//! # Example
//! ```
//! use spider_rewrite::graph::*;
//! use spider_rewrite::graph::rules::*;
//!
//! let mut dg = Diagram::new();
//! let a = dg.add_spider(Spider::green(0.25));
//! let b = dg.add_spider(Spider::green(0.5));
//! dg.add_wire(a, b).unwrap();
//! assert!(dg.simplify_rule(Fuse));
//! assert!(!dg.simplify_rule(Fuse));
//! dg.compact();
//! assert_eq!(dg.count_spiders(), 1);
//! assert_eq!(dg.get_spider(0).unwrap().phase, 0.75);
//! ```

use crate::graph::{ Diagram, NodeId, Wire };

/// A trait for types that can explore a [`Diagram`] and find a particular
/// structure to simplify.
///
/// Types implementing this trait (usually unit structs) have the only purpose
/// of denoting the existence of a particular rewrite rule. This is to allow for
/// programmatic manipulation of rewrite rules.
///
/// All types created by this trait via [`find`][RuleFinder::find] (i.e.
/// [`Self::Output`]) store a mutable reference to the diagram they will
/// simplify.
pub trait RuleFinder<M, P> {
    /// The type representing the instantiated (but not executed) rewrite rule.
    type Output<'a>: Rule where M: 'a, P: 'a;

    /// Explore a [`Diagram`] to find a particular structure. Returns `None` if
    /// the structure does not exist.
    fn find(self, diagram: &mut Diagram<M, P>) -> Option<Self::Output<'_>>;
}

/// A trait representing an unexecuted rewrite rule on a [`Diagram`].
///
/// Types implementing this trait are not constructable as such (see
/// [`RuleFinder`]) and store a mutable reference to the diagram they will
/// simplify. No type implementing this trait implements [`Clone`] or
/// [`Copy`].
pub trait Rule {
    /// Execute the rewrite rule, consuming self and releasing the inner hold on
    /// the diagram.
    fn simplify(self);
}

/// Position of a resumable search through a [`Diagram`].
///
/// Holds a cursor over spider IDs or wire slots (depending on the rule) and a
/// stack of positions behind the cursor that an application may have made
/// eligible again.
#[derive(Clone, Debug, Default)]
pub struct Scan {
    next: usize,
    pending: Vec<usize>,
}

impl Scan {
    /// Create a new search starting from the front of the diagram.
    pub fn new() -> Self { Self::default() }

    // next position to examine, revisits first
    pub(crate) fn pop(&mut self, bound: usize) -> Option<usize> {
        if let Some(k) = self.pending.pop() { return Some(k); }
        (self.next < bound).then(|| {
            self.next += 1;
            self.next - 1
        })
    }

    // queue positions already passed by the cursor for another look
    pub(crate) fn revisit<I>(&mut self, positions: I)
    where I: IntoIterator<Item = usize>
    {
        let next = self.next;
        self.pending.extend(positions.into_iter().filter(|k| *k < next));
    }
}

/// A [`RuleFinder`] whose search can be resumed from a [`Scan`].
///
/// Implementors must guarantee that every position skipped by a search cannot
/// become a match through later applications of the same rule unless it was
/// queued for revisiting, so that a single `Scan` threaded through repeated
/// applications finds the same matches as restarting from scratch.
pub trait RuleSeeker<M, P>: RuleFinder<M, P> {
    /// Continue a search from `scan`, updating it in place.
    fn seek<'a>(&self, diagram: &'a mut Diagram<M, P>, scan: &mut Scan)
        -> Option<Self::Output<'a>>
    where M: 'a, P: 'a;
}

mod bialgebra;
pub use bialgebra::*;
mod fuse;
pub use fuse::*;
mod hadamard;
pub use hadamard::*;
mod identity;
pub use identity::*;
mod self_loop;
pub use self_loop::*;

// return the two neighbors of a degree-2 spider, in wire order
pub(crate) fn binary_neighbors<M, P>(dg: &Diagram<M, P>, id: NodeId)
    -> Option<(NodeId, NodeId)>
{
    (dg.degree(id)? == 2).then_some(())?;
    let mut nnb = dg.neighbors(id)?;
    let a = nnb.next()?;
    let b = nnb.next()?;
    Some((a, b))
}

// remove a degree-2 spider, replacing it with a single wire between its
// neighbors; nothing is added if the replacement would be a self-loop
pub(crate) fn splice_out<M, P>(dg: &mut Diagram<M, P>, id: NodeId) {
    let nnb = dg.detach(id);
    dg.tombstone(id);
    if let [a, b] = nnb[..] {
        if a != b && a != id && b != id {
            dg.push_wire(Wire(a, b));
        }
    }
}

impl<M, P> Diagram<M, P> {
    /// Shortcut to calling [`RuleFinder::find`] on `self`, returning any
    /// output.
    pub fn find_rule<R>(&mut self, rule: R) -> Option<R::Output<'_>>
    where R: RuleFinder<M, P>
    {
        rule.find(self)
    }

    /// Find and immediately apply a rewrite rule, returning `true` if the rule
    /// was successfully applied.
    pub fn simplify_rule<R>(&mut self, rule: R) -> bool
    where R: RuleFinder<M, P>
    {
        rule.find(self)
            .map(|rule_data| { rule_data.simplify(); })
            .is_some()
    }

    /// Repeatedly apply a rewrite rule a maximum of `max` times, returning the
    /// number of times the rule was actually applied.
    pub fn simplify_rule_n<R>(
        &mut self,
        rule: R,
        max: Option<usize>,
    ) -> usize
    where R: RuleFinder<M, P> + Clone
    {
        if let Some(n) = max {
            (0..n)
                .take_while(|_| self.simplify_rule(rule.clone()))
                .count()
        } else {
            (0..)
                .take_while(|_| self.simplify_rule(rule.clone()))
                .count()
        }
    }

    /// Like [`simplify_rule_n`][Self::simplify_rule_n], but thread a single
    /// [`Scan`] through every application so that each search resumes where
    /// the last one stopped.
    pub fn simplify_rule_scan<R>(&mut self, rule: R, max: Option<usize>)
        -> usize
    where R: RuleSeeker<M, P>
    {
        let mut scan = Scan::new();
        let mut count: usize = 0;
        while max.map_or(true, |n| count < n) {
            let Some(rule_data) = rule.seek(self, &mut scan) else { break; };
            rule_data.simplify();
            count += 1;
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::*;
    use super::*;

    #[test]
    fn binary_neighbors_requires_degree_two() {
        let mut dg = Diagram::new();
        let a = dg.add_spider(Spider::green(0.0));
        let b = dg.add_spider(Spider::green(0.0));
        let c = dg.add_spider(Spider::green(0.0));
        dg.add_wire(a, b).unwrap();
        dg.add_wire(b, c).unwrap();
        assert_eq!(binary_neighbors(&dg, b), Some((a, c)));
        assert_eq!(binary_neighbors(&dg, a), None);
        dg.add_wire(a, a).unwrap();
        assert_eq!(binary_neighbors(&dg, a), None);
    }

    #[test]
    fn splice_out_drops_self_loops() {
        let mut dg = Diagram::new();
        let a = dg.add_spider(Spider::green(0.0));
        let b = dg.add_spider(Spider::green(0.0));
        dg.add_wire(a, b).unwrap();
        dg.add_wire(b, a).unwrap();
        splice_out(&mut dg, b);
        assert_eq!(dg.count_spiders(), 1);
        assert_eq!(dg.count_wires(), 0);
    }

    #[test]
    fn simplify_rule_n_is_bounded() {
        let mut dg = Diagram::new();
        let ids: Vec<NodeId> =
            (0..6).map(|_| dg.add_spider(Spider::red(0.5))).collect();
        for w in ids.windows(2) {
            dg.add_wire(w[0], w[1]).unwrap();
        }
        assert_eq!(dg.simplify_rule_n(Fuse, Some(2)), 2);
        assert_eq!(dg.count_spiders(), 4);
        assert_eq!(dg.simplify_rule_n(Fuse, None), 3);
        assert_eq!(dg.count_spiders(), 1);
        assert!(dg.find_rule(Fuse).is_none());
    }

    #[test]
    fn scan_revisits_only_passed_positions() {
        let mut scan = Scan::new();
        assert_eq!(scan.pop(3), Some(0));
        assert_eq!(scan.pop(3), Some(1));
        scan.revisit([0, 1, 2, 5]);
        assert_eq!(scan.pop(3), Some(1));
        assert_eq!(scan.pop(3), Some(0));
        assert_eq!(scan.pop(3), Some(2));
        assert_eq!(scan.pop(3), None);
        assert_eq!(scan.pop(4), Some(3));
    }

    #[test]
    fn simplify_rule_scan_matches_restarts() {
        let build = || {
            let mut dg = Diagram::new();
            let ids: Vec<NodeId> =
                (0..8).map(|k| dg.add_spider(Spider::green(k as f64))).collect();
            for w in ids.windows(2).rev() {
                dg.add_wire(w[1], w[0]).unwrap();
            }
            dg
        };
        let mut restarted = build();
        let mut resumed = build();
        assert_eq!(restarted.simplify_rule_n(Fuse, None), 7);
        assert_eq!(resumed.simplify_rule_scan(Fuse, None), 7);
        assert_eq!(resumed.get_spider(0), restarted.get_spider(0));
        assert_eq!(resumed.get_spider(0).unwrap().phase, 28.0);
        assert_eq!(resumed.simplify_rule_scan(Fuse, Some(3)), 0);
    }
}
