//! Full simplification passes and the top-level rewrite driver.
//!
//! Each pass drives one or more rules from [`graph::rules`][crate::graph::rules]
//! to a fixed point, then strips self-loops and compacts the diagram so that no
//! tombstone survives the pass. Local rules are driven through
//! [`Diagram::simplify_rule_scan`], capped at the number of live spiders when
//! the pass begins, so a pass costs time proportional to the size of the
//! diagram.
//!
//! The driver, [`rewrite`], sequences the passes according to a set of
//! [`Flag`]s:
//! 1. If any Hadamard node exists, toggle the colors of its neighbors and
//!    eliminate every Hadamard node of degree 2.
//! 2. With [`Flag::IdentityCleanup`], eliminate identity spiders.
//! 3. With [`Flag::FuseSameColor`] and no Hadamard node left, fuse all
//!    adjacent same-colored spiders, then eliminate identities once more.
//! 4. If any wire joins a green and a red spider, apply the bialgebra rule.
//!
//! If none of these apply the diagram is returned exactly as given.
//!
//! # Example
//! ```
//! use spider_rewrite::graph::*;
//! use spider_rewrite::rewrite::*;
//!
//! let mut dg = Diagram::new();
//! let a = dg.add_spider(Spider::green(0.2));
//! let b = dg.add_spider(Spider::green(0.0));
//! let c = dg.add_spider(Spider::green(0.3));
//! dg.add_wire(a, b).unwrap();
//! dg.add_wire(b, c).unwrap();
//!
//! let flags = Flag::IdentityCleanup | Flag::FuseSameColor;
//! let (dg, report) = rewrite_with_report(dg, flags).unwrap();
//! assert_eq!(dg.count_spiders(), 1);
//! assert_eq!(dg.count_wires(), 0);
//! assert_eq!(report.identities_removed, 1);
//! assert_eq!(report.fusions, 1);
//! ```

use std::ops::BitOr;
use crate::graph::{
    Diagram,
    GraphError::*,
    GraphResult,
    rules::*,
};

/// A single optional rewrite step.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Flag {
    /// Remove phaseless, degree-2 spiders between same-colored neighbors.
    IdentityCleanup,
    /// Fuse adjacent spiders of the same color, summing their phases.
    FuseSameColor,
}

impl Flag {
    /// Every flag, in the order its pass runs.
    pub const ALL: [Flag; 2] = [Flag::IdentityCleanup, Flag::FuseSameColor];

    fn bit(self) -> u8 {
        match self {
            Flag::IdentityCleanup => 1 << 0,
            Flag::FuseSameColor   => 1 << 1,
        }
    }
}

/// A set of [`Flag`]s.
///
/// Built by `|`-ing flags together, collecting from an iterator, or starting
/// from [`Flags::empty`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Flags(u8);

impl Flags {
    /// Create a new, empty set.
    pub fn empty() -> Self { Self(0) }

    /// Return `true` if the set contains `flag`.
    pub fn contains(&self, flag: Flag) -> bool { self.0 & flag.bit() != 0 }

    /// Return `true` if no flags are set.
    pub fn is_empty(&self) -> bool { self.0 == 0 }

    /// Add a flag to the set, returning `true` if it was not already present.
    pub fn insert(&mut self, flag: Flag) -> bool {
        let new = !self.contains(flag);
        self.0 |= flag.bit();
        new
    }

    /// Return an iterator over all flags in the set, in pass order.
    pub fn iter(&self) -> impl Iterator<Item = Flag> {
        let flags = *self;
        Flag::ALL.into_iter().filter(move |flag| flags.contains(*flag))
    }
}

impl From<Flag> for Flags {
    fn from(flag: Flag) -> Self { Self(flag.bit()) }
}

impl FromIterator<Flag> for Flags {
    fn from_iter<I>(iter: I) -> Self
    where I: IntoIterator<Item = Flag>
    {
        let mut flags = Self::empty();
        iter.into_iter().for_each(|flag| { flags.insert(flag); });
        flags
    }
}

impl BitOr<Flag> for Flag {
    type Output = Flags;

    fn bitor(self, rhs: Flag) -> Flags { Flags(self.bit() | rhs.bit()) }
}

impl BitOr<Flag> for Flags {
    type Output = Flags;

    fn bitor(self, rhs: Flag) -> Flags { Flags(self.0 | rhs.bit()) }
}

impl BitOr<Flags> for Flags {
    type Output = Flags;

    fn bitor(self, rhs: Flags) -> Flags { Flags(self.0 | rhs.0) }
}

/// Number of applications of each rule during a call to
/// [`rewrite_with_report`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RewriteReport {
    /// Spider colors changed by adjacent Hadamard nodes.
    pub toggles: usize,
    /// Degree-2 Hadamard nodes removed.
    pub hadamards_removed: usize,
    /// Identity spiders removed, including the post-fusion pass.
    pub identities_removed: usize,
    /// Spider pairs fused.
    pub fusions: usize,
    /// Wires added by the bialgebra rule.
    pub bialgebra_wires_added: usize,
    /// Self-loop wires stripped at the ends of passes.
    pub self_loops_removed: usize,
}

impl RewriteReport {
    /// Return `true` if no rule was applied.
    pub fn is_empty(&self) -> bool { *self == Self::default() }
}

impl<M, P> Diagram<M, P> {
    // strip all self-loops and drop tombstones; returns the number of wires
    // removed
    fn finish_pass(&mut self) -> usize {
        let len = self.count_wires();
        self.simplify_rule(SelfLoopAll);
        let removed = len - self.count_wires();
        self.compact();
        removed
    }

    /// Toggle the colors of all green and red spiders adjacent to a Hadamard
    /// node, then remove every Hadamard node with exactly two wire endpoints.
    ///
    /// Returns the number of color toggles and the number of Hadamard nodes
    /// removed.
    pub fn eliminate_hadamards(&mut self) -> (usize, usize) {
        self.hadamard_pass(&mut RewriteReport::default())
    }

    fn hadamard_pass(&mut self, report: &mut RewriteReport) -> (usize, usize) {
        let toggles =
            self.find_rule(ColorToggleAll)
            .map(|data| {
                let n: usize = data.groups().iter().map(|(_, t)| t.len()).sum();
                data.simplify();
                n
            })
            .unwrap_or(0);
        let max = self.count_spiders();
        let removed = self.simplify_rule_scan(HadamardElim, Some(max));
        report.toggles += toggles;
        report.hadamards_removed += removed;
        report.self_loops_removed += self.finish_pass();
        (toggles, removed)
    }

    /// Remove all identity spiders, returning the number removed.
    pub fn eliminate_identities(&mut self) -> usize {
        self.identity_pass(&mut RewriteReport::default())
    }

    fn identity_pass(&mut self, report: &mut RewriteReport) -> usize {
        let max = self.count_spiders();
        let removed = self.simplify_rule_scan(Identity, Some(max));
        report.identities_removed += removed;
        report.self_loops_removed += self.finish_pass();
        removed
    }

    /// Fuse all adjacent same-colored spiders, returning the number of fusions.
    ///
    /// Fails without modifying the diagram if any Hadamard node is present.
    pub fn fuse_same_color(&mut self) -> GraphResult<usize> {
        self.fuse_pass(&mut RewriteReport::default())
    }

    fn fuse_pass(&mut self, report: &mut RewriteReport) -> GraphResult<usize> {
        if let Some((id, _)) = self.spiders().find(|(_, s)| s.is_hadamard()) {
            return Err(UnresolvedHadamard(id));
        }
        let max = self.count_spiders();
        let fused = self.simplify_rule_scan(Fuse, Some(max));
        report.fusions += fused;
        report.self_loops_removed += self.finish_pass();
        Ok(fused)
    }

    /// Apply the bialgebra rule across every green-red wire until it adds no
    /// new wire, returning the number of wires added.
    ///
    /// Calling this again on the result adds nothing.
    pub fn apply_bialgebra(&mut self) -> usize {
        self.bialgebra_pass(&mut RewriteReport::default())
    }

    fn bialgebra_pass(&mut self, report: &mut RewriteReport) -> usize {
        let mut added: usize = 0;
        while let Some(data) = self.find_rule(BialgebraAll) {
            let n = data.len();
            data.simplify();
            added += n;
            if n == 0 { break; }
        }
        report.bialgebra_wires_added += added;
        report.self_loops_removed += self.finish_pass();
        added
    }
}

/// Simplify a diagram according to a set of flags.
///
/// Fails with [`InvariantViolation`][crate::graph::GraphError::InvariantViolation]
/// if any wire in the input references a missing spider. Spider metadata and
/// the passthrough value are carried through untouched.
pub fn rewrite<M, P, F>(diagram: Diagram<M, P>, flags: F)
    -> GraphResult<Diagram<M, P>>
where F: Into<Flags>
{
    rewrite_with_report(diagram, flags).map(|(dg, _)| dg)
}

/// Like [`rewrite`], but additionally return the number of applications of
/// each rule.
pub fn rewrite_with_report<M, P, F>(mut diagram: Diagram<M, P>, flags: F)
    -> GraphResult<(Diagram<M, P>, RewriteReport)>
where F: Into<Flags>
{
    let flags: Flags = flags.into();
    let mut report = RewriteReport::default();
    diagram.validate()?;
    if diagram.has_hadamard() {
        diagram.hadamard_pass(&mut report);
    }
    if flags.contains(Flag::IdentityCleanup) {
        diagram.identity_pass(&mut report);
    }
    if flags.contains(Flag::FuseSameColor) && !diagram.has_hadamard() {
        diagram.fuse_pass(&mut report)?;
        diagram.identity_pass(&mut report);
    }
    if diagram.has_diff_color_wire() {
        diagram.bialgebra_pass(&mut report);
    }
    Ok((diagram, report))
}

#[cfg(test)]
mod tests {
    use crate::graph::*;
    use super::*;

    #[test]
    fn flags_set_ops() {
        let mut flags = Flags::empty();
        assert!(flags.is_empty());
        assert!(flags.insert(Flag::FuseSameColor));
        assert!(!flags.insert(Flag::FuseSameColor));
        assert!(flags.contains(Flag::FuseSameColor));
        assert!(!flags.contains(Flag::IdentityCleanup));
        let both = Flag::FuseSameColor | Flag::IdentityCleanup;
        assert_eq!(both.iter().collect::<Vec<_>>(), Flag::ALL.to_vec());
        assert_eq!(flags | Flag::IdentityCleanup, both);
        assert_eq!(Flag::ALL.into_iter().collect::<Flags>(), both);
        assert_eq!(Flags::from(Flag::FuseSameColor), flags);
        assert_eq!(Flags::default(), Flags::empty());
    }

    #[test]
    fn hadamard_pass_compacts() {
        let mut dg = Diagram::new();
        let g = dg.add_spider(Spider::green(0.0));
        let h = dg.add_spider(Spider::hadamard());
        let r = dg.add_spider(Spider::red(0.0));
        dg.add_wire(g, h).unwrap();
        dg.add_wire(h, r).unwrap();
        assert_eq!(dg.eliminate_hadamards(), (2, 1));
        assert_eq!(dg.count_spiders(), 2);
        assert_eq!(dg.spiders().len(), 2);
        assert_eq!(dg.get_spider(0).unwrap().color, Color::Red);
        assert_eq!(dg.get_spider(1).unwrap().color, Color::Green);
        assert_eq!(dg.wires().collect::<Vec<_>>(), vec![Wire(0, 1)]);
    }

    #[test]
    fn fuse_refuses_hadamard() {
        let mut dg = Diagram::new();
        let g0 = dg.add_spider(Spider::green(0.1));
        let g1 = dg.add_spider(Spider::green(0.2));
        let h = dg.add_spider(Spider::hadamard());
        dg.add_wire(g0, g1).unwrap();
        dg.add_wire(g1, h).unwrap();
        assert!(matches!(
            dg.fuse_same_color(),
            Err(GraphError::UnresolvedHadamard(2)),
        ));
        assert_eq!(dg.count_spiders(), 3);
        assert_eq!(dg.count_wires(), 2);
    }

    #[test]
    fn fuse_pass_strips_self_loops() {
        let mut dg = Diagram::new();
        let a = dg.add_spider(Spider::red(0.25));
        let b = dg.add_spider(Spider::red(0.25));
        let o = dg.add_spider(Spider::other(0.0));
        dg.add_wire(a, b).unwrap();
        dg.add_wire(o, o).unwrap();
        dg.add_wire(b, o).unwrap();
        assert_eq!(dg.fuse_same_color().unwrap(), 1);
        assert_eq!(dg.count_spiders(), 2);
        assert_eq!(dg.wires().collect::<Vec<_>>(), vec![Wire(0, 1)]);
        assert_eq!(dg.get_spider(0).unwrap().phase, 0.5);
    }

    #[test]
    fn driver_skips_fusion_with_hadamard() {
        // degree-3 hadamard survives the elimination pass
        let mut dg = Diagram::new();
        let g0 = dg.add_spider(Spider::green(0.0));
        let g1 = dg.add_spider(Spider::green(0.0));
        let h = dg.add_spider(Spider::hadamard());
        let o = dg.add_spider(Spider::other(0.0));
        dg.add_wire(g0, g1).unwrap();
        dg.add_wire(g0, h).unwrap();
        dg.add_wire(g1, h).unwrap();
        dg.add_wire(o, h).unwrap();
        let (dg, report) =
            rewrite_with_report(dg, Flag::FuseSameColor).unwrap();
        assert_eq!(report.toggles, 2);
        assert_eq!(report.hadamards_removed, 0);
        assert_eq!(report.fusions, 0);
        assert_eq!(dg.count_spiders(), 4);
        assert_eq!(dg.count_color(Color::Red), 2);
    }

    #[test]
    fn report_is_empty_for_noop() {
        let mut dg = Diagram::new();
        let a = dg.add_spider(Spider::green(0.0));
        let b = dg.add_spider(Spider::other(0.0));
        dg.add_wire(b, a).unwrap();
        let (dg, report) = rewrite_with_report(dg, Flags::empty()).unwrap();
        assert!(report.is_empty());
        assert_eq!(dg.wires().collect::<Vec<_>>(), vec![Wire(b, a)]);
    }

    #[test]
    fn bialgebra_pass_reaches_closure() {
        let mut dg = Diagram::new();
        let g = dg.add_spider(Spider::green(0.0));
        let h = dg.add_spider(Spider::red(0.0));
        let g2 = dg.add_spider(Spider::green(0.0));
        let h2 = dg.add_spider(Spider::red(0.0));
        dg.add_wire(g2, g).unwrap();
        dg.add_wire(g, h).unwrap();
        dg.add_wire(h, h2).unwrap();
        assert_eq!(dg.apply_bialgebra(), 3);
        assert_eq!(dg.mutual_arity(g2, h2), Some(1));
        let before = dg.wire_set();
        assert_eq!(dg.apply_bialgebra(), 0);
        assert_eq!(dg.wire_set(), before);
    }
}
