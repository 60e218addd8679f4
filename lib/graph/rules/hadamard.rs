use itertools::Itertools;
use super::*;

/// Change the color of every green or red spider adjacent to a Hadamard node.
///
/// Each Hadamard node is visited exactly once and toggles each of its distinct
/// green/red neighbors once, so a spider sitting between two Hadamard nodes is
/// toggled twice and keeps its color. Hadamard nodes of any degree take part;
/// none are removed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ColorToggleAll;

/// A Hadamard node and the spiders whose colors it toggles.
pub type ToggleGroup = (NodeId, Vec<NodeId>);

/// Output of [`ColorToggleAll::find`].
#[derive(Debug)]
pub struct ColorToggleAllData<'a, M, P> {
    pub(crate) dg: &'a mut Diagram<M, P>,
    pub(crate) groups: Vec<ToggleGroup>,
}

impl<'a, M, P> ColorToggleAllData<'a, M, P> {
    /// Return the number of Hadamard nodes found.
    pub fn len(&self) -> usize { self.groups.len() }

    /// Return `true` if the number of Hadamard nodes is zero.
    pub fn is_empty(&self) -> bool { self.groups.is_empty() }

    /// Return a reference to all groups.
    pub fn groups(&self) -> &Vec<ToggleGroup> { &self.groups }
}

impl<M, P> RuleFinder<M, P> for ColorToggleAll {
    type Output<'a> = ColorToggleAllData<'a, M, P> where M: 'a, P: 'a;

    fn find(self, dg: &mut Diagram<M, P>) -> Option<Self::Output<'_>> {
        let mut groups: Vec<ToggleGroup> = Vec::new();
        for (id, node) in dg.spiders() {
            if !node.is_hadamard() { continue; }
            let targets: Vec<NodeId> =
                dg.neighbors(id)?
                .unique()
                .filter(|nb| {
                    dg.get_spider(*nb).is_some_and(|s| s.is_spider())
                })
                .collect();
            groups.push((id, targets));
        }
        if groups.is_empty() {
            None
        } else {
            Some(ColorToggleAllData { dg, groups })
        }
    }
}

impl<'a, M, P> Rule for ColorToggleAllData<'a, M, P> {
    fn simplify(self) {
        let Self { dg, groups } = self;
        for (_, targets) in groups.into_iter() {
            for t in targets.into_iter() {
                if let Some(s) = dg.get_spider_mut(t) { s.toggle_color(); }
            }
        }
    }
}

/// A Hadamard node with exactly two wire endpoints, replaced by a single wire
/// between its neighbors.
///
/// If both endpoints land on the same spider (or on the Hadamard node itself)
/// the node is removed without adding a wire.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct HadamardElim;

/// Output of [`HadamardElim::find`].
#[derive(Debug)]
pub struct HadamardElimData<'a, M, P> {
    pub(crate) dg: &'a mut Diagram<M, P>,
    pub(crate) h: NodeId, // hadamard
}

impl<M, P> RuleFinder<M, P> for HadamardElim {
    type Output<'a> = HadamardElimData<'a, M, P> where M: 'a, P: 'a;

    fn find(self, dg: &mut Diagram<M, P>) -> Option<Self::Output<'_>> {
        self.seek(dg, &mut Scan::new())
    }
}

impl<M, P> RuleSeeker<M, P> for HadamardElim {
    fn seek<'a>(&self, dg: &'a mut Diagram<M, P>, scan: &mut Scan)
        -> Option<Self::Output<'a>>
    where M: 'a, P: 'a
    {
        while let Some(id) = scan.pop(dg.nodes.len()) {
            if !dg.get_spider(id).is_some_and(|s| s.is_hadamard()) { continue; }
            if let Some((a, b)) = binary_neighbors(dg, id) {
                scan.revisit([a, b]);
                return Some(HadamardElimData { dg, h: id });
            }
        }
        None
    }
}

impl<'a, M, P> Rule for HadamardElimData<'a, M, P> {
    fn simplify(self) {
        let Self { dg, h } = self;
        splice_out(dg, h);
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::*;
    use super::*;

    #[test]
    fn toggle_all() {
        let mut dg = Diagram::new();
        let g0 = dg.add_spider(Spider::green(0.0));
        let h0 = dg.add_spider(Spider::hadamard());
        let r0 = dg.add_spider(Spider::red(0.0));
        let h1 = dg.add_spider(Spider::hadamard());
        let g1 = dg.add_spider(Spider::green(0.0));
        let o0 = dg.add_spider(Spider::other(0.0));
        dg.add_wire(g0, h0).unwrap();
        dg.add_wire(g0, h0).unwrap();
        dg.add_wire(h0, r0).unwrap();
        dg.add_wire(r0, h1).unwrap();
        dg.add_wire(h1, g1).unwrap();
        dg.add_wire(h1, o0).unwrap();
        dg.add_wire(h1, h0).unwrap();
        let data = dg.find_rule(ColorToggleAll).unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data.groups()[0], (h0, vec![g0, r0]));
        assert_eq!(data.groups()[1], (h1, vec![r0, g1]));
        data.simplify();
        assert_eq!(dg.get_spider(g0).unwrap().color, Color::Red);
        // toggled once by each hadamard
        assert_eq!(dg.get_spider(r0).unwrap().color, Color::Red);
        assert_eq!(dg.get_spider(g1).unwrap().color, Color::Red);
        assert_eq!(dg.get_spider(o0).unwrap().color, Color::Other);
        assert_eq!(dg.count_color(Color::Hadamard), 2);
        assert_eq!(dg.count_wires(), 7);
    }

    #[test]
    fn toggle_all_none() {
        let mut dg = Diagram::new();
        dg.add_spider(Spider::green(0.0));
        assert!(dg.find_rule(ColorToggleAll).is_none());
    }

    #[test]
    fn elim() {
        let mut dg = Diagram::new();
        let g = dg.add_spider(Spider::green(0.0));
        let h0 = dg.add_spider(Spider::hadamard());
        let r = dg.add_spider(Spider::red(0.0));
        let h1 = dg.add_spider(Spider::hadamard());
        let h2 = dg.add_spider(Spider::hadamard());
        dg.add_wire(g, h0).unwrap();
        dg.add_wire(h0, r).unwrap();
        // degree 3: stays
        dg.add_wire(r, h1).unwrap();
        dg.add_wire(h1, g).unwrap();
        dg.add_wire(h1, g).unwrap();
        // self-loop only
        dg.add_wire(h2, h2).unwrap();
        assert_eq!(dg.simplify_rule_n(HadamardElim, Some(5)), 2);
        assert!(!dg.has_spider(h0));
        assert!(!dg.has_spider(h2));
        assert!(dg.has_spider(h1));
        assert_eq!(dg.mutual_arity(g, r), Some(1));
        assert_eq!(dg.count_wires(), 4);
        assert!(dg.validate().is_ok());
    }

    #[test]
    fn elim_parallel_pair() {
        let mut dg = Diagram::new();
        let g = dg.add_spider(Spider::green(0.0));
        let h = dg.add_spider(Spider::hadamard());
        dg.add_wire(g, h).unwrap();
        dg.add_wire(h, g).unwrap();
        assert!(dg.simplify_rule(HadamardElim));
        assert_eq!(dg.count_spiders(), 1);
        assert_eq!(dg.count_wires(), 0);
    }

    #[test]
    fn elim_revisits_earlier_node() {
        // h0 drops to degree 2 only after h1 is removed
        let mut dg = Diagram::new();
        let h0 = dg.add_spider(Spider::hadamard());
        let g = dg.add_spider(Spider::green(0.0));
        let r = dg.add_spider(Spider::red(0.0));
        let h1 = dg.add_spider(Spider::hadamard());
        dg.add_wire(h0, h1).unwrap();
        dg.add_wire(h1, h0).unwrap();
        dg.add_wire(g, h0).unwrap();
        dg.add_wire(h0, r).unwrap();
        assert_eq!(dg.simplify_rule_scan(HadamardElim, None), 2);
        assert_eq!(dg.count_color(Color::Hadamard), 0);
        assert_eq!(dg.count_wires(), 1);
        assert_eq!(dg.mutual_arity(g, r), Some(1));
    }
}
