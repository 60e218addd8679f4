use super::*;

/// A phaseless green or red spider with exactly two wires whose neighbors both
/// share its color, replaced by a single wire between the neighbors.
///
/// Neighbors must be live and distinct from the spider itself. When both wires
/// run to the same neighbor no replacement wire is added.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Identity;

/// Output of [`Identity::find`].
#[derive(Debug)]
pub struct IdentityData<'a, M, P> {
    pub(crate) dg: &'a mut Diagram<M, P>,
    pub(crate) s: NodeId, // spider
}

// the two neighbors of `id` if it is an identity spider
fn identity_neighbors<M, P>(dg: &Diagram<M, P>, id: NodeId)
    -> Option<(NodeId, NodeId)>
{
    let node = dg.get_spider(id)?;
    (node.is_spider() && node.has_defarg()).then_some(())?;
    let (a, b) = binary_neighbors(dg, id)?;
    let matches = |nb: NodeId| {
        nb != id && dg.get_spider(nb).is_some_and(|s| s.is_same_color(node))
    };
    (matches(a) && matches(b)).then_some((a, b))
}

impl<M, P> RuleFinder<M, P> for Identity {
    type Output<'a> = IdentityData<'a, M, P> where M: 'a, P: 'a;

    fn find(self, dg: &mut Diagram<M, P>) -> Option<Self::Output<'_>> {
        self.seek(dg, &mut Scan::new())
    }
}

impl<M, P> RuleSeeker<M, P> for Identity {
    fn seek<'a>(&self, dg: &'a mut Diagram<M, P>, scan: &mut Scan)
        -> Option<Self::Output<'a>>
    where M: 'a, P: 'a
    {
        // splicing only changes the degree of a neighbor reached by both wires
        while let Some(id) = scan.pop(dg.nodes.len()) {
            if let Some((a, b)) = identity_neighbors(dg, id) {
                scan.revisit([a, b]);
                return Some(IdentityData { dg, s: id });
            }
        }
        None
    }
}

impl<'a, M, P> Rule for IdentityData<'a, M, P> {
    fn simplify(self) {
        let Self { dg, s } = self;
        splice_out(dg, s);
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::*;
    use super::*;

    #[test]
    fn simplify_identity() {
        let mut dg = Diagram::new();
        let z0 = dg.add_spider(Spider::green(0.1));
        let z1 = dg.add_spider(Spider::green(0.0));
        let z2 = dg.add_spider(Spider::green(0.2));
        let z3 = dg.add_spider(Spider::green(0.0)); // phased neighbor is red
        let x0 = dg.add_spider(Spider::red(0.0));
        let z4 = dg.add_spider(Spider::green(0.5)); // nonzero phase
        let z5 = dg.add_spider(Spider::green(0.0));
        let h0 = dg.add_spider(Spider::hadamard());
        let z6 = dg.add_spider(Spider::green(0.0));
        dg.add_wire(z0, z1).unwrap();
        dg.add_wire(z1, z2).unwrap();
        dg.add_wire(z2, z3).unwrap();
        dg.add_wire(z3, x0).unwrap();
        dg.add_wire(z2, z4).unwrap();
        dg.add_wire(z4, z5).unwrap();
        dg.add_wire(z5, h0).unwrap();
        dg.add_wire(z6, z6).unwrap();
        assert_eq!(dg.count_spiders(), 9);
        assert_eq!(dg.count_wires(),   8);
        assert_eq!(dg.simplify_rule_n(Identity, None), 1);
        assert!(!dg.has_spider(z1));
        assert!(dg.has_spider(z3));
        assert!(dg.has_spider(z4));
        assert!(dg.has_spider(z5));
        assert!(dg.has_spider(z6));
        assert_eq!(dg.count_spiders(), 8);
        assert_eq!(dg.count_wires(),   7);
        assert_eq!(dg.mutual_arity(z0, z2), Some(1));
    }

    #[test]
    fn identity_chain() {
        let mut dg = Diagram::new();
        let r0 = dg.add_spider(Spider::red(0.3));
        let ids: Vec<NodeId> =
            (0..4).map(|_| dg.add_spider(Spider::red(0.0))).collect();
        let r1 = dg.add_spider(Spider::red(0.4));
        dg.add_wire(r0, ids[0]).unwrap();
        for w in ids.windows(2) {
            dg.add_wire(w[0], w[1]).unwrap();
        }
        dg.add_wire(ids[3], r1).unwrap();
        assert_eq!(dg.simplify_rule_n(Identity, Some(6)), 4);
        assert_eq!(dg.count_spiders(), 2);
        let keys: Vec<(NodeId, NodeId)> =
            dg.wires().map(|w| w.key()).collect();
        assert_eq!(keys, vec![(r0, r1)]);
    }

    #[test]
    fn identity_double_wire() {
        let mut dg = Diagram::new();
        let a = dg.add_spider(Spider::green(0.7));
        let s = dg.add_spider(Spider::green(0.0));
        dg.add_wire(a, s).unwrap();
        dg.add_wire(s, a).unwrap();
        assert!(dg.simplify_rule(Identity));
        assert_eq!(dg.count_spiders(), 1);
        assert_eq!(dg.count_wires(), 0);
    }

    #[test]
    fn identity_revisits_earlier_spider() {
        // x only becomes an identity once s is gone
        let mut dg = Diagram::new();
        let x = dg.add_spider(Spider::green(0.0));
        let p = dg.add_spider(Spider::green(0.1));
        let q = dg.add_spider(Spider::green(0.2));
        let s = dg.add_spider(Spider::green(0.0));
        dg.add_wire(x, s).unwrap();
        dg.add_wire(s, x).unwrap();
        dg.add_wire(p, x).unwrap();
        dg.add_wire(x, q).unwrap();
        assert_eq!(dg.simplify_rule_scan(Identity, None), 2);
        assert!(!dg.has_spider(x));
        assert!(!dg.has_spider(s));
        assert_eq!(dg.count_wires(), 1);
        assert_eq!(dg.mutual_arity(p, q), Some(1));
    }

    #[test]
    fn identity_scan_long_chain() {
        let n: usize = 20_000;
        let mut dg = Diagram::new();
        let hub = dg.add_spider(Spider::other(0.0));
        for _ in 0..n {
            let leaf = dg.add_spider(Spider::green(0.0));
            dg.add_wire(hub, leaf).unwrap();
        }
        let r0 = dg.add_spider(Spider::red(0.5));
        let chain: Vec<NodeId> =
            (0..n).map(|_| dg.add_spider(Spider::red(0.0))).collect();
        let r1 = dg.add_spider(Spider::red(0.5));
        dg.add_wire(r0, chain[0]).unwrap();
        for w in chain.windows(2) {
            dg.add_wire(w[0], w[1]).unwrap();
        }
        dg.add_wire(chain[n - 1], r1).unwrap();
        assert_eq!(dg.simplify_rule_scan(Identity, None), n);
        assert_eq!(dg.count_spiders(), n + 3);
        assert_eq!(dg.count_wires(), n + 1);
        assert_eq!(dg.mutual_arity(r0, r1), Some(1));
    }
}
