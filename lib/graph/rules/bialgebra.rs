use rustc_hash::FxHashSet;
use super::*;

/// Propagate connectivity across every wire joining a green and a red spider.
///
/// For each such wire `(g, h)` in the diagram as found, every other neighbor
/// of `g` gains a direct wire to `h` and every other neighbor of `h` gains a
/// direct wire to `g`. Original wires are kept, no spider is removed, and the
/// final wire list is deduplicated as a set of unordered pairs.
///
/// Wires created by this rule are not themselves scanned in the same
/// application. When an outer neighbor is itself green or red, a new wire can
/// form a fresh green-red pair, so reaching closure may take further
/// applications; see [`Diagram::apply_bialgebra`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BialgebraAll;

/// Output of [`BialgebraAll::find`].
#[derive(Debug)]
pub struct BialgebraAllData<'a, M, P> {
    pub(crate) dg: &'a mut Diagram<M, P>,
    // new wires only; none is already present, a duplicate, or a self-loop
    pub(crate) new_wires: Vec<Wire>,
}

impl<'a, M, P> BialgebraAllData<'a, M, P> {
    /// Return the number of wires that will be added.
    pub fn len(&self) -> usize { self.new_wires.len() }

    /// Return `true` if no wires will be added.
    ///
    /// The wire list is still deduplicated on application.
    pub fn is_empty(&self) -> bool { self.new_wires.is_empty() }

    /// Return a reference to all wires that will be added.
    pub fn new_wires(&self) -> &Vec<Wire> { &self.new_wires }
}

impl<M, P> RuleFinder<M, P> for BialgebraAll {
    type Output<'a> = BialgebraAllData<'a, M, P> where M: 'a, P: 'a;

    fn find(self, dg: &mut Diagram<M, P>) -> Option<Self::Output<'_>> {
        let pairs: Vec<(NodeId, NodeId)> =
            dg.wires()
            .filter_map(|w| {
                let a = dg.get_spider(w.0)?;
                let b = dg.get_spider(w.1)?;
                if a.color.is_green() && b.color.is_red() {
                    Some((w.0, w.1))
                } else if a.color.is_red() && b.color.is_green() {
                    Some((w.1, w.0))
                } else {
                    None
                }
            })
            .collect();
        if pairs.is_empty() { return None; }

        let mut seen: FxHashSet<(NodeId, NodeId)> = dg.wire_set();
        let mut new_wires: Vec<Wire> = Vec::new();
        let mut push = |w: Wire| {
            if !w.is_self_loop() && seen.insert(w.key()) {
                new_wires.push(w);
            }
        };
        for (g, h) in pairs.into_iter() {
            dg.neighbors(g).into_iter().flatten()
                .filter(|nb| *nb != h)
                .for_each(|nb| push(Wire(nb, h)));
            dg.neighbors(h).into_iter().flatten()
                .filter(|nb| *nb != g)
                .for_each(|nb| push(Wire(g, nb)));
        }
        Some(BialgebraAllData { dg, new_wires })
    }
}

impl<'a, M, P> Rule for BialgebraAllData<'a, M, P> {
    fn simplify(self) {
        let Self { dg, new_wires } = self;
        new_wires.into_iter().for_each(|w| { dg.push_wire(w); });
        dg.dedup_wires();
    }
}
