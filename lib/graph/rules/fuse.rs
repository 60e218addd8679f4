use super::*;

/// Two adjacent spiders of the same color and arbitrary arity and phase.
///
/// The pair is taken from the first wire (in wire order) joining two distinct
/// same-colored spiders. The lower-indexed spider survives, absorbing the
/// other's phase and wires; all wires left between the two become self-loops
/// and are dropped.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Fuse;

/// Output of [`Fuse::find`].
#[derive(Debug)]
pub struct FuseData<'a, M, P> {
    pub(crate) dg: &'a mut Diagram<M, P>,
    pub(crate) s1: NodeId, // surviving spider
    pub(crate) s2: NodeId, // absorbed spider
}

impl<'a, M, P> FuseData<'a, M, P> {
    /// Return the IDs of the surviving and absorbed spiders.
    pub fn pair(&self) -> (NodeId, NodeId) { (self.s1, self.s2) }
}

impl<M, P> RuleFinder<M, P> for Fuse {
    type Output<'a> = FuseData<'a, M, P> where M: 'a, P: 'a;

    fn find(self, dg: &mut Diagram<M, P>) -> Option<Self::Output<'_>> {
        self.seek(dg, &mut Scan::new())
    }
}

impl<M, P> RuleSeeker<M, P> for Fuse {
    // scans wire slots; fusing keeps every endpoint's color, so a wire passed
    // over never becomes fusable later
    fn seek<'a>(&self, dg: &'a mut Diagram<M, P>, scan: &mut Scan)
        -> Option<Self::Output<'a>>
    where M: 'a, P: 'a
    {
        while let Some(k) = scan.pop(dg.wires.len()) {
            let Some(w) = dg.wires[k] else { continue; };
            if w.is_self_loop() { continue; }
            let fusable =
                match (dg.get_spider(w.0), dg.get_spider(w.1)) {
                    (Some(a), Some(b)) => a.is_same_color(b),
                    _ => false,
                };
            if fusable {
                let (s1, s2) = w.key();
                return Some(FuseData { dg, s1, s2 });
            }
        }
        None
    }
}

impl<'a, M, P> Rule for FuseData<'a, M, P> {
    fn simplify(self) {
        let Self { dg, s1, s2 } = self;
        let Some(node2) = dg.tombstone(s2) else { return; };
        if let Some(node1) = dg.get_spider_mut(s1) {
            node1.map_phase(|ph1| ph1 + node2.phase);
        }
        dg.redirect(s2, s1);
    }
}
