use super::*;

/// Remove all wires connecting any spider to itself.
///
/// Applies to spiders of every color, Hadamard nodes included.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SelfLoopAll;

/// Output of [`SelfLoopAll::find`].
#[derive(Debug)]
pub struct SelfLoopAllData<'a, M, P> {
    pub(crate) dg: &'a mut Diagram<M, P>,
    pub(crate) spiders: Vec<NodeId>,
}

impl<'a, M, P> SelfLoopAllData<'a, M, P> {
    /// Return the number of spiders found with self-loops.
    pub fn len(&self) -> usize { self.spiders.len() }

    /// Return `true` if the number of spiders found is zero.
    pub fn is_empty(&self) -> bool { self.spiders.is_empty() }

    /// Return a reference to all spiders found with self-loops.
    pub fn spiders(&self) -> &Vec<NodeId> { &self.spiders }
}

impl<M, P> RuleFinder<M, P> for SelfLoopAll {
    type Output<'a> = SelfLoopAllData<'a, M, P> where M: 'a, P: 'a;

    fn find(self, dg: &mut Diagram<M, P>) -> Option<Self::Output<'_>> {
        let spiders: Vec<NodeId> =
            dg.spiders()
            .filter(|(id, _)| dg.mutual_arity(*id, *id).is_some_and(|n| n > 0))
            .map(|(id, _)| id)
            .collect();
        if spiders.is_empty() {
            None
        } else {
            Some(SelfLoopAllData { dg, spiders })
        }
    }
}

impl<'a, M, P> Rule for SelfLoopAllData<'a, M, P> {
    fn simplify(self) {
        let Self { dg, spiders } = self;
        spiders.into_iter()
            .for_each(|s| { dg.remove_wires(s, s); });
    }
}
