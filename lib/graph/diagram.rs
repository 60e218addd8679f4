use rustc_hash::FxHashSet;
use crate::graph::{ Color, GraphError, GraphResult, NodeId, Spider };
use GraphError::*;

/// An undirected wire between two spiders.
///
/// The order of the endpoints carries no meaning; use [`key`][Self::key] to
/// compare wires as unordered pairs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Wire(pub NodeId, pub NodeId);

impl Wire {
    /// Create a new wire.
    pub fn new(a: NodeId, b: NodeId) -> Self { Self(a, b) }

    /// Return `true` if either endpoint is `id`.
    pub fn has_id(&self, id: NodeId) -> bool { self.0 == id || self.1 == id }

    /// Return `true` if both endpoints are the same spider.
    pub fn is_self_loop(&self) -> bool { self.0 == self.1 }

    /// Return the endpoint opposite `id`, if `id` is an endpoint.
    ///
    /// For a self-loop on `id` this is `id` itself.
    pub fn other(&self, id: NodeId) -> Option<NodeId> {
        if self.0 == id {
            Some(self.1)
        } else if self.1 == id {
            Some(self.0)
        } else {
            None
        }
    }

    /// Return the endpoints as an ordered pair, lower index first.
    pub fn key(&self) -> (NodeId, NodeId) {
        if self.0 <= self.1 { (self.0, self.1) } else { (self.1, self.0) }
    }

    /// Apply a mapping function to both endpoints in place.
    pub fn map_ids<F>(&mut self, mut map: F)
    where F: FnMut(NodeId) -> NodeId
    {
        self.0 = map(self.0);
        self.1 = map(self.1);
    }
}

impl From<(NodeId, NodeId)> for Wire {
    fn from(ab: (NodeId, NodeId)) -> Self { Self(ab.0, ab.1) }
}

impl From<Wire> for (NodeId, NodeId) {
    fn from(wire: Wire) -> Self { (wire.0, wire.1) }
}

/// A spider diagram.
///
/// Every spider is identified by its [index][NodeId] in an ordered arena and
/// parallel wires are, in general, allowed. Wires are likewise kept in an
/// ordered arena of slots, and each spider carries the list of slots attached
/// to it so that degree and neighbor queries never walk the whole wire list.
/// Rewrite passes remove spiders and wires by tombstoning their slots and then
/// [compacting][Self::compact] once at the end, so IDs are stable within a
/// pass and dense between passes.
///
/// `M` is the type of opaque data attached to each spider and `P` the type of
/// opaque data attached to the diagram as a whole. Neither is ever inspected.
#[derive(Clone, Debug)]
pub struct Diagram<M = (), P = ()> {
    pub(crate) nodes: Vec<Option<Spider<M>>>,
    pub(crate) node_count: usize,
    pub(crate) wires: Vec<Option<Wire>>,
    pub(crate) wire_count: usize,
    // wire slots per spider, a self-loop listed twice; may also hold slots of
    // wires removed from the other end, which are skipped on read
    pub(crate) adj: Vec<Vec<usize>>,
    // exact number of live wire endpoints per spider
    pub(crate) deg: Vec<usize>,
    pub(crate) passthrough: P,
}

impl<M, P> Default for Diagram<M, P>
where P: Default
{
    fn default() -> Self { Self::with_passthrough(P::default()) }
}

impl Diagram<(), ()> {
    /// Create a new, empty diagram with no metadata.
    pub fn new() -> Self { Self::default() }
}

impl<M, P> Diagram<M, P> {
    /// Create a new, empty diagram carrying some passthrough data.
    pub fn with_passthrough(passthrough: P) -> Self {
        Self {
            nodes: Vec::new(),
            node_count: 0,
            wires: Vec::new(),
            wire_count: 0,
            adj: Vec::new(),
            deg: Vec::new(),
            passthrough,
        }
    }

    /// Create a new diagram directly from a list of spiders and wires.
    ///
    /// Spiders are given IDs in the order they are seen. Wires are taken as-is
    /// and are *not* checked; see [`validate`][Self::validate].
    pub fn from_parts<I, J, W>(spiders: I, wires: J, passthrough: P) -> Self
    where
        I: IntoIterator<Item = Spider<M>>,
        J: IntoIterator<Item = W>,
        W: Into<Wire>,
    {
        let mut dg = Self::with_passthrough(passthrough);
        spiders.into_iter().for_each(|s| { dg.add_spider(s); });
        wires.into_iter().for_each(|w| { dg.push_wire(w.into()); });
        dg
    }

    /// Compact `self` and split it into its spiders, wires, and passthrough
    /// data.
    pub fn into_parts(mut self) -> (Vec<Spider<M>>, Vec<Wire>, P) {
        self.compact();
        let Self { nodes, wires, passthrough, .. } = self;
        (
            nodes.into_iter().flatten().collect(),
            wires.into_iter().flatten().collect(),
            passthrough,
        )
    }

    /// Return a reference to the passthrough data.
    pub fn passthrough(&self) -> &P { &self.passthrough }

    /// Return a mutable reference to the passthrough data.
    pub fn passthrough_mut(&mut self) -> &mut P { &mut self.passthrough }

    /// Return the number of live spiders.
    pub fn count_spiders(&self) -> usize { self.node_count }

    /// Return the number of wires.
    pub fn count_wires(&self) -> usize { self.wire_count }

    /// Return the number of live spiders with a particular color.
    pub fn count_color(&self, color: Color) -> usize {
        self.spiders().filter(|(_, s)| s.color == color).count()
    }

    /// Return `true` if any live spider is a Hadamard node.
    pub fn has_hadamard(&self) -> bool {
        self.spiders().any(|(_, s)| s.is_hadamard())
    }

    /// Return `true` if any wire directly joins a green and a red spider.
    pub fn has_diff_color_wire(&self) -> bool {
        self.wires()
            .any(|w| {
                match (self.get_spider(w.0), self.get_spider(w.1)) {
                    (Some(a), Some(b)) => a.is_diff_color(b),
                    _ => false,
                }
            })
    }

    /// Get the spider associated with a particular ID if it exists.
    pub fn get_spider(&self, id: NodeId) -> Option<&Spider<M>> {
        self.nodes.get(id).and_then(|mb_s| mb_s.as_ref())
    }

    pub(crate) fn get_spider_mut(&mut self, id: NodeId)
        -> Option<&mut Spider<M>>
    {
        self.nodes.get_mut(id).and_then(|mb_s| mb_s.as_mut())
    }

    /// Return `true` if a live spider exists with the given ID.
    pub fn has_spider(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(|mb_s| mb_s.is_some())
    }

    /// Return the number of wire endpoints at a spider, if it exists.
    ///
    /// Self-loops are counted twice.
    pub fn degree(&self, id: NodeId) -> Option<usize> {
        self.has_spider(id).then_some(())?;
        self.deg.get(id).copied()
    }

    /// Return an iterator over the neighbors of a spider, if it exists.
    ///
    /// One neighbor is produced per wire endpoint, so parallel wires produce
    /// duplicates and a self-loop produces the spider itself twice.
    pub fn neighbors(&self, id: NodeId) -> Option<Neighbors<'_>> {
        self.has_spider(id).then_some(())?;
        let slots = self.adj.get(id)?;
        Some(Neighbors { id, slots: slots.iter(), wires: &self.wires })
    }

    /// Get the number of wires connecting two spiders, if they both exist.
    pub fn mutual_arity(&self, a: NodeId, b: NodeId) -> Option<usize> {
        self.has_spider(b).then_some(())?;
        let ma = self.neighbors(a)?.filter(|nb| *nb == b).count();
        if a == b { Some(ma / 2) } else { Some(ma) }
    }

    /// Add a spider to the diagram and return its ID.
    pub fn add_spider(&mut self, spider: Spider<M>) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Some(spider));
        self.adj.push(Vec::new());
        self.deg.push(0);
        self.node_count += 1;
        id
    }

    /// Add a wire between two spiders.
    ///
    /// Fails if one or neither of the spiders exist.
    pub fn add_wire(&mut self, a: NodeId, b: NodeId) -> GraphResult<()> {
        self.has_spider(a).then_some(()).ok_or(MissingNode(a))?;
        self.has_spider(b).then_some(()).ok_or(MissingNode(b))?;
        self.push_wire(Wire(a, b));
        Ok(())
    }

    // append a wire without checking its endpoints, returning its slot;
    // out-of-range endpoints are stored but not indexed
    pub(crate) fn push_wire(&mut self, wire: Wire) -> usize {
        let k = self.wires.len();
        self.wires.push(Some(wire));
        self.wire_count += 1;
        for id in [wire.0, wire.1] {
            if let (Some(slots), Some(d)) = (self.adj.get_mut(id), self.deg.get_mut(id)) {
                slots.push(k);
                *d += 1;
            }
        }
        k
    }

    // tombstone the wire in slot `k`; slot lists are cleaned up lazily
    pub(crate) fn drop_wire(&mut self, k: usize) -> Option<Wire> {
        let wire = self.wires.get_mut(k)?.take()?;
        self.wire_count -= 1;
        for id in [wire.0, wire.1] {
            if let Some(d) = self.deg.get_mut(id) { *d = d.saturating_sub(1); }
        }
        Some(wire)
    }

    // drop stale entries from a spider's slot list
    pub(crate) fn prune(&mut self, id: NodeId) {
        let wires = &self.wires;
        if let Some(slots) = self.adj.get_mut(id) {
            slots.retain(|k| wires[*k].is_some_and(|w| w.has_id(id)));
        }
    }

    // remove every wire with an endpoint at `id`, returning the other
    // endpoints in slot-list order (once per wire)
    pub(crate) fn detach(&mut self, id: NodeId) -> Vec<NodeId> {
        let slots = self.adj.get_mut(id).map(std::mem::take).unwrap_or_default();
        let mut nnb: Vec<NodeId> = Vec::with_capacity(slots.len());
        for k in slots.into_iter() {
            let Some(w) = self.wires[k] else { continue; };
            let Some(nb) = w.other(id) else { continue; };
            self.drop_wire(k);
            nnb.push(nb);
        }
        nnb
    }

    // move every wire endpoint at `from` onto `into`, dropping wires that
    // would become self-loops; returns the number of wires dropped
    pub(crate) fn redirect(&mut self, from: NodeId, into: NodeId) -> usize {
        let slots = self.adj.get_mut(from).map(std::mem::take).unwrap_or_default();
        let mut dropped: usize = 0;
        for k in slots.into_iter() {
            let Some(mut w) = self.wires[k] else { continue; };
            if !w.has_id(from) { continue; }
            if w.is_self_loop() || w.has_id(into) {
                self.drop_wire(k);
                dropped += 1;
                continue;
            }
            w.map_ids(|id| if id == from { into } else { id });
            self.wires[k] = Some(w);
            self.deg[from] -= 1;
            self.adj[into].push(k);
            self.deg[into] += 1;
        }
        dropped
    }

    // mark a spider as removed without touching any wires; callers must have
    // already detached or redirected them
    pub(crate) fn tombstone(&mut self, id: NodeId) -> Option<Spider<M>> {
        let spider = self.nodes.get_mut(id)?.take()?;
        self.node_count -= 1;
        Some(spider)
    }

    /// Remove all wires between two spiders, returning the number removed.
    pub fn remove_wires(&mut self, a: NodeId, b: NodeId) -> usize {
        let key = Wire(a, b).key();
        let slots: Vec<usize> = self.adj.get(a).cloned().unwrap_or_default();
        let removed =
            slots.into_iter()
            .filter(|k| {
                self.wires[*k].is_some_and(|w| w.key() == key)
                    && self.drop_wire(*k).is_some()
            })
            .count();
        self.prune(a);
        self.prune(b);
        removed
    }

    /// Remove every wire whose endpoints are the same spider, returning the
    /// number removed.
    pub fn remove_self_loops(&mut self) -> usize {
        (0..self.wires.len())
            .filter(|k| {
                self.wires[*k].is_some_and(|w| w.is_self_loop())
                    && self.drop_wire(*k).is_some()
            })
            .count()
    }

    /// Check that every wire references two live spiders.
    ///
    /// Fails with [`GraphError::InvariantViolation`] on the first wire that
    /// does not, identified by its position in [`wires`][Self::wires].
    pub fn validate(&self) -> GraphResult<()> {
        self.wires().enumerate()
            .find(|(_, w)| !self.has_spider(w.0) || !self.has_spider(w.1))
            .map_or(Ok(()), |(k, w)| Err(InvariantViolation(k, w.0, w.1)))
    }

    /// Drop all tombstoned spiders and wires, renumbering the surviving
    /// spiders while preserving their relative order and remapping every wire
    /// accordingly.
    ///
    /// Returns a table mapping each old ID to its new ID, or `None` if the
    /// spider was removed.
    ///
    /// Wires with an endpoint that is out of range or already removed have no
    /// place in the renumbered diagram and are dropped without notice. Such
    /// wires can only come from [`from_parts`][Self::from_parts]; call
    /// [`validate`][Self::validate] first to reject them instead.
    pub fn compact(&mut self) -> Vec<Option<NodeId>> {
        let mut remap: Vec<Option<NodeId>> = Vec::with_capacity(self.nodes.len());
        let mut next: NodeId = 0;
        for mb_s in self.nodes.iter() {
            if mb_s.is_some() {
                remap.push(Some(next));
                next += 1;
            } else {
                remap.push(None);
            }
        }
        let nodes = std::mem::take(&mut self.nodes);
        let wires = std::mem::take(&mut self.wires);
        self.node_count = 0;
        self.wire_count = 0;
        self.adj.clear();
        self.deg.clear();
        nodes.into_iter().flatten().for_each(|s| { self.add_spider(s); });
        for w in wires.into_iter().flatten() {
            let a = remap.get(w.0).copied().flatten();
            let b = remap.get(w.1).copied().flatten();
            if let (Some(a), Some(b)) = (a, b) {
                self.push_wire(Wire(a, b));
            }
        }
        remap
    }

    /// Return an iterator over all live spiders, visited in index order.
    ///
    /// The iterator item type is `(`[`NodeId`]`, &`[`Spider`]`)`.
    pub fn spiders(&self) -> Spiders<'_, M> {
        Spiders { len: self.node_count, iter: self.nodes.iter().enumerate() }
    }

    /// Return an iterator over all wires in insertion order.
    pub fn wires(&self) -> Wires<'_> {
        Wires { len: self.wire_count, iter: self.wires.iter() }
    }

    /// Return all wires as a set of unordered pairs, each given lower index
    /// first.
    pub fn wire_set(&self) -> FxHashSet<(NodeId, NodeId)> {
        self.wires().map(|w| w.key()).collect()
    }

    // keep only the first occurrence of every unordered pair
    pub(crate) fn dedup_wires(&mut self) -> usize {
        let mut seen: FxHashSet<(NodeId, NodeId)> = FxHashSet::default();
        let dups: Vec<usize> =
            self.wires.iter().enumerate()
            .filter_map(|(k, mb_w)| mb_w.map(|w| (k, w)))
            .filter(|(_, w)| !seen.insert(w.key()))
            .map(|(k, _)| k)
            .collect();
        dups.iter().for_each(|k| { self.drop_wire(*k); });
        dups.len()
    }
}

/// Iterator over live spiders in a [`Diagram`].
///
/// The iterator item type is `(`[`NodeId`]`, &`[`Spider`]`)`.
#[derive(Clone)]
pub struct Spiders<'a, M> {
    len: usize,
    iter: std::iter::Enumerate<std::slice::Iter<'a, Option<Spider<M>>>>,
}

impl<'a, M> Iterator for Spiders<'a, M> {
    type Item = (NodeId, &'a Spider<M>);

    fn next(&mut self) -> Option<Self::Item> {
        for (id, mb_s) in self.iter.by_ref() {
            if let Some(s) = mb_s.as_ref() {
                self.len = self.len.saturating_sub(1);
                return Some((id, s));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) { (self.len, Some(self.len)) }
}

impl<'a, M> DoubleEndedIterator for Spiders<'a, M> {
    fn next_back(&mut self) -> Option<Self::Item> {
        while let Some((id, mb_s)) = self.iter.next_back() {
            if let Some(s) = mb_s.as_ref() {
                self.len = self.len.saturating_sub(1);
                return Some((id, s));
            }
        }
        None
    }
}

impl<'a, M> ExactSizeIterator for Spiders<'a, M> {
    fn len(&self) -> usize { self.len }
}

impl<'a, M> std::iter::FusedIterator for Spiders<'a, M> { }

/// Iterator over live wires in a [`Diagram`], in insertion order.
///
/// The iterator item type is [`Wire`].
#[derive(Clone)]
pub struct Wires<'a> {
    len: usize,
    iter: std::slice::Iter<'a, Option<Wire>>,
}

impl<'a> Iterator for Wires<'a> {
    type Item = Wire;

    fn next(&mut self) -> Option<Self::Item> {
        for mb_w in self.iter.by_ref() {
            if let Some(w) = mb_w {
                self.len = self.len.saturating_sub(1);
                return Some(*w);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) { (self.len, Some(self.len)) }
}

impl<'a> ExactSizeIterator for Wires<'a> {
    fn len(&self) -> usize { self.len }
}

impl<'a> std::iter::FusedIterator for Wires<'a> { }

/// Iterator over the neighbors of a single spider.
///
/// The iterator item type is [`NodeId`].
#[derive(Clone)]
pub struct Neighbors<'a> {
    id: NodeId,
    slots: std::slice::Iter<'a, usize>,
    wires: &'a [Option<Wire>],
}

impl<'a> Iterator for Neighbors<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.id;
        let wires = self.wires;
        self.slots.find_map(|k| wires[*k].and_then(|w| w.other(id)))
    }
}

impl<'a> std::iter::FusedIterator for Neighbors<'a> { }

/// Create a [spider diagram][Diagram] using an abbreviated syntax.
///
/// There are two blocks. The first is headed with `spiders` and defines
/// spiders with the syntax
/// ```text
/// <label> = <constructor> ( args... )
/// ```
/// where `<constructor>` is one of [`Spider`]'s metadata-free constructors
/// (`green`, `red`, `hadamard`, or `other`). Labels given here are then used
/// in the second block, headed with `wires`, which chains labels as
/// ```text
/// <spider1> -- <spider2> [ -- <spider3> ... ]
/// ```
/// adding a wire for every (overlapping) consecutive pair.
///
/// The total return type is `Result<(`[`Diagram`]`,
/// `[`HashMap`][std::collections::HashMap]`<&'static `[`str`]`, `[`NodeId`]`>),
/// `[`GraphError`]`>`.
///
/// ```
/// # use spider_rewrite::graph::*;
/// use spider_rewrite::spider_diagram;
///
/// let (diagram, ids) = spider_diagram!(
///     spiders: {
///         a = green (0.5),
///         h = hadamard (),
///         b = red (0.0),
///         c = red (0.25),
///     }
///     wires: {
///         a -- h -- b,
///         b -- c,
///     }
/// ).unwrap();
/// assert_eq!(diagram.count_spiders(), 4);
/// assert_eq!(diagram.count_wires(), 3);
/// assert_eq!(diagram.degree(ids["b"]), Some(2));
/// ```
#[macro_export]
macro_rules! spider_diagram {
    (
        spiders : {
            $( $name:ident = $ctor:ident ( $( $arg:expr ),* $(,)? ) ),*
            $(,)?
        }
        wires : {
            $( $first:ident $( -- $rest:ident )+ ),*
            $(,)?
        }
    ) => {
        {
            let mut _diagram_ = $crate::graph::Diagram::new();
            $(
            let $name =
                _diagram_.add_spider(
                    $crate::graph::Spider::$ctor( $( $arg ),* )
                );
            )*
            Ok::<(), $crate::graph::GraphError>(())
            $(.and_then(|_| {
                let mut _last_ = $first;
                Ok(())
                $(.and_then(|_| {
                    let res = _diagram_.add_wire(_last_, $rest);
                    _last_ = $rest;
                    res
                }))+
            }))*
            .map(|_| {
                let _ids_:
                    std::collections::HashMap<
                        &'static str,
                        $crate::graph::NodeId
                    > =
                    [$( (stringify!($name), $name) ),*]
                    .into_iter()
                    .collect();
                (_diagram_, _ids_)
            })
        }
    }
}

pub use spider_diagram;
