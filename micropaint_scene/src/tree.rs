// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core scene implementation: structure, updates, queries.

use alloc::vec::Vec;

use kurbo::Point;
use micropaint_hit::HitParams;

use crate::error::SceneError;
use crate::placement::Placement;
use crate::types::{CursorId, HitShape, NodeId, NodeSpec};

/// Arena of scene nodes.
///
/// Children are owned through the arena and listed in paint order: the
/// first child is drawn farthest back, the last child frontmost. Parents are
/// plain [`NodeId`] back-references, so walking up is O(1) per step and the
/// structure has no ownership cycles.
///
/// A scene may hold several root nodes; the dispatcher is pointed at one of
/// them.
///
/// ## Example
///
/// ```rust
/// use kurbo::{Point, Size};
/// use micropaint_scene::{HitShape, NodeSpec, Placement, Scene};
///
/// let mut scene = Scene::new();
/// let root = scene
///     .insert(None, NodeSpec::default().with_shape(HitShape::Everywhere))
///     .unwrap();
/// let button = scene
///     .insert(
///         Some(root),
///         NodeSpec::new(Placement::at(Point::new(10.0, 10.0), Size::new(80.0, 24.0))),
///     )
///     .unwrap();
///
/// let hit = scene.hit_test_point(root, Point::new(20.0, 20.0)).unwrap();
/// assert_eq!(hit.node, button);
/// assert_eq!(hit.local, Point::new(10.0, 10.0));
/// assert_eq!(hit.path, vec![root, button]);
/// ```
pub struct Scene {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    hit_params: HitParams,
}

impl core::fmt::Debug for Scene {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Scene")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("hit_params", &self.hit_params)
            .finish_non_exhaustive()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of [`Scene::hit_test_point`].
#[derive(Clone, Debug, PartialEq)]
pub struct Hit {
    /// The deepest, frontmost node under the point.
    pub node: NodeId,
    /// The point in `node`'s local space.
    pub local: Point,
    /// Path from the root to `node` (inclusive).
    pub path: Vec<NodeId>,
}

#[derive(Debug)]
struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    placement: Placement,
    shape: HitShape,
    cursor: CursorId,
    hovered: bool,
}

impl Node {
    fn new(generation: u32, spec: NodeSpec) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            placement: spec.placement,
            shape: spec.shape,
            cursor: spec.cursor,
            hovered: false,
        }
    }
}

impl Scene {
    /// Create an empty scene with default [`HitParams`].
    pub fn new() -> Self {
        Self::with_hit_params(HitParams::default())
    }

    /// Create an empty scene whose containment tests use `hit_params`.
    pub fn with_hit_params(hit_params: HitParams) -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            hit_params,
        }
    }

    /// Tolerances used by every containment test.
    pub fn hit_params(&self) -> &HitParams {
        &self.hit_params
    }

    /// Insert a new node as the frontmost child of `parent`, or as a root.
    pub fn insert(&mut self, parent: Option<NodeId>, spec: NodeSpec) -> Result<NodeId, SceneError> {
        if let Some(p) = parent
            && !self.is_alive(p)
        {
            return Err(SceneError::StaleNode(p));
        }
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, spec));
            (idx, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, spec)));
            self.generations.push(generation);
            (self.nodes.len() - 1, generation)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "NodeId uses 32-bit indices by design."
        )]
        let id = NodeId::new(idx as u32, generation);
        if let Some(p) = parent {
            self.link_parent(id, p);
        }
        Ok(id)
    }

    /// Remove a node and its whole subtree.
    pub fn remove(&mut self, id: NodeId) -> Result<(), SceneError> {
        if !self.is_alive(id) {
            return Err(SceneError::StaleNode(id));
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        self.free_subtree(id);
        Ok(())
    }

    /// Move `id` to be the frontmost child of `new_parent`, or detach it
    /// into a root.
    pub fn reparent(&mut self, id: NodeId, new_parent: Option<NodeId>) -> Result<(), SceneError> {
        if !self.is_alive(id) {
            return Err(SceneError::StaleNode(id));
        }
        if let Some(p) = new_parent {
            if !self.is_alive(p) {
                return Err(SceneError::StaleNode(p));
            }
            if self.is_descendant_of(p, id) {
                return Err(SceneError::WouldCycle {
                    node: id,
                    parent: p,
                });
            }
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        if let Some(p) = new_parent {
            self.link_parent(id, p);
        }
        Ok(())
    }

    /// Update a node's placement.
    pub fn set_placement(&mut self, id: NodeId, placement: Placement) -> Result<(), SceneError> {
        let n = self.node_opt_mut(id).ok_or(SceneError::StaleNode(id))?;
        n.placement = placement;
        if placement.is_degenerate() {
            tracing::debug!(%id, "placement is degenerate; node is unreachable by hit testing");
        }
        Ok(())
    }

    /// Update a node's containment predicate.
    pub fn set_shape(&mut self, id: NodeId, shape: impl Into<HitShape>) -> Result<(), SceneError> {
        let n = self.node_opt_mut(id).ok_or(SceneError::StaleNode(id))?;
        n.shape = shape.into();
        Ok(())
    }

    /// Update a node's requested cursor.
    pub fn set_cursor(&mut self, id: NodeId, cursor: CursorId) -> Result<(), SceneError> {
        let n = self.node_opt_mut(id).ok_or(SceneError::StaleNode(id))?;
        n.cursor = cursor;
        Ok(())
    }

    /// Record whether the pointer is over `id`. Ignored for stale ids.
    ///
    /// The dispatcher owns this flag; other callers normally only read it.
    pub fn set_hovered(&mut self, id: NodeId, hovered: bool) {
        if let Some(n) = self.node_opt_mut(id) {
            n.hovered = hovered;
        }
    }

    /// Returns true if `id` refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .is_some_and(|n| n.generation == id.1)
    }

    /// Returns the parent of a node, or `None` for roots and stale ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id).and_then(|n| n.parent)
    }

    /// Children of a node in paint order, or an empty slice if stale.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        match self.node_opt(id) {
            Some(n) => &n.children,
            None => &[],
        }
    }

    /// Placement of a live node.
    pub fn placement(&self, id: NodeId) -> Option<&Placement> {
        self.node_opt(id).map(|n| &n.placement)
    }

    /// Containment predicate of a live node.
    pub fn shape(&self, id: NodeId) -> Option<&HitShape> {
        self.node_opt(id).map(|n| &n.shape)
    }

    /// Mutable access to a node's shape, e.g. to extend a stroke in place.
    pub fn shape_mut(&mut self, id: NodeId) -> Option<&mut HitShape> {
        self.node_opt_mut(id).map(|n| &mut n.shape)
    }

    /// Cursor requested by a live node.
    pub fn cursor_of(&self, id: NodeId) -> Option<CursorId> {
        self.node_opt(id).map(|n| n.cursor)
    }

    /// Whether the last hover pass found the pointer over `id`.
    pub fn is_hovered(&self, id: NodeId) -> bool {
        self.node_opt(id).is_some_and(|n| n.hovered)
    }

    /// Convert a point in `id`'s parent space into `id`'s local space.
    ///
    /// Returns `None` for stale ids and degenerate placements.
    pub fn to_local(&self, id: NodeId, parent_point: Point) -> Option<Point> {
        self.node_opt(id)?.placement.to_local_space(parent_point)
    }

    /// Containment test for a point already in `id`'s local space.
    pub fn contains(&self, id: NodeId, local: Point) -> bool {
        self.node_opt(id).is_some_and(|n| {
            !n.placement.is_degenerate() && n.shape.contains(&n.placement, local, &self.hit_params)
        })
    }

    /// Localize a parent-space point and keep it only if `id` contains it.
    pub fn localize(&self, id: NodeId, parent_point: Point) -> Option<Point> {
        let local = self.to_local(id, parent_point)?;
        self.contains(id, local).then_some(local)
    }

    /// Iterate from `id` up to its root, `id` first.
    ///
    /// Yields nothing for a stale id.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            scene: self,
            next: self.is_alive(id).then_some(id),
        }
    }

    /// True if `ancestor` is `id` itself or lies on `id`'s parent chain.
    pub fn is_descendant_of(&self, id: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }

    /// Find the deepest node under `point`, given in `root`'s parent space.
    ///
    /// The root itself is never containment-tested, mirroring how input
    /// dispatch starts. At each level the children are tried frontmost first
    /// and the first containing child is descended into; farther-back
    /// siblings are not considered once one matches.
    ///
    /// Returns `None` if `root` is stale or its placement is degenerate.
    pub fn hit_test_point(&self, root: NodeId, point: Point) -> Option<Hit> {
        let mut local = self.to_local(root, point)?;
        let mut node = root;
        let mut path = alloc::vec![root];
        'descend: loop {
            for &child in self.children_of(node).iter().rev() {
                if let Some(child_local) = self.localize(child, local) {
                    node = child;
                    local = child_local;
                    path.push(child);
                    continue 'descend;
                }
            }
            break;
        }
        Some(Hit { node, local, path })
    }

    // --- internals ---

    fn node(&self, id: NodeId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }

    fn node_opt(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn free_subtree(&mut self, id: NodeId) {
        let mut stack = alloc::vec![id];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.nodes[id.idx()].take() {
                stack.extend(node.children);
                self.free_list.push(id.idx());
            }
        }
    }

    fn link_parent(&mut self, id: NodeId, parent: NodeId) {
        self.node_mut(parent).children.push(id);
        self.node_mut(id).parent = Some(parent);
    }

    fn unlink_parent(&mut self, id: NodeId, parent: NodeId) {
        self.node_mut(parent).children.retain(|c| *c != id);
        self.node_mut(id).parent = None;
    }
}

/// Iterator over a node and its ancestors, returned by [`Scene::ancestors`].
#[derive(Clone, Debug)]
pub struct Ancestors<'a> {
    scene: &'a Scene,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.scene.parent_of(current);
        Some(current)
    }
}
