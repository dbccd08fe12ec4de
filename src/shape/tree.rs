use super::{Shape, ShapeError};
use crate::math::{Affine2D, Affine3D};
use glam::Vec3;
use slotmap::SlotMap;
use smallvec::SmallVec;
use std::ops::Index;

slotmap::new_key_type! {
    pub struct ShapeId;
}

struct Node {
    shape: Shape,
    parent: Option<ShapeId>,
    children: SmallVec<[ShapeId; 4]>,
}

/// Arena of shapes linked into a forest. Every child has exactly one parent.
///
/// Ids are only valid for the tree that issued them. Passing a foreign or
/// stale id to a transform method is a programming error and panics.
#[derive(Default)]
pub struct ShapeTree {
    nodes: SlotMap<ShapeId, Node>,
    /// Insertion order, used for flattening.
    order: Vec<ShapeId>,
}

impl ShapeTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Inserts a detached shape.
    pub fn insert(&mut self, shape: Shape) -> ShapeId {
        let id = self.nodes.insert(Node {
            shape,
            parent: None,
            children: SmallVec::new(),
        });
        self.order.push(id);
        id
    }

    pub fn insert_child(&mut self, parent: ShapeId, shape: Shape) -> Result<ShapeId, ShapeError> {
        if !self.nodes.contains_key(parent) {
            return Err(ShapeError::UnknownShape(parent));
        }
        let child = self.insert(shape);
        self.attach(parent, child)?;
        Ok(child)
    }

    /// Makes `child` (currently a root) a child of `parent`.
    pub fn attach(&mut self, parent: ShapeId, child: ShapeId) -> Result<(), ShapeError> {
        for id in [parent, child] {
            if !self.nodes.contains_key(id) {
                return Err(ShapeError::UnknownShape(id));
            }
        }
        if self.nodes[child].parent.is_some() {
            return Err(ShapeError::AlreadyAttached { child });
        }
        if parent == child || self.is_ancestor(child, parent) {
            return Err(ShapeError::Cycle { parent, child });
        }

        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
        Ok(())
    }

    /// Whether `ancestor` lies on the path from `id` up to its root.
    pub fn is_ancestor(&self, ancestor: ShapeId, id: ShapeId) -> bool {
        let mut current = self.nodes.get(id).and_then(|node| node.parent);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.nodes[node].parent;
        }
        false
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.nodes.get(id).map(|node| &node.shape)
    }

    pub fn parent(&self, id: ShapeId) -> Option<ShapeId> {
        self.nodes.get(id).and_then(|node| node.parent)
    }

    pub fn children(&self, id: ShapeId) -> &[ShapeId] {
        self.nodes
            .get(id)
            .map_or(&[][..], |node| node.children.as_slice())
    }

    /// Shapes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (ShapeId, &Shape)> + '_ {
        self.order.iter().map(|&id| (id, &self.nodes[id].shape))
    }

    /// Applies `m` to the shape and every descendant. Only the shape itself
    /// accumulates `delta_angle`.
    pub fn apply(&mut self, id: ShapeId, m: &Affine2D, delta_angle: f32) {
        let node = &mut self.nodes[id];
        node.shape.transform(m);

        let children = node.children.clone();
        for child in children {
            self.apply(child, m, 0.0);
        }

        self.nodes[id].shape.finish_transform(m, delta_angle);
    }

    /// Rotates the subtree by `degrees` about the shape's own pivot.
    pub fn rotate_about_pivot(&mut self, id: ShapeId, degrees: f32) {
        let pivot = self.nodes[id].shape.pivot.truncate();
        self.apply(id, &Affine2D::rotate_about(degrees, pivot), degrees);
    }

    /// Rotates the shape back to the angle it was created with.
    pub fn reset_angle(&mut self, id: ShapeId) {
        let angle = self.nodes[id].shape.angle;
        self.rotate_about_pivot(id, -angle);
    }

    pub fn apply_3d(&mut self, id: ShapeId, m: &Affine3D) {
        let node = &mut self.nodes[id];
        node.shape.transform_3d(m);

        let children = node.children.clone();
        for child in children {
            self.apply_3d(child, m);
        }
    }

    /// Spins the subtree about the shape's pivot by per-axis degrees,
    /// composed as `Rz · Ry · Rx`.
    pub fn spin_about_pivot(&mut self, id: ShapeId, degrees: Vec3) {
        let pivot = self.nodes[id].shape.pivot;
        self.apply_3d(id, &Affine3D::rotate_about(degrees, pivot));
    }
}

impl Index<ShapeId> for ShapeTree {
    type Output = Shape;

    fn index(&self, id: ShapeId) -> &Shape {
        &self.nodes[id].shape
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    const EPS: f32 = 1e-5;

    fn assert_points(actual: &[Vec3], expected: &[Vec3]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((*a - *e).abs().max_element() <= EPS, "{} != {}", a, e);
        }
    }

    fn body() -> Shape {
        Shape::quad([
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
        ])
        .with_pivot(Vec3::new(0.0, -0.5, 0.0))
    }

    fn stick(y0: f32, y1: f32) -> Shape {
        Shape::quad([
            Vec3::new(-0.25, y0, 0.0),
            Vec3::new(-0.25, y1, 0.0),
            Vec3::new(0.25, y1, 0.0),
            Vec3::new(0.25, y0, 0.0),
        ])
        .with_pivot(Vec3::new(0.0, y0, 0.0))
    }

    fn chain() -> (ShapeTree, [ShapeId; 3]) {
        let mut tree = ShapeTree::new();
        let body = tree.insert(body());
        let arm = tree.insert_child(body, stick(0.0, 2.0)).unwrap();
        let head = tree.insert_child(arm, stick(2.0, 3.0)).unwrap();
        (tree, [body, arm, head])
    }

    #[test]
    fn quarter_turn_about_pivot() {
        let mut tree = ShapeTree::new();
        let id = tree.insert(body());
        tree.rotate_about_pivot(id, 90.0);

        assert_points(
            tree[id].vertices(),
            &[
                Vec3::new(0.5, -1.5, 0.0),
                Vec3::new(-0.5, -1.5, 0.0),
                Vec3::new(-0.5, 0.5, 0.0),
                Vec3::new(0.5, 0.5, 0.0),
            ],
        );
        assert_points(&[tree[id].pivot()], &[Vec3::new(0.0, -0.5, 0.0)]);
        assert_eq!(tree[id].angle(), 90.0);
    }

    #[test]
    fn rotation_and_reverse_restore_shape() {
        let (mut tree, [_, arm, head]) = chain();
        let before: Vec<Vec3> = tree[head].vertices().to_vec();
        let arm_before: Vec<Vec3> = tree[arm].vertices().to_vec();

        tree.rotate_about_pivot(arm, 37.5);
        tree.rotate_about_pivot(arm, -37.5);

        assert_points(tree[arm].vertices(), &arm_before);
        assert_points(tree[head].vertices(), &before);
        assert_eq!(tree[arm].angle(), 0.0);
    }

    #[test]
    fn translation_reaches_every_descendant() {
        let (mut tree, ids) = chain();
        let before: Vec<Vec<Vec3>> = ids.iter().map(|&id| tree[id].vertices().to_vec()).collect();
        let v = Vec2::new(1.5, -0.75);

        tree.apply(ids[0], &Affine2D::translate(v), 0.0);

        for (&id, old) in ids.iter().zip(&before) {
            let shifted: Vec<Vec3> = old.iter().map(|p| *p + v.extend(0.0)).collect();
            assert_points(tree[id].vertices(), &shifted);
            assert_eq!(tree[id].angle(), 0.0);
        }
        assert_points(&[tree[ids[2]].pivot()], &[Vec3::new(1.5, 1.25, 0.0)]);
    }

    #[test]
    fn child_rotation_leaves_parent_alone() {
        let (mut tree, [body, arm, head]) = chain();
        let body_before = tree[body].vertices().to_vec();

        tree.rotate_about_pivot(arm, -90.0);

        assert_points(tree[body].vertices(), &body_before);
        assert_eq!(tree[arm].angle(), -90.0);
        assert_eq!(tree[head].angle(), 0.0);
        // The head's pivot swings with the arm: (0, 2) -> (2, 0).
        assert_points(&[tree[head].pivot()], &[Vec3::new(2.0, 0.0, 0.0)]);
    }

    #[test]
    fn identity_changes_nothing() {
        let (mut tree, [body, arm, _]) = chain();
        tree.rotate_about_pivot(arm, 12.0);
        let before: Vec<Vec3> = tree.iter().flat_map(|(_, s)| s.vertices().to_vec()).collect();

        tree.apply(body, &Affine2D::IDENTITY, 0.0);

        let after: Vec<Vec3> = tree.iter().flat_map(|(_, s)| s.vertices().to_vec()).collect();
        assert_eq!(before, after);
        assert_eq!(tree[arm].angle(), 12.0);
    }

    #[test]
    fn reset_angle_returns_to_zero() {
        let (mut tree, [_, arm, _]) = chain();
        tree.rotate_about_pivot(arm, 13.0);
        tree.rotate_about_pivot(arm, 29.25);
        tree.reset_angle(arm);
        assert_eq!(tree[arm].angle(), 0.0);
    }

    #[test]
    fn attach_rules() {
        let (mut tree, [trunk, arm, head]) = chain();

        assert_eq!(
            tree.attach(trunk, arm),
            Err(ShapeError::AlreadyAttached { child: arm })
        );

        let loose = tree.insert(stick(5.0, 6.0));
        assert_eq!(
            tree.attach(loose, loose),
            Err(ShapeError::Cycle {
                parent: loose,
                child: loose
            })
        );
        assert!(tree.attach(head, loose).is_ok());
        assert_eq!(tree.parent(loose), Some(head));
        assert_eq!(tree.children(head), &[loose]);
        assert!(tree.is_ancestor(trunk, loose));

        let root = tree.insert(body());
        assert_eq!(
            tree.attach(loose, root).and_then(|_| tree.attach(root, trunk)),
            Err(ShapeError::Cycle {
                parent: root,
                child: trunk
            })
        );
    }

    #[test]
    fn null_ids_are_reported() {
        let mut tree = ShapeTree::new();
        let root = tree.insert(body());
        let null = ShapeId::default();

        assert_eq!(
            tree.insert_child(null, body()),
            Err(ShapeError::UnknownShape(null))
        );
        assert_eq!(tree.attach(root, null), Err(ShapeError::UnknownShape(null)));
        assert!(tree.get(null).is_none());
        assert!(tree.children(null).is_empty());
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn spin_propagates_in_3d() {
        let mut tree = ShapeTree::new();
        let cube = tree.insert(Shape::cube(1.0, Vec3::ZERO));
        let satellite = tree.insert_child(cube, Shape::cube(0.5, Vec3::X * 2.0)).unwrap();

        tree.spin_about_pivot(cube, Vec3::new(0.0, 0.0, 90.0));

        assert_points(&[tree[cube].pivot()], &[Vec3::ZERO]);
        assert_points(&[tree[satellite].pivot()], &[Vec3::Y * 2.0]);
        assert_eq!(tree[cube].angle(), 0.0);

        tree.apply_3d(cube, &Affine3D::translate(Vec3::Z));
        assert_points(&[tree[satellite].pivot()], &[Vec3::new(0.0, 2.0, 1.0)]);
    }
}
