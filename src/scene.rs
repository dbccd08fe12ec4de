//! The articulated figure and its render-side flattening.

use crate::config::Palette;
use crate::math::Affine2D;
use crate::shape::{Shape, ShapeId, ShapeTree};
use glam::{Vec2, Vec3};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Joint {
    Body,
    UpperArm,
    LowerArm,
    Head,
}

impl Joint {
    pub const ALL: [Joint; 4] = [Joint::Body, Joint::UpperArm, Joint::LowerArm, Joint::Head];
}

/// Which way the figure walks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

impl Default for Facing {
    fn default() -> Self {
        Self::Right
    }
}

impl Facing {
    /// `+1` facing right, `-1` facing left.
    pub fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    pub fn unit(self) -> Vec2 {
        Vec2::X * self.sign()
    }
}

/// Vertex data handed to the renderer once per frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameMesh {
    pub positions: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
    pub colors: Vec<[f32; 4]>,
}

impl FrameMesh {
    pub fn clear(&mut self) {
        self.positions.clear();
        self.indices.clear();
        self.colors.clear();
    }
}

/// A body quad carrying a three link arm: body → upper arm → lower arm → head.
pub struct Figure {
    tree: ShapeTree,
    body: ShapeId,
    upper_arm: ShapeId,
    lower_arm: ShapeId,
    head: ShapeId,
}

impl Default for Figure {
    fn default() -> Self {
        Self::new()
    }
}

impl Figure {
    pub fn new() -> Self {
        let quad = |x0: f32, y0: f32, x1: f32, y1: f32| {
            Shape::quad([
                Vec3::new(x0, y0, 0.0),
                Vec3::new(x0, y1, 0.0),
                Vec3::new(x1, y1, 0.0),
                Vec3::new(x1, y0, 0.0),
            ])
        };

        let mut tree = ShapeTree::new();
        let body = tree.insert(quad(-1.0, -1.0, 1.0, 0.0).with_pivot(Vec3::new(0.0, -0.5, 0.0)));

        // Ids come from this tree, so attaching cannot fail.
        let mut link = |parent: ShapeId, shape: Shape| {
            let child = tree.insert(shape);
            let attached = tree.attach(parent, child);
            debug_assert!(attached.is_ok());
            child
        };

        let upper_arm = link(body, quad(-0.25, 0.0, 0.25, 2.0).with_pivot(Vec3::ZERO));
        let lower_arm = link(
            upper_arm,
            quad(-0.25, 2.0, 0.25, 4.0).with_pivot(Vec3::new(0.0, 2.0, 0.0)),
        );
        let head = link(
            lower_arm,
            quad(-0.1, 4.0, 0.1, 5.0).with_pivot(Vec3::new(0.0, 4.0, 0.0)),
        );

        Self {
            tree,
            body,
            upper_arm,
            lower_arm,
            head,
        }
    }

    pub fn id(&self, joint: Joint) -> ShapeId {
        match joint {
            Joint::Body => self.body,
            Joint::UpperArm => self.upper_arm,
            Joint::LowerArm => self.lower_arm,
            Joint::Head => self.head,
        }
    }

    pub fn shape(&self, joint: Joint) -> &Shape {
        &self.tree[self.id(joint)]
    }

    pub fn angle(&self, joint: Joint) -> f32 {
        self.shape(joint).angle()
    }

    pub fn tree(&self) -> &ShapeTree {
        &self.tree
    }

    /// Moves the whole figure.
    pub fn translate(&mut self, offset: Vec2) {
        self.tree.apply(self.body, &Affine2D::translate(offset), 0.0);
    }

    /// Rotates a link (and everything it carries) about its pivot.
    pub fn rotate(&mut self, joint: Joint, degrees: f32) {
        self.tree.rotate_about_pivot(self.id(joint), degrees);
    }

    /// Rotates a link back to its rest angle.
    pub fn straighten(&mut self, joint: Joint) {
        self.tree.reset_angle(self.id(joint));
    }

    /// Bottom centre of the body.
    pub fn base_point(&self) -> Vec2 {
        let v = self.shape(Joint::Body).vertices();
        Vec2::new((v[0].x + v[2].x) * 0.5, v[0].y)
    }

    /// Mid-height of the body on the side it is walking towards.
    pub fn front_point(&self, facing: Facing) -> Vec2 {
        let v = self.shape(Joint::Body).vertices();
        let x = match facing {
            Facing::Right => v[2].x,
            Facing::Left => v[0].x,
        };
        Vec2::new(x, (v[0].y + v[1].y) * 0.5)
    }

    pub fn vertex_count(&self) -> usize {
        self.tree.iter().map(|(_, s)| s.vertices().len()).sum()
    }

    /// Flattens every shape, in creation order, into `out`.
    pub fn write_mesh(&self, palette: &Palette, out: &mut FrameMesh) {
        out.clear();

        let mut offset = 0;
        for (id, shape) in self.tree.iter() {
            let color = self.color_of(id, palette);
            out.indices.extend(shape.triangles(offset));
            out.positions
                .extend_from_slice(bytemuck::cast_slice::<Vec3, [f32; 3]>(shape.vertices()));
            out.colors
                .extend(std::iter::repeat(color).take(shape.vertices().len()));
            offset += shape.vertices().len() as u32;
        }
    }

    pub fn mesh(&self, palette: &Palette) -> FrameMesh {
        let mut mesh = FrameMesh::default();
        self.write_mesh(palette, &mut mesh);
        mesh
    }

    fn color_of(&self, id: ShapeId, palette: &Palette) -> [f32; 4] {
        match Joint::ALL.iter().find(|&&joint| self.id(joint) == id) {
            Some(Joint::Body) => palette.body,
            Some(Joint::UpperArm) => palette.upper_arm,
            Some(Joint::LowerArm) => palette.lower_arm,
            Some(Joint::Head) | None => palette.head,
        }
    }
}
