use std::fmt;

/// The fixed topologies a [`Shape`](super::Shape) can take.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeKind {
    Triangle,
    Quad,
    Cube,
    /// A centre vertex followed by `segments` rim vertices.
    Circle { segments: usize },
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Triangle => "triangle",
            Self::Quad => "quad",
            Self::Cube => "cube",
            Self::Circle { .. } => "circle",
        })
    }
}

const QUAD: [u32; 6] = [0, 1, 2, 0, 2, 3];

const CUBE: [u32; 36] = [
    0, 3, 1, //
    0, 2, 3, //
    0, 4, 6, //
    0, 6, 2, //
    0, 1, 5, //
    0, 5, 4, //
    7, 6, 4, //
    7, 4, 5, //
    7, 5, 1, //
    7, 1, 3, //
    7, 6, 2, //
    7, 2, 3, //
];

impl ShapeKind {
    pub const MIN_CIRCLE_SEGMENTS: usize = 4;

    pub fn vertex_count(self) -> usize {
        match self {
            Self::Triangle => 3,
            Self::Quad => 4,
            Self::Cube => 8,
            Self::Circle { segments } => segments + 1,
        }
    }

    /// Triangle indices for this topology, shifted by `offset`.
    pub fn triangles(self, offset: u32) -> Vec<u32> {
        match self {
            Self::Triangle => vec![offset, offset + 1, offset + 2],
            Self::Quad => QUAD.iter().map(|i| i + offset).collect(),
            Self::Cube => CUBE.iter().map(|i| i + offset).collect(),
            Self::Circle { segments } => {
                let segments = segments as u32;
                (0..segments)
                    .flat_map(|i| {
                        let next = if i + 1 == segments { 1 } else { i + 2 };
                        [offset, offset + i + 1, offset + next]
                    })
                    .collect()
            }
        }
    }
}
