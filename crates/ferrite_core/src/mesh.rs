//! Public mesh representation handed to the rest of the import pipeline.
//!
//! A mesh is format agnostic: importers promote their intermediate models
//! into it, and postprocessing stages and renderers read it. Every
//! per-vertex channel is either fully present (one entry per vertex) or
//! absent.

use ferrite_math::{Aabb, Mat4, Vec3, Vec4};
use thiserror::Error;

/// Maximum number of vertex color sets per mesh.
pub const MAX_COLOR_SETS: usize = 4;

/// Maximum number of texture coordinate channels per mesh.
pub const MAX_TEXTURE_COORDS: usize = 4;

/// Tolerance for per-vertex bone weight sums.
const WEIGHT_SUM_EPSILON: f32 = 1e-3;

/// A polygon referencing vertices of its mesh by index.
///
/// Three indices make a triangle, more make a polygon.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Face {
    pub indices: Vec<u32>,
}

impl Face {
    pub fn new(indices: Vec<u32>) -> Self {
        Self { indices }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn is_triangle(&self) -> bool {
        self.indices.len() == 3
    }
}

/// Influence of a bone on one vertex.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VertexWeight {
    pub vertex_id: u32,
    pub weight: f32,
}

impl VertexWeight {
    pub fn new(vertex_id: u32, weight: f32) -> Self {
        Self { vertex_id, weight }
    }
}

/// A named bone with its vertex influences and bind-pose offset.
#[derive(Clone, Debug, PartialEq)]
pub struct Bone {
    /// Name used to find the bone in a node hierarchy
    pub name: String,

    /// Vertices influenced by this bone
    pub weights: Vec<VertexWeight>,

    /// Transforms from mesh space to bone space in bind pose
    pub offset: Mat4,
}

impl Bone {
    pub fn new(name: impl Into<String>, offset: Mat4) -> Self {
        Self {
            name: name.into(),
            weights: Vec::new(),
            offset,
        }
    }

    pub fn with_weights(mut self, weights: Vec<VertexWeight>) -> Self {
        self.weights = weights;
        self
    }
}

/// Invariant violations reported by [`Mesh::validate`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    #[error("{channel} has {actual} entries, mesh has {expected} vertices")]
    ChannelSize {
        channel: String,
        expected: usize,
        actual: usize,
    },

    #[error("mesh has tangents but no bitangents (or the reverse)")]
    TangentsWithoutBitangents,

    #[error("face {face} has no indices")]
    EmptyFace { face: usize },

    #[error("face {face} references vertex {index}, mesh has {vertex_count} vertices")]
    FaceIndexOutOfRange {
        face: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error("bone {bone} weights vertex {vertex}, mesh has {vertex_count} vertices")]
    BoneVertexOutOfRange {
        bone: String,
        vertex: u32,
        vertex_count: usize,
    },

    #[error("bone weights of vertex {vertex} sum to {sum}, expected 1.0")]
    WeightSum { vertex: u32, sum: f32 },
}

/// A mesh with a single material.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    /// Vertex positions (always present)
    pub positions: Vec<Vec3>,

    /// Vertex normals
    pub normals: Option<Vec<Vec3>>,

    /// Tangents, pointing along +U. Present together with bitangents.
    pub tangents: Option<Vec<Vec3>>,

    /// Bitangents, pointing along +V
    pub bitangents: Option<Vec<Vec3>>,

    /// Vertex color sets (RGBA)
    pub colors: [Option<Vec<Vec4>>; MAX_COLOR_SETS],

    /// Texture coordinate channels. Unused components are zero.
    pub texture_coords: [Option<Vec<Vec3>>; MAX_TEXTURE_COORDS],

    /// Number of meaningful components (1-3) per texture coordinate channel
    pub uv_components: [u32; MAX_TEXTURE_COORDS],

    /// Polygons indexing into the vertex arrays
    pub faces: Vec<Face>,

    /// Bones influencing this mesh
    pub bones: Vec<Bone>,

    /// Index into the scene's material list
    pub material_index: usize,

    /// Axis-aligned bounding box of the positions
    pub bounds: Aabb,
}

impl Mesh {
    /// Create a mesh from positions and faces; other channels start absent.
    pub fn new(positions: Vec<Vec3>, faces: Vec<Face>, material_index: usize) -> Self {
        let bounds = Aabb::from_positions(&positions);
        Self {
            positions,
            faces,
            material_index,
            bounds,
            ..Default::default()
        }
    }

    pub fn with_normals(mut self, normals: Vec<Vec3>) -> Self {
        self.normals = Some(normals);
        self
    }

    /// Set texture coordinate `channel` with `components` meaningful
    /// components. Channels past [`MAX_TEXTURE_COORDS`] are ignored.
    pub fn with_texture_coords(
        mut self,
        channel: usize,
        coords: Vec<Vec3>,
        components: u32,
    ) -> Self {
        if channel < MAX_TEXTURE_COORDS {
            self.texture_coords[channel] = Some(coords);
            self.uv_components[channel] = components;
        } else {
            log::warn!("Ignoring texture coordinate channel {}", channel);
        }
        self
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Number of faces that are triangles.
    pub fn triangle_count(&self) -> usize {
        self.faces.iter().filter(|f| f.is_triangle()).count()
    }

    pub fn has_positions(&self) -> bool {
        !self.positions.is_empty()
    }

    pub fn has_normals(&self) -> bool {
        self.normals.is_some()
    }

    pub fn has_tangents_and_bitangents(&self) -> bool {
        self.tangents.is_some() && self.bitangents.is_some()
    }

    pub fn has_vertex_colors(&self, set: usize) -> bool {
        self.colors.get(set).map_or(false, Option::is_some)
    }

    pub fn has_texture_coords(&self, channel: usize) -> bool {
        self.texture_coords.get(channel).map_or(false, Option::is_some)
    }

    pub fn has_bones(&self) -> bool {
        !self.bones.is_empty()
    }

    /// Number of leading color sets that are present.
    pub fn color_channel_count(&self) -> usize {
        self.colors.iter().take_while(|c| c.is_some()).count()
    }

    /// Number of leading texture coordinate channels that are present.
    pub fn uv_channel_count(&self) -> usize {
        self.texture_coords.iter().take_while(|c| c.is_some()).count()
    }

    /// Check the channel-size, index-range and bone-weight invariants.
    pub fn validate(&self) -> Result<(), MeshError> {
        let vertex_count = self.positions.len();

        let check = |channel: String, len: Option<usize>| match len {
            Some(actual) if actual != vertex_count => Err(MeshError::ChannelSize {
                channel,
                expected: vertex_count,
                actual,
            }),
            _ => Ok(()),
        };

        check("normals".into(), self.normals.as_ref().map(Vec::len))?;
        check("tangents".into(), self.tangents.as_ref().map(Vec::len))?;
        check("bitangents".into(), self.bitangents.as_ref().map(Vec::len))?;
        for (i, set) in self.colors.iter().enumerate() {
            check(format!("color set {}", i), set.as_ref().map(Vec::len))?;
        }
        for (i, channel) in self.texture_coords.iter().enumerate() {
            check(format!("texture channel {}", i), channel.as_ref().map(Vec::len))?;
        }

        if self.tangents.is_some() != self.bitangents.is_some() {
            return Err(MeshError::TangentsWithoutBitangents);
        }

        for (face_index, face) in self.faces.iter().enumerate() {
            if face.is_empty() {
                return Err(MeshError::EmptyFace { face: face_index });
            }
            if let Some(&index) = face.indices.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(MeshError::FaceIndexOutOfRange {
                    face: face_index,
                    index,
                    vertex_count,
                });
            }
        }

        if self.bones.is_empty() {
            return Ok(());
        }

        let mut sums = vec![None::<f32>; vertex_count];
        for bone in &self.bones {
            for weight in &bone.weights {
                let slot = sums.get_mut(weight.vertex_id as usize).ok_or_else(|| {
                    MeshError::BoneVertexOutOfRange {
                        bone: bone.name.clone(),
                        vertex: weight.vertex_id,
                        vertex_count,
                    }
                })?;
                *slot = Some(slot.unwrap_or(0.0) + weight.weight);
            }
        }

        for (vertex, sum) in sums.iter().enumerate() {
            if let Some(sum) = *sum {
                if (sum - 1.0).abs() > WEIGHT_SUM_EPSILON {
                    return Err(MeshError::WeightSum {
                        vertex: vertex as u32,
                        sum,
                    });
                }
            }
        }

        Ok(())
    }
}
