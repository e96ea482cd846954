//! Imported scene: meshes, the materials they reference, and one node per
//! source object.

use ferrite_math::Aabb;

use crate::mesh::Mesh;
use crate::obj::Material;

/// A named entry of the scene referencing some of its meshes.
///
/// For OBJ files there is one node per object; an object whose faces use
/// several materials owns several meshes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Node {
    pub name: String,

    /// Indices into [`Scene::meshes`]
    pub meshes: Vec<usize>,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            meshes: Vec::new(),
        }
    }
}

/// The finished, caller-owned result of an import.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    /// Scene name (usually from filename)
    pub name: String,

    pub meshes: Vec<Mesh>,

    /// Materials referenced by `Mesh::material_index`; the default first
    pub materials: Vec<Material>,

    pub nodes: Vec<Node>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a mesh and return its index.
    pub fn add_mesh(&mut self, mesh: Mesh) -> usize {
        self.meshes.push(mesh);
        self.meshes.len() - 1
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    pub fn total_face_count(&self) -> usize {
        self.meshes.iter().map(Mesh::face_count).sum()
    }

    pub fn total_vertex_count(&self) -> usize {
        self.meshes.iter().map(Mesh::vertex_count).sum()
    }

    pub fn find_node(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.name == name)
    }

    /// Meshes owned by the node called `name`.
    pub fn node_meshes<'s>(&'s self, name: &str) -> impl Iterator<Item = &'s Mesh> + 's {
        self.find_node(name)
            .into_iter()
            .flat_map(|node| node.meshes.iter())
            .filter_map(|&index| self.meshes.get(index))
    }

    /// Bounding box around every mesh.
    pub fn world_bounds(&self) -> Aabb {
        self.meshes
            .iter()
            .fold(Aabb::empty(), |acc, mesh| Aabb::surrounding(&acc, &mesh.bounds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Face;
    use ferrite_math::Vec3;

    fn triangle(offset: Vec3) -> Mesh {
        Mesh::new(
            vec![offset, offset + Vec3::X, offset + Vec3::Y],
            vec![Face::new(vec![0, 1, 2])],
            0,
        )
    }

    #[test]
    fn test_scene_creation() {
        let mut scene = Scene::new("test");
        let a = scene.add_mesh(triangle(Vec3::ZERO));
        let b = scene.add_mesh(triangle(Vec3::new(5.0, 0.0, 0.0)));

        let mut node = Node::new("pair");
        node.meshes = vec![a, b];
        scene.nodes.push(node);

        assert_eq!(scene.mesh_count(), 2);
        assert_eq!(scene.total_face_count(), 2);
        assert_eq!(scene.total_vertex_count(), 6);
        assert_eq!(scene.node_meshes("pair").count(), 2);
        assert_eq!(scene.node_meshes("missing").count(), 0);
    }

    #[test]
    fn test_world_bounds() {
        let mut scene = Scene::new("test");
        assert!(scene.world_bounds().is_empty());

        scene.add_mesh(triangle(Vec3::ZERO));
        scene.add_mesh(triangle(Vec3::new(5.0, 0.0, -2.0)));

        let bounds = scene.world_bounds();
        assert_eq!(bounds.min, Vec3::new(0.0, 0.0, -2.0));
        assert_eq!(bounds.max, Vec3::new(6.0, 1.0, 0.0));
    }
}
