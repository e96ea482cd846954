//! Promotion of the intermediate OBJ model into the public [`Scene`].
//!
//! Each object becomes a node; its faces are split by material into meshes.
//! Vertices are not shared: every face corner gets its own vertex, and the
//! face indices are renumbered locally. Sharing identical corners is a job
//! for a later deduplication stage.

use super::model::{Face as ObjFace, MaterialId, Model, Object};
use crate::config::ImportConfig;
use crate::mesh::{Face, Mesh};
use crate::scene::{Node, Scene};

/// Build a [`Scene`] from a parsed model.
pub fn assemble_scene(model: &Model, config: &ImportConfig) -> Scene {
    let mut scene = Scene::new(model.model_name.clone());
    scene.materials = model.materials().to_vec();

    for object in model.objects() {
        let mut node = Node::new(object.name.clone());
        for (material, faces) in partition_faces(object, config.split_by_material) {
            match build_mesh(model, &object.name, material, &faces) {
                Some(mesh) => node.meshes.push(scene.add_mesh(mesh)),
                None => log::debug!("Object {} produced an empty mesh", object.name),
            }
        }
        scene.nodes.push(node);
    }

    log::info!(
        "Assembled {}: {} nodes, {} meshes, {} faces, {} vertices",
        scene.name,
        scene.nodes.len(),
        scene.mesh_count(),
        scene.total_face_count(),
        scene.total_vertex_count()
    );

    scene
}

/// Group an object's faces by material, in order of first use.
fn partition_faces(
    object: &Object,
    split_by_material: bool,
) -> Vec<(MaterialId, Vec<&ObjFace>)> {
    let mut parts: Vec<(MaterialId, Vec<&ObjFace>)> = Vec::new();

    for face in &object.faces {
        if !split_by_material {
            match parts.first_mut() {
                Some((_, faces)) => faces.push(face),
                None => parts.push((face.material, vec![face])),
            }
            continue;
        }

        match parts.iter_mut().find(|(material, _)| *material == face.material) {
            Some((_, faces)) => faces.push(face),
            None => parts.push((face.material, vec![face])),
        }
    }

    parts
}

/// Resolve `indices` against `stream`, or `None` if any corner is missing.
fn resolve<T: Copy>(stream: &[T], indices: &[u32], corners: usize) -> Option<Vec<T>> {
    if indices.len() != corners {
        return None;
    }
    indices
        .iter()
        .map(|&i| stream.get(i as usize).copied())
        .collect()
}

fn build_mesh(
    model: &Model,
    object_name: &str,
    material: MaterialId,
    faces: &[&ObjFace],
) -> Option<Mesh> {
    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut texture_coords = Vec::new();
    let mut mesh_faces = Vec::with_capacity(faces.len());

    // A channel survives only if every emitted corner resolves
    let mut normals_complete = true;
    let mut texture_coords_complete = true;
    let mut normals_seen = false;
    let mut texture_coords_seen = false;

    for face in faces {
        let corners = face.vertices.len();
        if corners == 0 {
            continue;
        }
        let Some(corner_positions) = resolve(&model.vertices, &face.vertices, corners) else {
            log::warn!(
                "Skipping face of {} with out-of-range vertex indices {:?} ({} vertices)",
                object_name,
                face.vertices,
                model.vertices.len()
            );
            continue;
        };

        normals_seen |= !face.normals.is_empty();
        texture_coords_seen |= !face.texture_coords.is_empty();

        if normals_complete {
            match resolve(&model.normals, &face.normals, corners) {
                Some(n) => normals.extend(n),
                None => normals_complete = false,
            }
        }
        if texture_coords_complete {
            match resolve(&model.texture_coords, &face.texture_coords, corners) {
                Some(uv) => texture_coords.extend(uv.into_iter().map(|uv| uv.extend(0.0))),
                None => texture_coords_complete = false,
            }
        }

        let base = positions.len() as u32;
        positions.extend(corner_positions);
        mesh_faces.push(Face::new((base..base + corners as u32).collect()));
    }

    if mesh_faces.is_empty() {
        return None;
    }

    if normals_seen && !normals_complete {
        log::debug!("Dropping partial normals of {}", object_name);
    }
    if texture_coords_seen && !texture_coords_complete {
        log::debug!("Dropping partial texture coordinates of {}", object_name);
    }

    let mut mesh = Mesh::new(positions, mesh_faces, material.0);
    if normals_complete {
        mesh = mesh.with_normals(normals);
    }
    if texture_coords_complete {
        mesh = mesh.with_texture_coords(0, texture_coords, 2);
    }
    Some(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFileSystem;
    use crate::obj::model::Material;
    use crate::obj::parser::ObjParser;
    use ferrite_math::Vec3;

    fn model(source: &str) -> Model {
        ObjParser::new(source.as_bytes(), "/", "test", MemoryFileSystem::new())
            .parse()
            .model
    }

    const QUAD: &str = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\n";

    #[test]
    fn test_one_vertex_per_corner() {
        let model = model(&format!("{}f 1 2 3\nf 1 3 4\n", QUAD));
        let scene = assemble_scene(&model, &ImportConfig::default());

        assert_eq!(scene.mesh_count(), 1);
        let mesh = &scene.meshes[0];
        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.faces[0].indices, vec![0, 1, 2]);
        assert_eq!(mesh.faces[1].indices, vec![3, 4, 5]);
        assert_eq!(mesh.positions[3], Vec3::ZERO);
        assert_eq!(mesh.positions[5], Vec3::new(0.0, 1.0, 0.0));
        assert!(!mesh.has_normals());
        assert!(!mesh.has_texture_coords(0));
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_polygon_keeps_its_corner_count() {
        let model = model(&format!("{}f 1 2 3 4\n", QUAD));
        let scene = assemble_scene(&model, &ImportConfig::default());
        let mesh = &scene.meshes[0];

        assert_eq!(mesh.faces[0].len(), 4);
        assert_eq!(mesh.triangle_count(), 0);
    }

    #[test]
    fn test_channels_present_when_complete() {
        let source = format!(
            "{}vt 0 0\nvt 1 0\nvt 1 1\nvn 0 0 1\nf 1/1/1 2/2/1 3/3/1\n",
            QUAD
        );
        let scene = assemble_scene(&model(&source), &ImportConfig::default());
        let mesh = &scene.meshes[0];

        assert!(mesh.has_normals());
        assert!(mesh.has_texture_coords(0));
        assert_eq!(mesh.uv_components[0], 2);
        assert_eq!(mesh.normals.as_ref().unwrap(), &vec![Vec3::Z; 3]);
        assert_eq!(
            mesh.texture_coords[0].as_ref().unwrap()[2],
            Vec3::new(1.0, 1.0, 0.0)
        );
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_partial_channels_are_dropped() {
        let source = format!("{}vn 0 0 1\nf 1//1 2//1 3//1\nf 1 3 4\n", QUAD);
        let scene = assemble_scene(&model(&source), &ImportConfig::default());
        let mesh = &scene.meshes[0];

        assert_eq!(mesh.face_count(), 2);
        assert!(!mesh.has_normals());
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_out_of_range_face_is_skipped() {
        let model = model(&format!("{}f 1 2 3\nf 1 2 99\n", QUAD));
        let scene = assemble_scene(&model, &ImportConfig::default());
        assert_eq!(scene.total_face_count(), 1);
        assert!(scene.meshes[0].validate().is_ok());
    }

    #[test]
    fn test_split_by_material() {
        let mut model = model(QUAD);
        let red = model.add_material(Material::new("red"));
        model.use_material("red");
        model.add_face(crate::obj::FaceRecord {
            vertices: vec![0, 1, 2],
            ..Default::default()
        });
        model.use_material("missing");
        model.add_face(crate::obj::FaceRecord {
            vertices: vec![0, 2, 3],
            ..Default::default()
        });
        model.use_material("red");
        model.add_face(crate::obj::FaceRecord {
            vertices: vec![1, 2, 3],
            ..Default::default()
        });

        let scene = assemble_scene(&model, &ImportConfig::default());
        assert_eq!(scene.material_count(), 2);
        assert_eq!(scene.mesh_count(), 2);
        assert_eq!(scene.meshes[0].material_index, red.0);
        assert_eq!(scene.meshes[0].face_count(), 2);
        assert_eq!(scene.meshes[1].material_index, MaterialId::DEFAULT.0);
        assert_eq!(scene.nodes[0].meshes, vec![0, 1]);

        let merged = assemble_scene(
            &model,
            &ImportConfig {
                split_by_material: false,
                ..Default::default()
            },
        );
        assert_eq!(merged.mesh_count(), 1);
        assert_eq!(merged.meshes[0].material_index, red.0);
        assert_eq!(merged.meshes[0].face_count(), 3);
    }

    #[test]
    fn test_one_node_per_object() {
        let source = format!("{}o A\nf 1 2 3\no B\no C\nf 2 3 4\n", QUAD);
        let scene = assemble_scene(&model(&source), &ImportConfig::default());

        let names: Vec<&str> = scene.nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert!(scene.find_node("B").unwrap().meshes.is_empty());
        assert_eq!(scene.node_meshes("C").count(), 1);
    }
}
