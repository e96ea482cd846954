//! Example: Load and inspect an OBJ file.
//!
//! Run with: cargo run --example load_obj -- assets/box.obj [config.json]

use std::env;
use std::fs;
use std::path::Path;

use anyhow::Context;
use ferrite_core::fs::StdFileSystem;
use ferrite_core::obj::{assemble_scene, format_diagnostics, ObjImporter};
use ferrite_core::ImportConfig;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("Usage: load_obj <path-to-obj-file> [config.json]");
        println!("\nExamples:");
        println!("  cargo run --example load_obj -- assets/box.obj");
        println!("  cargo run --example load_obj -- assets/box.obj import.json");
        return Ok(());
    }

    let config = match args.get(2) {
        Some(config_path) => {
            let json = fs::read_to_string(config_path)
                .with_context(|| format!("reading {}", config_path))?;
            ImportConfig::from_json_str(&json)?
        }
        None => ImportConfig::default(),
    };

    let path = &args[1];
    println!("Loading OBJ file: {}", path);

    let mut importer = ObjImporter::new(StdFileSystem).with_config(config);
    let data = fs::read(path).with_context(|| format!("reading {}", path))?;
    let name = Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unnamed");
    let base_dir = Path::new(path).parent().unwrap_or(Path::new("."));

    let output = importer.parse_bytes(&data, name, base_dir);
    for line in format_diagnostics(&output.diagnostics) {
        println!("  warning: {}", line);
    }

    let scene = assemble_scene(&output.model, importer.config());

    println!("\n=== Scene: {} ===", scene.name);
    println!("Meshes: {}", scene.mesh_count());
    println!("Materials: {}", scene.material_count());
    println!("Total faces: {}", scene.total_face_count());
    println!("Total vertices: {}", scene.total_vertex_count());

    println!("\n--- Nodes ---");
    for node in &scene.nodes {
        println!("  {} ({} meshes)", node.name, node.meshes.len());
        for &index in &node.meshes {
            let mesh = &scene.meshes[index];
            println!(
                "    [{}] {} - {} vertices, {} faces ({} triangles)",
                index,
                scene.materials[mesh.material_index].name,
                mesh.vertex_count(),
                mesh.face_count(),
                mesh.triangle_count()
            );
            println!(
                "         Has normals: {}, UV channels: {}",
                mesh.has_normals(),
                mesh.uv_channel_count()
            );
        }
    }

    let world_bounds = scene.world_bounds();
    println!("\n--- World Bounds ---");
    println!(
        "  Min: ({:.2}, {:.2}, {:.2})",
        world_bounds.min.x, world_bounds.min.y, world_bounds.min.z
    );
    println!(
        "  Max: ({:.2}, {:.2}, {:.2})",
        world_bounds.max.x, world_bounds.max.y, world_bounds.max.z
    );

    Ok(())
}
