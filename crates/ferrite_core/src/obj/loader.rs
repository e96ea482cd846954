//! High-level OBJ scene loading.
//!
//! Entry points that run the parser and promote its model into a [`Scene`].
//! Only failing to read the top-level file is an error; problems inside the
//! file are logged and surface as [`Diagnostic`]s.

use std::path::{Path, PathBuf};

use thiserror::Error;

use super::assemble::assemble_scene;
use super::model::Model;
use super::mtl::{DeferredMaterialLibrary, MaterialLibrary};
use super::parser::{Diagnostic, ObjParser, ParseOutput};
use crate::config::ImportConfig;
use crate::fs::{read_to_end, FileSystem, StdFileSystem};
use crate::scene::Scene;

/// Errors that can occur during OBJ loading.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid import configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Load an OBJ file from disk and return a [`Scene`].
///
/// The scene is named after the file stem; `mtllib` references resolve
/// against the file's directory.
///
/// # Example
///
/// ```ignore
/// use ferrite_core::obj::load_obj;
///
/// let scene = load_obj("models/box.obj")?;
/// println!("Loaded {} meshes", scene.mesh_count());
/// ```
pub fn load_obj<P: AsRef<Path>>(path: P) -> LoadResult<Scene> {
    ObjImporter::new(StdFileSystem).import_file(path)
}

/// Load OBJ text already in memory, resolving companion files on disk
/// relative to `base_dir`.
pub fn load_obj_from_bytes(data: &[u8], name: &str, base_dir: impl AsRef<Path>) -> Scene {
    ObjImporter::new(StdFileSystem).import_bytes(data, name, base_dir)
}

/// Configurable importer over an injected file system.
///
/// ```ignore
/// use ferrite_core::fs::MemoryFileSystem;
/// use ferrite_core::obj::ObjImporter;
///
/// let fs = MemoryFileSystem::new().with_file("/m/box.obj", "v 0 0 0\n");
/// let scene = ObjImporter::new(fs).import_file("/m/box.obj")?;
/// ```
pub struct ObjImporter<F: FileSystem, L: MaterialLibrary = DeferredMaterialLibrary> {
    fs: F,
    library: L,
    config: ImportConfig,
}

impl<F: FileSystem> ObjImporter<F> {
    pub fn new(fs: F) -> Self {
        Self {
            fs,
            library: DeferredMaterialLibrary,
            config: ImportConfig::default(),
        }
    }
}

impl<F: FileSystem, L: MaterialLibrary> ObjImporter<F, L> {
    pub fn with_config(mut self, config: ImportConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the configuration with one read from JSON.
    pub fn with_config_json(self, json: &str) -> LoadResult<Self> {
        let config = ImportConfig::from_json_str(json)?;
        Ok(self.with_config(config))
    }

    /// Route `mtllib` contents to `library`.
    pub fn with_material_library<M: MaterialLibrary>(self, library: M) -> ObjImporter<F, M> {
        ObjImporter {
            fs: self.fs,
            library,
            config: self.config,
        }
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Read `path` through the file system and import it.
    pub fn import_file<P: AsRef<Path>>(&mut self, path: P) -> LoadResult<Scene> {
        let path = path.as_ref();
        let name = path.file_stem().and_then(|s| s.to_str()).unwrap_or("unnamed");
        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();

        log::info!("Loading OBJ file: {}", path.display());
        let data = read_to_end(&self.fs, path)?;
        Ok(self.import_bytes(&data, name, base_dir))
    }

    /// Parse and assemble a buffer.
    pub fn import_bytes(&mut self, data: &[u8], name: &str, base_dir: impl AsRef<Path>) -> Scene {
        let output = self.parse_bytes(data, name, base_dir);
        if !output.diagnostics.is_empty() {
            log::info!("{}: {} diagnostics", name, output.diagnostics.len());
        }
        assemble_scene(&output.model, &self.config)
    }

    /// Parse a buffer without assembling, keeping the intermediate model and
    /// its diagnostics.
    pub fn parse_bytes(
        &mut self,
        data: &[u8],
        name: &str,
        base_dir: impl AsRef<Path>,
    ) -> ParseOutput {
        let base_dir: PathBuf = base_dir.as_ref().to_path_buf();
        let output = ObjParser::new(data, base_dir, name, &self.fs)
            .with_config(self.config.clone())
            .with_material_library(Borrowed(&mut self.library))
            .parse();

        log::info!(
            "Parsed {}: {} vertices, {} faces in {} objects",
            name,
            output.model.vertices.len(),
            output.model.face_count(),
            output.model.objects().len()
        );
        output
    }
}

/// Lends the importer's library to one parser run.
struct Borrowed<'l, L>(&'l mut L);

impl<L: MaterialLibrary> MaterialLibrary for Borrowed<'_, L> {
    fn load(&mut self, name: &str, content: &[u8], model: &mut Model) {
        self.0.load(name, content, model);
    }
}

/// Diagnostics worth showing a user, one per line.
pub fn format_diagnostics(diagnostics: &[Diagnostic]) -> Vec<String> {
    diagnostics
        .iter()
        .map(|d| format!("line {}: {}", d.line, d.kind))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFileSystem;
    use crate::obj::{DiagnosticKind, Material};
    use ferrite_math::Vec3;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    const BOX: &str = "\
# two objects, the first reopened after the second
mtllib box.mtl
o Box
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vn 0 0 1
usemtl red
f 1//1 2//1 3//1
o Lid
f 1 3 4
o Box
usemtl blue
f 1//1 3//1 4//1
usemtl red
f 2//1 3//1 4//1
";

    const BOX_MTL: &str = "newmtl red\nnewmtl blue\n";

    fn declare_materials(_name: &str, content: &[u8], model: &mut Model) {
        for line in String::from_utf8_lossy(content).lines() {
            if let Some(name) = line.strip_prefix("newmtl ") {
                model.add_material(Material::new(name.trim()));
            }
        }
    }

    fn box_fs() -> MemoryFileSystem {
        MemoryFileSystem::new()
            .with_file("/models/box.obj", BOX)
            .with_file("/models/box.mtl", BOX_MTL)
    }

    #[test]
    fn test_import_file() {
        init();
        let mut importer = ObjImporter::new(box_fs()).with_material_library(declare_materials);
        let scene = importer.import_file("/models/box.obj").unwrap();

        assert_eq!(scene.name, "box");
        assert_eq!(scene.material_count(), 3);
        assert_eq!(scene.nodes.len(), 2);

        // Box reopened: its three faces split into red and blue meshes
        let box_meshes: Vec<_> = scene.node_meshes("Box").collect();
        assert_eq!(box_meshes.len(), 2);
        assert_eq!(scene.materials[box_meshes[0].material_index].name, "red");
        assert_eq!(box_meshes[0].face_count(), 2);
        assert_eq!(scene.materials[box_meshes[1].material_index].name, "blue");
        assert!(box_meshes.iter().all(|m| m.has_normals()));

        let lid: Vec<_> = scene.node_meshes("Lid").collect();
        assert_eq!(lid.len(), 1);
        // Lid faces carry the material active when they were read
        assert_eq!(scene.materials[lid[0].material_index].name, "red");
        assert!(!lid[0].has_normals());

        assert_eq!(scene.total_face_count(), 4);
        assert!(scene.meshes.iter().all(|m| m.validate().is_ok()));
        assert_eq!(scene.world_bounds().max, Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let mut importer = ObjImporter::new(MemoryFileSystem::new());
        let err = importer.import_file("/nowhere.obj").unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }

    #[test]
    fn test_without_material_library_falls_back() {
        init();
        let mut importer = ObjImporter::new(box_fs());
        let output = importer.parse_bytes(BOX.as_bytes(), "box", "/models");

        assert_eq!(output.model.material_libraries, vec!["box.mtl".to_string()]);
        assert_eq!(output.model.materials().len(), 1);
        let unknown = output
            .diagnostics
            .iter()
            .filter(|d| matches!(d.kind, DiagnosticKind::UnknownMaterial(_)))
            .count();
        assert_eq!(unknown, 3);

        let scene = importer.import_bytes(BOX.as_bytes(), "box", "/models");
        assert_eq!(scene.mesh_count(), 2);
        assert!(scene.meshes.iter().all(|m| m.material_index == 0));
    }

    #[test]
    fn test_config_json() {
        let importer = ObjImporter::new(box_fs())
            .with_config_json(r#"{ "split_by_material": false }"#)
            .unwrap();
        assert!(!importer.config().split_by_material);
        assert!(importer.config().load_material_libraries);

        let mut importer = importer.with_material_library(declare_materials);
        let scene = importer.import_file("/models/box.obj").unwrap();
        assert_eq!(scene.node_meshes("Box").count(), 1);

        let err = ObjImporter::new(box_fs()).with_config_json("{ nope").err().unwrap();
        assert!(matches!(err, LoadError::Config(_)));
    }

    #[test]
    fn test_import_is_repeatable() {
        let mut importer = ObjImporter::new(box_fs()).with_material_library(declare_materials);
        let first = importer.parse_bytes(BOX.as_bytes(), "box", "/models");
        let second = importer.parse_bytes(BOX.as_bytes(), "box", "/models");

        assert_eq!(first.model, second.model);
        assert_eq!(first.diagnostics, second.diagnostics);
    }

    #[test]
    fn test_format_diagnostics() {
        let mut importer = ObjImporter::new(MemoryFileSystem::new());
        let output = importer.parse_bytes(b"v 0 0 0\nf 1 1 1/1/1/4\nusemtl none\n", "d", "/");
        let lines = format_diagnostics(&output.diagnostics);
        assert_eq!(
            lines,
            vec![
                "line 2: face token '4' addresses attribute slot 3".to_string(),
                "line 3: unsupported material requested: none".to_string(),
            ]
        );
    }

    #[test]
    fn test_load_obj_from_bytes_without_companions() {
        let source = b"v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3";
        let scene = load_obj_from_bytes(source, "tri", "/definitely/missing");
        assert_eq!(scene.name, "tri");
        assert_eq!(scene.total_face_count(), 1);
        assert_eq!(scene.nodes[0].name, crate::obj::DEFAULT_OBJECT_NAME);
    }
}
