//! Ferrite Core - OBJ import and format-agnostic scene representation.
//!
//! This crate provides:
//!
//! - **Scene types**: `Scene`, `Node`, `Mesh`, `Face`, `Bone`
//! - **OBJ support**: streaming parser, intermediate model and scene assembly
//! - **File-system capability**: `FileSystem` with disk and in-memory backends
//!
//! # Example
//!
//! ```ignore
//! use ferrite_core::obj::load_obj;
//!
//! // Load an OBJ model
//! let scene = load_obj("model.obj")?;
//! println!("Loaded {} meshes in {} nodes",
//!     scene.mesh_count(),
//!     scene.nodes.len());
//! ```

pub mod config;
pub mod fs;
pub mod mesh;
pub mod obj;
pub mod scene;

// Re-export commonly used types
pub use config::ImportConfig;
pub use mesh::{Bone, Face, Mesh, MeshError, VertexWeight};
pub use obj::{load_obj, load_obj_from_bytes, LoadError, LoadResult, ObjImporter};
pub use scene::{Node, Scene};
