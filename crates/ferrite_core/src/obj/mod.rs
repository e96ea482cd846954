//! Wavefront OBJ support.
//!
//! This module parses OBJ text into an intermediate [`Model`] and promotes
//! it to the format-agnostic [`Scene`](crate::scene::Scene).
//!
//! ## Supported OBJ Features
//!
//! - `v`, `vt`, `vn`: positions, texture coordinates, normals
//! - `f`: polygons with `v`, `v/vt`, `v//vn` and `v/vt/vn` records
//! - `o`: objects (a repeated name reopens the existing object)
//! - `g`: groups, recorded as lists of face ordinals
//! - `usemtl`, `mtllib`: material selection and library resolution
//!
//! ## Not Yet Supported
//!
//! - MTL parsing (library contents go to a [`MaterialLibrary`])
//! - Negative (relative) face indices
//! - Smoothing groups (`s` is accepted and ignored)
//! - Free-form geometry (`vp`, `curv`, `surf`)
//!
//! # Example
//!
//! ```ignore
//! use ferrite_core::obj::load_obj;
//!
//! let scene = load_obj("path/to/model.obj")?;
//! println!("Loaded {} meshes, {} faces",
//!     scene.mesh_count(),
//!     scene.total_face_count());
//! ```

pub mod scanner;

mod assemble;
mod face;
mod loader;
mod model;
mod mtl;
mod parser;

pub use assemble::*;
pub use face::*;
pub use loader::*;
pub use model::*;
pub use mtl::*;
pub use parser::*;
