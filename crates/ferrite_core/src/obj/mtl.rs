//! Material-library (`.mtl`) collaborator interface.
//!
//! The OBJ parser resolves `mtllib` declarations and reads the companion
//! file, then hands the raw bytes to a [`MaterialLibrary`]. Interpreting
//! them is up to the implementation.

use super::model::Model;

/// Receives the contents of each resolved `mtllib` file.
pub trait MaterialLibrary {
    /// `name` is the library name as declared in the OBJ file. Implementations
    /// register materials through [`Model::add_material`].
    fn load(&mut self, name: &str, content: &[u8], model: &mut Model);
}

/// Accepts library contents without interpreting them.
#[derive(Debug, Default, Clone, Copy)]
pub struct DeferredMaterialLibrary;

impl MaterialLibrary for DeferredMaterialLibrary {
    fn load(&mut self, name: &str, content: &[u8], _model: &mut Model) {
        log::debug!(
            "Material library {} loaded ({} bytes), content parsing deferred",
            name,
            content.len()
        );
    }
}

impl<F> MaterialLibrary for F
where
    F: FnMut(&str, &[u8], &mut Model),
{
    fn load(&mut self, name: &str, content: &[u8], model: &mut Model) {
        self(name, content, model)
    }
}
