//! Intermediate OBJ model, built incrementally while scanning.
//!
//! The model owns everything it references. Cursors into the object and
//! material tables are plain indices, so they stay valid as the tables grow.

use std::collections::HashMap;

use ferrite_math::{Vec2, Vec3};

use super::face::FaceRecord;

/// Object created when a face appears before any `o` directive.
pub const DEFAULT_OBJECT_NAME: &str = "defaultobject";

/// Name of the fallback material every model carries.
pub const DEFAULT_MATERIAL_NAME: &str = "DefaultMaterial";

/// Index of an object in [`Model::objects`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObjectId(pub usize);

/// Index of a material in [`Model::materials`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MaterialId(pub usize);

impl MaterialId {
    /// The default material always occupies the first slot.
    pub const DEFAULT: MaterialId = MaterialId(0);
}

/// A polygon as written in the file: 0-based indices into the model's
/// vertex, texture coordinate and normal streams.
///
/// The three lists are independent and may differ in length.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Face {
    pub vertices: Vec<u32>,
    pub texture_coords: Vec<u32>,
    pub normals: Vec<u32>,
    pub material: MaterialId,
}

/// A named collection of faces (`o` directive).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Object {
    pub name: String,
    pub faces: Vec<Face>,
}

impl Object {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            faces: Vec::new(),
        }
    }
}

/// Surface description referenced by faces.
///
/// Only the name is known to the OBJ parser itself; the remaining fields are
/// filled by a material-library collaborator.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub name: String,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub shininess: f32,
    pub alpha: f32,
    pub diffuse_texture: Option<String>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: DEFAULT_MATERIAL_NAME.to_string(),
            ambient: Vec3::ZERO,
            diffuse: Vec3::splat(0.6),
            specular: Vec3::ZERO,
            shininess: 0.0,
            alpha: 1.0,
            diffuse_texture: None,
        }
    }
}

impl Material {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Where a face ended up: owning object and position in its face list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaceLocation {
    pub object: ObjectId,
    pub index: usize,
}

/// The mutable accumulation structure of one OBJ parse.
#[derive(Clone, Debug, PartialEq)]
pub struct Model {
    pub model_name: String,

    pub vertices: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub texture_coords: Vec<Vec2>,

    /// Declared `mtllib` names that resolved to an existing file (or all
    /// declarations when library loading is disabled).
    pub material_libraries: Vec<String>,

    objects: Vec<Object>,
    current_object: Option<ObjectId>,

    groups: HashMap<String, Vec<u32>>,
    active_group: Option<String>,

    materials: Vec<Material>,
    material_map: HashMap<String, MaterialId>,
    current_material: Option<MaterialId>,

    face_locations: Vec<FaceLocation>,
}

impl Model {
    pub fn new(model_name: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            vertices: Vec::new(),
            normals: Vec::new(),
            texture_coords: Vec::new(),
            material_libraries: Vec::new(),
            objects: Vec::new(),
            current_object: None,
            groups: HashMap::new(),
            active_group: None,
            materials: vec![Material::default()],
            material_map: HashMap::new(),
            current_material: None,
            face_locations: Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // Objects

    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    pub fn object(&self, id: ObjectId) -> Option<&Object> {
        self.objects.get(id.0)
    }

    pub fn current_object_id(&self) -> Option<ObjectId> {
        self.current_object
    }

    pub fn current_object(&self) -> Option<&Object> {
        self.current_object.and_then(|id| self.object(id))
    }

    /// First object with exactly this name.
    pub fn find_object(&self, name: &str) -> Option<ObjectId> {
        self.objects
            .iter()
            .position(|object| object.name == name)
            .map(ObjectId)
    }

    /// Append a new object and make it current, even if the name is taken.
    pub fn create_object(&mut self, name: impl Into<String>) -> ObjectId {
        let id = ObjectId(self.objects.len());
        self.objects.push(Object::new(name));
        self.current_object = Some(id);
        id
    }

    /// Re-activate the object named `name`, creating it on first use.
    pub fn set_active_object(&mut self, name: &str) -> ObjectId {
        match self.find_object(name) {
            Some(id) => {
                self.current_object = Some(id);
                id
            }
            None => self.create_object(name),
        }
    }

    // ------------------------------------------------------------------
    // Groups

    pub fn groups(&self) -> &HashMap<String, Vec<u32>> {
        &self.groups
    }

    /// Face ordinals recorded for group `name`.
    pub fn group(&self, name: &str) -> Option<&[u32]> {
        self.groups.get(name).map(Vec::as_slice)
    }

    pub fn active_group(&self) -> Option<&str> {
        self.active_group.as_deref()
    }

    /// Route subsequent faces to group `name`. Already recorded faces stay
    /// where they are.
    pub fn set_active_group(&mut self, name: &str) {
        if self.active_group.as_deref() == Some(name) {
            return;
        }
        self.groups.entry(name.to_string()).or_default();
        self.active_group = Some(name.to_string());
    }

    // ------------------------------------------------------------------
    // Materials

    /// All materials, the default first.
    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0)
    }

    pub fn default_material(&self) -> &Material {
        &self.materials[MaterialId::DEFAULT.0]
    }

    /// Declared materials by name. The default material is not listed.
    pub fn material_map(&self) -> &HashMap<String, MaterialId> {
        &self.material_map
    }

    pub fn find_material(&self, name: &str) -> Option<MaterialId> {
        self.material_map.get(name).copied()
    }

    /// Register a material. The first declaration of a name wins; later
    /// ones return the existing id unchanged.
    pub fn add_material(&mut self, material: Material) -> MaterialId {
        if let Some(id) = self.find_material(&material.name) {
            return id;
        }
        let id = MaterialId(self.materials.len());
        self.material_map.insert(material.name.clone(), id);
        self.materials.push(material);
        id
    }

    /// Activate `name`. Unknown names select the default material and
    /// return `false`.
    pub fn use_material(&mut self, name: &str) -> bool {
        match self.find_material(name) {
            Some(id) => {
                self.current_material = Some(id);
                true
            }
            None => {
                self.current_material = Some(MaterialId::DEFAULT);
                false
            }
        }
    }

    /// Material attached to newly built faces.
    pub fn current_material(&self) -> MaterialId {
        self.current_material.unwrap_or(MaterialId::DEFAULT)
    }

    // ------------------------------------------------------------------
    // Faces

    /// Total number of faces across all objects.
    pub fn face_count(&self) -> usize {
        self.face_locations.len()
    }

    /// Face by global ordinal (parse order), as stored in group lists.
    pub fn face(&self, ordinal: u32) -> Option<&Face> {
        let location = self.face_locations.get(ordinal as usize)?;
        self.objects.get(location.object.0)?.faces.get(location.index)
    }

    pub fn face_location(&self, ordinal: u32) -> Option<FaceLocation> {
        self.face_locations.get(ordinal as usize).copied()
    }

    /// Build a face from a parsed record using the current material, append
    /// it to the current object and the active group. Returns its ordinal.
    pub fn add_face(&mut self, record: FaceRecord) -> u32 {
        let object = match self.current_object {
            Some(id) => id,
            None => self.create_object(DEFAULT_OBJECT_NAME),
        };

        let face = Face {
            vertices: record.vertices,
            texture_coords: record.texture_coords,
            normals: record.normals,
            material: self.current_material(),
        };

        let faces = &mut self.objects[object.0].faces;
        let location = FaceLocation {
            object,
            index: faces.len(),
        };
        faces.push(face);

        let ordinal = self.face_locations.len() as u32;
        self.face_locations.push(location);

        if let Some(group) = &self.active_group {
            if let Some(members) = self.groups.get_mut(group) {
                members.push(ordinal);
            }
        }

        ordinal
    }
}
