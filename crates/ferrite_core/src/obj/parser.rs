//! OBJ line dispatcher.
//!
//! The parser walks the input one directive at a time and routes each line
//! to a handler by its leading byte:
//!
//! - `v`, `vt`, `vn` - positions, texture coordinates, normals
//! - `f` - faces
//! - `o` - objects, `g` - groups
//! - `usemtl` (`u`), `mtllib` (`m`) - materials
//! - `s` - smoothing groups (accepted, ignored)
//! - `#` and anything else - skipped
//!
//! Nothing in a file aborts the parse. Conditions worth reporting are logged
//! and collected as [`Diagnostic`]s next to the finished model.

use std::path::{Path, PathBuf};

use ferrite_math::{Vec2, Vec3};
use thiserror::Error;

use super::face::{parse_face_record, FaceTokenError};
use super::model::Model;
use super::mtl::{DeferredMaterialLibrary, MaterialLibrary};
use super::scanner::{is_space, parse_float, Scanner};
use crate::config::ImportConfig;
use crate::fs::{read_to_end, FileSystem};

/// A non-fatal condition met while parsing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// 1-based line number.
    pub line: usize,
    pub kind: DiagnosticKind,
}

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticKind {
    #[error("face token '{token}' addresses attribute slot {slot}")]
    FaceSlotOutOfRange { slot: usize, token: String },

    #[error("malformed face index '{0}'")]
    MalformedFaceIndex(String),

    #[error("face record has no vertex indices")]
    EmptyFace,

    #[error("line is {length} bytes long, limit is {limit}")]
    LineTooLong { length: usize, limit: usize },

    #[error("unsupported material requested: {0}")]
    UnknownMaterial(String),

    #[error("material library {0} not found")]
    MissingMaterialLibrary(String),

    #[error("material library {name} could not be read: {message}")]
    MaterialLibraryUnreadable { name: String, message: String },
}

/// Result of a parse: the model plus everything reported along the way.
#[derive(Clone, Debug)]
pub struct ParseOutput {
    pub model: Model,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse context for one OBJ buffer.
///
/// Owns the scanner, the model being built and the diagnostics list; it is
/// consumed by [`ObjParser::parse`].
pub struct ObjParser<'a, F: FileSystem, L: MaterialLibrary = DeferredMaterialLibrary> {
    scanner: Scanner<'a>,
    model: Model,
    base_dir: PathBuf,
    config: ImportConfig,
    fs: F,
    library: L,
    diagnostics: Vec<Diagnostic>,
}

impl<'a, F: FileSystem> ObjParser<'a, F> {
    /// `base_dir` is the directory companion files are resolved against.
    pub fn new(data: &'a [u8], base_dir: impl Into<PathBuf>, model_name: &str, fs: F) -> Self {
        Self {
            scanner: Scanner::new(data),
            model: Model::new(model_name),
            base_dir: base_dir.into(),
            config: ImportConfig::default(),
            fs,
            library: DeferredMaterialLibrary,
            diagnostics: Vec::new(),
        }
    }
}

impl<'a, F: FileSystem, L: MaterialLibrary> ObjParser<'a, F, L> {
    pub fn with_config(mut self, config: ImportConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the collaborator that receives `mtllib` contents.
    pub fn with_material_library<M: MaterialLibrary>(self, library: M) -> ObjParser<'a, F, M> {
        ObjParser {
            scanner: self.scanner,
            model: self.model,
            base_dir: self.base_dir,
            config: self.config,
            fs: self.fs,
            library,
            diagnostics: self.diagnostics,
        }
    }

    /// Run to end of input and hand over the model.
    pub fn parse(mut self) -> ParseOutput {
        while !self.scanner.is_eof() {
            self.scanner.skip_spaces();
            match self.scanner.peek() {
                Some(b'v') => self.parse_vertex_directive(),
                Some(b'f') => self.parse_face(),
                Some(b'#') => self.scanner.skip_line(),
                Some(b'u') => self.parse_use_material(),
                Some(b'm') => self.parse_material_lib(),
                Some(b'g') => self.parse_group_name(),
                Some(b's') => self.parse_smoothing_group(),
                Some(b'o') => self.parse_object_name(),
                _ => self.scanner.skip_line(),
            }
        }

        log::debug!(
            "Parsed {} lines of {}: {} vertices, {} normals, {} uvs, {} objects, {} faces",
            self.scanner.lines_consumed(),
            self.model.model_name,
            self.model.vertices.len(),
            self.model.normals.len(),
            self.model.texture_coords.len(),
            self.model.objects().len(),
            self.model.face_count()
        );

        ParseOutput {
            model: self.model,
            diagnostics: self.diagnostics,
        }
    }

    fn report(&mut self, kind: DiagnosticKind) {
        let line = self.scanner.line_number();
        log::warn!("{}: line {}: {}", self.model.model_name, line, kind);
        self.diagnostics.push(Diagnostic { line, kind });
    }

    /// `v`, `vt` or `vn`.
    fn parse_vertex_directive(&mut self) {
        match self.scanner.peek_at(1) {
            Some(b) if is_space(b) => {
                self.scanner.advance(1);
                let v = self.read_vec3();
                self.model.vertices.push(v);
            }
            Some(b't') => {
                self.scanner.advance(2);
                let vt = self.read_vec2();
                self.model.texture_coords.push(vt);
            }
            Some(b'n') => {
                self.scanner.advance(2);
                let vn = self.read_vec3();
                self.model.normals.push(vn);
            }
            _ => {}
        }
        self.scanner.skip_line();
    }

    fn read_vec3(&mut self) -> Vec3 {
        let x = parse_float(self.scanner.next_word());
        let y = parse_float(self.scanner.next_word());
        let z = parse_float(self.scanner.next_word());
        Vec3::new(x, y, z)
    }

    fn read_vec2(&mut self) -> Vec2 {
        let u = parse_float(self.scanner.next_word());
        let v = parse_float(self.scanner.next_word());
        Vec2::new(u, v)
    }

    fn parse_face(&mut self) {
        self.scanner.skip_directive();
        let line = match self.scanner.copy_line(self.config.max_line_length) {
            Ok(line) => line,
            Err(err) => {
                self.report(DiagnosticKind::LineTooLong {
                    length: err.length,
                    limit: err.limit,
                });
                self.scanner.skip_line();
                return;
            }
        };

        let has_texture_coords = !self.model.texture_coords.is_empty();
        let has_normals = !self.model.normals.is_empty();
        let (record, errors) = parse_face_record(line, has_texture_coords, has_normals);

        for error in errors {
            let kind = match error {
                FaceTokenError::SlotOutOfRange { slot, token } => {
                    DiagnosticKind::FaceSlotOutOfRange { slot, token }
                }
                FaceTokenError::Malformed { token } => DiagnosticKind::MalformedFaceIndex(token),
            };
            self.report(kind);
        }

        if record.vertices.is_empty() {
            self.report(DiagnosticKind::EmptyFace);
        } else {
            self.model.add_face(record);
        }

        self.scanner.skip_line();
    }

    /// First word after the directive keyword, as an owned name.
    fn directive_argument(&mut self) -> String {
        self.scanner.skip_directive();
        String::from_utf8_lossy(self.scanner.next_word()).into_owned()
    }

    /// `usemtl <name>`
    fn parse_use_material(&mut self) {
        let name = self.directive_argument();
        if !name.is_empty() && !self.model.use_material(&name) {
            self.report(DiagnosticKind::UnknownMaterial(name));
        }
        self.scanner.skip_line();
    }

    /// `mtllib <name>`
    fn parse_material_lib(&mut self) {
        let name = self.directive_argument();
        let line = self.scanner.line_number();
        self.scanner.skip_line();
        if name.is_empty() {
            return;
        }

        if !self.config.load_material_libraries {
            self.model.material_libraries.push(name);
            return;
        }

        let path = self.base_dir.join(&name);
        if !self.fs.exists(&path) {
            log::debug!("Material library {} not found, skipping", path.display());
            self.diagnostics.push(Diagnostic {
                line,
                kind: DiagnosticKind::MissingMaterialLibrary(name),
            });
            return;
        }

        match read_to_end(&self.fs, &path) {
            Ok(content) => self.library.load(&name, &content, &mut self.model),
            Err(err) => {
                log::warn!("Failed to read material library {}: {}", path.display(), err);
                self.diagnostics.push(Diagnostic {
                    line,
                    kind: DiagnosticKind::MaterialLibraryUnreadable {
                        name: name.clone(),
                        message: err.to_string(),
                    },
                });
            }
        }

        self.model.material_libraries.push(name);
    }

    /// `g <name>`
    fn parse_group_name(&mut self) {
        let name = self.directive_argument();
        if !name.is_empty() {
            self.model.set_active_group(&name);
        }
        self.scanner.skip_line();
    }

    /// `s <n>`: smoothing groups are not supported.
    fn parse_smoothing_group(&mut self) {
        self.scanner.skip_line();
    }

    /// `o <name>`
    fn parse_object_name(&mut self) {
        let name = self.directive_argument();
        if !name.is_empty() {
            self.model.set_active_object(&name);
        }
        self.scanner.skip_line();
    }
}

/// Parse `data` with default configuration.
pub fn parse_obj<F: FileSystem>(
    data: &[u8],
    base_dir: impl AsRef<Path>,
    model_name: &str,
    fs: F,
) -> ParseOutput {
    ObjParser::new(data, base_dir.as_ref(), model_name, fs).parse()
}
