//! Level text plus texture archives in, one mesh per texture out.

use std::collections::BTreeMap;
use std::sync::Arc;

use brush_kernel::{build_solid, Brush, FaceProjector, Point3d};
use map_format::{parse_level_with, ParsedLevel};
use rayon::prelude::*;
use tracing::{debug, info, instrument};
use wad_format::{DecodedTexture, Palette, WadArchive};

use crate::cache::{TextureCache, TextureObserver};
use crate::config::{is_tool_texture, CompileConfig};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::{CompileError, TextureError};
use crate::mesh::TriangleMesh;

/// Result of compiling one level.
#[derive(Debug, Clone, Default)]
pub struct CompiledLevel {
    /// Merged geometry per texture name as written in the level.
    pub meshes: BTreeMap<String, TriangleMesh>,
    /// Every texture that decoded, keyed like `meshes`.
    pub textures: BTreeMap<String, Arc<DecodedTexture>>,
    pub spawn_origin: Option<Point3d>,
    pub wad_names: Vec<String>,
    pub diagnostics: Diagnostics,
}

impl CompiledLevel {
    pub fn triangle_count(&self) -> usize {
        self.meshes.values().map(TriangleMesh::triangle_count).sum()
    }
}

/// Compiler front end. Archives are searched in the order they were added.
#[derive(Default)]
pub struct Compiler {
    config: CompileConfig,
    archives: Vec<WadArchive>,
    shared_palette: Option<Palette>,
    observers: Vec<Arc<dyn TextureObserver>>,
}

/// Output of one brush, merged in document order afterwards.
#[derive(Default)]
struct BrushOutput {
    faces: Vec<(String, Arc<DecodedTexture>, TriangleMesh)>,
    diagnostics: Vec<Diagnostic>,
}

impl Compiler {
    pub fn new(config: CompileConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn with_archive(mut self, archive: WadArchive) -> Self {
        self.archives.push(archive);
        self
    }

    /// Palette for archives without embedded palettes.
    pub fn with_shared_palette(mut self, palette: Palette) -> Self {
        self.shared_palette = Some(palette);
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn TextureObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &CompileConfig {
        &self.config
    }

    // Explicit palette first, else the first archive carrying a palette lump.
    fn resolve_palette(&self) -> Result<Option<Palette>, CompileError> {
        if let Some(palette) = &self.shared_palette {
            return Ok(Some(palette.clone()));
        }
        for archive in &self.archives {
            if let Some(palette) = archive.palette_lump()? {
                return Ok(Some(palette));
            }
        }
        Ok(None)
    }

    /// Parse and compile `text`.
    ///
    /// Malformed brushes, faces and missing textures are skipped and recorded in
    /// [`CompiledLevel::diagnostics`]; only structural archive damage is an error.
    #[instrument(skip_all, fields(len = text.len(), parallel = self.config.parallel))]
    pub fn compile(&self, text: &str) -> Result<CompiledLevel, CompileError> {
        let parsed = parse_level_with(text, &self.config.tolerance);
        self.compile_parsed(&parsed)
    }

    /// Compile an already parsed level.
    pub fn compile_parsed(&self, parsed: &ParsedLevel) -> Result<CompiledLevel, CompileError> {
        let palette = self.resolve_palette()?;
        let cache = TextureCache::new(&self.archives, palette.as_ref(), &self.observers);

        let outputs: Vec<Result<BrushOutput, CompileError>> = if self.config.parallel {
            parsed
                .brushes
                .par_iter()
                .map(|brush| self.compile_brush(brush, &cache))
                .collect()
        } else {
            parsed
                .brushes
                .iter()
                .map(|brush| self.compile_brush(brush, &cache))
                .collect()
        };

        let mut level = CompiledLevel {
            spawn_origin: parsed.spawn_origin,
            wad_names: parsed.wad_names.clone(),
            ..CompiledLevel::default()
        };
        level
            .diagnostics
            .extend(parsed.issues.iter().map(Diagnostic::from_parse_issue));
        for output in outputs {
            let output = output?;
            for (texture_name, texture, mesh) in output.faces {
                level.meshes.entry(texture_name.clone()).or_default().merge(&mesh);
                level.textures.entry(texture_name).or_insert(texture);
            }
            level.diagnostics.extend(output.diagnostics);
        }

        info!(
            brushes = parsed.brushes.len(),
            textures = level.meshes.len(),
            triangles = level.triangle_count(),
            decodes = cache.decode_count(),
            diagnostics = level.diagnostics.len(),
            "compiled level"
        );
        Ok(level)
    }

    fn compile_brush(&self, brush: &Brush, cache: &TextureCache<'_>) -> Result<BrushOutput, CompileError> {
        let mut output = BrushOutput::default();
        let solid = match build_solid(&brush.planes(), &self.config.tolerance) {
            Ok(solid) => solid,
            Err(error) => {
                output
                    .diagnostics
                    .push(Diagnostic::from_geometry(&error).at_brush(brush.ordinal, brush.line));
                return Ok(output);
            }
        };
        for (face, error) in &solid.rejected {
            output.diagnostics.push(
                Diagnostic::from_geometry(error)
                    .at_brush(brush.ordinal, brush.line)
                    .at_face(*face),
            );
        }

        for solid_face in &solid.faces {
            let face = &brush.faces[solid_face.descriptor_index];
            if self.config.skip_tool_textures && is_tool_texture(&face.texture) {
                debug!(brush = brush.ordinal, texture = %face.texture, "skipping tool face");
                continue;
            }
            let texture = match cache.get(&face.texture) {
                Ok(texture) => texture,
                Err(TextureError::Archive(error)) if error.is_fatal() => return Err(error.into()),
                Err(error) => {
                    output.diagnostics.push(
                        Diagnostic::from_texture(&face.texture, &error)
                            .at_brush(brush.ordinal, brush.line)
                            .at_face(solid_face.descriptor_index),
                    );
                    continue;
                }
            };

            let projector = FaceProjector::new(face);
            let uvs: Vec<(f64, f64)> = solid_face
                .polygon
                .iter()
                .map(|p| projector.project(p, texture.width, texture.height))
                .collect();
            let mut mesh = TriangleMesh::new();
            mesh.add_polygon(&solid_face.polygon, face.plane.normal, &uvs);
            output.faces.push((face.texture.clone(), texture, mesh));
        }
        debug!(brush = brush.ordinal, faces = output.faces.len(), "compiled brush");
        Ok(output)
    }
}
