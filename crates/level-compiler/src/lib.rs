//! Turns level text and texture archives into textured triangle meshes.
//!
//! [`Compiler`] parses the level, rebuilds each brush as a convex solid, projects
//! texture coordinates and merges the faces into one [`TriangleMesh`] per texture.
//! Anything that cannot be built is skipped and reported in [`Diagnostics`].

pub mod cache;
pub mod compile;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod export;
pub mod mesh;

pub use cache::{TextureCache, TextureObserver};
pub use compile::{CompiledLevel, Compiler};
pub use config::{is_tool_texture, CompileConfig, TOOL_TEXTURES};
pub use diagnostics::{Diagnostic, DiagnosticCode, Diagnostics, Severity};
pub use error::{CompileError, ConfigError, TextureError};
pub use export::mesh_to_obj;
pub use mesh::TriangleMesh;
