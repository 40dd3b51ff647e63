//! Assertion helpers with diagnostic output.
//!
//! Every failure names the context and includes the level's diagnostics.

use level_compiler::{CompiledLevel, DiagnosticCode, TriangleMesh};

use crate::helpers::{mesh_signed_volume, HarnessError};

fn fail(ctx: &str, level: &CompiledLevel, detail: String) -> HarnessError {
    HarnessError::AssertionFailed {
        detail: format!("[{}] {}\n{}", ctx, detail, level.diagnostics),
    }
}

/// Assert the level compiled without skipping anything.
pub fn assert_clean(level: &CompiledLevel, ctx: &str) -> Result<(), HarnessError> {
    if level.diagnostics.is_empty() {
        Ok(())
    } else {
        Err(fail(ctx, level, "expected no diagnostics".to_string()))
    }
}

/// Assert the number of triangles textured with `texture`.
pub fn assert_triangle_count(
    level: &CompiledLevel,
    texture: &str,
    expected: usize,
    ctx: &str,
) -> Result<(), HarnessError> {
    let actual = level.meshes.get(texture).map_or(0, TriangleMesh::triangle_count);
    if actual == expected {
        Ok(())
    } else {
        Err(fail(
            ctx,
            level,
            format!("texture `{}`: expected {} triangles, got {}", texture, expected, actual),
        ))
    }
}

/// Assert exactly `expected` diagnostics carry `code`.
pub fn assert_diagnostic_count(
    level: &CompiledLevel,
    code: DiagnosticCode,
    expected: usize,
    ctx: &str,
) -> Result<(), HarnessError> {
    let actual = level.diagnostics.errors_of(code).len();
    if actual == expected {
        Ok(())
    } else {
        Err(fail(
            ctx,
            level,
            format!("expected {} {} diagnostics, got {}", expected, code, actual),
        ))
    }
}

/// Assert the mesh bounding box matches expected values within tolerance.
pub fn assert_bounding_box(
    mesh: &TriangleMesh,
    expected_min: [f32; 3],
    expected_max: [f32; 3],
    tol: f32,
    ctx: &str,
) -> Result<(), HarnessError> {
    let Some((actual_min, actual_max)) = mesh.bounding_box() else {
        return Err(HarnessError::AssertionFailed {
            detail: format!("[{}] mesh is empty", ctx),
        });
    };

    for i in 0..3 {
        if (actual_min[i] - expected_min[i]).abs() > tol {
            return Err(HarnessError::AssertionFailed {
                detail: format!(
                    "[{}] bounding box min[{}]: expected {:.3}, got {:.3} (tol={})",
                    ctx, i, expected_min[i], actual_min[i], tol,
                ),
            });
        }
        if (actual_max[i] - expected_max[i]).abs() > tol {
            return Err(HarnessError::AssertionFailed {
                detail: format!(
                    "[{}] bounding box max[{}]: expected {:.3}, got {:.3} (tol={})",
                    ctx, i, expected_max[i], actual_max[i], tol,
                ),
            });
        }
    }
    Ok(())
}

/// Assert the level's meshes enclose `expected` cubic units with outward winding.
pub fn assert_volume(level: &CompiledLevel, expected: f64, tol: f64, ctx: &str) -> Result<(), HarnessError> {
    let actual = mesh_signed_volume(level.meshes.values());
    if (actual - expected).abs() <= tol {
        Ok(())
    } else {
        Err(fail(
            ctx,
            level,
            format!("expected signed volume {:.3}, got {:.3} (tol={})", expected, actual, tol),
        ))
    }
}

/// Assert every UV is finite.
pub fn assert_uvs_finite(level: &CompiledLevel, ctx: &str) -> Result<(), HarnessError> {
    for (texture, mesh) in &level.meshes {
        if let Some(bad) = mesh.uvs.iter().find(|c| !c.is_finite()) {
            return Err(fail(ctx, level, format!("texture `{}` has UV component {}", texture, bad)));
        }
    }
    Ok(())
}
