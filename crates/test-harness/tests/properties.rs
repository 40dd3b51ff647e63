//! Property tests over randomly sized box brushes.

use brush_kernel::Point3d;
use level_compiler::{CompileConfig, Compiler};
use proptest::prelude::*;
use test_harness::assertions::{assert_clean, assert_uvs_finite, assert_volume};
use test_harness::helpers::{distinct_positions, mesh_surface_area};
use test_harness::{box_brush, box_brush_valve, checker_wad};
use wad_format::WadDialect;

fn corners() -> impl Strategy<Value = (Point3d, Point3d)> {
    (
        -512i32..512,
        -512i32..512,
        -512i32..512,
        1i32..256,
        1i32..256,
        1i32..256,
    )
        .prop_map(|(x, y, z, dx, dy, dz)| {
            let min = Point3d::new(x as f64, y as f64, z as f64);
            let max = Point3d::new((x + dx) as f64, (y + dy) as f64, (z + dz) as f64);
            (min, max)
        })
}

proptest! {
    #[test]
    fn prop_box_volume_and_area((min, max) in corners()) {
        let archive = checker_wad(WadDialect::Wad3, &["box"], 16).unwrap();
        let level = Compiler::new(CompileConfig::default())
            .with_archive(archive)
            .compile(&box_brush(min, max, "box"))
            .unwrap();
        assert_clean(&level, "random box").unwrap();
        prop_assert_eq!(level.triangle_count(), 12);
        prop_assert_eq!(distinct_positions(level.meshes.values()), 8);

        let (dx, dy, dz) = (max.x - min.x, max.y - min.y, max.z - min.z);
        let volume = dx * dy * dz;
        assert_volume(&level, volume, volume * 1e-4 + 1e-2, "random box").unwrap();
        let area = 2.0 * (dx * dy + dy * dz + dz * dx);
        let actual = mesh_surface_area(&level.meshes["box"]);
        prop_assert!((actual - area).abs() <= area * 1e-4, "area {} vs {}", actual, area);
    }

    #[test]
    fn prop_valve_uvs_are_finite((min, max) in corners()) {
        let archive = checker_wad(WadDialect::Wad3, &["box"], 32).unwrap();
        let level = Compiler::new(CompileConfig::default())
            .with_archive(archive)
            .compile(&box_brush_valve(min, max, "box"))
            .unwrap();
        assert_clean(&level, "random valve box").unwrap();
        assert_uvs_finite(&level, "random valve box").unwrap();
        prop_assert_eq!(level.triangle_count(), 12);
    }
}
