use brush_kernel::Point3d;
use serde::{Deserialize, Serialize};

use crate::blocks::Block;
use crate::grammar::parse_property_line;

/// Classnames whose origin places the camera.
pub const SPAWN_CLASSNAMES: [&str; 2] = ["info_player_start", "info_player_deathmatch"];

/// Key/value properties of one entity block, in file order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// 1-based line of the opening brace.
    pub line: usize,
    pub properties: Vec<(String, String)>,
}

impl Entity {
    pub(crate) fn from_block(block: &Block<'_>) -> Self {
        let properties = block
            .lines
            .iter()
            .filter_map(|(_, text)| parse_property_line(text))
            .collect();
        Self {
            line: block.line,
            properties,
        }
    }

    /// First value of `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn classname(&self) -> Option<&str> {
        self.get("classname")
    }

    pub fn origin(&self) -> Option<Point3d> {
        parse_origin(self.get("origin")?)
    }
}

/// Parse `"x y z"`.
pub fn parse_origin(value: &str) -> Option<Point3d> {
    let mut parts = value.split_whitespace().map(str::parse::<f64>);
    let (x, y, z) = (parts.next()?.ok()?, parts.next()?.ok()?, parts.next()?.ok()?);
    if parts.next().is_some() {
        return None;
    }
    Some(Point3d::new(x, y, z))
}

/// Archive file names from a `"wad"` value: `;`-separated paths reduced to file names.
pub fn split_wad_names(value: &str) -> Vec<String> {
    value
        .split(';')
        .filter_map(|path| path.rsplit(|c: char| c == '/' || c == '\\').next())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_accepts_floats() {
        assert_eq!(parse_origin("-480 96.5 1e2"), Some(Point3d::new(-480.0, 96.5, 100.0)));
        assert_eq!(parse_origin("1 2"), None);
        assert_eq!(parse_origin("1 2 3 4"), None);
        assert_eq!(parse_origin("a b c"), None);
    }

    #[test]
    fn test_wad_names_strip_paths() {
        assert_eq!(
            split_wad_names(r"\quiver\valve\halflife.wad;C:/maps/decals.wad;;liquids.wad"),
            vec!["halflife.wad", "decals.wad", "liquids.wad"]
        );
        assert!(split_wad_names("").is_empty());
        assert!(split_wad_names("textures/").is_empty());
    }

    #[test]
    fn test_first_property_wins() {
        let entity = Entity {
            line: 1,
            properties: vec![
                ("origin".into(), "1 2 3".into()),
                ("origin".into(), "4 5 6".into()),
            ],
        };
        assert_eq!(entity.origin(), Some(Point3d::new(1.0, 2.0, 3.0)));
        assert_eq!(entity.classname(), None);
    }
}
