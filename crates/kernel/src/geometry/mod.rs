pub mod plane;
pub mod point;
pub mod vector;

pub use plane::Plane;
pub use point::{Point2d, Point3d};
pub use vector::Vec3;
