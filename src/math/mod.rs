pub mod mat;
pub mod transform;
pub mod vec2;

pub use mat::{Mat22, Mat33, Vec3};
pub use transform::{Sweep, Transform};
pub use vec2::Vec2;
