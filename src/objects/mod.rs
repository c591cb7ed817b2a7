pub mod body;
pub mod fixture;

pub use body::Body;
pub use fixture::{Filter, Fixture};
