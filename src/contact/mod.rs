pub mod contact;
pub mod manager;

pub use contact::{Contact, ContactEdge, ContactEnd, ContactKind, EdgeRef};
pub use manager::ContactManager;
