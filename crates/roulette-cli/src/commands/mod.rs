pub mod extract;
pub mod spin;
