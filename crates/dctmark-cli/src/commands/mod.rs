pub mod capacity;
pub mod embed;
pub mod extract;
