pub mod container;
pub mod extract;
pub mod group;
pub mod info;

pub use extract::IconExtractor;
