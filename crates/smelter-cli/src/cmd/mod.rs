pub mod icons;
pub mod recipes;
