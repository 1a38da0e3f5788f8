pub mod error;
pub mod hash;

pub mod icon;
pub mod pe;
pub mod recipe;

pub mod test_utils;

pub use crate::error::{Result, SmeltError};
pub use crate::icon::extract::IconExtractor;
