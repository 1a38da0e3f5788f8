// crates/smelter-cli/src/lib.rs

pub mod io;
pub mod logging;
