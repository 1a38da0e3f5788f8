pub mod exe_file;
pub mod recipe_dir;
