pub mod line;
pub mod scene;
