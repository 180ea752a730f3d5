pub mod scale;
pub mod scene;
pub mod svg;
pub mod transition;
