pub mod blur;
pub mod mix;
pub mod overlay;
pub mod pipeline;
