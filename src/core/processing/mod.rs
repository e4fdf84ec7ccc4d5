pub mod normalize;
pub mod resize;
pub mod scene_filter;
