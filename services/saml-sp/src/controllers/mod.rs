pub mod fallback;
pub mod select;
