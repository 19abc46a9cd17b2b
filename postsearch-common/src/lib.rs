pub mod author_index;
pub mod model;
pub mod render;
pub mod search;
