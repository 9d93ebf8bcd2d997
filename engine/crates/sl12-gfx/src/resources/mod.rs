pub mod format;
pub mod handles;
pub mod resource_state;
pub mod texture;
