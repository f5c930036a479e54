pub mod renderer;
pub mod store;
