pub mod dump;
pub mod renderer;
