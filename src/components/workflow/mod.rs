mod component;
mod render;
mod state;
mod storage;
mod store;
mod types;

pub use component::WorkflowCanvas;
