//! CLI command implementations.

pub(crate) mod render;
pub(crate) mod server;

pub(crate) use render::RenderArgs;
pub(crate) use server::ServerArgs;
