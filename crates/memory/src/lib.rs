//! Context directory loading for ctxpack.
//!
//! Reads a project's `.context/` directory and turns its Markdown files
//! into [`PacketInput`](ctxpack_agent::PacketInput) for the assembler.

pub mod loader;
pub mod parser;

pub use loader::{ContextDir, ContextFile, FILE_READ_ORDER};
pub use parser::{
    active_tasks, bullet_items, constitution_rules, parse_entry_blocks, parse_entry_header,
};
