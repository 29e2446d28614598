//! Arena-based AST for the subset of TypeScript the dit transform inspects:
//! registration call sites, the declarations their type arguments can name,
//! and the import/export statements that connect files.
//!
//! Nodes are 16-byte headers into typed data pools (see [`node`]); programs
//! are built bottom-up through the arena's `add_*` methods and mutated in
//! place by the rewrite through the `get_*_mut` accessors and the
//! synthesized-node factory.

pub mod arena;
pub mod base;
pub mod build;
pub mod factory;
pub mod node;
pub mod program;
pub mod syntax_kind;

pub use arena::NodeArena;
pub use base::{NodeIndex, NodeList};
pub use build::ProgramBuilder;
pub use node::{Node, NodeFlags, ModifierFlags};
pub use program::Program;
