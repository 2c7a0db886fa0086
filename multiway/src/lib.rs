pub mod builder;
pub mod config;
pub mod error;
pub mod export;
pub mod graph;
pub mod parser;
pub mod prelude;
pub mod registry;
pub mod rewrite;
pub mod term;

pub use builder::{Builder, Multiway, Parent, RootEdge, Stats};
pub use config::Config;
pub use error::{Error, Result};
pub use registry::{Registry, StateId};
pub use rewrite::Sharing;
pub use term::{Atom, Term};
