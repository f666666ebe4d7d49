//! conduit-host: Host document boundary and the connect command.
//!
//! The geometry lives in `conduit-geometry`; this crate describes what a
//! CAD host must provide ([`document`]), how the two conduits are found
//! ([`lookup`]), and runs the command in two transactions ([`command`]).
//! [`memory`] is a complete in-memory host used by the CLI and tests.

pub mod command;
pub mod document;
pub mod lookup;
pub mod memory;
pub mod types;

pub use command::{CommandConfig, CommandVariant, ConnectOutcome, preview, run};
pub use document::{
    ConnectorGraph, ElementFactory, ElementSource, HostDocument, TransactionScope,
};
pub use lookup::ElementLookup;
pub use memory::{Element, MemoryDocument, Scene};
pub use types::{CommandError, ConduitTypeId, Connector, Curve, ElementId, LevelId};
