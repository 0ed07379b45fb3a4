//! Process-lifetime state for the DDNS client
//!
//! - [`ResolverState`]: The lookup endpoint that answered last
//! - [`ReconcilerState`]: The last public IP known to be in sync
//!
//! Nothing here survives a restart.

mod memory;

pub use memory::{ReconcilerState, ResolverState};
