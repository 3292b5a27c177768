//! Domain modules — vertical slices.
//!
//! Each slice owns its snapshot types, its state container, and (where the
//! domain is fetched) its mock data source. The `Dashboard` in `store`
//! composes the state containers and drives their transitions.

pub mod crypto;
pub mod lifecycle;
pub mod notifications;
pub mod preferences;
pub mod weather;
