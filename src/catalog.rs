//! Track catalog: the fixed, ordered list of playable tracks.
//!
//! A catalog is read from a TOML file (`[[tracks]]` tables) or built by
//! scanning a local music directory. Either way it is non-empty and its
//! indices stay stable for the lifetime of the player.

mod error;
mod load;
mod model;
mod scan;

pub use error::CatalogError;
pub use load::open;
pub use model::*;
pub use scan::scan;
