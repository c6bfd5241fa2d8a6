//! IRREVERSO Shell - the surfaces around the boot sequence
//!
//! Everything a host needs besides the sequencer itself:
//! - `state`: the app state store and its reducer
//! - `visit`: the last-visit gate deciding whether the boot plays
//! - `locale`, `labels`: language detection and UI strings
//! - `routes`, `menu`: pages and navigation
//! - `timeline`, `canon`: the year bar and the canonical search
//! - `rail`: session telemetry for the core surface
//! - `access`: the temporal-access screen shown after the boot

pub mod access;
pub mod canon;
pub mod labels;
pub mod locale;
pub mod menu;
pub mod rail;
pub mod routes;
pub mod state;
pub mod timeline;
pub mod visit;

pub use access::*;
pub use canon::{search, CanonEntry};
pub use labels::*;
pub use locale::Zone;
pub use menu::MenuItem;
pub use rail::*;
pub use routes::*;
pub use state::*;
pub use visit::*;
