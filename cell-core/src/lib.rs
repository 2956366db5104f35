//! Cell relation interface: cell controller (provider) and compute (requirer) endpoints.
//! Host-driven: no I/O; the host reports relation events and owns flags and transport.

pub mod config;
pub mod event;
pub mod flags;
pub mod keys;
pub mod provider;
pub mod relation;
pub mod requirer;
pub mod settings;

pub use config::{CellConfig, ConfigError};
pub use event::{dispatch, Endpoint, Event, Reaction};
pub use flags::{FlagStore, MemoryFlagStore};
pub use provider::CellProvides;
pub use relation::{JoinedUnits, Relation, RelationId, Relations, Unit};
pub use requirer::CellRequires;
pub use settings::{RawSettings, Settings, SettingsError, Value};
