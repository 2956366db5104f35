//! Compute side of the cell interface.
//!
//! Tracks `<name>.connected` and `<name>.available` and exposes read access to the
//! settings the cell controller published. Accessors are pure reads and are safe
//! in any state; keys nobody published read as null.
//!
//! `broken` clears `available` only. `connected` stays set after the relation goes
//! away until the host clears it. `available` is only ever set while `connected` is.

use log::{debug, info};

use crate::config::CellConfig;
use crate::event::{Endpoint, Event, Reaction};
use crate::flags::FlagStore;
use crate::keys::{self, flag};
use crate::relation::Relations;
use crate::settings::{self, ConsoleData, NetworkData, Settings, SettingsError};

#[derive(Debug)]
pub struct CellRequires {
    endpoint_name: String,
    relations: Relations,
}

impl CellRequires {
    pub fn new(endpoint_name: impl Into<String>) -> Self {
        Self {
            endpoint_name: endpoint_name.into(),
            relations: Relations::new(),
        }
    }

    pub fn from_config(config: &CellConfig) -> Self {
        Self::new(config.endpoint_name.clone())
    }

    pub fn relations(&self) -> &Relations {
        &self.relations
    }

    /// Host access for adding/removing relations and updating received data.
    pub fn relations_mut(&mut self) -> &mut Relations {
        &mut self.relations
    }

    /// Set `connected` when the relation has been joined.
    pub fn joined(&mut self, flags: &mut dyn FlagStore) {
        if flags.set(&self.expand_name(flag::CONNECTED)) {
            info!("{}: relation joined", self.endpoint_name);
        }
    }

    /// Clear `available` when the relation has gone.
    pub fn broken(&mut self, flags: &mut dyn FlagStore) {
        if flags.clear(&self.expand_name(flag::AVAILABLE)) {
            info!("{}: relation no longer available", self.endpoint_name);
        }
    }

    /// Set `available` once the cell controller has published a network manager.
    /// Ignored until the relation has been joined.
    pub fn data_changed(&mut self, flags: &mut dyn FlagStore) {
        if !self.is_connected(flags) {
            debug!("{}: data changed before join, ignored", self.endpoint_name);
            return;
        }
        let network_manager = self
            .relations
            .all_joined_units()
            .received()
            .remove(keys::NETWORK_MANAGER);
        match network_manager {
            Some(v) if settings::is_truthy(&v) => {
                if flags.set(&self.expand_name(flag::AVAILABLE)) {
                    info!("{}: available (network_manager={})", self.endpoint_name, v);
                }
            }
            _ => debug!(
                "{}: data changed, no network_manager yet",
                self.endpoint_name
            ),
        }
    }

    pub fn is_connected(&self, flags: &dyn FlagStore) -> bool {
        flags.is_set(&self.expand_name(flag::CONNECTED))
    }

    pub fn is_available(&self, flags: &dyn FlagStore) -> bool {
        flags.is_set(&self.expand_name(flag::AVAILABLE))
    }

    /// Look up `keys` in the data received from all joined units.
    /// Every requested key is in the result; missing ones are null.
    pub fn get_settings<'a, I>(&self, keys: I) -> Settings
    where
        I: IntoIterator<Item = &'a str>,
    {
        let received = self.relations.all_joined_units().received();
        settings::select(&received, keys)
    }

    pub fn get_console_data(&self) -> Settings {
        self.get_settings(keys::CONSOLE_KEYS)
    }

    pub fn get_network_data(&self) -> Settings {
        self.get_settings(keys::NETWORK_KEYS)
    }

    pub fn get_region(&self) -> Settings {
        self.get_settings([keys::REGION])
    }

    pub fn get_volume_data(&self) -> Settings {
        self.get_settings([keys::VOLUME_SERVICE])
    }

    pub fn get_ec2_data(&self) -> Settings {
        self.get_settings([keys::EC2_HOST])
    }

    pub fn get_restart_trigger(&self) -> Settings {
        self.get_settings([keys::RESTART_TRIGGER])
    }

    /// Typed form of [`get_network_data`](Self::get_network_data).
    pub fn network_data(&self) -> Result<NetworkData, SettingsError> {
        settings::decode(&self.get_network_data())
    }

    /// Typed form of [`get_console_data`](Self::get_console_data).
    pub fn console_data(&self) -> Result<ConsoleData, SettingsError> {
        settings::decode(&self.get_console_data())
    }
}

impl Endpoint for CellRequires {
    const REACTIONS: &'static [Reaction<Self>] = &[
        Reaction {
            name: "data_changed",
            event: Event::Changed,
            run: CellRequires::data_changed,
        },
        Reaction {
            name: "broken",
            event: Event::Departed,
            run: CellRequires::broken,
        },
        Reaction {
            name: "joined",
            event: Event::Joined,
            run: CellRequires::joined,
        },
    ];

    fn endpoint_name(&self) -> &str {
        &self.endpoint_name
    }
}
