//! Cell controller side of the cell interface: tracks `<name>.connected` and
//! publishes the cell's identification to every joined compute relation.

use log::{debug, info};

use crate::config::{CellConfig, ConfigError};
use crate::event::{Endpoint, Event, Reaction};
use crate::flags::FlagStore;
use crate::keys::{self, flag};
use crate::relation::Relations;

#[derive(Debug)]
pub struct CellProvides {
    endpoint_name: String,
    relations: Relations,
}

impl CellProvides {
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

    /// Host access for adding/removing relations.
    pub fn relations_mut(&mut self) -> &mut Relations {
        &mut self.relations
    }

    pub fn joined(&mut self, flags: &mut dyn FlagStore) {
        if flags.set(&self.expand_name(flag::CONNECTED)) {
            info!("{}: cell relation joined", self.endpoint_name);
        }
    }

    pub fn broken(&mut self, flags: &mut dyn FlagStore) {
        flags.clear(&self.expand_name(flag::NEW_REQUEST));
        if flags.clear(&self.expand_name(flag::CONNECTED)) {
            info!("{}: cell relation broken", self.endpoint_name);
        }
    }

    pub fn is_connected(&self, flags: &dyn FlagStore) -> bool {
        flags.is_set(&self.expand_name(flag::CONNECTED))
    }

    /// Publish the cell's identification on every relation. Other outgoing keys are
    /// left as they are. No-op without relations.
    pub fn send_cell_data(&mut self, cell_name: &str, amqp_svc_name: &str, db_svc_name: &str) {
        for relation in self.relations.iter_mut() {
            relation.publish_raw(keys::AMQP_SERVICE, amqp_svc_name);
            relation.publish_raw(keys::DB_SERVICE, db_svc_name);
            relation.publish_raw(keys::CELL_NAME, cell_name);
            debug!(
                "{}: published cell {} to {}",
                self.endpoint_name,
                cell_name,
                relation.relation_id()
            );
        }
    }

    /// [`send_cell_data`](Self::send_cell_data) with values from configuration.
    pub fn send_configured(&mut self, config: &CellConfig) -> Result<(), ConfigError> {
        let (cell_name, amqp, db) = config.cell_data()?;
        self.send_cell_data(cell_name, amqp, db);
        Ok(())
    }
}

impl Endpoint for CellProvides {
    const REACTIONS: &'static [Reaction<Self>] = &[
        Reaction {
            name: "broken",
            event: Event::Departed,
            run: CellProvides::broken,
        },
        Reaction {
            name: "joined",
            event: Event::Joined,
            run: CellProvides::joined,
        },
    ];

    fn endpoint_name(&self) -> &str {
        &self.endpoint_name
    }
}
