//! Relations and remote units as seen by one endpoint.
//!
//! The host owns relation lifecycle: it adds relations and units as they join,
//! removes them as they depart, and copies peer data into [`Unit::received_raw`].
//! Endpoints only write outgoing data (provider) or read incoming data (requirer).

use std::fmt;

use crate::settings::{self, RawSettings, Settings};

/// Stable relation identifier assigned by the host, e.g. `cell:3`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelationId(String);

impl RelationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One remote unit and the raw data it published to us.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    unit_name: String,
    received_raw: RawSettings,
}

impl Unit {
    pub fn new(unit_name: impl Into<String>) -> Self {
        Self {
            unit_name: unit_name.into(),
            received_raw: RawSettings::new(),
        }
    }

    /// Unit with raw wire data.
    pub fn with_raw(unit_name: impl Into<String>, received_raw: RawSettings) -> Self {
        Self {
            unit_name: unit_name.into(),
            received_raw,
        }
    }

    /// Unit whose data was published as JSON-encoded values.
    pub fn with_data(unit_name: impl Into<String>, received: &Settings) -> Self {
        let received_raw = received
            .iter()
            .map(|(k, v)| (k.clone(), settings::encode_value(v)))
            .collect();
        Self::with_raw(unit_name, received_raw)
    }

    pub fn unit_name(&self) -> &str {
        &self.unit_name
    }

    pub fn received_raw(&self) -> &RawSettings {
        &self.received_raw
    }

    /// Decoded view of the unit's data.
    pub fn received(&self) -> Settings {
        settings::decode_all(&self.received_raw)
    }

    /// Host: replace the unit's data with what the peer currently publishes.
    pub fn set_received_raw(&mut self, received_raw: RawSettings) {
        self.received_raw = received_raw;
    }
}

/// A link to one remote application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    relation_id: RelationId,
    application_name: Option<String>,
    units: Vec<Unit>,
    to_publish_raw: RawSettings,
}

impl Relation {
    pub fn new(relation_id: RelationId) -> Self {
        Self {
            relation_id,
            application_name: None,
            units: Vec::new(),
            to_publish_raw: RawSettings::new(),
        }
    }

    pub fn with_application(mut self, application_name: impl Into<String>) -> Self {
        self.application_name = Some(application_name.into());
        self
    }

    pub fn relation_id(&self) -> &RelationId {
        &self.relation_id
    }

    pub fn application_name(&self) -> Option<&str> {
        self.application_name.as_deref()
    }

    /// Joined remote units, in join order.
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn unit_mut(&mut self, unit_name: &str) -> Option<&mut Unit> {
        self.units.iter_mut().find(|u| u.unit_name == unit_name)
    }

    /// Host: a remote unit joined. Replaces the unit's data if it is already present.
    pub fn join_unit(&mut self, unit: Unit) {
        match self.unit_mut(&unit.unit_name) {
            Some(existing) => *existing = unit,
            None => self.units.push(unit),
        }
    }

    /// Host: a remote unit departed. Returns the removed unit.
    pub fn depart_unit(&mut self, unit_name: &str) -> Option<Unit> {
        let idx = self.units.iter().position(|u| u.unit_name == unit_name)?;
        Some(self.units.remove(idx))
    }

    /// Outgoing data as written on the wire.
    pub fn to_publish_raw(&self) -> &RawSettings {
        &self.to_publish_raw
    }

    /// Write one outgoing raw value, leaving other keys untouched.
    pub(crate) fn publish_raw(&mut self, key: &str, value: impl Into<String>) {
        self.to_publish_raw.insert(key.to_string(), value.into());
    }
}

/// All relations bound to one endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Relations {
    relations: Vec<Relation>,
}

impl Relations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Relation> {
        self.relations.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Relation> {
        self.relations.iter_mut()
    }

    pub fn get(&self, relation_id: &RelationId) -> Option<&Relation> {
        self.relations.iter().find(|r| &r.relation_id == relation_id)
    }

    pub fn get_mut(&mut self, relation_id: &RelationId) -> Option<&mut Relation> {
        self.relations
            .iter_mut()
            .find(|r| &r.relation_id == relation_id)
    }

    /// Host: a relation was established. Replaces a relation with the same id.
    pub fn insert(&mut self, relation: Relation) {
        match self.get_mut(&relation.relation_id) {
            Some(existing) => *existing = relation,
            None => self.relations.push(relation),
        }
    }

    /// Host: a relation was torn down.
    pub fn remove(&mut self, relation_id: &RelationId) -> Option<Relation> {
        let idx = self
            .relations
            .iter()
            .position(|r| &r.relation_id == relation_id)?;
        Some(self.relations.remove(idx))
    }

    /// Every joined unit across all relations: relation order, then join order.
    pub fn all_joined_units(&self) -> JoinedUnits<'_> {
        JoinedUnits {
            units: self.relations.iter().flat_map(|r| r.units.iter()).collect(),
        }
    }
}

/// Combined view over the joined units of an endpoint.
pub struct JoinedUnits<'a> {
    units: Vec<&'a Unit>,
}

impl<'a> JoinedUnits<'a> {
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Unit> + '_ {
        self.units.iter().copied()
    }

    /// Raw data merged across units. On a key collision the earliest unit wins.
    pub fn received_raw(&self) -> RawSettings {
        let mut merged = RawSettings::new();
        for unit in self.units.iter().rev() {
            merged.extend(
                unit.received_raw
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone())),
            );
        }
        merged
    }

    /// Decoded merged data.
    pub fn received(&self) -> Settings {
        settings::decode_all(&self.received_raw())
    }
}
