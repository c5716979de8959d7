//! Homogeneous protected-entity collections with a channel index.

use crate::{entities::ProtectedEntity, error::WsError};
use log::{debug, warn};
use std::collections::HashMap;

/// A list of protected entities of one category, indexed by channel.
///
/// The channel index is rebuilt eagerly on every mutation so it can
/// never be served stale. Channel queries are validated against the
/// owning region's channel plan, captured at construction.
#[derive(Debug, Clone)]
pub struct EntityCollection<E> {
    channel_plan: Vec<u16>,
    entities: Vec<E>,
    by_channel: HashMap<u16, Vec<usize>>,
}

impl<E: ProtectedEntity> EntityCollection<E> {
    pub fn new(channel_plan: Vec<u16>) -> Self {
        let by_channel = channel_plan.iter().map(|&ch| (ch, Vec::new())).collect();
        Self {
            channel_plan,
            entities: Vec::new(),
            by_channel,
        }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.entities.iter()
    }

    pub fn push(&mut self, entity: E) {
        self.entities.push(entity);
        self.reindex();
    }

    /// Removes and returns the entity at `index`. Panics if out of
    /// bounds, like `Vec::remove`.
    pub fn remove(&mut self, index: usize) -> E {
        let entity = self.entities.remove(index);
        self.reindex();
        entity
    }

    /// Replaces the entity at `index`, returning the old one. Panics
    /// if out of bounds.
    pub fn replace(&mut self, index: usize, entity: E) -> E {
        let old = std::mem::replace(&mut self.entities[index], entity);
        self.reindex();
        old
    }

    /// Validates and appends a batch of raw records. A record that
    /// fails validation is skipped with a logged warning; a record
    /// that maps to `Ok(None)` (valid but unprotected) is skipped
    /// silently.
    pub fn load_records<R, F>(&mut self, records: impl IntoIterator<Item = R>, mut build: F)
    where
        F: FnMut(R) -> Result<Option<E>, WsError>,
    {
        let mut skipped = 0_usize;
        for record in records {
            match build(record) {
                Ok(Some(entity)) => self.entities.push(entity),
                Ok(None) => (),
                Err(error) => {
                    skipped += 1;
                    warn!("skipping malformed entity record: {error}");
                }
            }
        }
        if skipped > 0 {
            warn!("skipped {skipped} malformed entity records");
        }
        self.reindex();
    }

    /// Entities operating on `channel`. Fails if `channel` is not in
    /// the owning region's channel plan; an in-plan channel with no
    /// entities yields an empty list.
    pub fn entities_on_channel(&self, channel: u16) -> Result<Vec<&E>, WsError> {
        let indices = self
            .by_channel
            .get(&channel)
            .ok_or(WsError::InvalidChannel(channel))?;
        Ok(indices.iter().map(|&i| &self.entities[i]).collect())
    }

    fn reindex(&mut self) {
        for indices in self.by_channel.values_mut() {
            indices.clear();
        }
        for (i, entity) in self.entities.iter().enumerate() {
            let Some(channel) = entity.channel() else {
                continue;
            };
            match self.by_channel.get_mut(&channel) {
                Some(indices) => indices.push(i),
                // Kept in the collection for channel-agnostic
                // iteration, just unreachable by channel query.
                None => debug!("entity on out-of-plan channel {channel}"),
            }
        }
    }

    pub fn channel_plan(&self) -> &[u16] {
        &self.channel_plan
    }
}
