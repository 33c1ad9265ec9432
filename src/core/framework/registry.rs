use std::sync::OnceLock;

use super::{catalog, Framework, FrameworkId};
use crate::error::{Result, ValidationError};

/// Framework definitions, materialized on first lookup.
///
/// One registry is built per invocation and handed to callers by reference.
/// Each framework has its own cache slot, so a lookup only builds the
/// definition it asks for.
#[derive(Debug, Default)]
pub struct FrameworkRegistry {
    slots: [OnceLock<Framework>; FrameworkId::ALL.len()],
}

impl FrameworkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: FrameworkId) -> &Framework {
        self.slots[id.index()].get_or_init(|| {
            tracing::debug!(framework = id.as_str(), "loading framework definition");
            catalog::definition(id)
        })
    }

    /// Look up a framework by its textual id.
    pub fn lookup(&self, id: &str) -> Result<&Framework> {
        let id = id
            .parse::<FrameworkId>()
            .map_err(|_| ValidationError::UnknownFramework { id: id.to_string() })?;
        Ok(self.get(id))
    }

    pub fn all(&self) -> impl Iterator<Item = &Framework> + '_ {
        FrameworkId::ALL.into_iter().map(move |id| self.get(id))
    }

    pub fn ids(&self) -> &'static [FrameworkId] {
        &FrameworkId::ALL
    }

    /// Number of definitions built so far.
    pub fn loaded(&self) -> usize {
        self.slots.iter().filter(|slot| slot.get().is_some()).count()
    }
}
