//! Crew directory: the master crew records.

use std::collections::BTreeMap;

use divecrew_logic::crew::{CrewId, CrewMember};

use crate::error::StoreError;

/// Read and write access to crew master records.
///
/// Writes validate the record first; a crew member with a non-positive
/// cycle length never reaches the cycle model. Reads are consistent with
/// the immediately preceding write.
pub trait CrewDirectory {
    /// Active crew in id order.
    fn list(&self) -> Result<Vec<CrewMember>, StoreError>;

    fn get(&self, id: CrewId) -> Result<CrewMember, StoreError>;

    /// Add a crew member; the directory assigns the id.
    fn create(&mut self, crew: CrewMember) -> Result<CrewMember, StoreError>;

    /// Replace every field of an existing record.
    fn update(&mut self, crew: CrewMember) -> Result<CrewMember, StoreError>;

    /// Soft delete: the record stays but drops out of `list`.
    fn deactivate(&mut self, id: CrewId) -> Result<(), StoreError>;
}

/// In-process directory keyed by id.
#[derive(Debug, Clone, Default)]
pub struct MemoryDirectory {
    crew: BTreeMap<CrewId, CrewMember>,
    next_id: CrewId,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self {
            crew: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Seed from existing records, keeping their ids.
    pub fn with_crew(crew: impl IntoIterator<Item = CrewMember>) -> Result<Self, StoreError> {
        let mut dir = Self::new();
        for c in crew {
            c.validate()?;
            dir.next_id = dir.next_id.max(c.id + 1);
            dir.crew.insert(c.id, c);
        }
        Ok(dir)
    }

    /// Every record, including deactivated ones.
    pub fn all(&self) -> impl Iterator<Item = &CrewMember> {
        self.crew.values()
    }
}

impl CrewDirectory for MemoryDirectory {
    fn list(&self) -> Result<Vec<CrewMember>, StoreError> {
        Ok(self.crew.values().filter(|c| c.active).cloned().collect())
    }

    fn get(&self, id: CrewId) -> Result<CrewMember, StoreError> {
        self.crew.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    fn create(&mut self, mut crew: CrewMember) -> Result<CrewMember, StoreError> {
        crew.validate()?;
        crew.id = self.next_id;
        self.next_id += 1;
        log::info!("created crew member {} ({})", crew.id, crew.display_name());
        self.crew.insert(crew.id, crew.clone());
        Ok(crew)
    }

    fn update(&mut self, crew: CrewMember) -> Result<CrewMember, StoreError> {
        crew.validate()?;
        let slot = self.crew.get_mut(&crew.id).ok_or(StoreError::NotFound(crew.id))?;
        *slot = crew.clone();
        Ok(crew)
    }

    fn deactivate(&mut self, id: CrewId) -> Result<(), StoreError> {
        let crew = self.crew.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        crew.active = false;
        log::info!("deactivated crew member {}", id);
        Ok(())
    }
}
