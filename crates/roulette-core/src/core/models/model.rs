use super::atom::AtomRecord;
use std::collections::BTreeSet;

/// An ordered collection of atom records sharing one coordinate frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    atoms: Vec<AtomRecord>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn atoms(&self) -> &[AtomRecord] {
        &self.atoms
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// The distinct chain identifiers present in the model, sorted.
    pub fn chain_ids(&self) -> BTreeSet<&str> {
        self.atoms.iter().map(|a| a.chain_id.as_str()).collect()
    }

    pub(crate) fn push(&mut self, atom: AtomRecord) {
        self.atoms.push(atom);
    }

    pub fn into_atoms(self) -> Vec<AtomRecord> {
        self.atoms
    }
}

impl From<Vec<AtomRecord>> for Model {
    fn from(atoms: Vec<AtomRecord>) -> Self {
        Self { atoms }
    }
}

impl FromIterator<AtomRecord> for Model {
    fn from_iter<I: IntoIterator<Item = AtomRecord>>(iter: I) -> Self {
        Self {
            atoms: iter.into_iter().collect(),
        }
    }
}
