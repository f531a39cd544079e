use super::atom::{AtomRecord, ResidueKey};
use super::residue::BasicResidue;
use std::hash::{Hash, Hasher};

/// One drawn set of residues to be charged.
///
/// The atoms are kept sorted by residue sequence number (serial breaks ties),
/// so two draws of the same residues compare equal regardless of the order in
/// which they were picked. Equality and hashing only consider residue
/// identity, never coordinates or depth.
#[derive(Debug, Clone)]
pub struct Sample {
    atoms: Vec<AtomRecord>,
}

impl Sample {
    pub fn new(mut atoms: Vec<AtomRecord>) -> Self {
        atoms.sort_by_key(|a| (a.residue_seq, a.serial));
        Self { atoms }
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

    pub fn keys(&self) -> impl Iterator<Item = ResidueKey> + '_ {
        self.atoms.iter().map(AtomRecord::residue_key)
    }

    /// Residue sequence numbers of one category, in sample order.
    pub fn residue_ids(&self, category: BasicResidue) -> Vec<i32> {
        self.atoms
            .iter()
            .filter(|a| a.residue_name == category.code())
            .map(|a| a.residue_seq)
            .collect()
    }
}

impl PartialEq for Sample {
    fn eq(&self, other: &Self) -> bool {
        self.atoms.len() == other.atoms.len() && self.keys().eq(other.keys())
    }
}

impl Eq for Sample {}

impl Hash for Sample {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.atoms.len().hash(state);
        for key in self.keys() {
            key.hash(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::tests::atom;

    #[test]
    fn new_sorts_by_residue_sequence_number() {
        let sample = Sample::new(vec![
            atom(3, "CA", "HIS", 15),
            atom(1, "CA", "LYS", 10),
            atom(2, "CA", "ARG", 12),
        ]);
        let ids: Vec<_> = sample.atoms().iter().map(|a| a.residue_seq).collect();
        assert_eq!(ids, [10, 12, 15]);
    }

    #[test]
    fn equality_ignores_draw_order() {
        let a = Sample::new(vec![atom(1, "CA", "LYS", 10), atom(4, "CA", "LYS", 20)]);
        let b = Sample::new(vec![atom(4, "CA", "LYS", 20), atom(1, "CA", "LYS", 10)]);
        assert_eq!(a, b);
    }

    #[test]
    fn equality_ignores_depth_and_coordinates() {
        let mut moved = atom(1, "CA", "LYS", 10);
        moved.depth = 9.0;
        moved.position.x += 1.0;
        assert_eq!(
            Sample::new(vec![moved]),
            Sample::new(vec![atom(1, "CA", "LYS", 10)])
        );
    }

    #[test]
    fn samples_with_different_residues_are_not_equal() {
        let a = Sample::new(vec![atom(1, "CA", "LYS", 10), atom(2, "CA", "ARG", 12)]);
        let b = Sample::new(vec![atom(1, "CA", "LYS", 10), atom(3, "CA", "HIS", 15)]);
        assert_ne!(a, b);
    }

    #[test]
    fn residue_ids_groups_by_category() {
        let sample = Sample::new(vec![
            atom(4, "CA", "LYS", 20),
            atom(3, "CA", "HIS", 15),
            atom(1, "CA", "LYS", 10),
        ]);
        assert_eq!(sample.residue_ids(BasicResidue::Lys), [10, 20]);
        assert!(sample.residue_ids(BasicResidue::Arg).is_empty());
        assert_eq!(sample.residue_ids(BasicResidue::His), [15]);
    }
}
