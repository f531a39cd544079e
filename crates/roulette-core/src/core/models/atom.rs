use nalgebra::Point3;

/// A single `ATOM` record read from a depth-annotated structure file.
///
/// Records are created once by the parser and never mutated afterwards. The
/// temperature-factor column of the file is reinterpreted as the atom's burial
/// depth, so the field is named accordingly.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomRecord {
    /// The record name (always `ATOM` for accepted lines).
    pub record_type: String,
    /// The atom serial number.
    pub serial: i32,
    /// The atom name (e.g., "CA", "NZ").
    pub name: String,
    /// The alternate-location indicator, empty when absent.
    pub alt_loc: String,
    /// The three-letter residue name (e.g., "LYS").
    pub residue_name: String,
    /// The chain identifier, empty when absent.
    pub chain_id: String,
    /// The residue sequence number.
    pub residue_seq: i32,
    /// The Cartesian coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
    /// The occupancy.
    pub occupancy: f64,
    /// The burial depth in Angstroms, stored in the temperature-factor column.
    pub depth: f64,
}

/// The identity of the residue an atom record represents.
///
/// Two samples are considered the same when their ordered sequences of keys
/// are equal. The serial is part of the key so that residues sharing a
/// sequence number on different chains are still distinguished.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResidueKey {
    pub chain_id: String,
    pub residue_seq: i32,
    pub residue_name: String,
    pub serial: i32,
}

impl AtomRecord {
    pub fn residue_key(&self) -> ResidueKey {
        ResidueKey {
            chain_id: self.chain_id.clone(),
            residue_seq: self.residue_seq,
            residue_name: self.residue_name.clone(),
            serial: self.serial,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn atom(serial: i32, name: &str, residue_name: &str, residue_seq: i32) -> AtomRecord {
        AtomRecord {
            record_type: "ATOM".to_string(),
            serial,
            name: name.to_string(),
            alt_loc: String::new(),
            residue_name: residue_name.to_string(),
            chain_id: "A".to_string(),
            residue_seq,
            position: Point3::new(residue_seq as f64, 1.5, -2.25),
            occupancy: 1.0,
            depth: 3.0,
        }
    }

    #[test]
    fn residue_key_carries_identity_fields() {
        let record = atom(42, "CA", "LYS", 10);
        let key = record.residue_key();
        assert_eq!(key.chain_id, "A");
        assert_eq!(key.residue_seq, 10);
        assert_eq!(key.residue_name, "LYS");
        assert_eq!(key.serial, 42);
    }

    #[test]
    fn residue_key_distinguishes_chains_with_same_sequence_number() {
        let a = atom(1, "CA", "LYS", 10);
        let mut b = atom(2, "CA", "LYS", 10);
        b.chain_id = "B".to_string();
        assert_ne!(a.residue_key(), b.residue_key());
    }

    #[test]
    fn residue_keys_order_by_chain_then_sequence() {
        let a = atom(5, "CA", "ARG", 3).residue_key();
        let b = atom(1, "CA", "LYS", 7).residue_key();
        assert!(a < b);
    }
}
