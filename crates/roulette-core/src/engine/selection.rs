use crate::core::models::atom::AtomRecord;
use crate::core::models::model::Model;
use std::borrow::Cow;

/// A field of an atom record that selections can match against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtomField {
    RecordType,
    Serial,
    Name,
    AltLoc,
    ResidueName,
    ChainId,
    ResidueSeq,
}

impl AtomRecord {
    /// The value of `field` as text; numeric fields use their decimal form.
    pub fn field_value(&self, field: AtomField) -> Cow<'_, str> {
        match field {
            AtomField::RecordType => Cow::Borrowed(&self.record_type),
            AtomField::Serial => Cow::Owned(self.serial.to_string()),
            AtomField::Name => Cow::Borrowed(&self.name),
            AtomField::AltLoc => Cow::Borrowed(&self.alt_loc),
            AtomField::ResidueName => Cow::Borrowed(&self.residue_name),
            AtomField::ChainId => Cow::Borrowed(&self.chain_id),
            AtomField::ResidueSeq => Cow::Owned(self.residue_seq.to_string()),
        }
    }
}

/// Keeps, per model, the atoms whose `field` is one of `allowed`.
///
/// Models keep their position in the output even when nothing in them
/// matches, so indices line up with the input.
pub fn select<V: AsRef<str>>(models: &[Model], field: AtomField, allowed: &[V]) -> Vec<Model> {
    models
        .iter()
        .map(|model| {
            model
                .atoms()
                .iter()
                .filter(|atom| {
                    let value = atom.field_value(field);
                    allowed.iter().any(|v| v.as_ref() == value)
                })
                .cloned()
                .collect::<Model>()
        })
        .collect()
}

/// Keeps the atoms buried strictly less than `threshold`.
pub fn below_depth(model: &Model, threshold: f64) -> Model {
    model
        .atoms()
        .iter()
        .filter(|atom| atom.depth < threshold)
        .cloned()
        .collect()
}
