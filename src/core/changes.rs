//! Change sets reported by every mutating call
//!
//! Angle values report which of their own fields moved; positions report which
//! top-level properties changed or were refreshed. Both are small bitsets so a
//! caller can test membership cheaply and decide whether to react.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

/// A tag that can live in a [`FieldSet`]
pub trait Field: Copy + fmt::Debug + 'static {
    /// Every tag, in a stable order
    const ALL: &'static [Self];

    /// Bit position of this tag (must be < 32)
    fn index(self) -> u32;
}

/// Fields of an angle value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AngleField {
    DecimalDegree,
    DecimalMinute,
    Degrees,
    Minutes,
    Seconds,
    Hemisphere,
}

impl Field for AngleField {
    const ALL: &'static [Self] = &[
        AngleField::DecimalDegree,
        AngleField::DecimalMinute,
        AngleField::Degrees,
        AngleField::Minutes,
        AngleField::Seconds,
        AngleField::Hemisphere,
    ];

    fn index(self) -> u32 {
        self as u32
    }
}

/// Top-level properties of a position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Property {
    Latitude,
    Longitude,
    ObservedAt,
    Height,
    Ellipsoid,
    FormatRules,
    /// The rendered position string
    Display,
    Grid,
    Mgrs,
    EarthCentered,
    Cartesian,
    Celestial,
}

impl Field for Property {
    const ALL: &'static [Self] = &[
        Property::Latitude,
        Property::Longitude,
        Property::ObservedAt,
        Property::Height,
        Property::Ellipsoid,
        Property::FormatRules,
        Property::Display,
        Property::Grid,
        Property::Mgrs,
        Property::EarthCentered,
        Property::Cartesian,
        Property::Celestial,
    ];

    fn index(self) -> u32 {
        self as u32
    }
}

/// Bitset of [`Field`] tags
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldSet<F: Field> {
    bits: u32,
    _marker: PhantomData<F>,
}

impl<F: Field> FieldSet<F> {
    pub fn empty() -> Self {
        Self {
            bits: 0,
            _marker: PhantomData,
        }
    }

    /// Builder-style insert
    pub fn with(mut self, field: F) -> Self {
        self.insert(field);
        self
    }

    pub fn insert(&mut self, field: F) {
        self.bits |= 1 << field.index();
    }

    pub fn extend(&mut self, other: FieldSet<F>) {
        self.bits |= other.bits;
    }

    pub fn contains(&self, field: F) -> bool {
        self.bits & (1 << field.index()) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Tags in declaration order
    pub fn iter(&self) -> impl Iterator<Item = F> + '_ {
        F::ALL.iter().copied().filter(move |field| self.contains(*field))
    }
}

impl<F: Field> Default for FieldSet<F> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<F: Field> FromIterator<F> for FieldSet<F> {
    fn from_iter<I: IntoIterator<Item = F>>(iter: I) -> Self {
        let mut set = Self::empty();
        for field in iter {
            set.insert(field);
        }
        set
    }
}

impl<F: Field> fmt::Debug for FieldSet<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Fields moved by one angle value write
pub type AngleChanges = FieldSet<AngleField>;

/// Properties touched by one position mutation
pub type PropertySet = FieldSet<Property>;

/// Notification batch emitted by a position after propagation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Changes {
    /// Top-level properties that changed or were refreshed
    pub properties: PropertySet,
    /// Latitude fields that moved
    pub latitude: AngleChanges,
    /// Longitude fields that moved
    pub longitude: AngleChanges,
}

impl Changes {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty() && self.latitude.is_empty() && self.longitude.is_empty()
    }

    pub fn contains(&self, property: Property) -> bool {
        self.properties.contains(property)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_set_membership() {
        let set = AngleChanges::empty()
            .with(AngleField::Seconds)
            .with(AngleField::DecimalDegree);
        assert!(set.contains(AngleField::Seconds));
        assert!(set.contains(AngleField::DecimalDegree));
        assert!(!set.contains(AngleField::Minutes));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_field_set_iterates_in_declaration_order() {
        let set: AngleChanges = [AngleField::Seconds, AngleField::DecimalDegree]
            .into_iter()
            .collect();
        let fields: Vec<_> = set.iter().collect();
        assert_eq!(fields, vec![AngleField::DecimalDegree, AngleField::Seconds]);
    }

    #[test]
    fn test_changes_emptiness() {
        let mut changes = Changes::none();
        assert!(changes.is_empty());
        changes.longitude.insert(AngleField::Degrees);
        assert!(!changes.is_empty());
        assert!(!changes.contains(Property::Longitude));
        changes.properties.insert(Property::Longitude);
        assert!(changes.contains(Property::Longitude));
    }

    #[test]
    fn test_debug_lists_tags() {
        let set = PropertySet::empty().with(Property::Mgrs);
        assert_eq!(format!("{:?}", set), "{Mgrs}");
    }
}
