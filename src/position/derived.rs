//! Derived representation slots and the policy that keeps them fresh

use crate::validation::CoordinateResult;
use serde::{Deserialize, Serialize};

/// State of one derived representation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Derived<T> {
    /// Never computed, or discarded because its inputs moved while inactive
    Unloaded,
    Loaded(T),
    /// Computed, but the collaborator rejected the input
    Invalid(String),
}

impl<T> Default for Derived<T> {
    fn default() -> Self {
        Derived::Unloaded
    }
}

impl<T> Derived<T> {
    pub fn from_result(result: CoordinateResult<T>) -> Self {
        match result {
            Ok(value) => Derived::Loaded(value),
            Err(err) => Derived::Invalid(err.to_string()),
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Derived::Loaded(_))
    }

    pub fn is_unloaded(&self) -> bool {
        matches!(self, Derived::Unloaded)
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Derived::Invalid(_))
    }

    pub fn as_loaded(&self) -> Option<&T> {
        match self {
            Derived::Loaded(value) => Some(value),
            _ => None,
        }
    }
}

/// Which derived representations recompute on every relevant change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadPolicy {
    pub celestial: bool,
    /// Grid and the MGRS reference derived from it
    pub grid: bool,
    pub earth_centered: bool,
    pub cartesian: bool,
}

impl LoadPolicy {
    /// Everything recomputes eagerly
    pub fn eager() -> Self {
        Self {
            celestial: true,
            grid: true,
            earth_centered: true,
            cartesian: true,
        }
    }

    /// Nothing recomputes until loaded explicitly
    pub fn lazy() -> Self {
        Self {
            celestial: false,
            grid: false,
            earth_centered: false,
            cartesian: false,
        }
    }

    pub fn with_celestial(mut self, enabled: bool) -> Self {
        self.celestial = enabled;
        self
    }

    pub fn with_grid(mut self, enabled: bool) -> Self {
        self.grid = enabled;
        self
    }

    pub fn with_earth_centered(mut self, enabled: bool) -> Self {
        self.earth_centered = enabled;
        self
    }

    pub fn with_cartesian(mut self, enabled: bool) -> Self {
        self.cartesian = enabled;
        self
    }
}

impl Default for LoadPolicy {
    fn default() -> Self {
        Self::eager()
    }
}
