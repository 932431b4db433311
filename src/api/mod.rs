//! Outward-facing surfaces: text rendering and change listeners

pub mod callback;
pub mod formatting;

pub use callback::{ChangeListener, ListenerRegistry, SubscriptionHandle};
pub use formatting::{render_angle, render_pair, FormatRules, FormatStyle};
