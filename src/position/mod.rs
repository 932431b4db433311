//! Geographic position with cascading recompute of derived representations
//!
//! A [`Position`] owns a latitude and a longitude [`AngleValue`], the instant
//! it was observed at, a height above the ellipsoid and the ellipsoid itself.
//! Every mutation runs the same sequence before returning:
//!
//! 1. validate the new value (nothing is written on failure)
//! 2. commit it
//! 3. refresh each derived representation whose inputs moved, as allowed by
//!    the [`LoadPolicy`]
//! 4. hand one [`Changes`] batch to the subscribed listeners and return it
//!
//! Inputs of each derived representation:
//!
//! | representation | inputs                                   |
//! |----------------|------------------------------------------|
//! | grid + MGRS    | latitude, longitude, ellipsoid           |
//! | earth-centered | latitude, longitude, height, ellipsoid   |
//! | cartesian      | latitude, longitude                      |
//! | celestial      | latitude, longitude, observation instant |
//!
//! A representation that is inactive in the policy is dropped back to
//! [`Derived::Unloaded`] when its inputs move, so a loaded value is never stale.

pub mod derived;
pub mod movement;

pub use derived::{Derived, LoadPolicy};
pub use movement::Distance;

use crate::algorithms::{Cartesian, CelestialResult, EarthCentered, GridResult, Services};
use crate::api::{render_pair, ChangeListener, FormatRules, ListenerRegistry, SubscriptionHandle};
use crate::core::{AngleChanges, AngleField, AngleValue, Axis, Changes, Ellipsoid, Property};
use crate::processing::parse;
use crate::utils::CoordinateConfig;
use crate::validation::{
    check_ellipsoid, check_finite, check_rounding, CoordinateError, CoordinateResult,
};
use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// One geographic point plus its temporal and configuration context
#[derive(Debug)]
pub struct Position {
    latitude: AngleValue,
    longitude: AngleValue,
    observed_at: DateTime<Utc>,
    /// Height above the ellipsoid (meters)
    height: f64,
    policy: LoadPolicy,
    format_rules: FormatRules,
    ellipsoid: Ellipsoid,

    grid: Derived<GridResult>,
    mgrs: Derived<String>,
    earth_centered: Derived<EarthCentered>,
    cartesian: Derived<Cartesian>,
    celestial: Derived<CelestialResult>,
    /// Set once the grid has been computed; survives later unloads
    grid_baseline: bool,

    services: Services,
    listeners: ListenerRegistry,
}

impl Position {
    /// Eager position observed now
    pub fn new(latitude: f64, longitude: f64) -> CoordinateResult<Self> {
        Self::with_date(latitude, longitude, Utc::now())
    }

    /// Eager position observed at `observed_at`
    pub fn with_date(
        latitude: f64,
        longitude: f64,
        observed_at: DateTime<Utc>,
    ) -> CoordinateResult<Self> {
        PositionBuilder::from_decimal(latitude, longitude)?
            .date(observed_at)
            .build()
    }

    /// Position with every derived representation left unloaded
    pub fn lazy(
        latitude: f64,
        longitude: f64,
        observed_at: DateTime<Utc>,
    ) -> CoordinateResult<Self> {
        PositionBuilder::from_decimal(latitude, longitude)?
            .date(observed_at)
            .policy(LoadPolicy::lazy())
            .build()
    }

    /// Eager position from already-built angle values
    pub fn from_angles(latitude: AngleValue, longitude: AngleValue) -> CoordinateResult<Self> {
        PositionBuilder::new(latitude, longitude).build()
    }

    pub fn builder(latitude: AngleValue, longitude: AngleValue) -> PositionBuilder {
        PositionBuilder::new(latitude, longitude)
    }

    pub fn latitude(&self) -> &AngleValue {
        &self.latitude
    }

    pub fn longitude(&self) -> &AngleValue {
        &self.longitude
    }

    pub fn observed_at(&self) -> DateTime<Utc> {
        self.observed_at
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn policy(&self) -> LoadPolicy {
        self.policy
    }

    pub fn format_rules(&self) -> &FormatRules {
        &self.format_rules
    }

    pub fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }

    pub fn grid(&self) -> &Derived<GridResult> {
        &self.grid
    }

    pub fn mgrs(&self) -> &Derived<String> {
        &self.mgrs
    }

    pub fn earth_centered(&self) -> &Derived<EarthCentered> {
        &self.earth_centered
    }

    pub fn cartesian(&self) -> &Derived<Cartesian> {
        &self.cartesian
    }

    pub fn celestial(&self) -> &Derived<CelestialResult> {
        &self.celestial
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    /// Renders the position with rules other than its own
    pub fn to_string_with(&self, rules: &FormatRules) -> String {
        render_pair(&self.latitude, &self.longitude, rules)
    }

    /// Replaces the latitude
    ///
    /// A longitude value is rejected with [`CoordinateError::TypeMismatch`] and
    /// the current latitude is kept.
    pub fn set_latitude(&mut self, latitude: AngleValue) -> CoordinateResult<Changes> {
        check_axis(Axis::Latitude, &latitude)?;
        let mut changes = Changes::none();
        changes.latitude = self.commit_latitude(latitude);
        Ok(self.finish(changes))
    }

    /// Replaces the longitude
    pub fn set_longitude(&mut self, longitude: AngleValue) -> CoordinateResult<Changes> {
        check_axis(Axis::Longitude, &longitude)?;
        let mut changes = Changes::none();
        changes.longitude = self.commit_longitude(longitude);
        Ok(self.finish(changes))
    }

    /// Replaces both axes as one mutation
    ///
    /// Both values are checked before either is written.
    pub fn set_coordinates(
        &mut self,
        latitude: AngleValue,
        longitude: AngleValue,
    ) -> CoordinateResult<Changes> {
        check_axis(Axis::Latitude, &latitude)?;
        check_axis(Axis::Longitude, &longitude)?;
        let mut changes = Changes::none();
        changes.latitude = self.commit_latitude(latitude);
        changes.longitude = self.commit_longitude(longitude);
        Ok(self.finish(changes))
    }

    /// Edits the latitude in place
    ///
    /// The closure works on a copy, which is committed only if the closure
    /// returns `Ok`. The fields it reports are merged with the fields that
    /// actually differ afterwards.
    ///
    /// ```
    /// use geocoord::Position;
    ///
    /// let mut position = Position::new(47.5, -122.25).unwrap();
    /// let changes = position.edit_latitude(|lat| lat.set_seconds(12.5)).unwrap();
    /// assert!(changes.contains(geocoord::Property::Latitude));
    /// assert_eq!(position.latitude().seconds(), 12.5);
    /// ```
    pub fn edit_latitude<F>(&mut self, edit: F) -> CoordinateResult<Changes>
    where
        F: FnOnce(&mut AngleValue) -> CoordinateResult<AngleChanges>,
    {
        let mut copy = self.latitude;
        let reported = edit(&mut copy)?;
        let mut changes = Changes::none();
        changes.latitude = self.commit_latitude(copy);
        if !changes.latitude.is_empty() {
            changes.latitude.extend(reported);
        }
        Ok(self.finish(changes))
    }

    /// Edits the longitude in place, see [`Position::edit_latitude`]
    pub fn edit_longitude<F>(&mut self, edit: F) -> CoordinateResult<Changes>
    where
        F: FnOnce(&mut AngleValue) -> CoordinateResult<AngleChanges>,
    {
        let mut copy = self.longitude;
        let reported = edit(&mut copy)?;
        let mut changes = Changes::none();
        changes.longitude = self.commit_longitude(copy);
        if !changes.longitude.is_empty() {
            changes.longitude.extend(reported);
        }
        Ok(self.finish(changes))
    }

    pub fn set_observed_at(&mut self, observed_at: DateTime<Utc>) -> Changes {
        if observed_at == self.observed_at {
            return Changes::none();
        }
        self.observed_at = observed_at;
        self.finish(changed(Property::ObservedAt))
    }

    /// Sets the height above the ellipsoid (meters)
    pub fn set_height(&mut self, height: f64) -> CoordinateResult<Changes> {
        check_finite("height", height)?;
        if height.to_bits() == self.height.to_bits() {
            return Ok(Changes::none());
        }
        self.height = height;
        Ok(self.finish(changed(Property::Height)))
    }

    pub fn set_ellipsoid(&mut self, ellipsoid: Ellipsoid) -> CoordinateResult<Changes> {
        check_ellipsoid(&ellipsoid)?;
        if ellipsoid == self.ellipsoid {
            return Ok(Changes::none());
        }
        self.ellipsoid = ellipsoid;
        Ok(self.finish(changed(Property::Ellipsoid)))
    }

    /// Rebases the grid representation onto another datum
    ///
    /// Fails with [`CoordinateError::PrecursorNotLoaded`] unless the grid has
    /// been computed at least once, even if a later edit unloaded it again. Grid and MGRS are always recomputed; a loaded
    /// earth-centered value follows the new ellipsoid too.
    pub fn set_datum(
        &mut self,
        equatorial_radius: f64,
        inverse_flattening: f64,
    ) -> CoordinateResult<Changes> {
        if !self.grid_baseline {
            return Err(CoordinateError::PrecursorNotLoaded {
                operation: "set_datum".to_string(),
                representation: "grid".to_string(),
            });
        }
        let ellipsoid = Ellipsoid::new(equatorial_radius, inverse_flattening);
        check_ellipsoid(&ellipsoid)?;

        let mut changes = Changes::none();
        if ellipsoid != self.ellipsoid {
            self.ellipsoid = ellipsoid;
            changes.properties.insert(Property::Ellipsoid);
            if !self.earth_centered.is_unloaded() {
                self.compute_earth_centered(&mut changes);
            }
        }
        self.compute_grid(&mut changes);
        Ok(self.notify(changes))
    }

    /// Replaces the rendering rules
    pub fn set_format_rules(&mut self, rules: FormatRules) -> CoordinateResult<Changes> {
        check_rounding(rules.rounding)?;
        if rules == self.format_rules {
            return Ok(Changes::none());
        }
        self.format_rules = rules;
        let mut changes = changed(Property::FormatRules);
        changes.properties.insert(Property::Display);
        Ok(self.notify(changes))
    }

    /// Replaces the load policy
    ///
    /// Nothing is computed here; newly enabled representations fill in on the
    /// next relevant change or explicit load.
    pub fn set_policy(&mut self, policy: LoadPolicy) {
        self.policy = policy;
    }

    /// Computes the grid and MGRS representations now
    pub fn load_grid(&mut self) -> Changes {
        let mut changes = Changes::none();
        self.compute_grid(&mut changes);
        self.notify(changes)
    }

    pub fn load_earth_centered(&mut self) -> Changes {
        let mut changes = Changes::none();
        self.compute_earth_centered(&mut changes);
        self.notify(changes)
    }

    pub fn load_cartesian(&mut self) -> Changes {
        let mut changes = Changes::none();
        self.compute_cartesian(&mut changes);
        self.notify(changes)
    }

    pub fn load_celestial(&mut self) -> Changes {
        let mut changes = Changes::none();
        self.compute_celestial(&mut changes);
        self.notify(changes)
    }

    /// Computes every derived representation now, regardless of policy
    pub fn load_all(&mut self) -> Changes {
        let mut changes = Changes::none();
        self.compute_grid(&mut changes);
        self.compute_earth_centered(&mut changes);
        self.compute_cartesian(&mut changes);
        self.compute_celestial(&mut changes);
        self.notify(changes)
    }

    /// Registers a listener for every non-empty change batch
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionHandle
    where
        F: FnMut(&Changes) + Send + 'static,
    {
        let listener: ChangeListener = Box::new(listener);
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, handle: SubscriptionHandle) -> bool {
        self.listeners.unsubscribe(handle)
    }

    fn commit_latitude(&mut self, latitude: AngleValue) -> AngleChanges {
        let moved = changed_fields(&self.latitude, &latitude);
        self.latitude = latitude;
        moved
    }

    fn commit_longitude(&mut self, longitude: AngleValue) -> AngleChanges {
        let moved = changed_fields(&self.longitude, &longitude);
        self.longitude = longitude;
        moved
    }

    /// Propagates committed input changes, then notifies
    fn finish(&mut self, mut changes: Changes) -> Changes {
        if !changes.latitude.is_empty() {
            changes.properties.insert(Property::Latitude);
        }
        if !changes.longitude.is_empty() {
            changes.properties.insert(Property::Longitude);
        }
        if changes.is_empty() {
            return changes;
        }
        self.propagate(&mut changes);
        self.notify(changes)
    }

    fn notify(&mut self, changes: Changes) -> Changes {
        if !changes.is_empty() {
            debug!(properties = ?changes.properties, "position updated");
            self.listeners.notify(&changes);
        }
        changes
    }

    fn propagate(&mut self, changes: &mut Changes) {
        let inputs = changes.properties;
        let moved = inputs.contains(Property::Latitude) || inputs.contains(Property::Longitude);
        let ellipsoid = inputs.contains(Property::Ellipsoid);

        if moved {
            changes.properties.insert(Property::Display);
        }

        if moved || ellipsoid {
            if self.policy.grid {
                self.compute_grid(changes);
            } else {
                unload(&mut self.grid, Property::Grid, changes);
                unload(&mut self.mgrs, Property::Mgrs, changes);
            }
        }

        if moved || ellipsoid || inputs.contains(Property::Height) {
            if self.policy.earth_centered {
                self.compute_earth_centered(changes);
            } else {
                unload(&mut self.earth_centered, Property::EarthCentered, changes);
            }
        }

        if moved {
            if self.policy.cartesian {
                self.compute_cartesian(changes);
            } else {
                unload(&mut self.cartesian, Property::Cartesian, changes);
            }
        }

        if moved || inputs.contains(Property::ObservedAt) {
            if self.policy.celestial {
                self.compute_celestial(changes);
            } else {
                unload(&mut self.celestial, Property::Celestial, changes);
            }
        }
    }

    fn compute_grid(&mut self, changes: &mut Changes) {
        let latitude = self.latitude.decimal_degree();
        let longitude = self.longitude.decimal_degree();
        match self.services.grid.project(latitude, longitude, &self.ellipsoid) {
            Ok(grid) => {
                self.mgrs = Derived::from_result(self.services.mgrs.encode(&grid));
                self.grid = Derived::Loaded(grid);
            }
            Err(err) => {
                warn!(latitude, longitude, error = %err, "grid projection rejected position");
                self.grid = Derived::Invalid(err.to_string());
                self.mgrs = Derived::Invalid(err.to_string());
            }
        }
        self.grid_baseline = true;
        changes.properties.insert(Property::Grid);
        changes.properties.insert(Property::Mgrs);
    }

    fn compute_earth_centered(&mut self, changes: &mut Changes) {
        let ecef = self.services.earth_centered.to_ecef(
            self.latitude.decimal_degree(),
            self.longitude.decimal_degree(),
            self.height,
            &self.ellipsoid,
        );
        self.earth_centered = Derived::Loaded(ecef);
        changes.properties.insert(Property::EarthCentered);
    }

    fn compute_cartesian(&mut self, changes: &mut Changes) {
        self.cartesian = Derived::Loaded(Cartesian::from_degrees(
            self.latitude.decimal_degree(),
            self.longitude.decimal_degree(),
        ));
        changes.properties.insert(Property::Cartesian);
    }

    fn compute_celestial(&mut self, changes: &mut Changes) {
        let result = self.services.celestial.compute(
            self.latitude.decimal_degree(),
            self.longitude.decimal_degree(),
            self.observed_at,
        );
        self.celestial = Derived::Loaded(result);
        changes.properties.insert(Property::Celestial);
    }
}

impl Clone for Position {
    /// Copies the value and its derived state; listeners are not carried over
    fn clone(&self) -> Self {
        Self {
            latitude: self.latitude,
            longitude: self.longitude,
            observed_at: self.observed_at,
            height: self.height,
            policy: self.policy,
            format_rules: self.format_rules,
            ellipsoid: self.ellipsoid,
            grid: self.grid.clone(),
            mgrs: self.mgrs.clone(),
            earth_centered: self.earth_centered.clone(),
            cartesian: self.cartesian.clone(),
            celestial: self.celestial.clone(),
            grid_baseline: self.grid_baseline,
            services: self.services.clone(),
            listeners: ListenerRegistry::new(),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_pair(&self.latitude, &self.longitude, &self.format_rules))
    }
}

impl FromStr for Position {
    type Err = CoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (latitude, longitude) = parse(s)?;
        Position::from_angles(latitude, longitude)
    }
}

/// Step-by-step construction of a [`Position`]
#[derive(Debug, Clone)]
pub struct PositionBuilder {
    latitude: AngleValue,
    longitude: AngleValue,
    observed_at: Option<DateTime<Utc>>,
    height: f64,
    policy: LoadPolicy,
    format_rules: FormatRules,
    ellipsoid: Ellipsoid,
    services: Services,
}

impl PositionBuilder {
    pub fn new(latitude: AngleValue, longitude: AngleValue) -> Self {
        Self {
            latitude,
            longitude,
            observed_at: None,
            height: 0.0,
            policy: LoadPolicy::eager(),
            format_rules: FormatRules::default(),
            ellipsoid: Ellipsoid::wgs84(),
            services: Services::default(),
        }
    }

    /// Builder over signed decimal degrees
    pub fn from_decimal(latitude: f64, longitude: f64) -> CoordinateResult<Self> {
        Ok(Self::new(
            AngleValue::from_decimal(latitude, Axis::Latitude)?,
            AngleValue::from_decimal(longitude, Axis::Longitude)?,
        ))
    }

    /// Observation instant; defaults to the time of `build`
    pub fn date(mut self, observed_at: DateTime<Utc>) -> Self {
        self.observed_at = Some(observed_at);
        self
    }

    pub fn policy(mut self, policy: LoadPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn format_rules(mut self, rules: FormatRules) -> Self {
        self.format_rules = rules;
        self
    }

    pub fn ellipsoid(mut self, ellipsoid: Ellipsoid) -> Self {
        self.ellipsoid = ellipsoid;
        self
    }

    pub fn height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    pub fn services(mut self, services: Services) -> Self {
        self.services = services;
        self
    }

    /// Takes rules, policy and ellipsoid from a loaded configuration
    pub fn config(mut self, config: &CoordinateConfig) -> Self {
        self.format_rules = config.format_rules;
        self.policy = config.load_policy;
        self.ellipsoid = config.ellipsoid;
        self
    }

    /// Validates the inputs and performs the initial load
    pub fn build(self) -> CoordinateResult<Position> {
        check_axis(Axis::Latitude, &self.latitude)?;
        check_axis(Axis::Longitude, &self.longitude)?;
        check_ellipsoid(&self.ellipsoid)?;
        check_rounding(self.format_rules.rounding)?;
        check_finite("height", self.height)?;

        let mut position = Position {
            latitude: self.latitude,
            longitude: self.longitude,
            observed_at: self.observed_at.unwrap_or_else(Utc::now),
            height: self.height,
            policy: self.policy,
            format_rules: self.format_rules,
            ellipsoid: self.ellipsoid,
            grid: Derived::Unloaded,
            mgrs: Derived::Unloaded,
            earth_centered: Derived::Unloaded,
            cartesian: Derived::Unloaded,
            celestial: Derived::Unloaded,
            grid_baseline: false,
            services: self.services,
            listeners: ListenerRegistry::new(),
        };

        let mut loaded = Changes::none();
        if position.policy.grid {
            position.compute_grid(&mut loaded);
        }
        if position.policy.earth_centered {
            position.compute_earth_centered(&mut loaded);
        }
        if position.policy.cartesian {
            position.compute_cartesian(&mut loaded);
        }
        if position.policy.celestial {
            position.compute_celestial(&mut loaded);
        }
        debug!(
            latitude = position.latitude.decimal_degree(),
            longitude = position.longitude.decimal_degree(),
            loaded = ?loaded.properties,
            "position created"
        );
        Ok(position)
    }
}

fn check_axis(expected: Axis, angle: &AngleValue) -> CoordinateResult<()> {
    if angle.axis() != expected {
        return Err(CoordinateError::TypeMismatch {
            expected,
            found: angle.axis(),
        });
    }
    Ok(())
}

fn changed(property: Property) -> Changes {
    let mut changes = Changes::none();
    changes.properties.insert(property);
    changes
}

/// Fields that differ bit-for-bit between two values of one axis
fn changed_fields(old: &AngleValue, new: &AngleValue) -> AngleChanges {
    let mut moved = AngleChanges::empty();
    if old.decimal_degree().to_bits() != new.decimal_degree().to_bits() {
        moved.insert(AngleField::DecimalDegree);
    }
    if old.decimal_minute().to_bits() != new.decimal_minute().to_bits() {
        moved.insert(AngleField::DecimalMinute);
    }
    if old.degrees() != new.degrees() {
        moved.insert(AngleField::Degrees);
    }
    if old.minutes() != new.minutes() {
        moved.insert(AngleField::Minutes);
    }
    if old.seconds().to_bits() != new.seconds().to_bits() {
        moved.insert(AngleField::Seconds);
    }
    if old.hemisphere() != new.hemisphere() {
        moved.insert(AngleField::Hemisphere);
    }
    moved
}

/// Drops a loaded slot whose inputs moved while it was inactive
fn unload<T>(slot: &mut Derived<T>, property: Property, changes: &mut Changes) {
    if !slot.is_unloaded() {
        *slot = Derived::Unloaded;
        changes.properties.insert(property);
    }
}
