//! Up-front validation of a [`Config`] before any scene node is created.

use std::collections::HashSet;

use crate::config::{Config, PlanetSpec};
use crate::error::ConfigError;

fn finite(field: impl Into<String>, value: f32) -> Result<f32, ConfigError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::NonFinite {
            field: field.into(),
            value,
        })
    }
}

fn positive(field: impl Into<String>, value: f32) -> Result<(), ConfigError> {
    let field = field.into();
    if finite(field.clone(), value)? > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn validate_planet(index: usize, planet: &PlanetSpec) -> Result<(), ConfigError> {
    if planet.id.is_empty() {
        return Err(ConfigError::EmptyPlanetId(index));
    }
    let prefix = format!("planets[{}]", planet.id);
    positive(format!("{prefix}.size"), planet.size)?;
    positive(format!("{prefix}.orbit_radius"), planet.orbit_radius)?;
    finite(format!("{prefix}.angular_speed"), planet.angular_speed)?;
    finite(format!("{prefix}.spin_speed"), planet.spin_speed)?;
    Ok(())
}

impl Config {
    /// Check every constraint the scene builder relies on.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule: duplicate or empty planet ids,
    /// non-positive sizes or radii, non-finite numbers, or an empty starfield shell.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sun = &self.solar_system.sun;
        positive("sun.size", sun.size)?;
        if let Some(arcs) = &sun.arcs {
            positive("sun.arcs.radius", arcs.radius)?;
            finite("sun.arcs.height", arcs.height)?;
            finite("sun.arcs.angle", arcs.angle)?;
            finite("sun.arcs.opacity", arcs.opacity)?;
        }
        if let Some(flares) = &sun.flares {
            finite("sun.flares.size", flares.size)?;
            finite("sun.flares.opacity", flares.opacity)?;
        }

        let mut seen = HashSet::new();
        for (index, planet) in self.solar_system.planets.iter().enumerate() {
            validate_planet(index, planet)?;
            if !seen.insert(planet.id.as_str()) {
                return Err(ConfigError::DuplicatePlanetId(planet.id.clone()));
            }
        }

        let range = self.starfield.distance;
        finite("starfield.distance.min", range.min)?;
        finite("starfield.distance.max", range.max)?;
        if range.min <= 0.0 || range.min >= range.max {
            return Err(ConfigError::InvalidDistanceRange {
                min: range.min,
                max: range.max,
            });
        }

        positive(
            "animation.reference_tick_rate",
            self.animation.reference_tick_rate,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DistanceRange;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_duplicate_planet_id_rejected() {
        let mut config = Config::default();
        config.solar_system.planets = vec![
            PlanetSpec::new("planet1", 1, "A", 1.0, 5.0, 0.01),
            PlanetSpec::new("planet1", 2, "B", 1.0, 8.0, 0.01),
        ];
        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::DuplicatePlanetId(ref id) if id == "planet1"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn test_empty_planet_id_rejected() {
        let mut config = Config::default();
        config.solar_system.planets = vec![PlanetSpec::new("", 1, "A", 1.0, 5.0, 0.01)];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyPlanetId(0))
        ));
    }

    #[test]
    fn test_non_positive_sizes_rejected() {
        let mut config = Config::default();
        config.solar_system.planets[1].size = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive { ref field, .. }) if field == "planets[planet2].size"
        ));

        let mut config = Config::default();
        config.solar_system.planets[0].orbit_radius = -3.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive { .. })
        ));

        let mut config = Config::default();
        config.solar_system.sun.size = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive { ref field, .. }) if field == "sun.size"
        ));
    }

    #[test]
    fn test_nan_rejected() {
        let mut config = Config::default();
        config.solar_system.planets[0].angular_speed = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonFinite { .. })
        ));
    }

    #[test]
    fn test_distance_range_must_be_ordered() {
        let mut config = Config::default();
        config.starfield.distance = DistanceRange {
            min: 150.0,
            max: 40.0,
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDistanceRange { .. })
        ));

        config.starfield.distance = DistanceRange {
            min: 50.0,
            max: 50.0,
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDistanceRange { .. })
        ));

        config.starfield.distance = DistanceRange {
            min: 0.0,
            max: 50.0,
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDistanceRange { .. })
        ));
    }

    #[test]
    fn test_zero_arcs_and_zero_stars_are_valid() {
        let mut config = Config::default();
        config.starfield.amount = 0;
        if let Some(arcs) = config.solar_system.sun.arcs.as_mut() {
            arcs.amount = 0;
        }
        assert!(config.validate().is_ok());
    }
}
