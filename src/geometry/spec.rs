use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{ConfigError, SpecError};

/// Default tap length in micrometers.
pub const DEFAULT_TAP_LENGTH: f64 = 10.0;

/// Winding topology of the generated inductor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InductorKind {
    /// Single continuous spiral with an under-pass feed.
    Spiral,
    /// Hexagonal spiral. Not implemented.
    Hexagon,
    /// Octagonal spiral. Not implemented.
    Octagon,
    /// Differential spiral with layer-hopping crossovers.
    #[serde(alias = "symmetry")]
    Symmetric,
}

impl InductorKind {
    /// All selectable kinds, implemented or not.
    pub const ALL: [Self; 4] = [Self::Spiral, Self::Hexagon, Self::Octagon, Self::Symmetric];

    /// Returns the lowercase name used on the command line and in job files.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Spiral => "spiral",
            Self::Hexagon => "hexagon",
            Self::Octagon => "octagon",
            Self::Symmetric => "symmetric",
        }
    }
}

impl fmt::Display for InductorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InductorKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "spiral" => Ok(Self::Spiral),
            "hexagon" => Ok(Self::Hexagon),
            "octagon" => Ok(Self::Octagon),
            "symmetric" | "symmetry" => Ok(Self::Symmetric),
            _ => Err(ConfigError::UnknownKind(s.to_owned())),
        }
    }
}

/// Primary inductor parameters. All lengths are in micrometers.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InductorSpec {
    /// Inner radius `R`.
    pub inner_radius: f64,
    /// Wire-to-wire spacing `S`.
    pub spacing: f64,
    /// Wire width `W`.
    pub width: f64,
    /// Number of turns `N`.
    pub turns: u32,
    /// Conductor thickness `T`.
    pub thickness: f64,
    /// Spacing between the outermost turn and the guard ring.
    pub guard_spacing: f64,
    /// Guard ring wire width.
    pub guard_width: f64,
    /// Tap length override. Zero selects the guard spacing.
    #[serde(default)]
    pub tap_length: Option<f64>,
}

impl InductorSpec {
    /// Creates a spec with the default tap length.
    #[must_use]
    pub fn new(
        inner_radius: f64,
        spacing: f64,
        width: f64,
        turns: u32,
        thickness: f64,
        guard_spacing: f64,
        guard_width: f64,
    ) -> Self {
        Self {
            inner_radius,
            spacing,
            width,
            turns,
            thickness,
            guard_spacing,
            guard_width,
            tap_length: None,
        }
    }

    /// Checks that every length is finite and positive, that there is at
    /// least one turn and that a given tap length is not negative.
    ///
    /// # Errors
    ///
    /// Returns the first [`SpecError`] found, in declaration order.
    pub fn validate(&self) -> Result<(), SpecError> {
        for (parameter, value) in self.lengths() {
            if !value.is_finite() {
                return Err(SpecError::NotFinite { parameter });
            }
            if value <= 0.0 {
                return Err(SpecError::NonPositive { parameter, value });
            }
        }
        if self.turns < 1 {
            return Err(SpecError::TurnCount(self.turns));
        }
        if let Some(tap) = self.tap_length {
            if !tap.is_finite() {
                return Err(SpecError::NotFinite {
                    parameter: "tap_length",
                });
            }
            if tap < 0.0 {
                return Err(SpecError::Negative {
                    parameter: "tap_length",
                    value: tap,
                });
            }
        }
        Ok(())
    }

    fn lengths(&self) -> [(&'static str, f64); 6] {
        [
            ("inner_radius", self.inner_radius),
            ("spacing", self.spacing),
            ("width", self.width),
            ("thickness", self.thickness),
            ("guard_spacing", self.guard_spacing),
            ("guard_width", self.guard_width),
        ]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn demo() -> InductorSpec {
        InductorSpec::new(20.0, 2.0, 2.0, 4, 0.854, 20.0, 2.0)
    }

    #[test]
    fn demo_spec_is_valid() {
        assert!(demo().validate().is_ok());
    }

    #[test]
    fn zero_spacing_is_rejected() {
        let spec = InductorSpec {
            spacing: 0.0,
            ..demo()
        };
        assert_eq!(
            spec.validate(),
            Err(SpecError::NonPositive {
                parameter: "spacing",
                value: 0.0
            })
        );
    }

    #[test]
    fn zero_turns_are_rejected() {
        let spec = InductorSpec { turns: 0, ..demo() };
        assert_eq!(spec.validate(), Err(SpecError::TurnCount(0)));
    }

    #[test]
    fn nan_width_is_rejected() {
        let spec = InductorSpec {
            width: f64::NAN,
            ..demo()
        };
        assert_eq!(
            spec.validate(),
            Err(SpecError::NotFinite { parameter: "width" })
        );
    }

    #[test]
    fn negative_guard_width_is_rejected() {
        let spec = InductorSpec {
            guard_width: -1.0,
            ..demo()
        };
        assert!(matches!(
            spec.validate(),
            Err(SpecError::NonPositive {
                parameter: "guard_width",
                ..
            })
        ));
    }

    #[test]
    fn tap_length_may_be_zero_but_not_negative() {
        let zero = InductorSpec {
            tap_length: Some(0.0),
            ..demo()
        };
        assert_eq!(zero.validate(), Ok(()));

        let negative = InductorSpec {
            tap_length: Some(-1.5),
            ..demo()
        };
        let err = negative.validate().unwrap_err();
        assert_eq!(
            err,
            SpecError::Negative {
                parameter: "tap_length",
                value: -1.5
            }
        );
        assert_eq!(
            err.to_string(),
            "invalid spec: tap_length = -1.5 must not be negative"
        );
    }

    #[test]
    fn kind_parses_symmetry_alias() {
        assert_eq!(
            "symmetry".parse::<InductorKind>().unwrap(),
            InductorKind::Symmetric
        );
        assert_eq!("Spiral".parse::<InductorKind>().unwrap(), InductorKind::Spiral);
        assert!("square".parse::<InductorKind>().is_err());
    }

    #[test]
    fn kind_names_round_trip() {
        for kind in InductorKind::ALL {
            assert_eq!(kind.name().parse::<InductorKind>().unwrap(), kind);
        }
    }

    #[test]
    fn spec_deserializes_from_toml() {
        let spec: InductorSpec = toml::from_str(
            r"
            inner_radius = 20.0
            spacing = 2.0
            width = 2.0
            turns = 4
            thickness = 0.854
            guard_spacing = 20.0
            guard_width = 2.0
            ",
        )
        .unwrap();
        assert_eq!(spec, demo());
    }
}
