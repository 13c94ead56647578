//! Simulation settings and the validated boundary through which they change.
//!
//! [`Settings`] is a plain value passed by reference into the simulation
//! phases and the renderer. Interactive controls never write its fields
//! directly: they build a [`Setting`] (usually through [`Setting::parse`])
//! and hand it to [`Settings::apply`], which rejects non-finite numbers
//! and clamps everything else into the ranges in [`limits`].

use std::{fmt, fs, ops::RangeInclusive, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// Accepted ranges for every numeric setting.
pub mod limits {
    use std::ops::RangeInclusive;

    pub const PULSE_SPEED: RangeInclusive<f32> = 0.0..=1.0;
    pub const PULSE_AMOUNT: RangeInclusive<f32> = 0.0..=1.0;
    pub const BASE_RADIUS: RangeInclusive<f32> = 0.0..=50.0;
    pub const NUM_POINTS: RangeInclusive<usize> = 0..=2000;
    pub const CONNECTION_DISTANCE: RangeInclusive<f32> = 0.0..=1000.0;
    pub const MAX_CONNECTIONS: RangeInclusive<usize> = 0..=20;
    pub const NEW_POINT_RADIUS: RangeInclusive<f32> = 0.0..=50.0;
    pub const DRAG_FORCE: RangeInclusive<f32> = 0.0..=5.0;
    pub const FLUID_FRICTION: RangeInclusive<f32> = 0.0..=1.0;
    pub const FLUID_RANGE: RangeInclusive<f32> = 0.0..=1000.0;
    pub const REPULSION_FORCE: RangeInclusive<f32> = 0.0..=50.0;
    pub const MAX_SPEED: RangeInclusive<f32> = 0.0..=500.0;
}

/// An sRGB colour, written as `#rrggbb`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const BLACK: Rgb = Rgb([0, 0, 0]);
    pub const RED: Rgb = Rgb([0xff, 0, 0]);
}

impl FromStr for Rgb {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SettingsError::InvalidColor { raw: s.to_owned() };
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let mut rgb = [0u8; 3];
        for (i, c) in rgb.iter_mut().enumerate() {
            *c = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).map_err(|_| invalid())?;
        }
        Ok(Rgb(rgb))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

impl TryFrom<String> for Rgb {
    type Error = SettingsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}

/// Parameters controlling pulsing, linking and drag interaction.
///
/// All lengths are in canvas pixels, all rates are per tick.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub pulse_speed: f32,
    pub pulse_amount: f32,
    pub base_radius: f32,
    pub num_points: usize,
    pub connection_distance: f32,
    pub point_color: Rgb,
    pub connection_color: Rgb,
    pub max_connections: usize,
    pub new_point_radius: f32,
    pub drag_force: f32,
    pub fluid_friction: f32,
    pub fluid_range: f32,
    pub repulsion_force: f32,
    /// Upper bound on the length of any point velocity.
    pub max_speed: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pulse_speed: 0.05,
            pulse_amount: 0.2,
            base_radius: 5.0,
            num_points: 50,
            connection_distance: 100.0,
            point_color: Rgb::BLACK,
            connection_color: Rgb::BLACK,
            max_connections: 3,
            new_point_radius: 5.0,
            drag_force: 0.9,
            fluid_friction: 0.95,
            fluid_range: 200.0,
            repulsion_force: 0.5,
            max_speed: 40.0,
        }
    }
}

/// A single named setting together with its new value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Setting {
    PulseSpeed(f32),
    PulseAmount(f32),
    BaseRadius(f32),
    NumPoints(usize),
    ConnectionDistance(f32),
    PointColor(Rgb),
    ConnectionColor(Rgb),
    MaxConnections(usize),
    NewPointRadius(f32),
    DragForce(f32),
    FluidFriction(f32),
    FluidRange(f32),
    RepulsionForce(f32),
    MaxSpeed(f32),
}

impl Setting {
    /// Every accepted setting name, in panel order.
    pub const NAMES: [&'static str; 14] = [
        "pulse_speed",
        "pulse_amount",
        "base_radius",
        "num_points",
        "connection_distance",
        "point_color",
        "connection_color",
        "max_connections",
        "new_point_radius",
        "drag_force",
        "fluid_friction",
        "fluid_range",
        "repulsion_force",
        "max_speed",
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Setting::PulseSpeed(_) => "pulse_speed",
            Setting::PulseAmount(_) => "pulse_amount",
            Setting::BaseRadius(_) => "base_radius",
            Setting::NumPoints(_) => "num_points",
            Setting::ConnectionDistance(_) => "connection_distance",
            Setting::PointColor(_) => "point_color",
            Setting::ConnectionColor(_) => "connection_color",
            Setting::MaxConnections(_) => "max_connections",
            Setting::NewPointRadius(_) => "new_point_radius",
            Setting::DragForce(_) => "drag_force",
            Setting::FluidFriction(_) => "fluid_friction",
            Setting::FluidRange(_) => "fluid_range",
            Setting::RepulsionForce(_) => "repulsion_force",
            Setting::MaxSpeed(_) => "max_speed",
        }
    }

    /// Parses a raw control value for the setting called `name`.
    ///
    /// Only the textual form is checked here. Range and finiteness checks
    /// happen in [`Settings::apply`].
    ///
    /// ### Parameters
    /// - `name` - One of [`Setting::NAMES`].
    /// - `raw` - The control's string value, e.g. `"0.25"` or `"#ff8800"`.
    ///
    /// ### Returns
    /// The parsed [`Setting`], or [`SettingsError::UnknownSetting`] /
    /// [`SettingsError::Parse`] / [`SettingsError::InvalidColor`].
    pub fn parse(name: &str, raw: &str) -> Result<Self, SettingsError> {
        let setting = match name {
            "pulse_speed" => Setting::PulseSpeed(parse_num("pulse_speed", raw)?),
            "pulse_amount" => Setting::PulseAmount(parse_num("pulse_amount", raw)?),
            "base_radius" => Setting::BaseRadius(parse_num("base_radius", raw)?),
            "num_points" => Setting::NumPoints(parse_num("num_points", raw)?),
            "connection_distance" => {
                Setting::ConnectionDistance(parse_num("connection_distance", raw)?)
            }
            "point_color" => Setting::PointColor(raw.parse()?),
            "connection_color" => Setting::ConnectionColor(raw.parse()?),
            "max_connections" => Setting::MaxConnections(parse_num("max_connections", raw)?),
            "new_point_radius" => Setting::NewPointRadius(parse_num("new_point_radius", raw)?),
            "drag_force" => Setting::DragForce(parse_num("drag_force", raw)?),
            "fluid_friction" => Setting::FluidFriction(parse_num("fluid_friction", raw)?),
            "fluid_range" => Setting::FluidRange(parse_num("fluid_range", raw)?),
            "repulsion_force" => Setting::RepulsionForce(parse_num("repulsion_force", raw)?),
            "max_speed" => Setting::MaxSpeed(parse_num("max_speed", raw)?),
            other => {
                return Err(SettingsError::UnknownSetting {
                    name: other.to_owned(),
                });
            }
        };
        Ok(setting)
    }

    /// Parses a `name=value` pair, as given on the command line.
    pub fn parse_assignment(pair: &str) -> Result<Self, SettingsError> {
        match pair.split_once('=') {
            Some((name, raw)) => Self::parse(name.trim(), raw),
            None => Err(SettingsError::UnknownSetting {
                name: pair.to_owned(),
            }),
        }
    }
}

fn parse_num<T>(name: &'static str, raw: &str) -> Result<T, SettingsError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| SettingsError::Parse {
        name,
        raw: raw.to_owned(),
        reason: e.to_string(),
    })
}

fn clamp_finite(
    name: &'static str,
    value: f32,
    range: RangeInclusive<f32>,
) -> Result<f32, SettingsError> {
    if !value.is_finite() {
        return Err(SettingsError::NonFinite { name, value });
    }
    Ok(value.clamp(*range.start(), *range.end()))
}

fn clamp_count(value: usize, range: RangeInclusive<usize>) -> usize {
    value.clamp(*range.start(), *range.end())
}

impl Settings {
    /// Validates and stores one setting.
    ///
    /// Non-finite numbers are rejected and leave `self` untouched. Finite
    /// numbers and counts are clamped into their [`limits`] range.
    ///
    /// ### Returns
    /// The setting as actually stored (after clamping).
    pub fn apply(&mut self, setting: Setting) -> Result<Setting, SettingsError> {
        let name = setting.name();
        let stored = match setting {
            Setting::PulseSpeed(v) => {
                self.pulse_speed = clamp_finite(name, v, limits::PULSE_SPEED)?;
                Setting::PulseSpeed(self.pulse_speed)
            }
            Setting::PulseAmount(v) => {
                self.pulse_amount = clamp_finite(name, v, limits::PULSE_AMOUNT)?;
                Setting::PulseAmount(self.pulse_amount)
            }
            Setting::BaseRadius(v) => {
                self.base_radius = clamp_finite(name, v, limits::BASE_RADIUS)?;
                Setting::BaseRadius(self.base_radius)
            }
            Setting::NumPoints(n) => {
                self.num_points = clamp_count(n, limits::NUM_POINTS);
                Setting::NumPoints(self.num_points)
            }
            Setting::ConnectionDistance(v) => {
                self.connection_distance = clamp_finite(name, v, limits::CONNECTION_DISTANCE)?;
                Setting::ConnectionDistance(self.connection_distance)
            }
            Setting::PointColor(c) => {
                self.point_color = c;
                setting
            }
            Setting::ConnectionColor(c) => {
                self.connection_color = c;
                setting
            }
            Setting::MaxConnections(n) => {
                self.max_connections = clamp_count(n, limits::MAX_CONNECTIONS);
                Setting::MaxConnections(self.max_connections)
            }
            Setting::NewPointRadius(v) => {
                self.new_point_radius = clamp_finite(name, v, limits::NEW_POINT_RADIUS)?;
                Setting::NewPointRadius(self.new_point_radius)
            }
            Setting::DragForce(v) => {
                self.drag_force = clamp_finite(name, v, limits::DRAG_FORCE)?;
                Setting::DragForce(self.drag_force)
            }
            Setting::FluidFriction(v) => {
                self.fluid_friction = clamp_finite(name, v, limits::FLUID_FRICTION)?;
                Setting::FluidFriction(self.fluid_friction)
            }
            Setting::FluidRange(v) => {
                self.fluid_range = clamp_finite(name, v, limits::FLUID_RANGE)?;
                Setting::FluidRange(self.fluid_range)
            }
            Setting::RepulsionForce(v) => {
                self.repulsion_force = clamp_finite(name, v, limits::REPULSION_FORCE)?;
                Setting::RepulsionForce(self.repulsion_force)
            }
            Setting::MaxSpeed(v) => {
                self.max_speed = clamp_finite(name, v, limits::MAX_SPEED)?;
                Setting::MaxSpeed(self.max_speed)
            }
        };
        Ok(stored)
    }

    /// Returns every field as a [`Setting`], in [`Setting::NAMES`] order.
    pub fn entries(&self) -> [Setting; 14] {
        [
            Setting::PulseSpeed(self.pulse_speed),
            Setting::PulseAmount(self.pulse_amount),
            Setting::BaseRadius(self.base_radius),
            Setting::NumPoints(self.num_points),
            Setting::ConnectionDistance(self.connection_distance),
            Setting::PointColor(self.point_color),
            Setting::ConnectionColor(self.connection_color),
            Setting::MaxConnections(self.max_connections),
            Setting::NewPointRadius(self.new_point_radius),
            Setting::DragForce(self.drag_force),
            Setting::FluidFriction(self.fluid_friction),
            Setting::FluidRange(self.fluid_range),
            Setting::RepulsionForce(self.repulsion_force),
            Setting::MaxSpeed(self.max_speed),
        ]
    }

    /// Runs every field through [`Settings::apply`].
    pub fn validated(self) -> Result<Self, SettingsError> {
        let mut out = Settings::default();
        for entry in self.entries() {
            out.apply(entry)?;
        }
        Ok(out)
    }

    /// Parses a JSON settings document. Missing fields take their defaults.
    pub fn from_json_str(text: &str) -> Result<Self, SettingsError> {
        let raw: Settings = serde_json::from_str(text)?;
        raw.validated()
    }

    /// Reads and validates a JSON settings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_within_limits() {
        let defaults = Settings::default();
        assert_eq!(defaults.validated().unwrap(), defaults);
    }

    #[test]
    fn parse_reads_numbers_and_colours() {
        assert_eq!(
            Setting::parse("pulse_speed", " 0.25").unwrap(),
            Setting::PulseSpeed(0.25)
        );
        assert_eq!(
            Setting::parse("num_points", "120").unwrap(),
            Setting::NumPoints(120)
        );
        assert_eq!(
            Setting::parse("point_color", "#FF8800").unwrap(),
            Setting::PointColor(Rgb([0xff, 0x88, 0x00]))
        );
        assert_eq!(
            Setting::parse_assignment("fluid_range=50").unwrap(),
            Setting::FluidRange(50.0)
        );
    }

    #[test]
    fn parse_rejects_unknown_names_and_garbage() {
        assert!(matches!(
            Setting::parse("gravity", "1"),
            Err(SettingsError::UnknownSetting { .. })
        ));
        assert!(matches!(
            Setting::parse("drag_force", "abc"),
            Err(SettingsError::Parse { name: "drag_force", .. })
        ));
        assert!(matches!(
            Setting::parse("num_points", "-3"),
            Err(SettingsError::Parse { .. })
        ));
        assert!(matches!(
            Setting::parse("point_color", "red"),
            Err(SettingsError::InvalidColor { .. })
        ));
        assert!(Setting::parse_assignment("fluid_range").is_err());
    }

    #[test]
    fn apply_rejects_non_finite_and_keeps_old_value() {
        let mut settings = Settings::default();
        let nan = Setting::parse("fluid_friction", "NaN").unwrap();

        let err = settings.apply(nan).unwrap_err();

        assert!(matches!(err, SettingsError::NonFinite { name: "fluid_friction", .. }));
        assert_eq!(settings.fluid_friction, 0.95);

        let inf = Setting::BaseRadius(f32::INFINITY);
        assert!(settings.apply(inf).is_err());
        assert_eq!(settings.base_radius, 5.0);
    }

    #[test]
    fn apply_clamps_into_range() {
        let mut settings = Settings::default();

        assert_eq!(
            settings.apply(Setting::FluidFriction(1.5)).unwrap(),
            Setting::FluidFriction(1.0)
        );
        assert_eq!(
            settings.apply(Setting::BaseRadius(-4.0)).unwrap(),
            Setting::BaseRadius(0.0)
        );
        assert_eq!(
            settings.apply(Setting::MaxConnections(99)).unwrap(),
            Setting::MaxConnections(20)
        );
        assert_eq!(settings.fluid_friction, 1.0);
        assert_eq!(settings.base_radius, 0.0);
        assert_eq!(settings.max_connections, 20);
    }

    #[test]
    fn json_fills_missing_fields_with_defaults() {
        let settings =
            Settings::from_json_str(r##"{ "num_points": 10, "point_color": "#00ff00" }"##)
                .unwrap();

        assert_eq!(settings.num_points, 10);
        assert_eq!(settings.point_color, Rgb([0, 0xff, 0]));
        assert_eq!(settings.connection_distance, 100.0);
    }

    #[test]
    fn json_values_are_clamped_and_bad_colours_fail() {
        let settings = Settings::from_json_str(r#"{ "fluid_friction": 3.0 }"#).unwrap();
        assert_eq!(settings.fluid_friction, 1.0);

        assert!(matches!(
            Settings::from_json_str(r#"{ "connection_color": "blue" }"#),
            Err(SettingsError::Json(_))
        ));
    }

    #[test]
    fn colour_display_is_lowercase_hex() {
        assert_eq!(Rgb([0xab, 0x01, 0xff]).to_string(), "#ab01ff");
        assert_eq!(String::from(Rgb::RED), "#ff0000");
    }
}
