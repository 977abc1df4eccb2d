use meadow_common::Color;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Keys of the tunable scene properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SceneProperty {
    FogColor,
    VolumetricLight1,
    VolumetricLight2,
    VolumetricLight3,
    FogDensity,
    BlueWindowColor,
}

impl SceneProperty {
    pub const ALL: [SceneProperty; 6] = [
        Self::FogColor,
        Self::VolumetricLight1,
        Self::VolumetricLight2,
        Self::VolumetricLight3,
        Self::FogDensity,
        Self::BlueWindowColor,
    ];

    /// The label shown next to the control.
    pub fn name(&self) -> &'static str {
        match self {
            Self::FogColor => "fogColor",
            Self::VolumetricLight1 => "volumetricLight1",
            Self::VolumetricLight2 => "volumetricLight2",
            Self::VolumetricLight3 => "volumetricLight3",
            Self::FogDensity => "fogDensity",
            Self::BlueWindowColor => "blueWindowColor",
        }
    }
}

impl fmt::Display for SceneProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Boxed value of a property.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyValue {
    Number(f64),
    Color(Color),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PropertyError {
    #[error("property {property} expects a {expected}, got {got:?}")]
    TypeMismatch {
        property: SceneProperty,
        expected: &'static str,
        got: PropertyValue,
    },
}

/// The tunables exposed through the debug panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SceneProperties {
    pub fog_color: Color,
    pub volumetric_light1: Color,
    pub volumetric_light2: Color,
    pub volumetric_light3: Color,
    pub fog_density: f64,
    pub blue_window_color: Color,
}

impl Default for SceneProperties {
    fn default() -> Self {
        Self {
            fog_color: Color::from_hex(0x2d2d2d),
            volumetric_light1: Color::from_hex(0xf7f7ff),
            volumetric_light2: Color::from_hex(0xf7f7ff),
            volumetric_light3: Color::from_hex(0xf7f7ff),
            fog_density: 0.0007,
            blue_window_color: Color::from_hex(0x6593aa),
        }
    }
}

impl SceneProperties {
    pub fn get(&self, key: SceneProperty) -> PropertyValue {
        match key {
            SceneProperty::FogColor => PropertyValue::Color(self.fog_color),
            SceneProperty::VolumetricLight1 => PropertyValue::Color(self.volumetric_light1),
            SceneProperty::VolumetricLight2 => PropertyValue::Color(self.volumetric_light2),
            SceneProperty::VolumetricLight3 => PropertyValue::Color(self.volumetric_light3),
            SceneProperty::FogDensity => PropertyValue::Number(self.fog_density),
            SceneProperty::BlueWindowColor => PropertyValue::Color(self.blue_window_color),
        }
    }

    pub fn set(&mut self, key: SceneProperty, value: PropertyValue) -> Result<(), PropertyError> {
        match (key, value) {
            (SceneProperty::FogDensity, PropertyValue::Number(v)) => self.fog_density = v,
            (SceneProperty::FogDensity, got) => {
                return Err(PropertyError::TypeMismatch {
                    property: key,
                    expected: "number",
                    got,
                });
            }
            (_, PropertyValue::Color(c)) => *self.color_slot(key) = c,
            (_, got) => {
                return Err(PropertyError::TypeMismatch {
                    property: key,
                    expected: "colour",
                    got,
                });
            }
        }
        Ok(())
    }

    fn color_slot(&mut self, key: SceneProperty) -> &mut Color {
        match key {
            SceneProperty::VolumetricLight1 => &mut self.volumetric_light1,
            SceneProperty::VolumetricLight2 => &mut self.volumetric_light2,
            SceneProperty::VolumetricLight3 => &mut self.volumetric_light3,
            SceneProperty::BlueWindowColor => &mut self.blue_window_color,
            SceneProperty::FogColor | SceneProperty::FogDensity => &mut self.fog_color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let p = SceneProperties::default();
        assert_eq!(p.fog_color.to_hex(), 0x2d2d2d);
        assert_eq!(p.fog_density, 0.0007);
        assert_eq!(p.blue_window_color.to_hex(), 0x6593aa);
    }

    #[test]
    fn get_and_set_by_key() {
        let mut p = SceneProperties::default();
        p.set(SceneProperty::FogDensity, PropertyValue::Number(0.005))
            .unwrap();
        assert_eq!(p.get(SceneProperty::FogDensity), PropertyValue::Number(0.005));

        let red = Color::from_hex(0xff0000);
        p.set(SceneProperty::VolumetricLight2, PropertyValue::Color(red))
            .unwrap();
        assert_eq!(p.volumetric_light2, red);
        assert_eq!(p.volumetric_light1.to_hex(), 0xf7f7ff);
    }

    #[test]
    fn type_mismatch_is_rejected() {
        let mut p = SceneProperties::default();
        let err = p
            .set(SceneProperty::FogColor, PropertyValue::Number(1.0))
            .unwrap_err();
        assert!(err.to_string().contains("fogColor"));
        assert!(
            p.set(SceneProperty::FogDensity, PropertyValue::Color(Color::WHITE))
                .is_err()
        );
        assert_eq!(p, SceneProperties::default());
    }

    #[test]
    fn every_key_has_a_distinct_name() {
        let mut names: Vec<_> = SceneProperty::ALL.iter().map(|k| k.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), SceneProperty::ALL.len());
    }
}
