use meadow_common::Color;
use std::collections::BTreeMap;

/// Elapsed-time uniform, advanced once per frame.
pub const U_TIME: &str = "uTime";

/// A value passed to GPU materials.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Float(f64),
    Int(i32),
    Color(Color),
}

/// Named shader uniforms shared by every material that reads them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Uniforms {
    values: BTreeMap<String, UniformValue>,
}

impl Uniforms {
    pub fn new() -> Self {
        Self::default()
    }

    /// The uniform set the grass materials expect, with `uTime` at zero.
    pub fn with_defaults(blue_window_color: Color) -> Self {
        let mut u = Self::new();
        u.set(U_TIME, UniformValue::Float(0.0));
        u.set("color", UniformValue::Color(Color::from_hex(0x0000ff)));
        u.set("blueWindowColor", UniformValue::Color(blue_window_color));
        u.set("useDotPattern", UniformValue::Int(1));
        u.set("rows", UniformValue::Float(220.0));
        u.set("cols", UniformValue::Float(220.0));
        u.set("radius", UniformValue::Float(0.001184));
        u.set("windowEmissionIntensity", UniformValue::Float(0.6));
        u.set("concreteRoughness", UniformValue::Float(1.48));
        u.set("blimpRoughness", UniformValue::Float(1.15));
        u.set("metalRoughness", UniformValue::Float(100.0));
        u
    }

    pub fn get(&self, name: &str) -> Option<&UniformValue> {
        self.values.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: UniformValue) {
        self.values.insert(name.into(), value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &UniformValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Current `uTime`, zero when unset or not a float.
    pub fn time(&self) -> f64 {
        match self.values.get(U_TIME) {
            Some(UniformValue::Float(t)) => *t,
            _ => 0.0,
        }
    }

    /// Add `dt` seconds to `uTime` and return the new value.
    ///
    /// Negative or non-finite deltas are dropped so `uTime` never decreases.
    pub fn advance_time(&mut self, dt: f64) -> f64 {
        let now = self.time();
        if !(dt.is_finite() && dt >= 0.0) {
            tracing::warn!(dt, "ignoring invalid frame delta");
            return now;
        }
        let next = now + dt;
        self.set(U_TIME, UniformValue::Float(next));
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_material_expectations() {
        let u = Uniforms::with_defaults(Color::from_hex(0x6593aa));
        assert_eq!(u.len(), 11);
        assert_eq!(u.time(), 0.0);
        assert_eq!(u.get("useDotPattern"), Some(&UniformValue::Int(1)));
        assert_eq!(u.get("rows"), Some(&UniformValue::Float(220.0)));
        match u.get("blueWindowColor") {
            Some(UniformValue::Color(c)) => assert_eq!(c.to_hex(), 0x6593aa),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn time_accumulates_deltas() {
        let mut u = Uniforms::with_defaults(Color::WHITE);
        let deltas = [0.016, 0.017, 0.0, 0.033];
        let mut expected = 0.0;
        for dt in deltas {
            expected += dt;
            assert_eq!(u.advance_time(dt), expected);
        }
        assert_eq!(u.time(), expected);
    }

    #[test]
    fn time_never_decreases() {
        let mut u = Uniforms::new();
        u.advance_time(1.0);
        u.advance_time(-0.5);
        u.advance_time(f64::NAN);
        u.advance_time(f64::INFINITY);
        assert_eq!(u.time(), 1.0);
    }
}
