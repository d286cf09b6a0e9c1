//! Explanation levels and the fixed five-slot container keyed by them.
//!
//! Every leveled field in the content model holds exactly one value per
//! level. `Levels<T>` stores those values in an array, so a missing or extra
//! level cannot be represented once content is loaded.

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::ops::Index;

use serde::de::{Error as _, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Audience tier of an explanation, from 1 (child) to 5 (physician)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Level {
    /// Children ages 5-12
    Child = 1,

    /// General adult patients and caregivers
    Patient = 2,

    /// Nurses and allied health professionals
    Nursing = 3,

    /// Medical and PA students
    MedicalStudent = 4,

    /// Attending physicians and specialists
    Physician = 5,
}

/// Errors from converting untyped input into a [`Level`]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LevelError {
    #[error("level {0} is out of range (expected 1-5)")]
    OutOfRange(i64),

    #[error("unknown level: {0}")]
    Unknown(String),

    #[error("missing content for level {0}")]
    Missing(u8),

    #[error("duplicate content for level {0}")]
    Duplicate(u8),
}

impl Level {
    /// All levels in ascending order
    pub const ALL: [Level; 5] = [
        Level::Child,
        Level::Patient,
        Level::Nursing,
        Level::MedicalStudent,
        Level::Physician,
    ];

    /// Numeric tier (1-5)
    pub fn number(self) -> u8 {
        self as u8
    }

    /// Zero-based slot in a [`Levels`] array
    pub fn index(self) -> usize {
        self as usize - 1
    }

    /// Closest valid level to an arbitrary number.
    ///
    /// Values below 1 map to [`Level::Child`], values above 5 to
    /// [`Level::Physician`].
    pub fn nearest(n: i64) -> Level {
        let clamped = n.clamp(1, 5) as usize;
        Level::ALL[clamped - 1]
    }

    /// Human-readable tier name
    pub fn name(self) -> &'static str {
        match self {
            Level::Child => "Child",
            Level::Patient => "Patient",
            Level::Nursing => "Nursing/Allied Health",
            Level::MedicalStudent => "Medical Student",
            Level::Physician => "Physician",
        }
    }

    /// Short label for badges and compact listings
    pub fn label(self) -> &'static str {
        match self {
            Level::Child => "Kids",
            Level::Patient => "Patient",
            Level::Nursing => "Nursing",
            Level::MedicalStudent => "Med Student",
            Level::Physician => "Physician",
        }
    }

    /// Target audience description
    pub fn audience(self) -> &'static str {
        match self {
            Level::Child => "Children ages 5-12",
            Level::Patient => "General adult patients and caregivers",
            Level::Nursing => "Nurses, PAs, respiratory therapists, allied health professionals",
            Level::MedicalStudent => "Medical students, PA students, advanced learners",
            Level::Physician => "Attending physicians, specialists, researchers",
        }
    }
}

impl TryFrom<u8> for Level {
    type Error = LevelError;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            1..=5 => Ok(Level::ALL[n as usize - 1]),
            _ => Err(LevelError::OutOfRange(n as i64)),
        }
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> u8 {
        level.number()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

impl std::str::FromStr for Level {
    type Err = LevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(n) = s.parse::<i64>() {
            return match n {
                1..=5 => Ok(Level::ALL[n as usize - 1]),
                _ => Err(LevelError::OutOfRange(n)),
            };
        }

        match s.to_lowercase().as_str() {
            "child" | "kids" => Ok(Level::Child),
            "patient" => Ok(Level::Patient),
            "nursing" | "allied" => Ok(Level::Nursing),
            "student" | "medical-student" | "med-student" => Ok(Level::MedicalStudent),
            "physician" | "expert" => Ok(Level::Physician),
            _ => Err(LevelError::Unknown(s.to_string())),
        }
    }
}

/// One value per [`Level`], stored in level order
#[derive(Debug, Clone, PartialEq)]
pub struct Levels<T>([T; 5]);

impl<T> Levels<T> {
    /// Build from values given in level order (1 through 5)
    pub fn new(values: [T; 5]) -> Self {
        Self(values)
    }

    /// Build by computing each level's value
    pub fn from_fn(f: impl FnMut(Level) -> T) -> Self {
        Self(Level::ALL.map(f))
    }

    /// Build from a level-keyed map; every level must be present
    pub fn try_from_map(mut map: BTreeMap<Level, T>) -> Result<Self, LevelError> {
        let mut values = Vec::with_capacity(5);
        for level in Level::ALL {
            let value = map
                .remove(&level)
                .ok_or(LevelError::Missing(level.number()))?;
            values.push(value);
        }

        match values.try_into() {
            Ok(array) => Ok(Self(array)),
            // Five levels were pushed above
            Err(_) => Err(LevelError::Missing(5)),
        }
    }

    /// Value at `level`
    pub fn get(&self, level: Level) -> &T {
        &self.0[level.index()]
    }

    /// Iterate `(level, value)` pairs in ascending level order
    pub fn iter(&self) -> impl Iterator<Item = (Level, &T)> {
        Level::ALL.into_iter().zip(self.0.iter())
    }

    /// Iterate values in ascending level order
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.0.iter()
    }

    /// Transform every value, keeping the level association
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Levels<U> {
        Levels(self.0.each_ref().map(f))
    }
}

impl<T> Index<Level> for Levels<T> {
    type Output = T;

    fn index(&self, level: Level) -> &T {
        self.get(level)
    }
}

impl<T: Serialize> Serialize for Levels<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(5))?;
        for (level, value) in self.iter() {
            map.serialize_entry(&level, value)?;
        }
        map.end()
    }
}

struct LevelsVisitor<T>(PhantomData<T>);

impl<'de, T: Deserialize<'de>> Visitor<'de> for LevelsVisitor<T> {
    type Value = Levels<T>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map with one entry per level 1-5")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = BTreeMap::new();
        while let Some(level) = access.next_key::<Level>()? {
            let value = access.next_value::<T>()?;
            if map.insert(level, value).is_some() {
                return Err(A::Error::custom(LevelError::Duplicate(level.number())));
            }
        }
        Levels::try_from_map(map).map_err(A::Error::custom)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Levels<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(LevelsVisitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_try_from() {
        assert_eq!(Level::try_from(1).unwrap(), Level::Child);
        assert_eq!(Level::try_from(5).unwrap(), Level::Physician);
        assert_eq!(Level::try_from(0), Err(LevelError::OutOfRange(0)));
        assert_eq!(Level::try_from(6), Err(LevelError::OutOfRange(6)));
    }

    #[test]
    fn test_level_nearest_clamps() {
        assert_eq!(Level::nearest(-3), Level::Child);
        assert_eq!(Level::nearest(0), Level::Child);
        assert_eq!(Level::nearest(3), Level::Nursing);
        assert_eq!(Level::nearest(9), Level::Physician);
    }

    #[test]
    fn test_level_from_str() {
        assert_eq!("4".parse::<Level>().unwrap(), Level::MedicalStudent);
        assert_eq!("physician".parse::<Level>().unwrap(), Level::Physician);
        assert_eq!("Kids".parse::<Level>().unwrap(), Level::Child);
        assert!("7".parse::<Level>().is_err());
        assert!("wizard".parse::<Level>().is_err());
    }

    #[test]
    fn test_levels_indexing() {
        let levels = Levels::from_fn(|l| l.number() * 10);
        assert_eq!(levels[Level::Child], 10);
        assert_eq!(*levels.get(Level::Physician), 50);
        assert_eq!(levels.values().copied().sum::<u8>(), 150);
    }

    #[test]
    fn test_levels_deserialize_requires_all_keys() {
        let complete = "1: a\n2: b\n3: c\n4: d\n5: e\n";
        let levels: Levels<String> = serde_yaml::from_str(complete).unwrap();
        assert_eq!(levels[Level::Nursing], "c");

        let missing = "1: a\n2: b\n4: d\n5: e\n";
        let err = serde_yaml::from_str::<Levels<String>>(missing).unwrap_err();
        assert!(err.to_string().contains("missing content for level 3"));

        let extra = "1: a\n2: b\n3: c\n4: d\n5: e\n6: f\n";
        assert!(serde_yaml::from_str::<Levels<String>>(extra).is_err());
    }

    #[test]
    fn test_levels_deserialize_rejects_repeated_keys() {
        let repeated = "1: a\n2: b\n3: c\n4: d\n5: e\n3: z\n";
        let err = serde_yaml::from_str::<Levels<String>>(repeated).unwrap_err();
        assert!(err.to_string().contains("duplicate content for level 3"));

        let json = r#"{"1":"a","2":"b","2":"again","3":"c","4":"d","5":"e"}"#;
        let err = serde_json::from_str::<Levels<String>>(json).unwrap_err();
        assert!(err.to_string().contains("duplicate content for level 2"));
    }

    #[test]
    fn test_levels_json_uses_string_keys() {
        let levels = Levels::new(["a", "b", "c", "d", "e"].map(String::from));
        let json = serde_json::to_value(&levels).unwrap();
        assert_eq!(json["1"], "a");
        assert_eq!(json["5"], "e");

        let back: Levels<String> = serde_json::from_value(json).unwrap();
        assert_eq!(back, levels);
    }
}
