//! Typed view of the MBTiles `metadata` table.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::SourceError;

/// A lon/lat/zoom triple, e.g. the package's `center` value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position([f64; 3]);

impl Position {
    pub fn lon(&self) -> f64 {
        self.0[0]
    }

    pub fn lat(&self) -> f64 {
        self.0[1]
    }

    pub fn zoom(&self) -> u8 {
        self.0[2] as u8
    }
}

impl FromStr for Position {
    type Err = String;

    // parses a value such as `-0.173,51.3859,10`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = parse_floats(s)?;
        match <[f64; 3]>::try_from(parts) {
            Ok(values) => Ok(Position(values)),
            Err(parts) => Err(format!("expected 3 values, got {}", parts.len())),
        }
    }
}

/// WGS 84 bounding box: left, bottom, right, top.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox([f64; 4]);

impl BBox {
    pub fn left(&self) -> f64 {
        self.0[0]
    }

    pub fn bottom(&self) -> f64 {
        self.0[1]
    }

    pub fn right(&self) -> f64 {
        self.0[2]
    }

    pub fn top(&self) -> f64 {
        self.0[3]
    }
}

impl FromStr for BBox {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = parse_floats(s)?;
        match <[f64; 4]>::try_from(parts) {
            Ok(values) => Ok(BBox(values)),
            Err(parts) => Err(format!("expected 4 values, got {}", parts.len())),
        }
    }
}

fn parse_floats(value: &str) -> Result<Vec<f64>, String> {
    value
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .map_err(|e| format!("{e}: {part:?}"))
        })
        .collect()
}

/// Package identity and coverage, folded from the `metadata` table.
///
/// Well-known keys get typed fields; anything else lands in `extra`.
#[derive(Debug, Clone, Default)]
pub struct Metadata {
    pub name: String,
    pub format: String,
    pub bounds: Option<BBox>,
    pub center: Option<Position>,
    pub minzoom: Option<u8>,
    pub maxzoom: Option<u8>,
    pub json: Option<String>,
    pub extra: HashMap<String, String>,
}

impl Metadata {
    pub(crate) fn from_pairs(pairs: Vec<(String, String)>) -> Result<Self, SourceError> {
        let mut meta = Metadata::default();

        for (key, value) in pairs {
            match key.as_str() {
                "name" => meta.name = value,
                "format" => meta.format = value,
                "bounds" => meta.bounds = Some(parse_field("bounds", &value)?),
                "center" => meta.center = Some(parse_field("center", &value)?),
                "minzoom" => meta.minzoom = Some(parse_field("minzoom", &value)?),
                "maxzoom" => meta.maxzoom = Some(parse_field("maxzoom", &value)?),
                "json" => meta.json = Some(value),
                _ => {
                    meta.extra.insert(key, value);
                }
            }
        }

        Ok(meta)
    }
}

fn parse_field<T>(field: &str, value: &str) -> Result<T, SourceError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    value.parse().map_err(|e: T::Err| SourceError::Metadata {
        field: field.to_string(),
        message: e.to_string(),
    })
}

impl fmt::Display for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "name = {}, format = {}", self.name, self.format)?;
        if let (Some(min), Some(max)) = (self.minzoom, self.maxzoom) {
            write!(f, ", zoom = {min}..{max}")?;
        }
        Ok(())
    }
}
