//! Feature collections around decoded geometries.
//!
//! Parsing happens in two steps. The document is first read into a generic
//! JSON value tree; then each feature's `geometry` member is handed to
//! [`decode_geometry`] explicitly while the rest of the feature (its
//! properties) is deserialized into the caller's own type `P`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result as AnyResult};
use log::{debug, info};
use rayon::prelude::*;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::geometry::{decode_geometry, Geometry};

/// Properties that carry a region code used to pick a fill color.
pub trait RegionCode {
    fn code(&self) -> &str;
}

/// Properties of the JMA GIS boundary datasets.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JmaProperties {
    /// JMA area code; empty for unnamed islets
    pub code: String,
    pub name: String,
    /// Reading of `name` in kana
    pub namekana: String,
}

impl RegionCode for JmaProperties {
    fn code(&self) -> &str {
        &self.code
    }
}

/// Accepts and ignores any properties object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct NoProperties {}

/// A geometry paired with its properties. A `None` geometry is a named
/// area without a shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature<P> {
    pub geometry: Option<Geometry>,
    pub properties: Option<P>,
}

impl<P: RegionCode> Feature<P> {
    /// Region code, empty when there are no properties.
    pub fn code(&self) -> &str {
        self.properties.as_ref().map_or("", |p| p.code())
    }
}

impl<P: DeserializeOwned> Feature<P> {
    pub fn from_value(value: &Value) -> Result<Self> {
        let geometry = match value.get("geometry") {
            None | Some(Value::Null) => None,
            Some(geometry) => Some(decode_geometry(geometry)?),
        };
        let properties = match value.get("properties") {
            None | Some(Value::Null) => None,
            Some(properties) => Some(P::deserialize(properties)?),
        };
        Ok(Self {
            geometry,
            properties,
        })
    }
}

/// `{"type":"FeatureCollection","features":[...]}`
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureCollection<P> {
    pub features: Vec<Feature<P>>,
}

impl<P: DeserializeOwned + Send> FeatureCollection<P> {
    /// Decode every feature. Order is preserved and the first bad feature
    /// fails the whole collection.
    pub fn from_value(value: &Value) -> Result<Self> {
        let features = member_array(value, "features")?
            .par_iter()
            .map(Feature::from_value)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { features })
    }
}

impl<P> FeatureCollection<P> {
    /// Each feature's geometry, for drawing without properties.
    pub fn geometries(&self) -> impl Iterator<Item = Option<&Geometry>> + '_ {
        self.features.iter().map(|f| f.geometry.as_ref())
    }
}

/// `{"type":"GeometryCollection","geometries":[...]}`; entries may be `null`.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryCollection {
    pub geometries: Vec<Option<Geometry>>,
}

impl GeometryCollection {
    pub fn from_value(value: &Value) -> Result<Self> {
        let geometries = member_array(value, "geometries")?
            .par_iter()
            .map(|g| match g {
                Value::Null => Ok(None),
                g => decode_geometry(g).map(Some),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { geometries })
    }

    pub fn geometries(&self) -> impl Iterator<Item = Option<&Geometry>> + '_ {
        self.geometries.iter().map(Option::as_ref)
    }
}

fn member_array<'a>(value: &'a Value, name: &str) -> Result<&'a Vec<Value>> {
    value
        .get(name)
        .and_then(Value::as_array)
        .ok_or_else(|| Error::Schema(format!("`{name}` is missing or not an array")))
}

fn read_value(path: &Path) -> AnyResult<Value> {
    let mut bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    debug!("parsing {} ({} bytes)", path.display(), bytes.len());
    simd_json::serde::from_slice(&mut bytes)
        .with_context(|| format!("parsing JSON in {}", path.display()))
}

/// Load a GeoJSON feature collection from disk
pub fn load_feature_collection<P>(path: &Path) -> AnyResult<FeatureCollection<P>>
where
    P: DeserializeOwned + Send,
{
    let value = read_value(path)?;
    let collection = FeatureCollection::from_value(&value)
        .with_context(|| format!("decoding features in {}", path.display()))?;

    let shapeless = collection.features.iter().filter(|f| f.geometry.is_none()).count();
    let points: usize = collection.geometries().flatten().map(Geometry::point_count).sum();
    info!(
        "loaded {} features ({} without geometry, {} points) from {}",
        collection.features.len(),
        shapeless,
        points,
        path.display()
    );
    Ok(collection)
}

/// Load a GeoJSON geometry collection from disk
pub fn load_geometry_collection(path: &Path) -> AnyResult<GeometryCollection> {
    let value = read_value(path)?;
    let collection = GeometryCollection::from_value(&value)
        .with_context(|| format!("decoding geometries in {}", path.display()))?;
    info!(
        "loaded {} geometries from {}",
        collection.geometries.len(),
        path.display()
    );
    Ok(collection)
}
