//! JSON structure documents
//!
//! A structure document describes a collection or manifest together with
//! its canvases and range hierarchy:
//!
//! ```json
//! { "type": "manifest", "id": "m1", "label": "Issue 1",
//!   "navDate": "1923-05-01T00:00:00Z",
//!   "canvases": [{ "id": "c1", "label": "p. 1" }],
//!   "structures": [{ "id": "r0", "label": "Contents", "canvases": ["c1"], "ranges": [] }] }
//! ```

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::domain::{Canvas, Collection, Manifest, Range, Resource};
use crate::infrastructure::traits::FileSystem;
use crate::infrastructure::{InfraError, InfraResult};

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum DocumentDto {
    Collection(CollectionDto),
    Manifest(ManifestDto),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct CollectionDto {
    id: String,
    label: String,
    nav_date: Option<String>,
    manifests: Vec<ManifestDto>,
    collections: Vec<CollectionDto>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ManifestDto {
    id: String,
    label: String,
    nav_date: Option<String>,
    canvases: Vec<CanvasDto>,
    #[serde(alias = "ranges")]
    structures: Vec<RangeDto>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CanvasDto {
    Id(String),
    Full {
        id: String,
        #[serde(default)]
        label: String,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RangeDto {
    id: String,
    label: String,
    nav_date: Option<String>,
    canvases: Vec<String>,
    ranges: Vec<RangeDto>,
}

impl From<CollectionDto> for Collection {
    fn from(dto: CollectionDto) -> Self {
        Self {
            nav_date: dto.nav_date.as_deref().and_then(parse_nav_date),
            id: dto.id,
            label: dto.label,
            manifests: dto.manifests.into_iter().map(Manifest::from).collect(),
            collections: dto.collections.into_iter().map(Collection::from).collect(),
        }
    }
}

impl From<ManifestDto> for Manifest {
    fn from(dto: ManifestDto) -> Self {
        Self {
            nav_date: dto.nav_date.as_deref().and_then(parse_nav_date),
            id: dto.id,
            label: dto.label,
            canvases: dto.canvases.into_iter().map(Canvas::from).collect(),
            structures: dto.structures.into_iter().map(Range::from).collect(),
        }
    }
}

impl From<CanvasDto> for Canvas {
    fn from(dto: CanvasDto) -> Self {
        match dto {
            CanvasDto::Id(id) => Self {
                label: id.clone(),
                id,
            },
            CanvasDto::Full { id, label } => Self { id, label },
        }
    }
}

impl From<RangeDto> for Range {
    fn from(dto: RangeDto) -> Self {
        Self {
            nav_date: dto.nav_date.as_deref().and_then(parse_nav_date),
            id: dto.id,
            label: dto.label,
            canvas_ids: dto.canvases,
            ranges: dto.ranges.into_iter().map(Range::from).collect(),
        }
    }
}

/// Parses an ISO 8601 navigation date.
///
/// Accepts RFC 3339 timestamps, naive `YYYY-MM-DDTHH:MM:SS` (taken as UTC)
/// and plain `YYYY-MM-DD` dates. Anything else is treated as absent.
pub fn parse_nav_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.and_utc());
    }
    if let Some(dt) = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Some(dt.and_utc());
    }
    warn!("ignoring invalid navDate: {value}");
    None
}

/// Parses a structure document from JSON text.
pub fn parse_document(json: &str) -> Result<Resource, serde_json::Error> {
    let dto: DocumentDto = serde_json::from_str(json)?;
    Ok(match dto {
        DocumentDto::Collection(c) => Resource::Collection(c.into()),
        DocumentDto::Manifest(m) => Resource::Manifest(m.into()),
    })
}

/// Loads structure documents through the filesystem boundary.
pub struct DocumentLoader {
    fs: Arc<dyn FileSystem>,
}

impl DocumentLoader {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> InfraResult<Resource> {
        if !self.fs.is_file(path) {
            return Err(InfraError::NotFound(path.to_path_buf()));
        }
        let content = self
            .fs
            .read_to_string(path)
            .map_err(|e| InfraError::io(format!("read {}", path.display()), e))?;
        let resource = parse_document(&content).map_err(|e| InfraError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let kind = if resource.is_collection() {
            "collection"
        } else {
            "manifest"
        };
        debug!("loaded {} ({})", resource.id(), kind);
        Ok(resource)
    }
}
