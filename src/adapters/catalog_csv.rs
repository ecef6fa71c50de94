use crate::domain::model::{Coordinates, Place, PlaceId, RegionBounds};
use crate::utils::error::Result;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashSet;
use std::io::Read;
use std::path::PathBuf;
use std::sync::OnceLock;

const MISSING_ADDRESS: &str = "Адрес не указан";

/// CSV 目錄的一列；欄位可缺省
#[derive(Debug, Deserialize)]
struct CatalogRow {
    #[serde(default)]
    id: Option<PlaceId>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    coordinate: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    category_id: Option<i64>,
}

/// 從 CSV 檔讀取景點目錄
#[derive(Debug, Clone)]
pub struct CsvCatalogSource {
    path: PathBuf,
    region: RegionBounds,
}

impl CsvCatalogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            region: RegionBounds::CATALOG,
        }
    }

    pub fn with_region(mut self, region: RegionBounds) -> Self {
        self.region = region;
        self
    }

    pub fn load(&self) -> Result<Vec<Place>> {
        tracing::info!("📁 Loading catalog from: {}", self.path.display());
        let file = std::fs::File::open(&self.path)?;
        read_places(file, self.region)
    }
}

/// 讀取並過濾目錄列：缺 id/標題或座標無效的列會被略過
pub fn read_places<R: Read>(reader: R, region: RegionBounds) -> Result<Vec<Place>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut places = Vec::new();
    let mut seen: HashSet<PlaceId> = HashSet::new();
    let mut skipped = 0usize;

    for (idx, result) in reader.deserialize::<CatalogRow>().enumerate() {
        let line = idx + 2; // 標題列佔第 1 行
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                tracing::warn!("Skipping catalog line {}: {}", line, e);
                skipped += 1;
                continue;
            }
        };

        match row_to_place(row, region) {
            Some(place) if seen.insert(place.id) => places.push(place),
            Some(place) => {
                tracing::warn!(
                    "Skipping catalog line {}: duplicate id {}",
                    line,
                    place.id
                );
                skipped += 1;
            }
            None => {
                tracing::debug!("Skipping catalog line {}: missing id, title or coordinates", line);
                skipped += 1;
            }
        }
    }

    tracing::info!(
        "Loaded {} places ({} rows skipped)",
        places.len(),
        skipped
    );
    Ok(places)
}

fn row_to_place(row: CatalogRow, region: RegionBounds) -> Option<Place> {
    let id = row.id?;
    let name = non_empty(row.title)?;
    let coordinates = parse_coordinates(row.coordinate.as_deref()?)?;
    if !region.contains(coordinates) {
        return None;
    }

    Some(Place {
        id,
        description: non_empty(row.description).unwrap_or_else(|| name.clone()),
        address: non_empty(row.address).unwrap_or_else(|| MISSING_ADDRESS.to_string()),
        url: non_empty(row.url),
        category_id: row.category_id,
        coordinates,
        name,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty() && s != "nan")
}

fn number_pattern() -> &'static Regex {
    static NUMBER: OnceLock<Regex> = OnceLock::new();
    NUMBER.get_or_init(|| Regex::new(r"[-+]?\d*\.\d+|[-+]?\d+").unwrap())
}

/// 解析 `POINT(lon lat)` 或 `lat,lon` / `lat lon`
pub fn parse_coordinates(raw: &str) -> Option<Coordinates> {
    let clean = raw.trim();
    if clean.is_empty() || clean == "nan" {
        return None;
    }

    if clean.to_ascii_uppercase().starts_with("POINT") {
        let numbers: Vec<f64> = number_pattern()
            .find_iter(clean)
            .filter_map(|m| m.as_str().parse().ok())
            .collect();
        // WKT 先經度後緯度
        return match numbers.as_slice() {
            [lon, lat, ..] => Some(Coordinates::new(*lat, *lon)),
            _ => None,
        };
    }

    Coordinates::parse_pair(clean)
}
