use crate::utils::error::{PlannerError, Result};
use serde::{Deserialize, Serialize};

pub type PlaceId = u64;

/// 緯度、經度（十進位度數）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// 解析使用者輸入的 "lat lon" 或 "lat, lon"
    pub fn parse_pair(input: &str) -> Option<Self> {
        let parts: Vec<&str> = input
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .collect();

        if parts.len() != 2 {
            return None;
        }

        let lat = parts[0].parse::<f64>().ok()?;
        let lon = parts[1].parse::<f64>().ok()?;
        if !lat.is_finite() || !lon.is_finite() {
            return None;
        }
        Some(Self { lat, lon })
    }
}

/// 服務區域的經緯度範圍（含邊界）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl RegionBounds {
    /// 目錄資料的有效範圍
    pub const CATALOG: RegionBounds = RegionBounds {
        min_lat: 56.0,
        max_lat: 56.5,
        min_lon: 43.0,
        max_lon: 44.5,
    };

    /// 起點允許的範圍，比目錄稍寬
    pub const START: RegionBounds = RegionBounds {
        min_lat: 55.8,
        max_lat: 56.8,
        min_lon: 43.0,
        max_lon: 44.8,
    };

    pub fn contains(&self, coords: Coordinates) -> bool {
        (self.min_lat..=self.max_lat).contains(&coords.lat)
            && (self.min_lon..=self.max_lon).contains(&coords.lon)
    }

    /// 解析起點座標並確認在區域內
    pub fn parse_start(&self, input: &str) -> Result<Coordinates> {
        Coordinates::parse_pair(input)
            .filter(|coords| self.contains(*coords))
            .ok_or_else(|| PlannerError::InvalidCoordinates {
                input: input.trim().to_string(),
            })
    }
}

/// 目錄中的景點，由外部載入後唯讀
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: PlaceId,
    pub name: String,
    pub description: String,
    pub address: String,
    pub coordinates: Coordinates,
    pub category_id: Option<i64>,
    pub url: Option<String>,
}

impl Place {
    /// 用於計算嵌入向量的文字
    pub fn embedding_text(&self) -> String {
        format!("{} {}", self.name, self.description)
    }
}

/// 由名稱與描述關鍵字判定的景點類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaceFeature {
    #[serde(rename = "исторический")]
    Historical,
    #[serde(rename = "культурный")]
    Cultural,
    #[serde(rename = "архитектурный")]
    Architectural,
    #[serde(rename = "природный")]
    Nature,
    #[serde(rename = "панорамный")]
    Panoramic,
    #[serde(rename = "религиозный")]
    Religious,
    #[serde(rename = "развлекательный")]
    Entertainment,
    #[serde(rename = "гастрономический")]
    Gastronomic,
    #[serde(rename = "образовательный")]
    Educational,
    #[serde(rename = "торговый")]
    Shopping,
    #[serde(rename = "спортивный")]
    Sports,
    #[serde(rename = "детский")]
    Children,
    #[serde(rename = "романтический")]
    Romantic,
    #[serde(rename = "технический")]
    Technical,
    #[serde(rename = "военный")]
    Military,
    #[serde(rename = "литературный")]
    Literary,
    #[serde(rename = "музыкальный")]
    Musical,
    #[serde(rename = "современное искусство")]
    ContemporaryArt,
    #[serde(rename = "уникальный")]
    Unique,
    #[serde(rename = "семейный")]
    Family,
}

/// 單次查詢中附加了相關度與時間估計的景點
#[derive(Debug, Clone, Copy)]
pub struct ScoredCandidate<'p> {
    pub place: &'p Place,
    pub similarity: f64,
    pub distance_from_start_km: f64,
    pub walk_time_from_start_hours: f64,
    pub dwell_time_hours: f64,
}

impl ScoredCandidate<'_> {
    pub fn id(&self) -> PlaceId {
        self.place.id
    }

    pub fn coordinates(&self) -> Coordinates {
        self.place.coordinates
    }
}

/// 使用者可接受的總時長範圍（小時）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteWindow {
    pub min_hours: f64,
    pub max_hours: f64,
}

impl RouteWindow {
    pub fn new(min_hours: f64, max_hours: f64) -> Result<Self> {
        let invalid = |reason: &str| PlannerError::InvalidWindow {
            min_hours,
            max_hours,
            reason: reason.to_string(),
        };

        if !min_hours.is_finite() || !max_hours.is_finite() {
            return Err(invalid("hours must be finite numbers"));
        }
        if min_hours <= 0.0 || max_hours <= 0.0 {
            return Err(invalid("hours must be positive"));
        }
        if min_hours > max_hours {
            return Err(invalid("minimum exceeds maximum"));
        }

        Ok(Self {
            min_hours,
            max_hours,
        })
    }

    pub fn midpoint(&self) -> f64 {
        (self.min_hours + self.max_hours) / 2.0
    }

    pub fn contains(&self, hours: f64) -> bool {
        self.min_hours <= hours && hours <= self.max_hours
    }

    pub fn fit(&self, hours: f64) -> WindowFit {
        if hours < self.min_hours {
            WindowFit::Under {
                by_hours: self.min_hours - hours,
            }
        } else if hours > self.max_hours {
            WindowFit::Over {
                by_hours: hours - self.max_hours,
            }
        } else {
            WindowFit::Within
        }
    }
}

/// 路線總時長相對於時間範圍的位置
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WindowFit {
    Within,
    Under { by_hours: f64 },
    Over { by_hours: f64 },
}

impl WindowFit {
    pub fn is_within(&self) -> bool {
        matches!(self, WindowFit::Within)
    }
}

/// 產生選擇結果的層級
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionTier {
    /// 多輪貪婪填充，結果落在時間範圍內
    Windowed,
    /// 只受上限約束的盡力填充
    BestEffort,
    /// 忽略時間預算補足最少景點數
    MinimumGuarantee,
}

/// 選擇階段的結果，順序為累積順序（排名順序）
#[derive(Debug, Clone)]
pub struct CandidateCombination<'p> {
    pub candidates: Vec<ScoredCandidate<'p>>,
    pub accumulated_hours: f64,
    pub tier: SelectionTier,
}

impl CandidateCombination<'_> {
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn ids(&self) -> Vec<PlaceId> {
        self.candidates.iter().map(|c| c.id()).collect()
    }
}

/// 組合請求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComposeRequest {
    pub interests: String,
    pub min_hours: f64,
    pub max_hours: f64,
    pub start: Coordinates,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pair() {
        assert_eq!(
            Coordinates::parse_pair("56.326887 44.005986"),
            Some(Coordinates::new(56.326887, 44.005986))
        );
        assert_eq!(
            Coordinates::parse_pair(" 56.32, 44.0 "),
            Some(Coordinates::new(56.32, 44.0))
        );
        assert_eq!(Coordinates::parse_pair("56.32"), None);
        assert_eq!(Coordinates::parse_pair("Большая Покровская улица, 12"), None);
    }

    #[test]
    fn test_parse_start_checks_region() {
        assert!(RegionBounds::START.parse_start("56.32 44.00").is_ok());
        assert!(matches!(
            RegionBounds::START.parse_start("55.75 37.61"),
            Err(PlannerError::InvalidCoordinates { .. })
        ));
    }

    #[test]
    fn test_route_window_validation() {
        assert!(RouteWindow::new(2.0, 3.0).is_ok());
        assert!(RouteWindow::new(2.0, 2.0).is_ok());
        assert!(matches!(
            RouteWindow::new(3.0, 2.0),
            Err(PlannerError::InvalidWindow { .. })
        ));
        assert!(RouteWindow::new(0.0, 2.0).is_err());
        assert!(RouteWindow::new(1.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_route_window_fit() {
        let window = RouteWindow::new(2.0, 3.0).unwrap();
        assert_eq!(window.midpoint(), 2.5);
        assert!(window.fit(2.0).is_within());
        assert!(window.fit(3.0).is_within());
        assert!(matches!(window.fit(1.5), WindowFit::Under { by_hours } if (by_hours - 0.5).abs() < 1e-9));
        assert!(matches!(window.fit(3.25), WindowFit::Over { by_hours } if (by_hours - 0.25).abs() < 1e-9));
    }
}
