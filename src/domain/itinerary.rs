use crate::domain::model::{Coordinates, Place, PlaceFeature, RouteWindow, SelectionTier, WindowFit};
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// 兩個相鄰停靠點之間（或起點到第一站）的步行段
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub distance_km: f64,
    pub duration_minutes: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItineraryStop {
    pub place: Place,
    pub similarity: f64,
    pub features: Vec<PlaceFeature>,
    /// 依興趣與景點類型產生的推薦理由
    pub reason: String,
    pub dwell_time_hours: f64,
    /// 抵達此站前的步行段
    pub walk_in: Transition,
    pub arrival_offset_minutes: f64,
    pub departure_offset_minutes: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteTotals {
    pub visit_hours: f64,
    pub walking_minutes: f64,
    pub total_hours: f64,
}

impl RouteTotals {
    pub const ZERO: RouteTotals = RouteTotals {
        visit_hours: 0.0,
        walking_minutes: 0.0,
        total_hours: 0.0,
    };
}

/// 最終輸出的步行路線，按遊覽順序排列
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Itinerary {
    pub interests: String,
    pub start: Coordinates,
    pub window: RouteWindow,
    pub stops: Vec<ItineraryStop>,
    pub totals: RouteTotals,
    pub window_fit: WindowFit,
    pub selection_tier: SelectionTier,
    /// 選擇階段按排名順序估算的總時長，可能與 totals 不同
    pub selection_hours: f64,
    /// 目錄不足三個景點時為 true
    pub shortfall: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    Walk,
    Visit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimetableEntry {
    pub kind: SegmentKind,
    /// 步行段為目的地名稱
    pub place_name: String,
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
}

impl Itinerary {
    pub fn place_ids(&self) -> Vec<u64> {
        self.stops.iter().map(|s| s.place.id).collect()
    }

    pub fn finishes_at(&self, departure: NaiveDateTime) -> NaiveDateTime {
        departure + minutes(self.totals.total_hours * 60.0)
    }

    /// 依出發時間展開每段步行與參觀的時刻
    pub fn timetable(&self, departure: NaiveDateTime) -> Vec<TimetableEntry> {
        let mut entries = Vec::with_capacity(self.stops.len() * 2);

        for stop in &self.stops {
            let arrival = departure + minutes(stop.arrival_offset_minutes);
            let walk_start = arrival - minutes(stop.walk_in.duration_minutes);
            entries.push(TimetableEntry {
                kind: SegmentKind::Walk,
                place_name: stop.place.name.clone(),
                starts_at: walk_start,
                ends_at: arrival,
            });
            entries.push(TimetableEntry {
                kind: SegmentKind::Visit,
                place_name: stop.place.name.clone(),
                starts_at: arrival,
                ends_at: departure + minutes(stop.departure_offset_minutes),
            });
        }

        entries
    }
}

fn minutes(value: f64) -> Duration {
    Duration::seconds((value * 60.0).round() as i64)
}
