use crate::utils::error::{PlannerError, Result};
use serde::{Deserialize, Serialize};

/// 將步行距離換算為時間，並限制在上下限之間
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WalkingTimeModel {
    pub speed_kmh: f64,
    pub min_minutes: f64,
    pub max_minutes: f64,
}

impl WalkingTimeModel {
    pub const DEFAULT_SPEED_KMH: f64 = 4.0;
    pub const DEFAULT_MIN_MINUTES: f64 = 5.0;
    pub const DEFAULT_MAX_MINUTES: f64 = 120.0;

    /// 速度須為正有限值，上下限須有限且 0 ≤ 下限 ≤ 上限
    pub fn new(speed_kmh: f64, min_minutes: f64, max_minutes: f64) -> Result<Self> {
        let invalid = |field: &str, value: f64, reason: &str| PlannerError::InvalidConfigValueError {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        };

        if !speed_kmh.is_finite() || speed_kmh <= 0.0 {
            return Err(invalid("walking.speed_kmh", speed_kmh, "Speed must be a positive number"));
        }
        if !min_minutes.is_finite() || min_minutes < 0.0 {
            return Err(invalid(
                "walking.min_minutes",
                min_minutes,
                "Minimum must be a non-negative number",
            ));
        }
        if !max_minutes.is_finite() || max_minutes < min_minutes {
            return Err(invalid(
                "walking.max_minutes",
                max_minutes,
                "Maximum must be a finite number not below the minimum",
            ));
        }

        Ok(Self {
            speed_kmh,
            min_minutes,
            max_minutes,
        })
    }

    /// 距離必須為非負有限值
    pub fn time_minutes(&self, distance_km: f64) -> f64 {
        let minutes = distance_km / self.speed_kmh * 60.0;
        minutes.clamp(self.min_minutes, self.max_minutes)
    }

    pub fn time_hours(&self, distance_km: f64) -> f64 {
        self.time_minutes(distance_km) / 60.0
    }
}

impl Default for WalkingTimeModel {
    fn default() -> Self {
        Self {
            speed_kmh: Self::DEFAULT_SPEED_KMH,
            min_minutes: Self::DEFAULT_MIN_MINUTES,
            max_minutes: Self::DEFAULT_MAX_MINUTES,
        }
    }
}
