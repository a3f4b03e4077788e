//! Travel cost model: fuel, labor and vehicle time.

use serde::{Deserialize, Serialize};

use crate::error::RatesError;
use crate::model::{round2, Route};

/// Minutes in one billing increment.
const BILLING_BLOCK_MIN: f64 = 15.0;

/// Cost rate configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostRates {
    /// Currency per liter.
    pub fuel_price: f64,
    /// Liters per 100 km.
    pub consumption_l_per_100km: f64,
    /// Mechanic labor, currency per hour.
    pub labor_hourly: f64,
    /// Vehicle time, currency per hour.
    pub vehicle_hourly: f64,
}

impl Default for CostRates {
    fn default() -> Self {
        Self {
            fuel_price: 6.50,
            consumption_l_per_100km: 10.0,
            labor_hourly: 0.0,
            vehicle_hourly: 0.0,
        }
    }
}

impl CostRates {
    /// Fuel cost of one kilometer, rounded to four decimals.
    ///
    /// Zero when consumption is zero or negative.
    pub fn fuel_per_km(&self) -> f64 {
        if self.consumption_l_per_100km <= 0.0 {
            return 0.0;
        }
        ((self.fuel_price * self.consumption_l_per_100km / 100.0) * 10_000.0).round() / 10_000.0
    }

    pub fn validate(&self) -> Result<(), RatesError> {
        let fields = [
            ("fuel price", self.fuel_price),
            ("fuel consumption", self.consumption_l_per_100km),
            ("labor hourly rate", self.labor_hourly),
            ("vehicle hourly rate", self.vehicle_hourly),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(RatesError { name, value });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub fuel: f64,
    pub labor: f64,
    pub vehicle: f64,
    pub total: f64,
    /// Travel time rounded up to the next quarter hour.
    pub billable_hours: f64,
}

/// Travel time rounded up to whole quarter hours, in hours.
pub fn billable_hours(duration_min: f64) -> f64 {
    if duration_min <= 0.0 {
        return 0.0;
    }
    (duration_min / BILLING_BLOCK_MIN).ceil() * 0.25
}

/// Cost of driving `route` at `rates`.
pub fn cost(route: &Route, rates: &CostRates) -> CostBreakdown {
    let hours = billable_hours(route.duration_min);
    let fuel = round2(route.distance_km * rates.fuel_per_km());
    let labor = round2(hours * rates.labor_hourly);
    let vehicle = round2(hours * rates.vehicle_hourly);

    CostBreakdown {
        fuel,
        labor,
        vehicle,
        total: round2(fuel + labor + vehicle),
        billable_hours: hours,
    }
}
