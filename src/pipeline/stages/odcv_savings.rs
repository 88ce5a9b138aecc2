//! ODCV savings as a fraction of HVAC energy.
//!
//! `floor + opportunity × automation × (ceiling − floor)`, scaled by the
//! efficiency, climate and uplift modifiers and clamped to the type's bounds.

use crate::config::odcv::OdcvConfig;
use crate::config::Resolution;
use crate::core::columns::{
    BLDG_SQFT, BLDG_TYPE, BLDG_YEAR_BUILT, ENERGY_STAR_SCORE, ODCV_SAVINGS_PCT, SITE_EUI,
    UTILIZATION_RATE, VACANCY_RATE,
};
use crate::core::{BuildingRecord, BuildingType, OccupancySignal, Precision};
use crate::errors::SkipReason;
use crate::pipeline::stage::{RowOutcome, Stage, StageContext, Updates};

pub struct OdcvSavingsStage;

/// Share of conditioned air that occupancy sensing could cut (pure).
pub fn opportunity(
    building_type: &BuildingType,
    vacancy: f64,
    utilization: f64,
    low_opportunity_factor: f64,
) -> f64 {
    let idle = 1.0 - utilization.clamp(0.0, 1.0);
    let opportunity = if *building_type == BuildingType::DataCenter {
        0.0
    } else if building_type.is_low_opportunity() {
        idle * low_opportunity_factor
    } else {
        match building_type.occupancy_signal() {
            OccupancySignal::Vacancy => {
                let vacancy = vacancy.clamp(0.0, 1.0);
                vacancy + (1.0 - vacancy) * idle
            }
            OccupancySignal::Utilization => idle,
        }
    };
    opportunity.clamp(0.0, 1.0)
}

/// Likelihood of a controllable building automation system, by vintage.
pub fn year_score(year_built: f64) -> f64 {
    match year_built {
        y if y < 1970.0 => 0.0,
        y if y < 1990.0 => 0.25,
        y if y < 2005.0 => 0.5,
        y if y < 2015.0 => 0.75,
        _ => 1.0,
    }
}

/// Likelihood of a controllable building automation system, by floor area.
pub fn size_score(sqft: f64) -> f64 {
    match sqft {
        s if s < 50_000.0 => 0.25,
        s if s < 100_000.0 => 0.5,
        s if s < 250_000.0 => 0.75,
        _ => 1.0,
    }
}

pub fn automation(year_built: f64, sqft: f64) -> f64 {
    (year_score(year_built) + size_score(sqft)) / 2.0
}

/// Efficient buildings leave less to save; inefficient ones more.
///
/// Uses the Energy Star score when present, otherwise the EUI relative to
/// the peer median.
pub fn efficiency_modifier(score: Option<f64>, eui: Option<f64>, peer_eui: Option<f64>) -> f64 {
    if let Some(score) = score {
        return match score {
            s if s >= 90.0 => 0.85,
            s if s >= 75.0 => 0.95,
            s if s >= 50.0 => 1.0,
            s if s >= 25.0 => 1.05,
            _ => 1.10,
        };
    }
    match (eui, peer_eui) {
        (Some(eui), Some(peer)) if peer > 0.0 => match eui / peer {
            r if r > 1.5 => 1.10,
            r if r > 1.2 => 1.05,
            r if r > 0.85 => 1.0,
            r if r > 0.70 => 0.95,
            _ => 0.90,
        },
        _ => 1.0,
    }
}

/// Tracks whether any input had to be filled in.
struct Inputs {
    resolution: Resolution,
}

impl Inputs {
    fn take(&mut self, value: Option<f64>, fallback: impl FnOnce() -> f64) -> f64 {
        value.unwrap_or_else(|| {
            self.resolution = self.resolution.widen(Resolution::Fallback);
            fallback()
        })
    }
}

impl Stage for OdcvSavingsStage {
    fn name(&self) -> &'static str {
        "odcv_savings"
    }

    fn description(&self) -> &'static str {
        "ODCV savings fraction of HVAC energy"
    }

    fn requires(&self) -> &'static [&'static str] {
        &[BLDG_TYPE, VACANCY_RATE, UTILIZATION_RATE]
    }

    fn outputs(&self) -> Vec<&'static str> {
        vec![ODCV_SAVINGS_PCT]
    }

    fn evaluate(&self, record: &BuildingRecord, ctx: &StageContext<'_>) -> RowOutcome {
        let Some(kind) = &record.building_type else {
            return RowOutcome::Skipped(SkipReason::MissingValue(BLDG_TYPE));
        };
        let odcv: &OdcvConfig = &ctx.config.odcv;
        let bounds = odcv.bounds.resolve(kind);
        let mut inputs = Inputs {
            resolution: bounds.resolution,
        };

        let vacancy = match kind.occupancy_signal() {
            OccupancySignal::Vacancy => {
                inputs.take(record.value(VACANCY_RATE), || odcv.default_vacancy)
            }
            OccupancySignal::Utilization => 0.0,
        };
        let utilization = inputs.take(record.value(UTILIZATION_RATE), || odcv.default_utilization);
        let year_built = inputs.take(record.positive(BLDG_YEAR_BUILT), || {
            ctx.peers
                .median_year(kind)
                .unwrap_or(odcv.default_year_built)
        });
        let sqft = inputs.take(record.positive(BLDG_SQFT), || odcv.default_sqft);

        let opportunity = opportunity(kind, vacancy, utilization, odcv.low_opportunity_factor);
        let automation = automation(year_built, sqft);
        let efficiency = efficiency_modifier(
            record.value(ENERGY_STAR_SCORE),
            record.positive(SITE_EUI),
            ctx.peers.median_eui(kind),
        );
        let climate = record
            .climate_zone
            .map(|zone| odcv.climate.for_zone(zone))
            .unwrap_or(1.0);

        let b = bounds.value;
        let raw = (b.floor + opportunity * automation * b.range()) * efficiency * climate * odcv.uplift;

        Updates::new()
            .number(ODCV_SAVINGS_PCT, b.clamp(raw), Precision::Fraction)
            .resolved(inputs.resolution)
    }
}
