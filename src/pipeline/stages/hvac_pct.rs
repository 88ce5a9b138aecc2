//! HVAC share of each fuel.
//!
//! Starts from the benchmark baseline for the building's type and climate
//! zone, then shifts every fuel by one efficiency adjustment built from the
//! Energy Star score, the vintage and the EUI relative to peers of the same
//! type. Fuel oil and data centers use fixed shares.

use crate::config::hvac::HvacAdjustments;
use crate::config::Resolution;
use crate::core::columns::{BLDG_TYPE, BLDG_YEAR_BUILT, ELEC_KBTU, ENERGY_STAR_SCORE, SITE_EUI};
use crate::core::{BuildingRecord, BuildingType, Fuel, PerFuel, Precision};
use crate::errors::SkipReason;
use crate::pipeline::stage::{RowOutcome, Stage, StageContext, Updates};

const REFERENCE_SCORE: f64 = 50.0;
const REFERENCE_YEAR: f64 = 1990.0;
const YEAR_SPAN: f64 = 20.0;

pub struct HvacPctStage;

/// Combined additive adjustment to the baseline share (pure).
///
/// Poor scores, older buildings and above-peer EUI push the share up; each
/// term saturates at its configured weight and the sum at the combined cap.
/// Missing inputs contribute nothing.
pub fn efficiency_adjustment(
    score: Option<f64>,
    year_built: Option<f64>,
    eui: Option<f64>,
    peer_eui: Option<f64>,
    weights: &HvacAdjustments,
) -> f64 {
    let score_term = score
        .map(|s| ((REFERENCE_SCORE - s) / REFERENCE_SCORE).clamp(-1.0, 1.0) * weights.score)
        .unwrap_or(0.0);
    let year_term = year_built
        .map(|y| ((REFERENCE_YEAR - y) / YEAR_SPAN).clamp(-1.0, 1.0) * weights.year)
        .unwrap_or(0.0);
    let eui_term = match (eui, peer_eui) {
        (Some(eui), Some(peer)) if peer > 0.0 => (eui / peer - 1.0).clamp(-1.0, 1.0) * weights.eui,
        _ => 0.0,
    };

    (score_term + year_term + eui_term).clamp(-weights.combined_cap, weights.combined_cap)
}

impl Stage for HvacPctStage {
    fn name(&self) -> &'static str {
        "hvac_pct"
    }

    fn description(&self) -> &'static str {
        "HVAC share of each fuel from benchmarks and efficiency adjustments"
    }

    fn requires(&self) -> &'static [&'static str] {
        &[BLDG_TYPE, ELEC_KBTU]
    }

    fn outputs(&self) -> Vec<&'static str> {
        Fuel::ALL.iter().map(|fuel| fuel.hvac_pct_column()).collect()
    }

    fn evaluate(&self, record: &BuildingRecord, ctx: &StageContext<'_>) -> RowOutcome {
        let Some(kind) = &record.building_type else {
            return RowOutcome::Skipped(SkipReason::MissingValue(BLDG_TYPE));
        };
        if record.fuels_in_use().next().is_none() {
            return RowOutcome::Skipped(SkipReason::NoFuelData);
        }

        let hvac = &ctx.config.hvac;
        let (shares, resolution) = if *kind == BuildingType::DataCenter {
            let shares = PerFuel {
                fuel_oil: hvac.fuel_oil_pct,
                ..hvac.data_center
            };
            (shares, Resolution::Exact)
        } else {
            let baseline = hvac.baseline(kind, record.climate_zone);
            let adjustment = efficiency_adjustment(
                record.value(ENERGY_STAR_SCORE),
                record.positive(BLDG_YEAR_BUILT),
                record.positive(SITE_EUI),
                ctx.peers.median_eui(kind),
                &hvac.adjustments,
            );
            let b = baseline.value;
            let shares = PerFuel::new(
                b.elec + adjustment,
                b.gas + adjustment,
                b.steam + adjustment,
                hvac.fuel_oil_pct,
            );
            (shares, baseline.resolution)
        };

        Fuel::ALL
            .into_iter()
            .fold(Updates::new(), |updates, fuel| {
                let share = record
                    .positive(fuel.energy_column())
                    .map(|_| shares.get(fuel).clamp(0.0, 1.0));
                updates.optional(fuel.hvac_pct_column(), share, Precision::Fraction)
            })
            .resolved(resolution)
    }
}
