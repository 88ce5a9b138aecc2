//! Vacancy and utilization rates from the per-type occupancy profiles.

use crate::core::columns::{BLDG_TYPE, LOC_CITY, LOC_STATE, UTILIZATION_RATE, VACANCY_RATE};
use crate::core::{BuildingRecord, OccupancySignal, Precision};
use crate::errors::SkipReason;
use crate::pipeline::stage::{RowOutcome, Stage, StageContext, Updates};

pub struct OccupancyStage;

impl Stage for OccupancyStage {
    fn name(&self) -> &'static str {
        "occupancy"
    }

    fn description(&self) -> &'static str {
        "Vacancy and utilization by type, city, state"
    }

    fn requires(&self) -> &'static [&'static str] {
        &[BLDG_TYPE, LOC_CITY, LOC_STATE]
    }

    fn outputs(&self) -> Vec<&'static str> {
        vec![VACANCY_RATE, UTILIZATION_RATE]
    }

    fn evaluate(&self, record: &BuildingRecord, ctx: &StageContext<'_>) -> RowOutcome {
        let Some(kind) = &record.building_type else {
            return RowOutcome::Skipped(SkipReason::MissingValue(BLDG_TYPE));
        };

        if let Some(profile) = ctx.config.occupancy.profile(kind) {
            let occupancy = profile.resolve(record.city.as_deref(), record.state.as_deref());
            return Updates::new()
                .number(VACANCY_RATE, occupancy.vacancy, Precision::Fraction)
                .number(UTILIZATION_RATE, occupancy.utilization, Precision::Fraction)
                .resolved(occupancy.resolution);
        }

        // No profile: keep whatever utilization the row already carries
        match (kind.occupancy_signal(), record.value(UTILIZATION_RATE)) {
            (OccupancySignal::Vacancy, _) => RowOutcome::NotApplicable,
            (OccupancySignal::Utilization, Some(utilization)) => Updates::new()
                .number(VACANCY_RATE, 0.0, Precision::Fraction)
                .number(UTILIZATION_RATE, utilization.clamp(0.0, 1.0), Precision::Fraction)
                .exact(),
            (OccupancySignal::Utilization, None) => {
                RowOutcome::Skipped(SkipReason::MissingValue(UTILIZATION_RATE))
            }
        }
    }
}
