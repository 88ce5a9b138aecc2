//! Energy consumption after ODCV.
//!
//! Each fuel keeps its non-HVAC share and loses `odcv_pct` of its HVAC share.
//! The post total is the sum of the fuel values as written, so the stored
//! parts always add up to the stored total.

use crate::core::columns::{
    ELEC_KWH, ELEC_KWH_POST, ENERGY_TOTAL_KBTU_POST, HVAC_PCT_ELEC, ODCV_SAVINGS_PCT,
};
use crate::core::fuel::KBTU_PER_KWH;
use crate::core::value::round_to;
use crate::core::{BuildingRecord, Fuel, Precision};
use crate::errors::SkipReason;
use crate::pipeline::stage::{RowOutcome, Stage, StageContext, Updates};

pub struct PostEnergyStage;

/// Fraction of a fuel that remains after ODCV (pure).
pub fn remaining_fraction(hvac_pct: f64, odcv_pct: f64) -> f64 {
    1.0 - hvac_pct * odcv_pct
}

impl Stage for PostEnergyStage {
    fn name(&self) -> &'static str {
        "post_odcv_energy"
    }

    fn description(&self) -> &'static str {
        "Per-fuel and total energy after ODCV"
    }

    fn requires(&self) -> &'static [&'static str] {
        &[HVAC_PCT_ELEC, ODCV_SAVINGS_PCT]
    }

    fn outputs(&self) -> Vec<&'static str> {
        let mut outputs = vec![ELEC_KWH_POST];
        outputs.extend(Fuel::ALL.iter().map(|fuel| fuel.post_energy_column()));
        outputs.push(ENERGY_TOTAL_KBTU_POST);
        outputs
    }

    fn evaluate(&self, record: &BuildingRecord, _ctx: &StageContext<'_>) -> RowOutcome {
        let Some(odcv) = record.value(ODCV_SAVINGS_PCT) else {
            return RowOutcome::Skipped(SkipReason::MissingValue(ODCV_SAVINGS_PCT));
        };
        if Fuel::ALL.iter().all(|fuel| record.energy(*fuel).is_none()) {
            return RowOutcome::Skipped(SkipReason::NoFuelData);
        }

        let remaining =
            |fuel: Fuel| remaining_fraction(record.value(fuel.hvac_pct_column()).unwrap_or(0.0), odcv);

        let mut total = 0.0;
        let mut updates = Updates::new();
        for fuel in Fuel::ALL {
            let post = record
                .energy(fuel)
                .map(|raw| round_to(raw * remaining(fuel), Precision::Amount));
            total += post.unwrap_or(0.0);
            updates = updates.optional(fuel.post_energy_column(), post, Precision::Amount);
        }

        let elec_factor = remaining(Fuel::Electricity);
        let kwh_post = record
            .positive(ELEC_KWH)
            .map(|kwh| kwh * elec_factor)
            .or_else(|| {
                record
                    .energy(Fuel::Electricity)
                    .map(|kbtu| kbtu * elec_factor / KBTU_PER_KWH)
            });

        updates
            .optional(ELEC_KWH_POST, kwh_post, Precision::Amount)
            .number(ENERGY_TOTAL_KBTU_POST, total, Precision::Amount)
            .exact()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::columns::{
        ELEC_KBTU, ELEC_KBTU_POST, FUEL_OIL_KBTU, GAS_KBTU, GAS_KBTU_POST, HVAC_PCT_FUEL_OIL,
        HVAC_PCT_GAS, HVAC_PCT_STEAM, STEAM_KBTU, STEAM_KBTU_POST,
    };
    use crate::core::value::parse_number;
    use crate::pipeline::stages::test_support::{evaluate, is_blanked, number, written};
    use proptest::prelude::*;

    #[test]
    fn test_post_energy_example() {
        // 1000 × (1 − 0.5 × 0.30) = 850
        let record = BuildingRecord::new("b")
            .with_value(ELEC_KBTU, 1_000.0)
            .with_value(HVAC_PCT_ELEC, 0.5)
            .with_value(ODCV_SAVINGS_PCT, 0.30);
        let outcome = evaluate(&PostEnergyStage, &record);

        assert_eq!(number(&outcome, ELEC_KBTU_POST), Some(850.0));
        assert_eq!(number(&outcome, ENERGY_TOTAL_KBTU_POST), Some(850.0));
        assert!(is_blanked(&outcome, STEAM_KBTU_POST));
        let kwh = number(&outcome, ELEC_KWH_POST).unwrap();
        assert!((kwh - 850.0 / KBTU_PER_KWH).abs() < 0.01);
    }

    #[test]
    fn test_fractional_parts_add_up_after_reading_back() {
        let record = BuildingRecord::new("b")
            .with_value(ELEC_KBTU, 1000.123)
            .with_value(GAS_KBTU, 250.456)
            .with_value(STEAM_KBTU, 10.001)
            .with_value(FUEL_OIL_KBTU, 5.004)
            .with_value(HVAC_PCT_ELEC, 0.4517)
            .with_value(HVAC_PCT_GAS, 0.8123)
            .with_value(HVAC_PCT_STEAM, 0.85)
            .with_value(HVAC_PCT_FUEL_OIL, 0.93)
            .with_value(ODCV_SAVINGS_PCT, 0.2733);
        let outcome = evaluate(&PostEnergyStage, &record);
        let read_back = |column: &str| parse_number(&written(&outcome, column).unwrap()).unwrap();

        let parts: f64 = Fuel::ALL
            .into_iter()
            .map(|fuel| read_back(fuel.post_energy_column()))
            .sum();
        assert!((read_back(ENERGY_TOTAL_KBTU_POST) - parts).abs() < 1e-6);
        for fuel in Fuel::ALL {
            assert!(read_back(fuel.post_energy_column()) <= record.energy(fuel).unwrap());
        }
    }

    #[test]
    fn test_kwh_scales_source_kwh() {
        let record = BuildingRecord::new("b")
            .with_value(ELEC_KWH, 2_000.0)
            .with_value(ELEC_KBTU, 6_824.0)
            .with_value(HVAC_PCT_ELEC, 0.5)
            .with_value(ODCV_SAVINGS_PCT, 0.2);
        let outcome = evaluate(&PostEnergyStage, &record);
        assert_eq!(number(&outcome, ELEC_KWH_POST), Some(1_800.0));
    }

    #[test]
    fn test_missing_odcv_is_skipped() {
        let record = BuildingRecord::new("b").with_value(ELEC_KBTU, 1.0);
        assert_eq!(
            evaluate(&PostEnergyStage, &record),
            RowOutcome::Skipped(SkipReason::MissingValue(ODCV_SAVINGS_PCT))
        );
    }

    proptest! {
        #[test]
        fn prop_total_is_sum_of_parts(
            elec in 0.0f64..1e7,
            gas in 0.0f64..1e7,
            elec_pct in 0.0f64..1.0,
            gas_pct in 0.0f64..1.0,
            odcv in 0.0f64..0.5,
        ) {
            let record = BuildingRecord::new("b")
                .with_value(ELEC_KBTU, elec)
                .with_value(GAS_KBTU, gas)
                .with_value(HVAC_PCT_ELEC, elec_pct)
                .with_value(HVAC_PCT_GAS, gas_pct)
                .with_value(ODCV_SAVINGS_PCT, odcv);
            let outcome = evaluate(&PostEnergyStage, &record);
            let parts = number(&outcome, ELEC_KBTU_POST).unwrap()
                + number(&outcome, GAS_KBTU_POST).unwrap();
            let total = number(&outcome, ENERGY_TOTAL_KBTU_POST).unwrap();
            prop_assert!((parts - total).abs() < 1e-6);
            prop_assert!(total <= elec + gas + 0.01);
        }

        #[test]
        fn prop_post_never_exceeds_raw(
            raw in 0.0f64..1e6,
            hvac_pct in 0.0f64..=1.0,
            odcv in 0.0f64..=1.0,
        ) {
            let record = BuildingRecord::new("b")
                .with_value(GAS_KBTU, raw)
                .with_value(HVAC_PCT_GAS, hvac_pct)
                .with_value(ODCV_SAVINGS_PCT, odcv);
            let outcome = evaluate(&PostEnergyStage, &record);
            let post = parse_number(&written(&outcome, GAS_KBTU_POST).unwrap()).unwrap();
            prop_assert!(post <= raw + 0.005);
            prop_assert!(post >= 0.0);
        }
    }
}
