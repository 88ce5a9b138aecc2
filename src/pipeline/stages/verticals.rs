//! Building type to portfolio vertical.

use crate::config::Resolution;
use crate::core::columns::{BLDG_TYPE, BLDG_VERTICAL};
use crate::core::BuildingRecord;
use crate::errors::SkipReason;
use crate::pipeline::stage::{RowOutcome, Stage, StageContext, Updates};

pub const OTHER_VERTICAL: &str = "Other";

pub struct VerticalsStage;

impl Stage for VerticalsStage {
    fn name(&self) -> &'static str {
        "verticals"
    }

    fn description(&self) -> &'static str {
        "Map building type to its portfolio vertical"
    }

    fn requires(&self) -> &'static [&'static str] {
        &[BLDG_TYPE]
    }

    fn outputs(&self) -> Vec<&'static str> {
        vec![BLDG_VERTICAL]
    }

    fn evaluate(&self, record: &BuildingRecord, _ctx: &StageContext<'_>) -> RowOutcome {
        let Some(kind) = &record.building_type else {
            return RowOutcome::Skipped(SkipReason::MissingValue(BLDG_TYPE));
        };
        match kind.vertical() {
            Some(vertical) => Updates::new().text(BLDG_VERTICAL, vertical.as_str()).exact(),
            None => Updates::new()
                .text(BLDG_VERTICAL, OTHER_VERTICAL)
                .resolved(Resolution::Default),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::BuildingType;
    use crate::pipeline::stages::test_support::{evaluate, text};

    fn vertical_of(building_type: BuildingType) -> Option<String> {
        let record = BuildingRecord::new("b").with_type(building_type);
        text(&evaluate(&VerticalsStage, &record), BLDG_VERTICAL)
    }

    #[test]
    fn test_known_types() {
        assert_eq!(vertical_of(BuildingType::Hotel).as_deref(), Some("Hospitality"));
        assert_eq!(vertical_of(BuildingType::K12School).as_deref(), Some("Education"));
        assert_eq!(vertical_of(BuildingType::Office).as_deref(), Some("Commercial"));
        assert_eq!(vertical_of(BuildingType::Courthouse).as_deref(), Some("Government"));
    }

    #[test]
    fn test_unknown_type_is_other() {
        let record = BuildingRecord::new("x").with_type(BuildingType::parse("Warehouse"));
        let outcome = evaluate(&VerticalsStage, &record);
        assert!(matches!(
            outcome,
            RowOutcome::Updated {
                resolution: Resolution::Default,
                ..
            }
        ));
        assert_eq!(text(&outcome, BLDG_VERTICAL).as_deref(), Some("Other"));
    }

    #[test]
    fn test_missing_type_is_skipped() {
        assert_eq!(
            evaluate(&VerticalsStage, &BuildingRecord::new("x")),
            RowOutcome::Skipped(SkipReason::MissingValue(BLDG_TYPE))
        );
    }
}
