//! Domain types shared by every stage.

pub mod building_type;
pub mod columns;
pub mod fuel;
pub mod record;
pub mod value;

pub use building_type::{BuildingType, ClimateZone, OccupancySignal, Vertical};
pub use fuel::{Fuel, PerFuel};
pub use record::BuildingRecord;
pub use value::{format_number, parse_number, parse_text, Precision};
