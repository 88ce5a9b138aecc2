//! Column names of the portfolio table.
//!
//! The table is wide and mostly free-form; only the columns below are read or
//! written by the pipeline. Everything else passes through untouched.

// Identity
pub const ID_BUILDING: &str = "id_building";
pub const LOC_ADDRESS: &str = "loc_address";
pub const LOC_CITY: &str = "loc_city";
pub const LOC_STATE: &str = "loc_state";
pub const BLDG_TYPE: &str = "bldg_type";
pub const BLDG_VERTICAL: &str = "bldg_vertical";

// Building characteristics
pub const BLDG_SQFT: &str = "bldg_sqft";
pub const BLDG_YEAR_BUILT: &str = "bldg_year_built";
pub const CLIMATE_ZONE: &str = "energy_climate_zone";
pub const ENERGY_STAR_SCORE: &str = "energy_star_score";
pub const SITE_EUI: &str = "energy_site_eui";
pub const PREDICTED_EUI: &str = "energy_predicted_eui";

// Occupancy
pub const VACANCY_RATE: &str = "occ_vacancy_rate";
pub const UTILIZATION_RATE: &str = "occ_utilization_rate";

// Raw energy
pub const ELEC_KWH: &str = "energy_elec_kwh";
pub const ELEC_KBTU: &str = "energy_elec_kbtu";
pub const GAS_KBTU: &str = "energy_gas_kbtu";
pub const STEAM_KBTU: &str = "energy_steam_kbtu";
pub const FUEL_OIL_KBTU: &str = "energy_fuel_oil_kbtu";
pub const ENERGY_TOTAL_KBTU: &str = "energy_total_kbtu";

// Per-building utility rates (optional; the rate schedule fills gaps)
pub const ELEC_RATE_KWH: &str = "cost_elec_rate_kwh";
pub const ELEC_RATE_DEMAND_KW: &str = "cost_elec_rate_demand_kw";
pub const ELEC_LOAD_FACTOR: &str = "cost_elec_load_factor";
pub const GAS_RATE_THERM: &str = "cost_gas_rate_therm";
pub const STEAM_RATE_MLB: &str = "cost_steam_rate_mlb";
pub const FUEL_OIL_RATE_MMBTU: &str = "cost_fuel_oil_rate_mmbtu";

// HVAC share
pub const HVAC_PCT_ELEC: &str = "hvac_pct_elec";
pub const HVAC_PCT_GAS: &str = "hvac_pct_gas";
pub const HVAC_PCT_STEAM: &str = "hvac_pct_steam";
pub const HVAC_PCT_FUEL_OIL: &str = "hvac_pct_fuel_oil";

pub const ODCV_SAVINGS_PCT: &str = "odcv_hvac_savings_pct";

// Current costs
pub const COST_ELEC_PEAK_KW: &str = "cost_elec_peak_kw";
pub const COST_ELEC_ENERGY: &str = "cost_elec_energy_annual";
pub const COST_ELEC_DEMAND: &str = "cost_elec_demand_annual";
pub const COST_ELEC_TOTAL: &str = "cost_elec_total_annual";
pub const COST_GAS: &str = "cost_gas_annual";
pub const COST_STEAM: &str = "cost_steam_annual";
pub const COST_FUEL_OIL: &str = "cost_fuel_oil_annual";

// HVAC totals
pub const HVAC_ENERGY_TOTAL: &str = "hvac_energy_total_kbtu";
pub const HVAC_COST_TOTAL: &str = "hvac_cost_total_annual";

// Post-ODCV energy
pub const ELEC_KWH_POST: &str = "energy_elec_kwh_post_odcv";
pub const ELEC_KBTU_POST: &str = "energy_elec_kbtu_post_odcv";
pub const GAS_KBTU_POST: &str = "energy_gas_kbtu_post_odcv";
pub const STEAM_KBTU_POST: &str = "energy_steam_kbtu_post_odcv";
pub const FUEL_OIL_KBTU_POST: &str = "energy_fuel_oil_kbtu_post_odcv";
pub const ENERGY_TOTAL_KBTU_POST: &str = "energy_total_kbtu_post_odcv";

// Post-ODCV costs
pub const COST_ELEC_ENERGY_POST: &str = "cost_elec_energy_annual_post_odcv";
pub const COST_ELEC_DEMAND_POST: &str = "cost_elec_demand_annual_post_odcv";
pub const COST_ELEC_TOTAL_POST: &str = "cost_elec_total_annual_post_odcv";
pub const COST_GAS_POST: &str = "cost_gas_annual_post_odcv";
pub const COST_STEAM_POST: &str = "cost_steam_annual_post_odcv";
pub const COST_FUEL_OIL_POST: &str = "cost_fuel_oil_annual_post_odcv";

// Carbon
pub const CARBON_TOTAL: &str = "carbon_emissions_total_mt";
pub const CARBON_POST: &str = "carbon_emissions_post_odcv_mt";
pub const CARBON_REDUCTION: &str = "odcv_carbon_reduction_yr1_mt";

// Valuation
pub const FINE_AVOIDED: &str = "bps_fine_avoided_yr1_usd";
pub const CAP_RATE: &str = "val_cap_rate_pct";
pub const ODCV_DOLLAR_SAVINGS: &str = "odcv_hvac_savings_annual_usd";
pub const OPEX_AVOIDED: &str = "savings_opex_avoided_annual_usd";
pub const VAL_CURRENT: &str = "val_current_usd";
pub const VAL_POST: &str = "val_post_odcv_usd";
pub const VAL_IMPACT: &str = "val_odcv_impact_usd";

// Efficiency score
pub const SITE_EUI_POST: &str = "energy_site_eui_post_odcv";
pub const ENERGY_STAR_SCORE_POST: &str = "energy_star_score_post_odcv";

/// Columns every table must carry to be recognised as a portfolio table.
pub const IDENTITY_SCHEMA: &[&str] = &[ID_BUILDING, LOC_CITY, LOC_STATE, BLDG_TYPE];

/// Numeric columns parsed into a [`BuildingRecord`](super::record::BuildingRecord).
pub const NUMERIC_COLUMNS: &[&str] = &[
    BLDG_SQFT,
    BLDG_YEAR_BUILT,
    ENERGY_STAR_SCORE,
    SITE_EUI,
    PREDICTED_EUI,
    VACANCY_RATE,
    UTILIZATION_RATE,
    ELEC_KWH,
    ELEC_KBTU,
    GAS_KBTU,
    STEAM_KBTU,
    FUEL_OIL_KBTU,
    ENERGY_TOTAL_KBTU,
    ELEC_RATE_KWH,
    ELEC_RATE_DEMAND_KW,
    ELEC_LOAD_FACTOR,
    GAS_RATE_THERM,
    STEAM_RATE_MLB,
    FUEL_OIL_RATE_MMBTU,
    HVAC_PCT_ELEC,
    HVAC_PCT_GAS,
    HVAC_PCT_STEAM,
    HVAC_PCT_FUEL_OIL,
    ODCV_SAVINGS_PCT,
    COST_ELEC_PEAK_KW,
    COST_ELEC_ENERGY,
    COST_ELEC_DEMAND,
    COST_ELEC_TOTAL,
    COST_GAS,
    COST_STEAM,
    COST_FUEL_OIL,
    HVAC_ENERGY_TOTAL,
    HVAC_COST_TOTAL,
    ELEC_KWH_POST,
    ELEC_KBTU_POST,
    GAS_KBTU_POST,
    STEAM_KBTU_POST,
    FUEL_OIL_KBTU_POST,
    ENERGY_TOTAL_KBTU_POST,
    COST_ELEC_ENERGY_POST,
    COST_ELEC_DEMAND_POST,
    COST_ELEC_TOTAL_POST,
    COST_GAS_POST,
    COST_STEAM_POST,
    COST_FUEL_OIL_POST,
    CARBON_TOTAL,
    CARBON_POST,
    CARBON_REDUCTION,
    FINE_AVOIDED,
    CAP_RATE,
    ODCV_DOLLAR_SAVINGS,
    OPEX_AVOIDED,
    VAL_CURRENT,
    VAL_POST,
    VAL_IMPACT,
    SITE_EUI_POST,
    ENERGY_STAR_SCORE_POST,
];
