// Shared fixtures for odcvmap integration tests
#![allow(dead_code)]

use indoc::indoc;
use odcvmap::Dataset;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Small portfolio covering every fuel, a profiled venue in a state-only
/// lookup, a restaurant with a city entry, and a row missing its type.
pub const PORTFOLIO: &str = indoc! {"
    id_building,loc_city,loc_state,bldg_type,bldg_sqft,bldg_year_built,energy_star_score,energy_site_eui,occ_utilization_rate,energy_elec_kwh,energy_elec_kbtu,energy_gas_kbtu,energy_steam_kbtu,energy_fuel_oil_kbtu,notes
    B1,Boston,MA,Office,120000,1975,62,85.5,,2500000,8530000,1500000,250000,,\"corner, lot\"
    B2,Aurora,CO,Venue,40000,2001,,110,,600000,2047200,900000,,,
    B3,Boston,MA,Restaurant/Bar,6000,1990,40,250,,300000,1023600,450000,,,
    B4,New York,NY,K-12 School,90000,1962,55,70,,900000,3070800,2500000,,120000,
    B5,Omaha,NE,,15000,1985,,,,,,,,,no type
"};

/// Fractional energies, a data center burning fuel oil, and an office already
/// at the top of the Energy Star scale.
pub const FRACTIONAL: &str = indoc! {"
    id_building,loc_city,loc_state,bldg_type,bldg_sqft,bldg_year_built,energy_star_score,energy_site_eui,occ_utilization_rate,energy_elec_kwh,energy_elec_kbtu,energy_gas_kbtu,energy_steam_kbtu,energy_fuel_oil_kbtu,notes
    F1,Boston,MA,Office,50000,2005,100,80,,,1000.123,250.456,10.001,5.004,
    F2,Boston,MA,Data Center,20000,2010,,300,,,4000.5,,,500,
    F3,Chicago,IL,Office,30000,1999,73,95.5,,,2000.777,1200.333,,,
"};

pub struct Workspace {
    pub dir: TempDir,
    pub data: PathBuf,
}

impl Workspace {
    pub fn new() -> Self {
        Self::with_data(PORTFOLIO)
    }

    pub fn with_data(contents: &str) -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let data = dir.path().join("portfolio.csv");
        fs::write(&data, contents).expect("write portfolio");
        Self { dir, data }
    }

    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).expect("write fixture");
        path
    }

    pub fn backup_dir(&self) -> PathBuf {
        self.dir.path().join("backups")
    }

    pub fn read_data(&self) -> String {
        fs::read_to_string(&self.data).expect("read portfolio")
    }

    pub fn load(&self) -> Dataset {
        Dataset::load(&self.data).expect("load portfolio")
    }

    pub fn backups(&self) -> Vec<PathBuf> {
        list_files(&self.backup_dir())
    }
}

pub fn list_files(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .collect();
    files.sort();
    files
}

/// Numeric cell of the row whose id is `id`.
pub fn number(dataset: &Dataset, id: &str, column: &str) -> Option<f64> {
    text(dataset, id, column).and_then(|cell| cell.parse().ok())
}

pub fn text(dataset: &Dataset, id: &str, column: &str) -> Option<String> {
    let row = (0..dataset.len()).find(|&row| dataset.cell(row, "id_building") == Some(id))?;
    dataset
        .cell(row, column)
        .filter(|cell| !cell.is_empty())
        .map(str::to_string)
}
