pub mod gamma;

pub use gamma::{gamma_cdf, gamma_ppf};
