//! Data models for Yearly

pub mod country;
pub mod preferences;
pub mod stats;
pub mod visit;

// Re-export commonly used types
pub use country::{Country, CountryDirectory, IsoCountryDirectory};
pub use preferences::{ColorScheme, DisplayPreferences, FlagDisplay};
pub use stats::{CountryDays, CountryVisits, MonthlyBreakdown, RankedCountry, Stay, YearStats};
pub use visit::{CreateVisits, Visit, VisitCollection};
