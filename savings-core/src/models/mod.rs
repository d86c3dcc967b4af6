mod bracket_table;
mod period;
mod profession;
mod simulation;
mod tax_bracket;

pub use bracket_table::{BracketTable, BracketTableError, BracketTables, CONTINUITY_TOLERANCE};
pub use period::Period;
pub use profession::Profession;
pub use simulation::{MAX_AMOUNT, PROJECTION_HORIZONS, Projection, SimulationInput, SimulationReport};
pub use tax_bracket::TaxBracket;
