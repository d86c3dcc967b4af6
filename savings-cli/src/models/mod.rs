mod simulation_form;

pub use simulation_form::{FormErrors, SimulationForm};
