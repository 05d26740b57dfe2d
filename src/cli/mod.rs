mod root;
mod simulate;

pub use root::Cli;
pub use simulate::{parse_script, run_script, SimulateCommand, Step};
