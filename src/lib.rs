pub mod app;
pub mod blast;
pub mod config;
pub mod errors;
pub mod external;
pub mod runner;
pub mod seq;
pub mod testing;
pub mod workspace;

use crate::errors::PipelineError;

pub fn run() -> Result<(), PipelineError> {
    runner::run()
}
