pub mod dumpconfigschema;
pub mod inspect;
pub mod run;
pub mod shell;

/// Marker error `run` returns once a signal ended it, so `main` can map
/// that to exit code 130 instead of a false 0.
#[derive(Debug)]
pub struct Interrupted;

impl std::fmt::Display for Interrupted {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("interrupted by signal")
    }
}

impl std::error::Error for Interrupted {}
