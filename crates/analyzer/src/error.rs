use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("No analytics rows in the requested window for symbol '{0}'")]
    EmptyWindow(String),
}
