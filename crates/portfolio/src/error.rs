use thiserror::Error;

#[derive(Error, Debug)]
pub enum PortfolioError {
    #[error("A portfolio needs at least 2 symbols, got {0}")]
    NotEnoughSymbols(usize),

    #[error("Bad close-price data: {0}")]
    Data(String),

    #[error("Calculation error: {0}")]
    Calculation(String),
}
