use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("invalid {what}: {value}")]
    InvalidParameter { what: &'static str, value: f64 },
    #[error("probability vector has {got} entries, expected {expected}")]
    DistributionLength { expected: usize, got: usize },
}
