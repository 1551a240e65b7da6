#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Probability table is empty")]
    Empty,

    #[error("Probability #{index} is {value}, expect a finite non-negative number")]
    InvalidProbability { index: usize, value: f64 },

    #[error("Total probability mass {0} can not be normalized")]
    ZeroMass(f64),

    #[error("Window [{offset}, {offset} + {size}) does not fit in u32 outcomes")]
    OutOfRange { offset: i64, size: usize },

    #[error("Failed to allocate a table of {0} entries")]
    Allocation(usize),
}

pub type Result<T> = std::result::Result<T, Error>;
