use deriv_error::Error as DerivError;

/// Utility enum to package errors that can occur while differentiating an input line.
#[derive(Debug)]
pub enum Error {
    /// Error that occurred while parsing.
    ParseError(DerivError),

    /// Error that occurred while differentiating or simplifying.
    DeriveError(DerivError),

    /// Error that occurred while evaluating the derivative.
    EvalError(DerivError),
}

impl Error {
    /// Returns the underlying error, whatever stage produced it.
    pub fn inner(&self) -> &DerivError {
        match self {
            Self::ParseError(err) | Self::DeriveError(err) | Self::EvalError(err) => err,
        }
    }

    /// Report the error to stderr, highlighting the given input. If the report cannot be
    /// written, the plain message is printed instead.
    pub fn report_to_stderr(&self, input: &str) {
        let err = self.inner();
        if err.report_to_stderr("input", input).is_err() {
            eprintln!("error: {}", err);
        }
    }
}
