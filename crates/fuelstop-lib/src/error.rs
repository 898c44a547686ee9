use thiserror::Error;

/// Convenient result alias for the fuelstop library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Carrier profile is missing a field required by the requested mode, or
    /// the request combines a mode with a fuel unit it cannot use.
    #[error("carrier configuration error: {message}")]
    Configuration { message: String },

    /// The search exhausted every reachable state without meeting the goal.
    #[error("no feasible route: {reason}")]
    InfeasibleRoute { reason: String },

    /// Request parameters that make the state space meaningless.
    #[error("degenerate input: {message}")]
    DegenerateInput { message: String },

    /// Raised when a carrier name could not be found in the catalog.
    #[error("unknown carrier: {name}{}", format_suggestions(.suggestions))]
    UnknownCarrier {
        name: String,
        suggestions: Vec<String>,
    },

    /// Raised when a transport mode string is not recognised.
    #[error("unknown transport mode '{value}'; expected maritime, air, road or rail")]
    UnknownMode { value: String },

    /// Raised when carrier data fails validation.
    #[error("invalid carrier data: {message}")]
    CarrierDataValidation { message: String },

    /// Raised when duplicate carrier names are encountered during catalog load.
    #[error("duplicate carrier name encountered: {name}")]
    DuplicateCarrierName { name: String },

    /// Raised when a node catalog row fails validation.
    #[error("invalid node data: {message}")]
    NodeDataValidation { message: String },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for JSON parsing errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error is the recoverable "no route" outcome rather than
    /// a problem with the inputs.
    pub fn is_infeasible(&self) -> bool {
        matches!(self, Error::InfeasibleRoute { .. })
    }
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}
