use thiserror::Error;

/// Request validation errors. Every one of these is raised before any
/// upstream call is issued, except `RejectedByUpstream`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter: '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },
    #[error("symbol '{symbol}' is malformed: {reason}")]
    SymbolMalformed { symbol: String, reason: &'static str },

    #[error(
        "unsupported function '{value}', expected one of TIME_SERIES_INTRADAY, \
         TIME_SERIES_DAILY, TIME_SERIES_WEEKLY, TIME_SERIES_MONTHLY"
    )]
    UnsupportedFunction { value: String },
    #[error("invalid interval '{value}', expected one of 1min, 5min, 15min, 30min, 60min")]
    InvalidInterval { value: String },
    #[error("an interval is required for TIME_SERIES_INTRADAY (e.g. '1min', '5min', '15min', '30min', '60min')")]
    MissingInterval,

    #[error("news limit must be greater than zero")]
    ZeroLimit,

    #[error("symbol '{symbol}' is not available in demo mode")]
    NotInDemoAllowList { symbol: String },

    #[error("upstream rejected the request: {message}")]
    RejectedByUpstream { message: String },
}

/// Why a single credential attempt failed. These values drive rotation and
/// only reach callers inside [`FetchError::Exhausted`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AttemptError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("upstream returned status {status}")]
    Status { status: u16 },
    #[error("unexpected payload: {0}")]
    UnexpectedPayload(String),
    #[error("minute throttle persisted after retries: {0}")]
    Throttled(String),
    #[error("daily cap reached: {0}")]
    DailyCap(String),
    #[error("no credentials configured for {upstream}")]
    NoCredentials { upstream: &'static str },
}

/// Errors that cross the client boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Bad function, symbol, interval or limit. Never retried.
    #[error(transparent)]
    Parameter(#[from] ValidationError),

    /// The daily quota is spent; retrying today will not help.
    #[error("daily request limit reached, try again tomorrow: {message}")]
    DailyCap { message: String },

    /// Every credential was tried and none produced a usable payload.
    #[error("{}", render_exhausted(.last_error, .daily_cap))]
    Exhausted {
        last_error: AttemptError,
        daily_cap: Option<String>,
    },
}

impl FetchError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Parameter(_) => "fetch.parameter",
            Self::DailyCap { .. } => "fetch.daily_cap",
            Self::Exhausted { .. } => "fetch.exhausted",
        }
    }

    pub const fn is_parameter_error(&self) -> bool {
        matches!(self, Self::Parameter(_))
    }
}

fn render_exhausted(last_error: &AttemptError, daily_cap: &Option<String>) -> String {
    match daily_cap {
        Some(message) => format!(
            "all credentials exhausted; daily request limit reached: {message} (last error: {last_error})"
        ),
        None => format!("all credentials exhausted; last error: {last_error}"),
    }
}

/// Configuration loading errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {name}: {reason}")]
    InvalidValue {
        name: String,
        value: String,
        reason: String,
    },
}
