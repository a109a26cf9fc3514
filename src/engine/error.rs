/// Transport-layer classification of a failed precheck/commit round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RpcError {
    /// Connection-level failure or timeout.
    Network(String),
    /// Server-reported application error code.
    App(i32),
}

impl std::fmt::Display for RpcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RpcError::Network(msg) => write!(f, "network error: {msg}"),
            RpcError::App(code) => write!(f, "server error code: {code}"),
        }
    }
}

impl std::error::Error for RpcError {}

#[derive(Debug)]
pub enum EngineError {
    /// No enabled workday within the scan bound — a preference/policy
    /// configuration error, not a user mistake.
    NoWorkdayFound,
    /// Structurally malformed recurrence rule.
    InvalidRule(&'static str),
    Rpc(RpcError),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::NoWorkdayFound => {
                write!(f, "no enabled workday within the scan bound")
            }
            EngineError::InvalidRule(msg) => write!(f, "invalid recurrence rule: {msg}"),
            EngineError::Rpc(e) => write!(f, "precheck RPC failed: {e}"),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<RpcError> for EngineError {
    fn from(e: RpcError) -> Self {
        EngineError::Rpc(e)
    }
}
