use dbdesk_gateway::ClientError;

#[derive(Debug, thiserror::Error)]
pub enum StrategyError {
    /// Whatever the chosen backend's client raised, untranslated.
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("{0}")]
    InvalidInput(String),
}
