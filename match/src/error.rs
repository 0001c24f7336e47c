use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The inbound stream is closed; nothing more can be submitted
    #[error("matching engine is closed")]
    Closed,
    #[error("order {order_id} rejected: {reason}")]
    Rejected { order_id: String, reason: String },
    #[error("order {0} was already submitted")]
    DuplicateOrder(String),
    /// The engine went away before it resolved a receipt
    #[error("matching engine stopped before answering")]
    Dropped,
    #[error("matching engine task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
