use thiserror::Error;

/// Failures reading or writing the people directory and the wake log.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Wake event {0} not found")]
    EventNotFound(String),
}

/// Failures delivering a message through the notification channel.
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Telegram request failed: {0}")]
    Request(#[from] teloxide::RequestError),

    #[error("Invalid destination chat '{0}'")]
    InvalidDestination(String),

    #[error("Delivery timed out after {0}s")]
    Timeout(u64),
}

/// Failures talking to the time-tracking API.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({code})")]
    Api { code: u16 },
}
