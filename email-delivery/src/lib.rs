pub mod settings;
pub mod smtp_sender;

pub use settings::{parse_port, split_recipients, SmtpSettings, DEFAULT_SMTP_PORT};
pub use smtp_sender::SmtpMailer;

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("Missing required setting: {0}")]
    MissingSetting(&'static str),

    #[error("Invalid address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("No valid recipients in '{0}'")]
    NoRecipients(String),

    #[error("Failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

pub type Result<T> = std::result::Result<T, DeliveryError>;
