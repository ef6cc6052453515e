use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("request to the rate service failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("rate service returned HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed SOAP envelope: {0}")]
    Envelope(#[from] quick_xml::Error),

    #[error("SOAP response is missing {0}")]
    MissingElement(&'static str),

    #[error("can't decode indicator document: {0}")]
    Decode(#[from] quick_xml::DeError),

    #[error("indicator {indicator} published a non-numeric value {value:?}")]
    BadValue { indicator: u32, value: String },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("currency {0} is not registered")]
    UnknownCurrency(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}
