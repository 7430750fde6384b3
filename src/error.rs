use thiserror::Error;

/// Errors raised while decoding geometries or rendering them.
///
/// Every variant aborts the call it occurs in; nothing partial is returned.
#[derive(Error, Debug)]
pub enum Error {
    #[error("geometry is missing the `{0}` field")]
    MissingField(&'static str),

    #[error("unsupported geometry type `{0}`")]
    UnsupportedGeometryKind(String),

    #[error("malformed coordinates: {0}")]
    MalformedCoordinate(String),

    #[error("{0} is not implemented")]
    NotImplemented(&'static str),

    #[error("region code `{0}` is not an integer")]
    NonNumericCode(String),

    #[error("unexpected document structure: {0}")]
    Schema(String),

    #[error("invalid properties: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
