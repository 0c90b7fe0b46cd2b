use thiserror::Error;

/// Reasons a scene buffer cannot be turned into render attributes.
///
/// Decoding stops at the first failure; no partial attribute set is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeFailure {
    #[error("no end_header line within the scanned header prefix")]
    NoHeaderEnd,
    #[error("header declares no vertices or no vertex properties")]
    EmptyOrInvalidHeader,
    #[error("vertex element lacks x, y and z properties")]
    MissingPosition,
    #[error("no vertex with a finite position")]
    NoValidVertices,
    #[error("unsupported payload format: {0}")]
    UnsupportedFormat(String),
    #[error("unsupported property `{name}` in element `{element}`")]
    UnsupportedProperty { element: String, name: String },
}

impl DecodeFailure {
    /// Stable identifier for hosts that branch on the failure type.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NoHeaderEnd => "no_header_end",
            Self::EmptyOrInvalidHeader => "empty_or_invalid_header",
            Self::MissingPosition => "missing_position",
            Self::NoValidVertices => "no_valid_vertices",
            Self::UnsupportedFormat(_) => "unsupported_format",
            Self::UnsupportedProperty { .. } => "unsupported_property",
        }
    }
}
