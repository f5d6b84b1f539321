use axum::http::StatusCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeErrorKind {
    /// Malformed address, amount literal, or route description.
    InvalidRequest,
    /// amountIn is zero.
    InvalidTradeAmount,
    /// The amount cannot be rendered as a smallest-unit integer without rounding.
    PrecisionLoss,
    /// Quoting service or route preview failed; the caller may retry.
    QuoteUnavailable,
    /// A required executor address is not configured.
    Unconfigured,
    Internal,
}

impl TradeErrorKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::InvalidTradeAmount => "invalid_trade_amount",
            Self::PrecisionLoss => "precision_loss",
            Self::QuoteUnavailable => "quote_unavailable",
            Self::Unconfigured => "unconfigured",
            Self::Internal => "internal",
        }
    }
}

#[derive(Debug)]
pub struct TradeError {
    kind: TradeErrorKind,
    message: String,
}

impl TradeError {
    pub fn invalid<T: Into<String>>(message: T) -> Self {
        Self {
            kind: TradeErrorKind::InvalidRequest,
            message: message.into(),
        }
    }

    pub fn invalid_amount<T: Into<String>>(message: T) -> Self {
        Self {
            kind: TradeErrorKind::InvalidTradeAmount,
            message: message.into(),
        }
    }

    pub fn precision_loss<T: Into<String>>(message: T) -> Self {
        Self {
            kind: TradeErrorKind::PrecisionLoss,
            message: message.into(),
        }
    }

    pub fn quote_unavailable<T: Into<String>>(message: T) -> Self {
        Self {
            kind: TradeErrorKind::QuoteUnavailable,
            message: message.into(),
        }
    }

    pub fn unconfigured<T: Into<String>>(message: T) -> Self {
        Self {
            kind: TradeErrorKind::Unconfigured,
            message: message.into(),
        }
    }

    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self {
            kind: TradeErrorKind::Internal,
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self.kind {
            TradeErrorKind::InvalidRequest | TradeErrorKind::InvalidTradeAmount => {
                StatusCode::BAD_REQUEST
            }
            TradeErrorKind::PrecisionLoss => StatusCode::UNPROCESSABLE_ENTITY,
            TradeErrorKind::QuoteUnavailable => StatusCode::BAD_GATEWAY,
            TradeErrorKind::Unconfigured => StatusCode::PRECONDITION_FAILED,
            TradeErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> TradeErrorKind {
        self.kind
    }
}

impl std::fmt::Display for TradeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind.label(), self.message)
    }
}

impl std::error::Error for TradeError {}
