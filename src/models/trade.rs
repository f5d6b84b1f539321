use alloy_primitives::{Address, Bytes};
use num_bigint::BigUint;

/// Trade parameters the executor checks before and after replaying the payload.
///
/// Only [`crate::services::encode::TradeRequestBuilder`] constructs one, after validating the
/// amount, so a descriptor in hand always carries `amount_in > 0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeDescriptor {
    holder: Address,
    input_asset: Address,
    output_asset: Address,
    amount_in: BigUint,
    min_amount_out: BigUint,
}

impl TradeDescriptor {
    pub(crate) fn new(
        holder: Address,
        input_asset: Address,
        output_asset: Address,
        amount_in: BigUint,
        min_amount_out: BigUint,
    ) -> Self {
        Self {
            holder,
            input_asset,
            output_asset,
            amount_in,
            min_amount_out,
        }
    }

    pub fn holder(&self) -> Address {
        self.holder
    }

    pub fn input_asset(&self) -> Address {
        self.input_asset
    }

    pub fn output_asset(&self) -> Address {
        self.output_asset
    }

    pub fn amount_in(&self) -> &BigUint {
        &self.amount_in
    }

    pub fn min_amount_out(&self) -> &BigUint {
        &self.min_amount_out
    }
}

/// One call the executor replays: `target.call(data)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallStep {
    pub target: Address,
    pub data: Bytes,
}

impl CallStep {
    pub fn new(target: Address, data: impl Into<Bytes>) -> Self {
        Self {
            target,
            data: data.into(),
        }
    }
}

/// Transport form of a [`CallStep`]: `(target, length, data)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedStep {
    target: Address,
    length: usize,
    data: Bytes,
}

impl EncodedStep {
    /// Pairs a declared length with the call data it describes.
    ///
    /// # Panics
    ///
    /// Panics when `declared_length` differs from `data.len()`. The packed layout frames records
    /// only by their length prefix, so a wrong length corrupts every record after it.
    pub fn from_parts(target: Address, declared_length: usize, data: Bytes) -> Self {
        assert!(
            declared_length == data.len(),
            "EncodingInvariantViolation: declared length {} does not match {} data bytes for target {}",
            declared_length,
            data.len(),
            target
        );
        Self {
            target,
            length: declared_length,
            data,
        }
    }

    pub fn target(&self) -> Address {
        self.target
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn into_call_step(self) -> CallStep {
        CallStep {
            target: self.target,
            data: self.data,
        }
    }
}

/// Packed, order-preserving sequence of encoded steps.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Payload {
    bytes: Bytes,
    step_count: usize,
}

impl Payload {
    pub(crate) fn new(bytes: Bytes, step_count: usize) -> Self {
        Self { bytes, step_count }
    }

    pub fn as_bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }
}

/// Extra fields the remote quoting service returns next to the route.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteMetadata {
    pub to: Option<Address>,
    pub allowance_target: Option<Address>,
    pub buy_amount: Option<BigUint>,
    pub price: Option<String>,
}

/// Route bytes produced for one trade.
///
/// `expected_out` is only set for routes assembled locally from a router preview; remote quotes
/// fold the amount into the route server-side and report it in `metadata.buy_amount` instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteResult {
    pub route: Bytes,
    pub expected_out: Option<BigUint>,
    pub metadata: QuoteMetadata,
}

/// Argument tuple for `execute(descriptor, swapper, data)` on the trade factory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionArgs {
    pub executor: Address,
    pub descriptor: TradeDescriptor,
    pub swapper: Address,
    pub data: Bytes,
}
