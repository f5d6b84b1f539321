//! Packed multi-call payload.
//!
//! Each record is `address (20 bytes) ‖ uint256 length (32 bytes, big-endian) ‖ data`, records
//! are concatenated with no delimiter, and the executor replays them front to back. Steps are
//! causally ordered (an approval must land before the call that spends it), so assembly never
//! reorders, merges, or deduplicates records.

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolValue;

use crate::models::trade::{EncodedStep, Payload};

use super::TradeError;

const ADDRESS_BYTES: usize = 20;
const LENGTH_BYTES: usize = 32;
const RECORD_HEADER_BYTES: usize = ADDRESS_BYTES + LENGTH_BYTES;

/// Packs one step as `abi.encodePacked(target, uint256(data.length), data)`.
pub fn pack_step(step: &EncodedStep) -> Vec<u8> {
    (step.target(), U256::from(step.length()), step.data().clone()).abi_encode_packed()
}

/// Concatenates `steps` in order into one payload.
pub fn assemble(steps: &[EncodedStep]) -> Payload {
    let capacity = steps
        .iter()
        .map(|step| RECORD_HEADER_BYTES + step.length())
        .sum();
    let mut packed = Vec::with_capacity(capacity);
    for step in steps {
        packed.extend(pack_step(step));
    }
    Payload::new(Bytes::from(packed), steps.len())
}

/// Splits a packed payload back into its records by walking the length prefixes until the
/// buffer is exhausted.
pub fn split_payload(payload: &[u8]) -> Result<Vec<EncodedStep>, TradeError> {
    let mut steps = Vec::new();
    let mut offset = 0usize;

    while offset < payload.len() {
        let remaining = payload.len() - offset;
        if remaining < RECORD_HEADER_BYTES {
            return Err(TradeError::invalid(format!(
                "Truncated payload record header at offset {}: {} bytes left",
                offset, remaining
            )));
        }

        let target = Address::from_slice(&payload[offset..offset + ADDRESS_BYTES]);
        let length_word =
            U256::from_be_slice(&payload[offset + ADDRESS_BYTES..offset + RECORD_HEADER_BYTES]);
        let data_start = offset + RECORD_HEADER_BYTES;
        let available = payload.len() - data_start;
        if length_word > U256::from(available) {
            return Err(TradeError::invalid(format!(
                "Payload record at offset {} declares {} bytes but only {} remain",
                offset, length_word, available
            )));
        }
        let length = length_word.to::<usize>();

        let data = Bytes::copy_from_slice(&payload[data_start..data_start + length]);
        steps.push(EncodedStep::from_parts(target, length, data));
        offset = data_start + length;
    }

    Ok(steps)
}
