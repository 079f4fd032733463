//! Contract values as carried in call arguments and simulation results.

use serde::{Deserialize, Serialize};

use crate::error::RpcError;

/// A contract value. Serialized externally tagged, e.g. `{"u32": 3}` or
/// `{"vec": [{"u32": 3}, {"u32": 5}]}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScVal {
    Void,
    Bool(bool),
    U32(u32),
    I32(i32),
    U64(u64),
    I64(i64),
    U128(u128),
    Symbol(String),
    Vec(Vec<ScVal>),
}

impl ScVal {
    /// The value as a non-negative count, if it is an integer.
    pub fn as_count(&self) -> Option<u64> {
        match *self {
            Self::U32(v) => Some(u64::from(v)),
            Self::U64(v) => Some(v),
            Self::I32(v) => u64::try_from(v).ok(),
            Self::I64(v) => u64::try_from(v).ok(),
            Self::U128(v) => u64::try_from(v).ok(),
            _ => None,
        }
    }

    /// Decode a two-element tuple of integer counts.
    pub fn as_count_pair(&self) -> Result<(u64, u64), RpcError> {
        match self {
            Self::Vec(items) if items.len() == 2 => {
                let first = items[0].as_count();
                let second = items[1].as_count();
                match (first, second) {
                    (Some(a), Some(b)) => Ok((a, b)),
                    _ => Err(RpcError::InvalidResponse(format!(
                        "tuple elements are not counts: {items:?}"
                    ))),
                }
            }
            other => Err(RpcError::InvalidResponse(format!(
                "expected a two-element tuple, got {other:?}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_pair_from_json() {
        let val: ScVal =
            serde_json::from_str(r#"{"vec":[{"u32":3},{"u32":5}]}"#).unwrap();
        assert_eq!(val.as_count_pair().unwrap(), (3, 5));
    }

    #[test]
    fn test_mixed_integer_widths() {
        let val = ScVal::Vec(vec![ScVal::I64(7), ScVal::U64(11)]);
        assert_eq!(val.as_count_pair().unwrap(), (7, 11));
        let wide = ScVal::Vec(vec![ScVal::U128(2), ScVal::I32(4)]);
        assert_eq!(wide.as_count_pair().unwrap(), (2, 4));
    }

    #[test]
    fn test_rejects_bad_shapes() {
        assert!(ScVal::Void.as_count_pair().is_err());
        assert!(ScVal::Vec(vec![ScVal::U32(1)]).as_count_pair().is_err());
        assert!(ScVal::Vec(vec![ScVal::U32(1), ScVal::Bool(true)])
            .as_count_pair()
            .is_err());
        assert!(ScVal::Vec(vec![ScVal::I32(-1), ScVal::U32(1)])
            .as_count_pair()
            .is_err());
    }

    #[test]
    fn test_void_serializes_as_string() {
        assert_eq!(serde_json::to_string(&ScVal::Void).unwrap(), r#""void""#);
    }
}
