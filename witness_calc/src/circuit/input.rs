use std::collections::BTreeMap;

use serde_json::Value;

use crate::{
    field::{parse_field, Field},
    utils::error::Error,
};

/// 64-bit FNV-1a, the hash used to key main input signals by name.
pub fn fnv1a(s: &str) -> u64 {
    let mut hash: u64 = 0xCBF29CE484222325;
    for b in s.bytes() {
        hash ^= b as u64;
        hash = hash.wrapping_mul(0x100000001B3);
    }
    hash
}

/// Primary input values, by signal name, flattened row-major.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputSignals<F> {
    values: BTreeMap<String, Vec<F>>,
}

impl<F: Field> InputSignals<F> {
    pub fn new() -> Self {
        InputSignals {
            values: BTreeMap::new(),
        }
    }

    pub fn set(&mut self, name: &str, values: Vec<F>) {
        self.values.insert(name.to_string(), values);
    }

    pub fn with(mut self, name: &str, values: Vec<F>) -> Self {
        self.set(name, values);
        self
    }

    pub fn get(&self, name: &str) -> Option<&[F]> {
        self.values.get(name).map(|v| v.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[F])> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parses a circom `input.json` object. Values may be numbers, decimal
    /// or `0x` strings, possibly negative, nested in arrays of any depth.
    pub fn from_json(s: &str) -> Result<Self, Error> {
        let value: Value = serde_json::from_str(s)?;
        let obj = match value {
            Value::Object(obj) => obj,
            _ => {
                return Err(Error::UserError(
                    "input must be a json object".to_string(),
                ))
            }
        };
        let mut res = InputSignals::new();
        for (name, v) in obj.iter() {
            let mut flat = Vec::new();
            flatten(&mut flat, v).map_err(|e| e.prepend(&format!("input {}", name)))?;
            res.set(name, flat);
        }
        Ok(res)
    }
}

fn flatten<F: Field>(out: &mut Vec<F>, v: &Value) -> Result<(), Error> {
    match v {
        Value::Array(items) => {
            for item in items.iter() {
                flatten(out, item)?;
            }
            Ok(())
        }
        Value::Number(n) => {
            out.push(parse_number(&n.to_string())?);
            Ok(())
        }
        Value::String(s) => {
            out.push(parse_number(s)?);
            Ok(())
        }
        Value::Bool(b) => {
            out.push(if *b { F::one() } else { F::zero() });
            Ok(())
        }
        _ => Err(Error::UserError(format!("unsupported value {}", v))),
    }
}

fn parse_number<F: Field>(s: &str) -> Result<F, Error> {
    parse_field(s).ok_or_else(|| Error::UserError(format!("invalid number {:?}", s)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::BN254;

    #[test]
    fn test_fnv1a() {
        assert_eq!(fnv1a(""), 0xcbf29ce484222325);
        assert_eq!(fnv1a("a"), 0xaf63dc4c8601ec8c);
        assert_ne!(fnv1a("in"), fnv1a("e"));
    }

    #[test]
    fn test_input_from_json() {
        let inputs = InputSignals::<BN254>::from_json(
            r#"{"in": 11, "m": [["1", "0x2"], [-1, "-3"]], "flag": true}"#,
        )
        .unwrap();
        assert_eq!(inputs.get("in"), Some(&[BN254::from(11u32)][..]));
        assert_eq!(
            inputs.get("m").unwrap(),
            &[
                BN254::from(1u32),
                BN254::from(2u32),
                -BN254::from(1u32),
                -BN254::from(3u32)
            ]
        );
        assert_eq!(inputs.get("flag"), Some(&[BN254::one()][..]));
        assert_eq!(inputs.len(), 3);
    }

    #[test]
    fn test_input_errors() {
        assert!(InputSignals::<BN254>::from_json("[1, 2]").unwrap_err().is_user());
        let err = InputSignals::<BN254>::from_json(r#"{"in": "abc"}"#).unwrap_err();
        assert_eq!(err, Error::UserError("input in: invalid number \"abc\"".to_string()));
        assert!(InputSignals::<BN254>::from_json(r#"{"in": 1.5}"#).is_err());
    }
}
