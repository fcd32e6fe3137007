use std::io::{self, Error as IoError, ErrorKind as IoErrorKind, Read, Write};

use crate::{
    calcwit::signals::SignalStore,
    field::{Field, U256},
    utils::error::Error,
};

use super::layout::CircuitLayout;

const WTNS_MAGIC: &[u8; 4] = b"wtns";
const WTNS_VERSION: u32 = 2;
const SECTION_HEADER: u32 = 1;
const SECTION_VALUES: u32 = 2;
const MAX_PREALLOCATED: usize = 1 << 20;

/// The exported subset of the signal array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Witness<F> {
    pub values: Vec<F>,
}

impl<F: Field> Witness<F> {
    /// Picks the exported signals out of a finished signal store.
    pub fn from_signals(layout: &CircuitLayout<F>, signals: &SignalStore<F>) -> Result<Self, Error> {
        if layout.witness_to_signal.is_empty() {
            return Ok(Witness {
                values: signals.as_slice().to_vec(),
            });
        }
        let values = layout
            .witness_to_signal
            .iter()
            .map(|&s| signals.get(s))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Witness { values })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Writes the circom `.wtns` binary format.
    pub fn serialize_into<W: Write>(&self, mut writer: W) -> Result<(), IoError> {
        let n8 = F::n8();
        writer.write_all(WTNS_MAGIC)?;
        writer.write_all(&WTNS_VERSION.to_le_bytes())?;
        writer.write_all(&2u32.to_le_bytes())?;

        writer.write_all(&SECTION_HEADER.to_le_bytes())?;
        writer.write_all(&((4 + n8 + 4) as u64).to_le_bytes())?;
        writer.write_all(&(n8 as u32).to_le_bytes())?;
        write_u256(&mut writer, F::MODULUS, n8)?;
        writer.write_all(&(self.values.len() as u32).to_le_bytes())?;

        writer.write_all(&SECTION_VALUES.to_le_bytes())?;
        writer.write_all(&((n8 * self.values.len()) as u64).to_le_bytes())?;
        for v in self.values.iter() {
            write_u256(&mut writer, v.to_u256(), n8)?;
        }
        Ok(())
    }

    pub fn deserialize_from<R: Read>(mut reader: R) -> Result<Self, IoError> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if &magic != WTNS_MAGIC {
            return Err(invalid_data("invalid magic"));
        }
        if read_u32(&mut reader)? != WTNS_VERSION {
            return Err(invalid_data("unsupported version"));
        }
        let num_sections = read_u32(&mut reader)?;
        let mut n8 = 0usize;
        let mut count = 0usize;
        let mut values = None;
        for _ in 0..num_sections {
            let section = read_u32(&mut reader)?;
            let size = read_u64(&mut reader)?;
            match section {
                SECTION_HEADER => {
                    n8 = read_u32(&mut reader)? as usize;
                    if n8 != F::n8() || read_u256(&mut reader, n8)? != F::MODULUS {
                        return Err(invalid_data("invalid modulus"));
                    }
                    count = read_u32(&mut reader)? as usize;
                }
                SECTION_VALUES => {
                    let expected = (n8 as u64).checked_mul(count as u64);
                    if n8 == 0 || expected != Some(size) {
                        return Err(invalid_data("values section before or unlike header"));
                    }
                    let mut v = Vec::with_capacity(count.min(MAX_PREALLOCATED));
                    for _ in 0..count {
                        let x = read_u256(&mut reader, n8)?;
                        if x >= F::MODULUS {
                            return Err(invalid_data("value not reduced"));
                        }
                        v.push(F::from_u256(x));
                    }
                    values = Some(v);
                }
                _ => {
                    let skipped = io::copy(&mut (&mut reader).take(size), &mut io::sink())?;
                    if skipped != size {
                        return Err(IoError::new(
                            IoErrorKind::UnexpectedEof,
                            "truncated section".to_string(),
                        ));
                    }
                }
            }
        }
        values
            .map(|values| Witness { values })
            .ok_or_else(|| invalid_data("missing values section"))
    }

    /// JSON array of decimal strings, as written by snarkjs `wej`.
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(&self.values)?)
    }
}

fn invalid_data(msg: &str) -> IoError {
    IoError::new(IoErrorKind::InvalidData, msg.to_string())
}

fn write_u256<W: Write>(writer: &mut W, x: U256, n8: usize) -> Result<(), IoError> {
    writer.write_all(&x.to_le_bytes()[..n8])
}

fn read_u32<R: Read>(reader: &mut R) -> Result<u32, IoError> {
    let mut b = [0u8; 4];
    reader.read_exact(&mut b)?;
    Ok(u32::from_le_bytes(b))
}

fn read_u64<R: Read>(reader: &mut R) -> Result<u64, IoError> {
    let mut b = [0u8; 8];
    reader.read_exact(&mut b)?;
    Ok(u64::from_le_bytes(b))
}

fn read_u256<R: Read>(reader: &mut R, n8: usize) -> Result<U256, IoError> {
    if n8 > 32 {
        return Err(invalid_data("field element too wide"));
    }
    let mut b = [0u8; 32];
    reader.read_exact(&mut b[..n8])?;
    Ok(U256::from_le_bytes(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{BN254, M31};

    #[test]
    fn test_wtns_layout() {
        let w = Witness {
            values: vec![BN254::one(), BN254::from(11u32), -BN254::one()],
        };
        let mut buf = Vec::new();
        w.serialize_into(&mut buf).unwrap();
        assert_eq!(&buf[0..4], b"wtns");
        // header: 12 bytes, section 1: 12 + 40 bytes, section 2: 12 + 3 * 32 bytes
        assert_eq!(buf.len(), 12 + 12 + 40 + 12 + 96);
        assert_eq!(&buf[64..68], &2u32.to_le_bytes());
        assert_eq!(buf[76], 1);
        let back = Witness::<BN254>::deserialize_from(&buf[..]).unwrap();
        assert_eq!(back, w);
    }

    #[test]
    fn test_wtns_rejects_other_field() {
        let w = Witness {
            values: vec![M31::one()],
        };
        let mut buf = Vec::new();
        w.serialize_into(&mut buf).unwrap();
        let err = Witness::<BN254>::deserialize_from(&buf[..]).unwrap_err();
        assert_eq!(err.kind(), IoErrorKind::InvalidData);
    }

    #[test]
    fn test_wtns_untrusted_sizes() {
        let w = Witness {
            values: vec![M31::from(3u32), M31::from(4u32)],
        };
        let mut buf = Vec::new();
        w.serialize_into(&mut buf).unwrap();
        let n8 = M31::n8();
        let count_at = 12 + 12 + 4 + n8;
        let values_at = count_at + 4;

        let mut huge = buf.clone();
        huge[8..12].copy_from_slice(&3u32.to_le_bytes());
        huge.extend_from_slice(&7u32.to_le_bytes());
        huge.extend_from_slice(&u64::MAX.to_le_bytes());
        let err = Witness::<M31>::deserialize_from(&huge[..]).unwrap_err();
        assert_eq!(err.kind(), IoErrorKind::UnexpectedEof);

        let mut overflow = buf.clone();
        overflow[count_at..count_at + 4].copy_from_slice(&u32::MAX.to_le_bytes());
        overflow[values_at + 4..values_at + 12].copy_from_slice(&u64::MAX.to_le_bytes());
        let err = Witness::<M31>::deserialize_from(&overflow[..]).unwrap_err();
        assert_eq!(err.kind(), IoErrorKind::InvalidData);

        let mut unknown = buf.clone();
        unknown[8..12].copy_from_slice(&3u32.to_le_bytes());
        unknown.extend_from_slice(&9u32.to_le_bytes());
        unknown.extend_from_slice(&3u64.to_le_bytes());
        unknown.extend_from_slice(&[1, 2, 3]);
        assert_eq!(Witness::<M31>::deserialize_from(&unknown[..]).unwrap(), w);
    }

    #[test]
    fn test_witness_json() {
        let w = Witness {
            values: vec![M31::one(), M31::from(5u32)],
        };
        let s = w.to_json().unwrap();
        let v: Vec<String> = serde_json::from_str(&s).unwrap();
        assert_eq!(v, vec!["1".to_string(), "5".to_string()]);
    }
}
