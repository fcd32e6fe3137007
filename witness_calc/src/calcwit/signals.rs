use crate::{field::Field, utils::error::Error};

/// Flat array holding every signal of the circuit.
///
/// Components address their signals as `signal_start + local_offset`.
#[derive(Debug, Clone)]
pub struct SignalStore<F> {
    values: Vec<F>,
}

impl<F: Field> SignalStore<F> {
    pub fn new(num_signals: usize) -> Self {
        SignalStore {
            values: vec![F::zero(); num_signals],
        }
    }

    #[inline]
    pub fn get(&self, index: usize) -> Result<F, Error> {
        self.values.get(index).copied().ok_or_else(|| {
            Error::InternalError(format!(
                "signal {} out of range ({} signals)",
                index,
                self.values.len()
            ))
        })
    }

    #[inline]
    pub fn set(&mut self, index: usize, value: F) -> Result<(), Error> {
        let len = self.values.len();
        match self.values.get_mut(index) {
            Some(v) => {
                *v = value;
                Ok(())
            }
            None => Err(Error::InternalError(format!(
                "signal {} out of range ({} signals)",
                index, len
            ))),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[F] {
        &self.values
    }

    pub fn into_values(self) -> Vec<F> {
        self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::BN254;

    #[test]
    fn test_signal_store_bounds() {
        let mut s = SignalStore::<BN254>::new(3);
        s.set(2, BN254::from(9u32)).unwrap();
        assert_eq!(s.get(2).unwrap(), BN254::from(9u32));
        assert_eq!(s.get(0).unwrap(), BN254::zero());
        assert!(s.get(3).unwrap_err().is_internal());
        assert!(s.set(3, BN254::one()).unwrap_err().is_internal());
        assert_eq!(s.len(), 3);
    }
}
