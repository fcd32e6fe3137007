//! Named entry points into the std templates, for tools that pick a circuit
//! at runtime.

use rand::RngCore;
use witness_calc::frontend::*;

use crate::{
    babyjub::BabyAdd,
    bitify::{Bits2Num, Num2Bits},
    comparators::{CompConstant, IsEqual, IsZero},
    elgamal::ElGamalEncrypt,
    escalarmulany::EscalarMulAny,
    escalarmulfix::EscalarMulFix,
    mux::MultiMux3,
    permutation::{Boolean, Permutation},
    shuffle::{
        self, EcDecompress, MatrixMultiplication, ShuffleEncryptV2, ShuffleEncryptV2Template,
    },
    traits::StdTemplate,
};

pub const CIRCUIT_NAMES: &[&str] = &[
    "Boolean",
    "Num2Bits",
    "Bits2Num",
    "IsZero",
    "IsEqual",
    "CompConstant",
    "BabyAdd",
    "EscalarMulAny",
    "Permutation",
    "MultiMux3",
    "EscalarMulFix",
    "ElGamalEncrypt",
    "matrixMultiplication",
    "ecDecompress",
    "ShuffleEncryptV2",
];

/// A laid-out circuit with a random satisfying assignment of its inputs.
pub struct CatalogCircuit<F: Field> {
    pub layout: CircuitLayout<F>,
    pub registry: TemplateRegistry<F>,
    pub sample: InputSignals<F>,
}

fn instantiate<F: Field, T: StdTemplate<F>>(
    params: &T::Params,
    rng: impl RngCore,
) -> Result<CatalogCircuit<F>, Error> {
    log::debug!("instantiating {:?}", params);
    let (layout, registry) = build_circuit(T::new_template(params))?;
    Ok(CatalogCircuit {
        layout,
        registry,
        sample: T::new_assignment(params, rng),
    })
}

fn width(param: Option<&str>, default: usize) -> Result<usize, Error> {
    match param {
        None => Ok(default),
        Some(s) => s
            .parse()
            .map_err(|_| Error::UserError(format!("invalid width {}", s))),
    }
}

pub fn build_by_name<F: Field>(
    name: &str,
    param: Option<&str>,
    rng: impl RngCore,
) -> Result<CatalogCircuit<F>, Error> {
    match name {
        "Boolean" => instantiate::<F, Boolean>(&(), rng),
        "Num2Bits" => instantiate::<F, Num2Bits>(&width(param, 254)?, rng),
        "Bits2Num" => instantiate::<F, Bits2Num>(&width(param, 254)?, rng),
        "IsZero" => instantiate::<F, IsZero>(&(), rng),
        "IsEqual" => instantiate::<F, IsEqual>(&(), rng),
        "CompConstant" => {
            let ct = match param {
                None => U256::ZERO,
                Some(s) => parse_field::<BN254>(s)
                    .map(|v| v.to_u256())
                    .ok_or_else(|| Error::UserError(format!("invalid constant {}", s)))?,
            };
            instantiate::<F, CompConstant>(&ct, rng)
        }
        "BabyAdd" => instantiate::<F, BabyAdd>(&(), rng),
        "EscalarMulAny" => {
            let n = width(param, 253)?;
            if !EscalarMulAny::supports(n) {
                return Err(Error::UserError(format!(
                    "EscalarMulAny cannot take {} bits",
                    n
                )));
            }
            instantiate::<F, EscalarMulAny>(&n, rng)
        }
        "Permutation" => instantiate::<F, Permutation>(&width(param, 52)?, rng),
        "MultiMux3" => instantiate::<F, MultiMux3>(&width(param, 2)?, rng),
        "EscalarMulFix" => {
            let n = width(param, shuffle::NUM_BITS)?;
            if !EscalarMulFix::supports(n) {
                return Err(Error::UserError(format!(
                    "EscalarMulFix cannot take {} bits",
                    n
                )));
            }
            instantiate::<F, EscalarMulFix>(&n, rng)
        }
        "ElGamalEncrypt" => {
            let n = width(param, shuffle::NUM_BITS)?;
            if !ElGamalEncrypt::supports(n) {
                return Err(Error::UserError(format!(
                    "ElGamalEncrypt cannot take {} bits",
                    n
                )));
            }
            instantiate::<F, ElGamalEncrypt>(&n, rng)
        }
        "matrixMultiplication" => {
            let n = width(param, 52)?;
            instantiate::<F, MatrixMultiplication>(&(n, n), rng)
        }
        "ecDecompress" => instantiate::<F, EcDecompress>(&(), rng),
        "ShuffleEncryptV2" => {
            let n = width(param, 52)?;
            if !ShuffleEncryptV2Template::supports(n, shuffle::NUM_BITS) {
                return Err(Error::UserError(format!("cannot shuffle {} cards", n)));
            }
            instantiate::<F, ShuffleEncryptV2>(&(n, shuffle::NUM_BITS), rng)
        }
        _ => Err(Error::UserError(format!(
            "unknown circuit {}, expected one of {}",
            name,
            CIRCUIT_NAMES.join(", ")
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_catalog_names() {
        let mut rng = StdRng::seed_from_u64(7);
        for name in CIRCUIT_NAMES {
            let param = match *name {
                "Num2Bits" | "Bits2Num" => Some("8"),
                "EscalarMulAny" | "EscalarMulFix" | "ElGamalEncrypt" => Some("4"),
                "Permutation" | "matrixMultiplication" => Some("3"),
                "ShuffleEncryptV2" => Some("2"),
                _ => None,
            };
            let c = build_by_name::<BN254>(name, param, &mut rng).unwrap();
            assert_eq!(c.layout.main_template().unwrap().name, *name);
        }
    }

    #[test]
    fn test_catalog_errors() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(build_by_name::<BN254>("Nope", None, &mut rng).is_err());
        assert!(build_by_name::<BN254>("Num2Bits", Some("x"), &mut rng).is_err());
        let err = build_by_name::<BN254>("EscalarMulAny", Some("149"), &mut rng)
            .err()
            .unwrap();
        assert!(err.is_user());
        for (name, param) in [
            ("EscalarMulFix", "247"),
            ("ElGamalEncrypt", "149"),
            ("ShuffleEncryptV2", "0"),
            ("ShuffleEncryptV2", "254"),
        ] {
            let err = build_by_name::<BN254>(name, Some(param), &mut rng)
                .err()
                .unwrap();
            assert!(err.is_user(), "{} {}", name, param);
        }
    }
}
