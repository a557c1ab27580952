//! ML-DSA keyGen, sigGen and sigVer (FIPS 204) over the `fips204` crate
//!
//! Signing and verification use the external interface with an empty
//! context string. Deterministic signing is hedged signing with an all-zero
//! `rnd`. GDT groups sign under a key pair generated on the group's first
//! case and report its public key.

use std::collections::HashMap;
use std::sync::Mutex;

use acvp_api::{
    AlgorithmId, CapabilityHandler, CryptoFailure, HandlerResult, MlDsaCase, MlDsaParameterSet, TestCase, TestType,
};
use acvp_engine::{CapabilityMetadata, CapabilityRegistry, RegistryError};
use acvp_params::pqc::ml_dsa::{
    MlDsa44Params, MlDsa65Params, MlDsa87Params, MlDsaParams, ML_DSA_RND_BYTES, ML_DSA_SEED_BYTES,
};
use fips204::traits::{KeyGen, SerDes, Signer, Verifier};
use fips204::{ml_dsa_44, ml_dsa_65, ml_dsa_87};
use rand::RngCore;
use tracing::debug;
use zeroize::Zeroizing;

/// One parameter set's keyGen/sign/verify over raw encodings
trait Scheme {
    type Params: MlDsaParams;

    fn keygen(xi: &[u8; ML_DSA_SEED_BYTES]) -> KeyPair;

    fn sign(sk: &[u8], rnd: &[u8; ML_DSA_RND_BYTES], message: &[u8]) -> Result<Vec<u8>, CryptoFailure>;

    /// Malformed keys and signatures verify as false
    fn verify(pk: &[u8], message: &[u8], signature: &[u8]) -> bool;
}

#[derive(Clone)]
struct KeyPair {
    pk: Vec<u8>,
    sk: Zeroizing<Vec<u8>>,
}

macro_rules! scheme {
    ($scheme:ident, $module:ident, $params:ty) => {
        struct $scheme;

        impl Scheme for $scheme {
            type Params = $params;

            fn keygen(xi: &[u8; ML_DSA_SEED_BYTES]) -> KeyPair {
                let (pk, sk) = $module::KG::keygen_from_seed(xi);
                KeyPair {
                    pk: pk.into_bytes().to_vec(),
                    sk: Zeroizing::new(sk.into_bytes().to_vec()),
                }
            }

            fn sign(
                sk: &[u8],
                rnd: &[u8; ML_DSA_RND_BYTES],
                message: &[u8],
            ) -> Result<Vec<u8>, CryptoFailure> {
                let bytes: Zeroizing<[u8; $module::SK_LEN]> =
                    Zeroizing::new(sk.try_into().map_err(|_| {
                        CryptoFailure::new(format!(
                            "{} secret key must be {} bytes, got {}",
                            <$params>::NAME,
                            <$params>::SECRET_KEY_BYTES,
                            sk.len()
                        ))
                    })?);
                let sk = $module::PrivateKey::try_from_bytes(*bytes)
                    .map_err(|e| CryptoFailure::new(format!("secret key rejected: {}", e)))?;
                let sig = sk
                    .try_sign_with_seed(rnd, message, &[])
                    .map_err(|e| CryptoFailure::new(format!("signing failed: {}", e)))?;
                Ok(sig.to_vec())
            }

            fn verify(pk: &[u8], message: &[u8], signature: &[u8]) -> bool {
                let (Ok(pk), Ok(sig)) = (
                    <[u8; $module::PK_LEN]>::try_from(pk),
                    <[u8; $module::SIG_LEN]>::try_from(signature),
                ) else {
                    return false;
                };
                match $module::PublicKey::try_from_bytes(pk) {
                    Ok(pk) => pk.verify(message, &sig, &[]),
                    Err(_) => false,
                }
            }
        }
    };
}

scheme!(MlDsa44, ml_dsa_44, MlDsa44Params);
scheme!(MlDsa65, ml_dsa_65, MlDsa65Params);
scheme!(MlDsa87, ml_dsa_87, MlDsa87Params);

/// Handler for all three ML-DSA modes
///
/// Holds the key pair of each GDT sigGen group, keyed by `tgId` and
/// replaced whenever a group starts.
#[derive(Default)]
pub struct MlDsaHandler {
    group_keys: Mutex<HashMap<u64, (MlDsaParameterSet, KeyPair)>>,
}

impl MlDsaHandler {
    pub fn new() -> Self {
        Self::default()
    }

    fn group_key<S: Scheme>(&self, tg_id: u64, first_in_group: bool, set: MlDsaParameterSet) -> KeyPair {
        let mut keys = self.group_keys.lock().unwrap_or_else(|p| p.into_inner());
        match keys.get(&tg_id) {
            Some((cached, pair)) if !first_in_group && *cached == set => pair.clone(),
            _ => {
                let mut xi = Zeroizing::new([0u8; ML_DSA_SEED_BYTES]);
                rand::thread_rng().fill_bytes(&mut xi[..]);
                let pair = S::keygen(&xi);
                debug!(tg_id, parameter_set = set.name(), "generated GDT group key pair");
                keys.insert(tg_id, (set, pair.clone()));
                pair
            }
        }
    }

    fn run<S: Scheme>(&self, case: &mut TestCase) -> HandlerResult {
        let (algorithm, test_type, tg_id, first) = (case.algorithm, case.test_type, case.tg_id, case.first_in_group);
        let ml = case
            .ml_dsa_mut()
            .ok_or_else(|| CryptoFailure::new("ML-DSA handler given a non-ML-DSA case"))?;

        match (algorithm, test_type) {
            (AlgorithmId::MlDsaKeyGen, _) => {
                let xi: &[u8; ML_DSA_SEED_BYTES] = ml.seed.as_slice().try_into().map_err(|_| {
                    CryptoFailure::new(format!("seed must be {} bytes, got {}", ML_DSA_SEED_BYTES, ml.seed.len()))
                })?;
                let pair = S::keygen(xi);
                ml.pk.write(&pair.pk)?;
                ml.sk.write(&pair.sk)?;
            }
            (AlgorithmId::MlDsaSigGen, TestType::Gdt) => {
                let pair = self.group_key::<S>(tg_id, first, ml.parameter_set);
                let rnd = signing_rnd(ml, true)?;
                let sig = S::sign(&pair.sk, &rnd, ml.message.as_slice())?;
                ml.pk.write(&pair.pk)?;
                ml.signature.write(&sig)?;
            }
            (AlgorithmId::MlDsaSigGen, TestType::Aft) => {
                let rnd = signing_rnd(ml, false)?;
                let sig = S::sign(ml.sk.as_slice(), &rnd, ml.message.as_slice())?;
                ml.signature.write(&sig)?;
            }
            (AlgorithmId::MlDsaSigVer, _) => {
                ml.test_passed = Some(S::verify(ml.pk.as_slice(), ml.message.as_slice(), ml.signature.as_slice()));
            }
            (other, _) => return Err(CryptoFailure::new(format!("{} is not an ML-DSA mode", other))),
        }
        Ok(())
    }
}

/// The signing randomness: zero when deterministic, else the case's `rnd`
///
/// A GDT case without `rnd` draws a fresh one.
fn signing_rnd(ml: &MlDsaCase, may_draw: bool) -> Result<Zeroizing<[u8; ML_DSA_RND_BYTES]>, CryptoFailure> {
    let mut rnd = Zeroizing::new([0u8; ML_DSA_RND_BYTES]);
    if ml.deterministic {
        return Ok(rnd);
    }
    match ml.rnd.len() {
        ML_DSA_RND_BYTES => rnd.copy_from_slice(ml.rnd.as_slice()),
        0 if may_draw => rand::thread_rng().fill_bytes(&mut rnd[..]),
        n => return Err(CryptoFailure::new(format!("rnd must be {} bytes, got {}", ML_DSA_RND_BYTES, n))),
    }
    Ok(rnd)
}

impl CapabilityHandler for MlDsaHandler {
    fn handle(&self, case: &mut TestCase) -> HandlerResult {
        let set = case
            .ml_dsa_mut()
            .map(|ml| ml.parameter_set)
            .ok_or_else(|| CryptoFailure::new("ML-DSA handler given a non-ML-DSA case"))?;
        match set {
            MlDsaParameterSet::MlDsa44 => self.run::<MlDsa44>(case),
            MlDsaParameterSet::MlDsa65 => self.run::<MlDsa65>(case),
            MlDsaParameterSet::MlDsa87 => self.run::<MlDsa87>(case),
        }
    }
}

/// Register keyGen, sigGen and sigVer
pub fn register(registry: &mut CapabilityRegistry) -> Result<(), RegistryError> {
    for (algorithm, description) in [
        (AlgorithmId::MlDsaKeyGen, "ML-DSA key generation from seed"),
        (AlgorithmId::MlDsaSigGen, "ML-DSA signature generation, pure, empty context"),
        (AlgorithmId::MlDsaSigVer, "ML-DSA signature verification, pure, empty context"),
    ] {
        registry.register(algorithm, MlDsaHandler::new(), CapabilityMetadata::new(description, "FIPS204"))?;
    }
    Ok(())
}
