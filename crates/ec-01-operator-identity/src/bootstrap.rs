//! Factory defaults for a fresh installation.

use rand::RngCore;

use crate::domain::{MutationRequest, RawSecret, SdInput};

pub const DEFAULT_MCC: &str = "001";
pub const DEFAULT_MNC: &str = "01";
pub const DEFAULT_SST: i64 = 1;
pub const DEFAULT_SD: i64 = 0x102030;
pub const DEFAULT_TAC: &str = "000001";

/// Default requests, one per operator sub-resource, in apply order.
///
/// The operator code and home-network key are fresh random values so that no
/// two installations share secrets.
pub fn default_requests<R: RngCore>(rng: &mut R) -> Vec<MutationRequest> {
    let mut code = [0u8; 16];
    rng.fill_bytes(&mut code);

    let mut key = [0u8; 32];
    rng.fill_bytes(&mut key);
    clamp_x25519(&mut key);

    let requests = vec![
        MutationRequest::SetIdentity {
            mcc: DEFAULT_MCC.to_string(),
            mnc: DEFAULT_MNC.to_string(),
        },
        MutationRequest::SetSlice {
            sst: Some(DEFAULT_SST),
            sd: Some(SdInput::Int(DEFAULT_SD)),
        },
        MutationRequest::SetTracking {
            supported_tacs: vec![DEFAULT_TAC.to_string()],
        },
        MutationRequest::SetOperatorCode {
            operator_code: RawSecret::new(hex::encode(code)),
        },
        MutationRequest::SetHomeNetworkKey {
            private_key: RawSecret::new(hex::encode(key)),
        },
    ];

    zeroize::Zeroize::zeroize(&mut code);
    zeroize::Zeroize::zeroize(&mut key);
    requests
}

/// RFC 7748 scalar clamping.
pub fn clamp_x25519(key: &mut [u8; 32]) {
    key[0] &= 248;
    key[31] &= 127;
    key[31] |= 64;
}
