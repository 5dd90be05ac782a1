//! # Value Objects
//!
//! Each type can only be constructed through its parser, so holding one means
//! the value already passed field validation. Parsers return the user-facing
//! message on failure; `validation` attaches it to the field name.
//!
//! Secret material (`OperatorCode`, `HomeNetworkPrivateKey`) zeroizes on drop,
//! compares in constant time and never prints.

use std::collections::BTreeSet;
use std::fmt;
use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize, Serializer};
use subtle::ConstantTimeEq;
use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::{Zeroize, ZeroizeOnDrop};

pub const MAX_SD: u32 = 0x00FF_FFFF;
pub const MAX_SUPPORTED_TACS: usize = 12;
pub const OPERATOR_CODE_LEN: usize = 16;
pub const HOME_NETWORK_KEY_LEN: usize = 32;

fn all_digits(value: &str) -> bool {
    value.bytes().all(|b| b.is_ascii_digit())
}

fn all_hex(value: &str) -> bool {
    value.bytes().all(|b| b.is_ascii_hexdigit())
}

// =============================================================================
// PLMN
// =============================================================================

/// Mobile Country Code: exactly three decimal digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Mcc(String);

impl Mcc {
    pub fn parse(value: &str) -> Result<Self, String> {
        if value.len() == 3 && all_digits(value) {
            Ok(Self(value.to_string()))
        } else {
            Err("MCC must be a 3 decimal digit".to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Mobile Network Code: two or three decimal digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Mnc(String);

impl Mnc {
    pub fn parse(value: &str) -> Result<Self, String> {
        if (value.len() == 2 || value.len() == 3) && all_digits(value) {
            Ok(Self(value.to_string()))
        } else {
            Err("MNC must be a 2 or 3 decimal digit".to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The (MCC, MNC) pair identifying the network.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Plmn {
    pub mcc: Mcc,
    pub mnc: Mnc,
}

impl Plmn {
    pub fn new(mcc: Mcc, mnc: Mnc) -> Self {
        Self { mcc, mnc }
    }
}

impl fmt::Display for Plmn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.mcc.as_str(), self.mnc.as_str())
    }
}

// =============================================================================
// SLICE
// =============================================================================

/// Slice Differentiator, a 24-bit value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Sd(u32);

impl Sd {
    pub fn from_int(value: i64) -> Result<Self, String> {
        if value < 0 {
            Err("SD must be at least 0".to_string())
        } else if value > i64::from(MAX_SD) {
            Err(format!("SD must be at most {}", MAX_SD))
        } else {
            Ok(Self(value as u32))
        }
    }

    /// Six hex digits, no `0x` prefix, case-insensitive.
    pub fn from_hex(value: &str) -> Result<Self, String> {
        if value.len() == 6 && all_hex(value) {
            u32::from_str_radix(value, 16)
                .map(Self)
                .map_err(|e| e.to_string())
        } else {
            Err("SD must be exactly 6 hex digits (e.g., 012030)".to_string())
        }
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    /// Lowercase six-digit hex.
    pub fn to_hex(&self) -> String {
        format!("{:06x}", self.0)
    }
}

/// The single network slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slice {
    pub sst: u8,
    pub sd: Option<Sd>,
}

impl Slice {
    pub fn parse_sst(value: i64) -> Result<u8, String> {
        if value < 0 {
            Err("SST must be at least 0".to_string())
        } else if value > 255 {
            Err("SST must be at most 255".to_string())
        } else {
            Ok(value as u8)
        }
    }
}

impl fmt::Display for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.sd {
            Some(sd) => write!(f, "SST {} SD {}", self.sst, sd.to_hex()),
            None => write!(f, "SST {} without SD", self.sst),
        }
    }
}

// =============================================================================
// TRACKING
// =============================================================================

/// Tracking Area Code, a 3-byte value written as six hex digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tac(u32);

impl Tac {
    pub fn parse(value: &str) -> Result<Self, String> {
        if value.len() == 6 && all_hex(value) {
            u32::from_str_radix(value, 16)
                .map(Self)
                .map_err(|e| e.to_string())
        } else {
            Err(format!(
                "TAC \"{}\" must be exactly 6 hex digits (e.g., 0000ff)",
                value
            ))
        }
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    pub fn to_hex(&self) -> String {
        format!("{:06x}", self.0)
    }
}

impl fmt::Display for Tac {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Tac {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// The supported tracking areas. Duplicates collapse; order is by value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TacSet(BTreeSet<Tac>);

impl TacSet {
    pub fn new(tacs: impl IntoIterator<Item = Tac>) -> Self {
        Self(tacs.into_iter().collect())
    }

    pub fn contains(&self, tac: &Tac) -> bool {
        self.0.contains(tac)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tac> {
        self.0.iter()
    }

    pub fn to_hex_list(&self) -> Vec<String> {
        self.0.iter().map(Tac::to_hex).collect()
    }
}

// =============================================================================
// SECRETS
// =============================================================================

/// Operator code (OP), 16 bytes. Write-only.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct OperatorCode([u8; OPERATOR_CODE_LEN]);

impl OperatorCode {
    pub fn from_hex(value: &str) -> Result<Self, String> {
        let message = "Operator Code must be a 32-character hexadecimal string.";
        if value.len() != OPERATOR_CODE_LEN * 2 || !all_hex(value) {
            return Err(message.to_string());
        }
        let mut bytes = [0u8; OPERATOR_CODE_LEN];
        hex::decode_to_slice(value, &mut bytes).map_err(|_| message.to_string())?;
        Ok(Self(bytes))
    }

    pub fn from_bytes(bytes: [u8; OPERATOR_CODE_LEN]) -> Self {
        Self(bytes)
    }

    /// Raw bytes, for persistence and subscriber authentication only.
    pub fn expose(&self) -> &[u8; OPERATOR_CODE_LEN] {
        &self.0
    }
}

impl PartialEq for OperatorCode {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl Eq for OperatorCode {}

impl fmt::Debug for OperatorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OperatorCode(***)")
    }
}

/// Home-network X25519 private key used to conceal subscriber identities.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct HomeNetworkPrivateKey([u8; HOME_NETWORK_KEY_LEN]);

impl HomeNetworkPrivateKey {
    pub fn from_hex(value: &str) -> Result<Self, String> {
        let message = "Private Key must be a 64-character hexadecimal string.";
        if value.len() != HOME_NETWORK_KEY_LEN * 2 || !all_hex(value) {
            return Err(message.to_string());
        }
        let mut bytes = [0u8; HOME_NETWORK_KEY_LEN];
        hex::decode_to_slice(value, &mut bytes).map_err(|_| message.to_string())?;
        Ok(Self(bytes))
    }

    pub fn from_bytes(bytes: [u8; HOME_NETWORK_KEY_LEN]) -> Self {
        Self(bytes)
    }

    pub fn expose(&self) -> &[u8; HOME_NETWORK_KEY_LEN] {
        &self.0
    }

    /// `X25519(private, basepoint)`.
    pub fn public_key(&self) -> HomeNetworkPublicKey {
        let secret = StaticSecret::from(self.0);
        HomeNetworkPublicKey(*PublicKey::from(&secret).as_bytes())
    }
}

impl PartialEq for HomeNetworkPrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl Eq for HomeNetworkPrivateKey {}

impl fmt::Debug for HomeNetworkPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HomeNetworkPrivateKey(***)")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HomeNetworkPublicKey([u8; HOME_NETWORK_KEY_LEN]);

impl HomeNetworkPublicKey {
    pub fn as_bytes(&self) -> &[u8; HOME_NETWORK_KEY_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

/// A raw secret as received over the wire. Zeroized on drop and redacted in
/// debug output so request logging cannot leak it.
#[derive(Clone, Default, Zeroize, ZeroizeOnDrop, Deserialize)]
#[serde(transparent)]
pub struct RawSecret(String);

impl RawSecret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RawSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RawSecret(***)")
    }
}

// =============================================================================
// N3
// =============================================================================

/// External address advertised for the N3 interface. `None` means "use the
/// configured interface address".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct N3ExternalAddress(Option<Ipv4Addr>);

impl N3ExternalAddress {
    pub fn parse(value: &str) -> Result<Self, String> {
        if value.is_empty() {
            return Ok(Self(None));
        }
        // `Ipv4Addr::from_str` accepts only strict dotted quads, so
        // surrounding whitespace is rejected too.
        value
            .parse::<Ipv4Addr>()
            .map(|ip| Self(Some(ip)))
            .map_err(|_| {
                "External address must be a valid IPv4 address (e.g., 192.168.1.10)".to_string()
            })
    }

    pub fn address(&self) -> Option<Ipv4Addr> {
        self.0
    }

    pub fn to_wire(&self) -> String {
        self.0.map(|ip| ip.to_string()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mcc_rules() {
        assert!(Mcc::parse("001").is_ok());
        assert!(Mcc::parse("310").is_ok());
        assert_eq!(
            Mcc::parse("31").unwrap_err(),
            "MCC must be a 3 decimal digit"
        );
        assert!(Mcc::parse("3100").is_err());
        assert!(Mcc::parse("31a").is_err());
        assert!(Mcc::parse("").is_err());
    }

    #[test]
    fn test_mnc_rules() {
        assert!(Mnc::parse("01").is_ok());
        assert!(Mnc::parse("410").is_ok());
        assert!(Mnc::parse("1").is_err());
        assert!(Mnc::parse("1234").is_err());
        assert!(Mnc::parse("0x").is_err());
    }

    #[test]
    fn test_non_ascii_digits_rejected() {
        // Arabic-Indic digits are numeric but not ASCII.
        assert!(Mcc::parse("٣١٠").is_err());
    }

    #[test]
    fn test_sst_bounds() {
        assert_eq!(Slice::parse_sst(0).unwrap(), 0);
        assert_eq!(Slice::parse_sst(255).unwrap(), 255);
        assert_eq!(Slice::parse_sst(256).unwrap_err(), "SST must be at most 255");
        assert_eq!(Slice::parse_sst(-1).unwrap_err(), "SST must be at least 0");
    }

    #[test]
    fn test_sd_forms() {
        assert_eq!(Sd::from_int(0x102030).unwrap().to_hex(), "102030");
        assert_eq!(Sd::from_hex("ABCDEF").unwrap().value(), 0xABCDEF);
        assert_eq!(
            Sd::from_int(16_777_216).unwrap_err(),
            "SD must be at most 16777215"
        );
        assert!(Sd::from_int(-5).is_err());
        assert!(Sd::from_hex("0x1020").is_err());
        assert!(Sd::from_hex("12345").is_err());
    }

    #[test]
    fn test_tac_parse_is_case_insensitive() {
        assert_eq!(Tac::parse("00AB12").unwrap(), Tac::parse("00ab12").unwrap());
        assert_eq!(Tac::parse("0000FF").unwrap().to_hex(), "0000ff");
        assert!(Tac::parse("XYZ").unwrap_err().contains("XYZ"));
        assert!(Tac::parse("+00001").is_err());
    }

    #[test]
    fn test_tac_set_collapses_duplicates() {
        let set = TacSet::new([
            Tac::parse("000002").unwrap(),
            Tac::parse("000001").unwrap(),
            Tac::parse("000002").unwrap(),
        ]);
        assert_eq!(set.to_hex_list(), vec!["000001", "000002"]);
    }

    #[test]
    fn test_operator_code_debug_is_redacted() {
        let code = OperatorCode::from_hex("00112233445566778899aabbccddeeff").unwrap();
        let debug = format!("{:?}", code);
        assert!(!debug.contains("00112233"));
        assert!(OperatorCode::from_hex("0011").is_err());
        assert!(OperatorCode::from_hex("zz112233445566778899aabbccddeeff").is_err());
    }

    #[test]
    fn test_home_network_public_key_matches_x25519() {
        // RFC 7748 section 6.1 test vector (Alice).
        let private =
            HomeNetworkPrivateKey::from_hex("77076d0a7318a57d3c16c17251b26645df4c2f87ebc0992ab177fba51db92c2a")
                .unwrap();
        assert_eq!(
            private.public_key().to_hex(),
            "8520f0098930a754748b7ddcb43ef75a0dbf3a0d26381af4eba4a98eaa9b4e6a"
        );
    }

    #[test]
    fn test_n3_address() {
        assert_eq!(N3ExternalAddress::parse("").unwrap().address(), None);
        assert_eq!(
            N3ExternalAddress::parse("192.168.1.10").unwrap().to_wire(),
            "192.168.1.10"
        );
        assert!(N3ExternalAddress::parse("256.1.1.1").is_err());
        assert!(N3ExternalAddress::parse("1.2.3").is_err());
        assert!(N3ExternalAddress::parse("example.com").is_err());
        assert!(N3ExternalAddress::parse("::1").is_err());
    }

    #[test]
    fn test_n3_address_rejects_surrounding_whitespace() {
        assert!(N3ExternalAddress::parse("   ").is_err());
        assert!(N3ExternalAddress::parse(" 10.0.0.1 ").is_err());
        assert!(N3ExternalAddress::parse("10.0.0.1\n").is_err());
    }

    #[test]
    fn test_raw_secret_debug_is_redacted() {
        let raw = RawSecret::new("00112233445566778899aabbccddeeff");
        assert_eq!(format!("{:?}", raw), "RawSecret(***)");
    }
}
