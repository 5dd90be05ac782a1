//! # Validator
//!
//! Pure field checks. Every violated field is reported, so a caller can
//! render all problems at once; nothing here short-circuits on the first error.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

use super::mutation::{Mutation, MutationRequest, SdInput};
use super::radio::{RadioRegistration, RadioRequest};
use super::value_objects::{
    HomeNetworkPrivateKey, Mcc, Mnc, N3ExternalAddress, OperatorCode, Plmn, Sd, Slice, Tac,
    TacSet, MAX_SUPPORTED_TACS,
};

pub const MAX_RADIO_NAME_LEN: usize = 64;

/// Field names as they appear in request bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Field {
    #[serde(rename = "mcc")]
    Mcc,
    #[serde(rename = "mnc")]
    Mnc,
    #[serde(rename = "sst")]
    Sst,
    #[serde(rename = "sd")]
    Sd,
    #[serde(rename = "supportedTacs")]
    SupportedTacs,
    #[serde(rename = "operatorCode")]
    OperatorCode,
    #[serde(rename = "privateKey")]
    PrivateKey,
    #[serde(rename = "external_address")]
    ExternalAddress,
    #[serde(rename = "name")]
    Name,
    #[serde(rename = "tac")]
    Tac,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Mcc => "mcc",
            Field::Mnc => "mnc",
            Field::Sst => "sst",
            Field::Sd => "sd",
            Field::SupportedTacs => "supportedTacs",
            Field::OperatorCode => "operatorCode",
            Field::PrivateKey => "privateKey",
            Field::ExternalAddress => "external_address",
            Field::Name => "name",
            Field::Tac => "tac",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field-keyed validation failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[serde(transparent)]
#[error("{}", self.summary())]
pub struct ValidationError {
    fields: BTreeMap<Field, String>,
}

impl ValidationError {
    pub fn single(field: Field, message: impl Into<String>) -> Self {
        let mut err = Self::default();
        err.add(field, message);
        err
    }

    /// Record a failure. A field keeps its first message.
    pub fn add(&mut self, field: Field, message: impl Into<String>) {
        self.fields.entry(field).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = (Field, &str)> {
        self.fields.iter().map(|(f, m)| (*f, m.as_str()))
    }

    /// `field: message` pairs joined with `; `.
    pub fn summary(&self) -> String {
        self.fields
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect::<Vec<_>>()
            .join("; ")
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, ValidationError> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

/// Collects the outcome of a parser into `errors`.
fn check<T>(errors: &mut ValidationError, field: Field, parsed: Result<T, String>) -> Option<T> {
    match parsed {
        Ok(value) => Some(value),
        Err(message) => {
            errors.add(field, message);
            None
        }
    }
}

/// Validate a single field given in its textual form.
///
/// SST is parsed as a decimal integer; SD as its six-digit hex form, where an
/// empty string means "no differentiator"; `SupportedTacs` and `Tac` check one TAC.
pub fn validate(field: Field, value: &str) -> Result<(), ValidationError> {
    let outcome = match field {
        Field::Mcc => Mcc::parse(value).map(drop),
        Field::Mnc => Mnc::parse(value).map(drop),
        Field::Sst => value
            .parse::<i64>()
            .map_err(|_| "SST must be an integer".to_string())
            .and_then(Slice::parse_sst)
            .map(drop),
        Field::Sd => parse_sd(&SdInput::Hex(value.to_string())).map(drop),
        Field::SupportedTacs | Field::Tac => Tac::parse(value).map(drop),
        Field::OperatorCode => OperatorCode::from_hex(value).map(drop),
        Field::PrivateKey => HomeNetworkPrivateKey::from_hex(value).map(drop),
        Field::ExternalAddress => N3ExternalAddress::parse(value).map(drop),
        Field::Name => parse_radio_name(value).map(drop),
    };
    outcome.map_err(|message| ValidationError::single(field, message))
}

/// An empty hex string means the slice has no differentiator.
fn parse_sd(input: &SdInput) -> Result<Option<Sd>, String> {
    match input {
        SdInput::Int(value) => Sd::from_int(*value).map(Some),
        SdInput::Hex(value) if value.is_empty() => Ok(None),
        SdInput::Hex(value) => Sd::from_hex(value).map(Some),
    }
}

fn parse_tacs(values: &[String]) -> Result<TacSet, String> {
    if values.len() > MAX_SUPPORTED_TACS {
        return Err(format!(
            "at most {} TACs are supported",
            MAX_SUPPORTED_TACS
        ));
    }
    let mut tacs = Vec::with_capacity(values.len());
    let mut invalid = Vec::new();
    for value in values {
        match Tac::parse(value) {
            Ok(tac) => tacs.push(tac),
            Err(message) => invalid.push(message),
        }
    }
    if invalid.is_empty() {
        Ok(TacSet::new(tacs))
    } else {
        Err(invalid.join("; "))
    }
}

fn parse_radio_name(value: &str) -> Result<String, String> {
    let valid = !value.is_empty()
        && value.len() <= MAX_RADIO_NAME_LEN
        && value
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'-'));
    if valid {
        Ok(value.to_string())
    } else {
        Err(format!(
            "Radio name must be 1 to {} characters of letters, digits, '.', '_' or '-'",
            MAX_RADIO_NAME_LEN
        ))
    }
}

/// Validate every field of `request`, producing the typed mutation.
pub fn validate_request(request: &MutationRequest) -> Result<Mutation, ValidationError> {
    let mut errors = ValidationError::default();

    match request {
        MutationRequest::SetIdentity { mcc, mnc } => {
            let mcc = check(&mut errors, Field::Mcc, Mcc::parse(mcc));
            let mnc = check(&mut errors, Field::Mnc, Mnc::parse(mnc));
            match (mcc, mnc) {
                (Some(mcc), Some(mnc)) => Ok(Mutation::SetIdentity(Plmn::new(mcc, mnc))),
                _ => Err(errors),
            }
        }
        MutationRequest::SetSlice { sst, sd } => {
            let sst = match sst {
                Some(value) => check(&mut errors, Field::Sst, Slice::parse_sst(*value)),
                None => check(&mut errors, Field::Sst, Err("SST is required".to_string())),
            };
            let sd = match sd {
                Some(input) => check(&mut errors, Field::Sd, parse_sd(input)),
                None => Some(None),
            };
            match (sst, sd) {
                (Some(sst), Some(sd)) => errors.into_result(|| Mutation::SetSlice(Slice { sst, sd })),
                _ => Err(errors),
            }
        }
        MutationRequest::SetTracking { supported_tacs } => {
            match check(&mut errors, Field::SupportedTacs, parse_tacs(supported_tacs)) {
                Some(tacs) => Ok(Mutation::SetTracking(tacs)),
                None => Err(errors),
            }
        }
        MutationRequest::SetOperatorCode { operator_code } => {
            match check(
                &mut errors,
                Field::OperatorCode,
                OperatorCode::from_hex(operator_code.expose()),
            ) {
                Some(code) => Ok(Mutation::SetOperatorCode(code)),
                None => Err(errors),
            }
        }
        MutationRequest::SetHomeNetworkKey { private_key } => {
            match check(
                &mut errors,
                Field::PrivateKey,
                HomeNetworkPrivateKey::from_hex(private_key.expose()),
            ) {
                Some(key) => Ok(Mutation::SetHomeNetworkKey(key)),
                None => Err(errors),
            }
        }
        MutationRequest::SetN3ExternalAddress { external_address } => {
            match check(
                &mut errors,
                Field::ExternalAddress,
                N3ExternalAddress::parse(external_address),
            ) {
                Some(addr) => Ok(Mutation::SetN3ExternalAddress(addr)),
                None => Err(errors),
            }
        }
    }
}

/// Validate a radio attachment request.
pub fn validate_radio(request: &RadioRequest) -> Result<RadioRegistration, ValidationError> {
    let mut errors = ValidationError::default();
    let name = check(&mut errors, Field::Name, parse_radio_name(&request.name));
    let mcc = check(&mut errors, Field::Mcc, Mcc::parse(&request.mcc));
    let mnc = check(&mut errors, Field::Mnc, Mnc::parse(&request.mnc));
    let tac = check(&mut errors, Field::Tac, Tac::parse(&request.tac));

    match (name, mcc, mnc, tac) {
        (Some(name), Some(mcc), Some(mnc), Some(tac)) => Ok(RadioRegistration {
            name,
            plmn: Plmn::new(mcc, mnc),
            tac,
        }),
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::RawSecret;
    use proptest::prelude::*;

    #[test]
    fn test_identity_errors_aggregate() {
        let err = validate_request(&MutationRequest::SetIdentity {
            mcc: "31".into(),
            mnc: "4".into(),
        })
        .unwrap_err();
        assert_eq!(err.get(Field::Mcc), Some("MCC must be a 3 decimal digit"));
        assert_eq!(err.get(Field::Mnc), Some("MNC must be a 2 or 3 decimal digit"));
        assert_eq!(err.fields().count(), 2);
    }

    #[test]
    fn test_slice_requires_sst_and_checks_sd() {
        let err = validate_request(&MutationRequest::SetSlice {
            sst: None,
            sd: Some(SdInput::Int(16_777_216)),
        })
        .unwrap_err();
        assert_eq!(err.get(Field::Sst), Some("SST is required"));
        assert_eq!(err.get(Field::Sd), Some("SD must be at most 16777215"));

        let ok = validate_request(&MutationRequest::SetSlice {
            sst: Some(1),
            sd: None,
        })
        .unwrap();
        assert_eq!(ok, Mutation::SetSlice(Slice { sst: 1, sd: None }));
    }

    #[test]
    fn test_empty_sd_means_no_differentiator() {
        assert!(validate(Field::Sd, "").is_ok());
        let ok = validate_request(&MutationRequest::SetSlice {
            sst: Some(1),
            sd: Some(SdInput::Hex(String::new())),
        })
        .unwrap();
        assert_eq!(ok, Mutation::SetSlice(Slice { sst: 1, sd: None }));

        let err = validate_request(&MutationRequest::SetSlice {
            sst: Some(1),
            sd: Some(SdInput::Hex("12345".into())),
        })
        .unwrap_err();
        assert!(validate(Field::Sd, "12345").is_err());
        assert_eq!(
            err.get(Field::Sd),
            Some("SD must be exactly 6 hex digits (e.g., 012030)")
        );
    }

    #[test]
    fn test_tracking_reports_bad_value_and_keeps_case_insensitivity() {
        let err = validate_request(&MutationRequest::SetTracking {
            supported_tacs: vec!["XYZ".into()],
        })
        .unwrap_err();
        assert!(err.get(Field::SupportedTacs).unwrap().contains("XYZ"));

        let ok = validate_request(&MutationRequest::SetTracking {
            supported_tacs: vec!["0000FF".into(), "00ab12".into()],
        })
        .unwrap();
        match ok {
            Mutation::SetTracking(tacs) => assert_eq!(tacs.to_hex_list(), ["0000ff", "00ab12"]),
            other => panic!("unexpected mutation {:?}", other),
        }
    }

    #[test]
    fn test_tracking_accepts_empty_and_caps_length() {
        assert!(validate_request(&MutationRequest::SetTracking {
            supported_tacs: vec![]
        })
        .is_ok());

        let too_many = (0..=MAX_SUPPORTED_TACS)
            .map(|i| format!("{:06x}", i))
            .collect();
        let err = validate_request(&MutationRequest::SetTracking {
            supported_tacs: too_many,
        })
        .unwrap_err();
        assert_eq!(
            err.get(Field::SupportedTacs),
            Some("at most 12 TACs are supported")
        );
    }

    #[test]
    fn test_secret_messages() {
        let err = validate_request(&MutationRequest::SetOperatorCode {
            operator_code: RawSecret::new("abc"),
        })
        .unwrap_err();
        assert_eq!(
            err.get(Field::OperatorCode),
            Some("Operator Code must be a 32-character hexadecimal string.")
        );

        let err = validate_request(&MutationRequest::SetHomeNetworkKey {
            private_key: RawSecret::new("abc"),
        })
        .unwrap_err();
        assert_eq!(
            err.get(Field::PrivateKey),
            Some("Private Key must be a 64-character hexadecimal string.")
        );
    }

    #[test]
    fn test_single_field_validate() {
        assert!(validate(Field::Sst, "255").is_ok());
        assert!(validate(Field::Sst, "abc").is_err());
        assert!(validate(Field::Sd, "").is_ok());
        assert!(validate(Field::ExternalAddress, "").is_ok());
        assert!(validate(Field::ExternalAddress, "10.0.0.300").is_err());
    }

    #[test]
    fn test_radio_request_aggregates() {
        let err = validate_radio(&RadioRequest {
            name: "".into(),
            mcc: "001".into(),
            mnc: "01".into(),
            tac: "12".into(),
        })
        .unwrap_err();
        assert!(err.get(Field::Name).is_some());
        assert!(err.get(Field::Tac).is_some());
        assert!(err.get(Field::Mcc).is_none());
    }

    #[test]
    fn test_summary_and_json_keys() {
        let mut err = ValidationError::single(Field::Mnc, "bad mnc");
        err.add(Field::Mcc, "bad mcc");
        assert_eq!(err.summary(), "mcc: bad mcc; mnc: bad mnc");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["mcc"], "bad mcc");
    }

    proptest! {
        #[test]
        fn prop_valid_plmn_accepted(mcc in "[0-9]{3}", mnc in "[0-9]{2,3}") {
            let request = MutationRequest::SetIdentity { mcc: mcc.clone(), mnc: mnc.clone() };
            match validate_request(&request) {
                Ok(Mutation::SetIdentity(plmn)) => {
                    prop_assert_eq!(plmn.mcc.as_str(), mcc.as_str());
                    prop_assert_eq!(plmn.mnc.as_str(), mnc.as_str());
                }
                other => prop_assert!(false, "unexpected {:?}", other),
            }
        }

        #[test]
        fn prop_wrong_length_mcc_rejected(mcc in "[0-9]{0,2}|[0-9]{4,8}") {
            let err = validate(Field::Mcc, &mcc).unwrap_err();
            prop_assert_eq!(err.get(Field::Mcc), Some("MCC must be a 3 decimal digit"));
        }

        #[test]
        fn prop_non_digit_mnc_rejected(mnc in "[0-9]?[a-zA-Z+ -][0-9]?") {
            let err = validate(Field::Mnc, &mnc).unwrap_err();
            prop_assert_eq!(err.get(Field::Mnc), Some("MNC must be a 2 or 3 decimal digit"));
        }

        #[test]
        fn prop_tac_hex_round_trips(value in 0u32..=0xFF_FFFF) {
            let hex = format!("{:06X}", value);
            prop_assert_eq!(Tac::parse(&hex).unwrap().value(), value);
        }
    }
}
