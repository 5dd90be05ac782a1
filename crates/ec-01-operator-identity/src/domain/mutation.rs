//! Mutation requests as received, and the validated mutations the enforcer applies.

use serde::{Deserialize, Serialize};
use shared_types::{Permission, SubResource};
use uuid::Uuid;

use ec_02_change_log::Impact;

use super::value_objects::{
    HomeNetworkPrivateKey, N3ExternalAddress, OperatorCode, Plmn, RawSecret, Slice, TacSet,
};

/// SD as sent by a client: either the integer value or its six-digit hex form.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SdInput {
    Int(i64),
    Hex(String),
}

/// An unvalidated configuration change.
#[derive(Debug, Clone)]
pub enum MutationRequest {
    SetIdentity {
        mcc: String,
        mnc: String,
    },
    SetSlice {
        sst: Option<i64>,
        sd: Option<SdInput>,
    },
    SetTracking {
        supported_tacs: Vec<String>,
    },
    SetOperatorCode {
        operator_code: RawSecret,
    },
    SetHomeNetworkKey {
        private_key: RawSecret,
    },
    SetN3ExternalAddress {
        external_address: String,
    },
}

impl MutationRequest {
    pub fn resource(&self) -> SubResource {
        match self {
            MutationRequest::SetIdentity { .. } => SubResource::Id,
            MutationRequest::SetSlice { .. } => SubResource::Slice,
            MutationRequest::SetTracking { .. } => SubResource::Tracking,
            MutationRequest::SetOperatorCode { .. } => SubResource::Code,
            MutationRequest::SetHomeNetworkKey { .. } => SubResource::HomeNetwork,
            MutationRequest::SetN3ExternalAddress { .. } => SubResource::N3,
        }
    }

    pub fn required_permission(&self) -> Permission {
        required_permission(self.resource())
    }
}

/// Permission needed to update `resource`.
pub fn required_permission(resource: SubResource) -> Permission {
    match resource {
        SubResource::Id => Permission::OperatorUpdateId,
        SubResource::Slice => Permission::OperatorUpdateSlice,
        SubResource::Tracking => Permission::OperatorUpdateTracking,
        SubResource::Code => Permission::OperatorUpdateCode,
        SubResource::HomeNetwork => Permission::OperatorUpdateHomeNetwork,
        SubResource::N3 => Permission::NetworkingUpdate,
    }
}

/// A validated configuration change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    SetIdentity(Plmn),
    SetSlice(Slice),
    SetTracking(TacSet),
    SetOperatorCode(OperatorCode),
    SetHomeNetworkKey(HomeNetworkPrivateKey),
    SetN3ExternalAddress(N3ExternalAddress),
}

impl Mutation {
    pub fn resource(&self) -> SubResource {
        match self {
            Mutation::SetIdentity(_) => SubResource::Id,
            Mutation::SetSlice(_) => SubResource::Slice,
            Mutation::SetTracking(_) => SubResource::Tracking,
            Mutation::SetOperatorCode(_) => SubResource::Code,
            Mutation::SetHomeNetworkKey(_) => SubResource::HomeNetwork,
            Mutation::SetN3ExternalAddress(_) => SubResource::N3,
        }
    }

    /// Human-readable summary for the audit trail. Never contains secret material.
    pub fn describe(&self) -> String {
        match self {
            Mutation::SetIdentity(plmn) => {
                format!("mcc={} mnc={}", plmn.mcc.as_str(), plmn.mnc.as_str())
            }
            Mutation::SetSlice(slice) => slice.to_string(),
            Mutation::SetTracking(tacs) if tacs.is_empty() => {
                "supported TACs cleared; radio attachment disabled".to_string()
            }
            Mutation::SetTracking(tacs) => {
                format!("supported TACs [{}]", tacs.to_hex_list().join(", "))
            }
            Mutation::SetOperatorCode(_) => "operator code replaced".to_string(),
            Mutation::SetHomeNetworkKey(key) => {
                format!("home network public key {}", key.public_key().to_hex())
            }
            Mutation::SetN3ExternalAddress(addr) => match addr.address() {
                Some(ip) => format!("N3 external address {}", ip),
                None => "N3 external address cleared".to_string(),
            },
        }
    }
}

/// Outcome of a successful `apply`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplyReceipt {
    pub request_id: Uuid,
    pub resource: SubResource,
    /// False when the new value equals the stored one.
    pub changed: bool,
    pub impact: Impact,
    pub audit_id: u64,
}
