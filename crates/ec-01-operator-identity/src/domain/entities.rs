//! # Operator Identity
//!
//! `OperatorIdentity` is the internal record and holds secret material.
//! Everything that leaves the crate goes through `view()` or
//! `subresource_view()`, whose output types have no field able to carry a
//! secret.

use std::fmt;

use serde::Serialize;
use shared_types::SubResource;
use zeroize::Zeroizing;

use ec_02_change_log::value_digest;

use super::mutation::Mutation;
use super::value_objects::{
    HomeNetworkPrivateKey, N3ExternalAddress, OperatorCode, Plmn, Slice, TacSet,
};

/// The singleton operator record. Every field starts unset.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct OperatorIdentity {
    pub plmn: Option<Plmn>,
    pub slice: Option<Slice>,
    pub tracking: Option<TacSet>,
    pub operator_code: Option<OperatorCode>,
    pub home_network_key: Option<HomeNetworkPrivateKey>,
    pub n3_external_address: Option<N3ExternalAddress>,
}

impl fmt::Debug for OperatorIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperatorIdentity")
            .field("plmn", &self.plmn)
            .field("slice", &self.slice)
            .field("tracking", &self.tracking)
            .field("operator_code_set", &self.operator_code.is_some())
            .field("home_network_key_set", &self.home_network_key.is_some())
            .field("n3_external_address", &self.n3_external_address)
            .finish()
    }
}

impl OperatorIdentity {
    /// The record after `mutation`. Sub-resources are replaced whole.
    pub fn apply(&self, mutation: &Mutation) -> OperatorIdentity {
        let mut next = self.clone();
        match mutation {
            Mutation::SetIdentity(plmn) => next.plmn = Some(plmn.clone()),
            Mutation::SetSlice(slice) => next.slice = Some(*slice),
            Mutation::SetTracking(tacs) => next.tracking = Some(tacs.clone()),
            Mutation::SetOperatorCode(code) => next.operator_code = Some(code.clone()),
            Mutation::SetHomeNetworkKey(key) => next.home_network_key = Some(key.clone()),
            Mutation::SetN3ExternalAddress(addr) => next.n3_external_address = Some(*addr),
        }
        next
    }

    pub fn is_initialized(&self, resource: SubResource) -> bool {
        match resource {
            SubResource::Id => self.plmn.is_some(),
            SubResource::Slice => self.slice.is_some(),
            SubResource::Tracking => self.tracking.is_some(),
            SubResource::Code => self.operator_code.is_some(),
            SubResource::HomeNetwork => self.home_network_key.is_some(),
            SubResource::N3 => self.n3_external_address.is_some(),
        }
    }

    /// True once every operator sub-resource has been written. N3 has a
    /// usable default and is not required.
    pub fn is_complete(&self) -> bool {
        SubResource::ALL
            .iter()
            .filter(|r| **r != SubResource::N3)
            .all(|r| self.is_initialized(*r))
    }

    /// Canonical byte form of a sub-resource, used only for digests.
    fn canonical(&self, resource: SubResource) -> Option<Zeroizing<Vec<u8>>> {
        let bytes = match resource {
            SubResource::Id => self
                .plmn
                .as_ref()
                .map(|p| format!("{}:{}", p.mcc.as_str(), p.mnc.as_str()).into_bytes()),
            SubResource::Slice => self.slice.map(|s| {
                let sd = s.sd.map(|sd| sd.to_hex()).unwrap_or_default();
                format!("{}:{}", s.sst, sd).into_bytes()
            }),
            SubResource::Tracking => self
                .tracking
                .as_ref()
                .map(|t| t.to_hex_list().join(",").into_bytes()),
            SubResource::Code => self.operator_code.as_ref().map(|c| c.expose().to_vec()),
            SubResource::HomeNetwork => self
                .home_network_key
                .as_ref()
                .map(|k| k.expose().to_vec()),
            SubResource::N3 => self.n3_external_address.map(|a| a.to_wire().into_bytes()),
        };
        bytes.map(Zeroizing::new)
    }

    /// SHA-256 digest of the stored value, `None` if unset.
    pub fn digest(&self, resource: SubResource) -> Option<String> {
        self.canonical(resource)
            .map(|bytes| value_digest(resource, &bytes))
    }

    /// The external projection. Secrets are reduced to a public key and a flag.
    pub fn view(&self) -> OperatorView {
        OperatorView {
            id: self.plmn.clone(),
            slice: self.slice.map(SliceView::from),
            tracking: self.tracking.as_ref().map(TrackingView::from),
            home_network: self.home_network_view(),
            operator_code_set: self.operator_code.is_some(),
        }
    }

    fn home_network_view(&self) -> HomeNetworkView {
        HomeNetworkView {
            public_key: self
                .home_network_key
                .as_ref()
                .map(|k| k.public_key().to_hex()),
        }
    }

    /// External projection of one sub-resource, `None` if it was never written.
    pub fn subresource_view(&self, resource: SubResource) -> Option<SubResourceView> {
        if !self.is_initialized(resource) {
            return None;
        }
        let view = match resource {
            SubResource::Id => SubResourceView::Id(self.plmn.clone()?),
            SubResource::Slice => SubResourceView::Slice(self.slice?.into()),
            SubResource::Tracking => SubResourceView::Tracking(self.tracking.as_ref()?.into()),
            SubResource::Code => SubResourceView::Code(CodeStatus {
                operator_code_set: true,
            }),
            SubResource::HomeNetwork => SubResourceView::HomeNetwork(self.home_network_view()),
            SubResource::N3 => SubResourceView::N3(self.n3_view()),
        };
        Some(view)
    }

    /// N3 always has a view; unset means "use the interface address".
    pub fn n3_view(&self) -> N3View {
        N3View {
            external_address: self
                .n3_external_address
                .map(|a| a.to_wire())
                .unwrap_or_default(),
        }
    }
}

// =============================================================================
// EXTERNAL VIEWS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorView {
    pub id: Option<Plmn>,
    pub slice: Option<SliceView>,
    pub tracking: Option<TrackingView>,
    pub home_network: HomeNetworkView,
    pub operator_code_set: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SliceView {
    pub sst: u8,
    /// Six lowercase hex digits.
    pub sd: Option<String>,
}

impl From<Slice> for SliceView {
    fn from(slice: Slice) -> Self {
        Self {
            sst: slice.sst,
            sd: slice.sd.map(|sd| sd.to_hex()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingView {
    pub supported_tacs: Vec<String>,
}

impl From<&TacSet> for TrackingView {
    fn from(tacs: &TacSet) -> Self {
        Self {
            supported_tacs: tacs.to_hex_list(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeNetworkView {
    pub public_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeStatus {
    pub operator_code_set: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct N3View {
    pub external_address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SubResourceView {
    Id(Plmn),
    Slice(SliceView),
    Tracking(TrackingView),
    Code(CodeStatus),
    HomeNetwork(HomeNetworkView),
    N3(N3View),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{Mcc, Mnc, Sd, Tac};

    fn populated() -> OperatorIdentity {
        OperatorIdentity::default()
            .apply(&Mutation::SetIdentity(Plmn::new(
                Mcc::parse("001").unwrap(),
                Mnc::parse("01").unwrap(),
            )))
            .apply(&Mutation::SetSlice(Slice {
                sst: 1,
                sd: Some(Sd::from_int(0x102030).unwrap()),
            }))
            .apply(&Mutation::SetTracking(TacSet::new([Tac::parse("000001").unwrap()])))
            .apply(&Mutation::SetOperatorCode(
                OperatorCode::from_hex("0123456789abcdef0123456789abcdef").unwrap(),
            ))
            .apply(&Mutation::SetHomeNetworkKey(HomeNetworkPrivateKey::from_bytes(
                [0x42; 32],
            )))
    }

    #[test]
    fn test_view_never_contains_secrets() {
        let identity = populated();
        let json = serde_json::to_string(&identity.view()).unwrap();
        assert!(!json.contains("0123456789abcdef0123456789abcdef"));
        assert!(!json.contains(&hex::encode([0x42u8; 32])));
        assert!(json.contains("\"operatorCodeSet\":true"));
        assert!(json.contains("\"publicKey\""));

        let debug = format!("{:?}", identity);
        assert!(!debug.contains("0123456789abcdef"));
    }

    #[test]
    fn test_view_shape() {
        let json = serde_json::to_value(populated().view()).unwrap();
        assert_eq!(json["id"]["mcc"], "001");
        assert_eq!(json["id"]["mnc"], "01");
        assert_eq!(json["slice"]["sst"], 1);
        assert_eq!(json["slice"]["sd"], "102030");
        assert_eq!(json["tracking"]["supportedTacs"][0], "000001");
    }

    #[test]
    fn test_digest_changes_with_value_and_skips_unset() {
        let identity = populated();
        assert!(identity.digest(SubResource::N3).is_none());
        let before = identity.digest(SubResource::Slice).unwrap();
        let after = identity
            .apply(&Mutation::SetSlice(Slice { sst: 2, sd: None }))
            .digest(SubResource::Slice)
            .unwrap();
        assert_ne!(before, after);
        assert_eq!(before, identity.digest(SubResource::Slice).unwrap());
    }

    #[test]
    fn test_subresource_views() {
        let identity = populated();
        assert!(identity.is_complete());
        assert!(OperatorIdentity::default().subresource_view(SubResource::Id).is_none());
        assert!(matches!(
            identity.subresource_view(SubResource::Code),
            Some(SubResourceView::Code(CodeStatus { operator_code_set: true }))
        ));
        assert_eq!(identity.n3_view().external_address, "");
    }
}
