//! Cross-field rules checked before a mutation reaches the store.

use ec_02_change_log::Impact;

use super::entities::OperatorIdentity;
use super::errors::ConflictError;
use super::mutation::Mutation;
use super::radio::{AttachedRadio, RadioRegistration};
use super::value_objects::{Plmn, Slice, TacSet};

/// Radios attached under `plmn` in one of the supported tracking areas.
/// An absent or empty TAC set puts no radio in scope.
pub fn radios_in_scope<'a>(
    radios: &'a [AttachedRadio],
    plmn: &Plmn,
    tacs: Option<&TacSet>,
) -> Vec<&'a AttachedRadio> {
    let Some(tacs) = tacs else {
        return Vec::new();
    };
    radios
        .iter()
        .filter(|radio| radio.plmn == *plmn && tacs.contains(&radio.tac))
        .collect()
}

/// A radio may attach only under the configured PLMN and a supported TAC.
pub fn check_admission(
    identity: &OperatorIdentity,
    radio: &RadioRegistration,
) -> Result<(), ConflictError> {
    let reject = |reason: String| ConflictError::RadioNotAdmitted {
        radio: radio.name.clone(),
        reason,
    };

    let plmn = identity
        .plmn
        .as_ref()
        .ok_or_else(|| reject("operator PLMN is not configured".to_string()))?;
    if *plmn != radio.plmn {
        return Err(reject(format!(
            "PLMN {} does not match operator PLMN {}",
            radio.plmn, plmn
        )));
    }

    match identity.tracking.as_ref() {
        Some(tacs) if tacs.contains(&radio.tac) => Ok(()),
        Some(tacs) if tacs.is_empty() => Err(reject(
            "no tracking areas are supported; radio attachment is disabled".to_string(),
        )),
        _ => Err(reject(format!("TAC {} is not supported", radio.tac))),
    }
}

/// Post-condition of a slice update: the record holds exactly the requested slice.
pub fn check_slice_singleton(
    next: &OperatorIdentity,
    requested: &Slice,
) -> Result<(), ConflictError> {
    if next.slice.as_ref() == Some(requested) {
        Ok(())
    } else {
        Err(ConflictError::SliceAlreadyUnique)
    }
}

/// Clearing every tracking area disconnects the RAN and is flagged for review.
pub fn impact_of(mutation: &Mutation) -> Impact {
    match mutation {
        Mutation::SetTracking(tacs) if tacs.is_empty() => Impact::High,
        _ => Impact::Normal,
    }
}
