//! # Inbound Ports (Driving Ports)
//!
//! The API the HTTP gateway and the runtime use. All configuration reads and
//! writes go through this trait; nothing outside the crate touches the store.

use async_trait::async_trait;
use shared_types::{Actor, SubResource};

use crate::domain::{
    ApplyReceipt, AttachedRadio, MutationRequest, N3View, OperatorResult, OperatorView,
    RadioRequest, StagedChangeView, SubResourceView,
};

#[async_trait]
pub trait OperatorConfigApi: Send + Sync {
    /// Validate, check invariants, audit and apply one mutation.
    ///
    /// Rejections are audited too. Once the mutation is admitted it runs to
    /// completion even if the caller goes away.
    async fn apply(&self, actor: &Actor, request: MutationRequest)
        -> OperatorResult<ApplyReceipt>;

    /// External view of the whole operator record.
    fn view(&self) -> OperatorResult<OperatorView>;

    /// External view of one sub-resource; `NotFound` if never written.
    fn read_subresource(&self, resource: SubResource) -> OperatorResult<SubResourceView>;

    fn n3(&self) -> OperatorResult<N3View>;

    /// A PLMN change held back because the radio registry could not confirm it.
    fn staged_identity_change(&self) -> Option<StagedChangeView>;

    /// Retry the staged PLMN change against the registry. It is committed,
    /// aborted or staged again, exactly like a fresh `SetIdentity`.
    async fn commit_staged_identity_change(&self, actor: &Actor) -> OperatorResult<ApplyReceipt>;

    /// Drop the staged PLMN change without applying it.
    fn discard_staged_identity_change(&self, actor: &Actor) -> OperatorResult<StagedChangeView>;

    /// Whether every operator sub-resource has been written.
    fn is_initialized(&self) -> bool;

    /// Attach a radio if its PLMN and TAC are currently served.
    async fn admit_radio(&self, actor: &Actor, request: RadioRequest)
        -> OperatorResult<AttachedRadio>;

    async fn release_radio(&self, actor: &Actor, name: &str) -> OperatorResult<()>;

    async fn attached_radios(&self) -> OperatorResult<Vec<AttachedRadio>>;
}
