//! # Consistency Enforcer
//!
//! Implements `OperatorConfigApi` on top of the identity store, the radio
//! registry and the audit sink.
//!
//! ## Apply pipeline
//!
//! 1. Permission check and validation (no lock held)
//! 2. Admission: acquire the writer gate, then for PLMN changes confirm
//!    against the radio registry. Both share one pre-commit deadline.
//! 3. Commit: audit entry recorded, then the store write. No await points,
//!    so an admitted mutation always runs to completion.


use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use ec_02_change_log::{NewAuditEntry, SystemTimeSource, TimeSource};
use ella_telemetry::{metric_inc, OPERATOR_MUTATIONS, OPERATOR_MUTATION_DURATION};
use parking_lot::Mutex as SyncMutex;
use rand::rngs::OsRng;
use shared_types::{Actor, Permission, SubResource};
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::bootstrap;
use crate::domain::{
    check_admission, check_slice_singleton, impact_of, validate_radio, validate_request,
    ApplyReceipt, AttachedRadio, ConflictError, Mutation, MutationRequest, N3View, NotFoundError,
    OperatorError, OperatorIdentity, OperatorResult, OperatorView, PreparedIdentityChange,
    RadioRequest, StagedChangeView, StoreError, SubResourceView,
};
use crate::ports::{AuditSink, IdentityStore, OperatorConfigApi, RadioRegistry};

pub const DEFAULT_PRECOMMIT_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnforcerConfig {
    /// Upper bound on admission (writer gate plus radio confirmation).
    pub precommit_timeout: Duration,
}

impl Default for EnforcerConfig {
    fn default() -> Self {
        Self {
            precommit_timeout: DEFAULT_PRECOMMIT_TIMEOUT,
        }
    }
}

/// Dependencies for `ConsistencyEnforcer`.
pub struct EnforcerDependencies {
    pub store: Arc<dyn IdentityStore>,
    pub audit: Arc<dyn AuditSink>,
    pub radios: Arc<dyn RadioRegistry>,
}

/// The single writer of the operator record.
pub struct ConsistencyEnforcer {
    store: Arc<dyn IdentityStore>,
    audit: Arc<dyn AuditSink>,
    radios: Arc<dyn RadioRegistry>,
    clock: Arc<dyn TimeSource>,
    /// Serializes admission and commit of every mutation.
    writer: Mutex<()>,
    /// A PLMN change the registry could not confirm.
    pending: SyncMutex<Option<PreparedIdentityChange>>,
    config: EnforcerConfig,
}

impl ConsistencyEnforcer {
    pub fn new(deps: EnforcerDependencies, config: EnforcerConfig) -> Self {
        Self {
            store: deps.store,
            audit: deps.audit,
            radios: deps.radios,
            clock: Arc::new(SystemTimeSource),
            writer: Mutex::new(()),
            pending: SyncMutex::new(None),
            config,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn TimeSource>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &EnforcerConfig {
        &self.config
    }

    /// Apply factory defaults to every operator sub-resource that was never
    /// written, as the system actor. Returns how many were seeded.
    pub async fn seed_defaults(&self) -> OperatorResult<usize> {
        let identity = self.store.read()?;
        let system = Actor::system();
        let mut seeded = 0;

        for request in bootstrap::default_requests(&mut OsRng) {
            let resource = request.resource();
            if identity.is_initialized(resource) {
                continue;
            }
            self.apply(&system, request).await?;
            seeded += 1;
        }

        if seeded > 0 {
            info!(seeded, "Seeded default operator configuration");
        }
        Ok(seeded)
    }

    async fn admit(&self, deadline: tokio::time::Instant) -> OperatorResult<MutexGuard<'_, ()>> {
        tokio::time::timeout_at(deadline, self.writer.lock())
            .await
            .map_err(|_| OperatorError::PrecommitTimeout {
                phase: "writer gate",
            })
    }

    /// Run the PLMN guard. `Ok` carries the mutation to commit.
    async fn confirm_identity_change(
        &self,
        actor: &Actor,
        request_id: Uuid,
        current: &OperatorIdentity,
        mutation: Mutation,
        deadline: tokio::time::Instant,
    ) -> OperatorResult<Mutation> {
        let target = match mutation {
            Mutation::SetIdentity(target) => target,
            other => return Ok(other),
        };

        let prepared = PreparedIdentityChange::prepare(
            request_id,
            actor.subject.clone(),
            current,
            target,
            self.clock.now(),
        );

        let radios = if prepared.needs_confirmation() {
            let snapshot = tokio::time::timeout_at(deadline, self.radios.attached_radios()).await;
            match snapshot {
                Ok(Ok(radios)) => radios,
                Ok(Err(e)) => return Err(self.stage(actor, current, prepared, e.to_string())),
                Err(_) => {
                    return Err(self.stage(
                        actor,
                        current,
                        prepared,
                        "radio registry did not answer in time".to_string(),
                    ))
                }
            }
        } else {
            Vec::new()
        };

        // Any outcome below supersedes a previously staged change.
        self.pending.lock().take();

        match prepared.confirm(&radios) {
            Ok(confirmed) => {
                debug!(request_id = %confirmed.request_id(), "PLMN change confirmed");
                Ok(confirmed.into_mutation())
            }
            Err(aborted) => {
                let conflict = aborted.into_conflict();
                self.audit_rejection(actor, request_id, SubResource::Id, current, &conflict.to_string());
                Err(conflict.into())
            }
        }
    }

    /// Hold `prepared` as the staged change and build the caller's error.
    fn stage(
        &self,
        actor: &Actor,
        current: &OperatorIdentity,
        prepared: PreparedIdentityChange,
        reason: String,
    ) -> OperatorError {
        let conflict = ConflictError::ConfirmationPending {
            target: prepared.target().to_string(),
            reason,
        };
        warn!(
            request_id = %prepared.request_id(),
            target = %prepared.target(),
            error = %conflict,
            "PLMN change staged without commit"
        );
        self.audit_rejection(
            actor,
            prepared.request_id(),
            SubResource::Id,
            current,
            &conflict.to_string(),
        );
        *self.pending.lock() = Some(prepared);
        conflict.into()
    }

    /// Record a rejected attempt. A failure here is logged, not returned: the
    /// caller already gets the rejection and nothing was applied.
    fn audit_rejection(
        &self,
        actor: &Actor,
        request_id: Uuid,
        resource: SubResource,
        current: &OperatorIdentity,
        reason: &str,
    ) {
        let entry = NewAuditEntry::new(request_id, actor, resource)
            .with_digests(current.digest(resource), None)
            .rejected(reason);
        if let Err(e) = self.audit.record(entry) {
            error!(%request_id, %resource, error = %e, "Failed to audit rejected mutation");
        }
    }

    /// Audit, then write. Runs with the writer gate held and never awaits.
    fn commit(
        &self,
        actor: &Actor,
        request_id: Uuid,
        current: &OperatorIdentity,
        mutation: &Mutation,
    ) -> OperatorResult<ApplyReceipt> {
        let resource = mutation.resource();
        let next = current.apply(mutation);

        if let Mutation::SetSlice(slice) = mutation {
            if let Err(conflict) = check_slice_singleton(&next, slice) {
                self.audit_rejection(actor, request_id, resource, current, &conflict.to_string());
                return Err(conflict.into());
            }
        }

        let previous_digest = current.digest(resource);
        let new_digest = next.digest(resource);
        let changed = previous_digest != new_digest;
        let impact = impact_of(mutation);

        let entry = NewAuditEntry::new(request_id, actor, resource)
            .with_digests(previous_digest.clone(), new_digest.clone())
            .with_impact(impact)
            .with_details(mutation.describe());

        // Write-ahead: no audit entry, no mutation.
        let recorded = self.audit.record(entry).map_err(|e| StoreError::IOFailure {
            reason: format!("audit log: {}", e),
        })?;

        if changed {
            if let Err(e) = self.store.write_subresource(mutation) {
                let followup = NewAuditEntry::new(request_id, actor, resource)
                    .with_digests(previous_digest, new_digest)
                    .rejected(format!("store write failed: {}", e));
                if let Err(audit_err) = self.audit.record(followup) {
                    error!(%request_id, error = %audit_err, "Failed to audit store failure");
                }
                return Err(e.into());
            }
        }

        Ok(ApplyReceipt {
            request_id,
            resource,
            changed,
            impact,
            audit_id: recorded.id,
        })
    }

    #[instrument(
        skip(self, actor, request),
        fields(%request_id, actor = %actor.subject, resource = %request.resource())
    )]
    async fn apply_inner(
        &self,
        actor: &Actor,
        request_id: Uuid,
        request: MutationRequest,
    ) -> OperatorResult<ApplyReceipt> {
        let resource = request.resource();
        actor.require(request.required_permission())?;

        let mutation = match validate_request(&request) {
            Ok(mutation) => mutation,
            Err(errors) => {
                let current = self.store.read()?;
                self.audit_rejection(actor, request_id, resource, &current, &errors.summary());
                return Err(errors.into());
            }
        };

        let deadline = tokio::time::Instant::now() + self.config.precommit_timeout;
        let _gate = match self.admit(deadline).await {
            Ok(gate) => gate,
            Err(e) => {
                let current = self.store.read()?;
                self.audit_rejection(actor, request_id, resource, &current, &e.to_string());
                return Err(e);
            }
        };
        let current = self.store.read()?;

        let mutation = self
            .confirm_identity_change(actor, request_id, &current, mutation, deadline)
            .await?;

        self.commit(actor, request_id, &current, &mutation)
    }
}

fn outcome_label(result: &OperatorResult<ApplyReceipt>) -> &'static str {
    match result {
        Ok(receipt) if receipt.changed => "accepted",
        Ok(_) => "unchanged",
        Err(OperatorError::Conflict(ConflictError::ValidationFailed(_))) => "invalid",
        Err(OperatorError::Conflict(_)) => "conflict",
        Err(OperatorError::Forbidden(_)) => "forbidden",
        Err(OperatorError::PrecommitTimeout { .. }) => "timeout",
        Err(_) => "error",
    }
}

#[async_trait]
impl OperatorConfigApi for ConsistencyEnforcer {
    async fn apply(
        &self,
        actor: &Actor,
        request: MutationRequest,
    ) -> OperatorResult<ApplyReceipt> {
        let started = Instant::now();
        let resource = request.resource();
        let request_id = Uuid::new_v4();

        let result = self.apply_inner(actor, request_id, request).await;

        OPERATOR_MUTATION_DURATION
            .with_label_values(&[resource.as_str()])
            .observe(started.elapsed().as_secs_f64());
        metric_inc!(OPERATOR_MUTATIONS, &[resource.as_str(), outcome_label(&result)]);

        match &result {
            Ok(receipt) => info!(
                %request_id,
                %resource,
                actor = %actor.subject,
                changed = receipt.changed,
                impact = ?receipt.impact,
                audit_id = receipt.audit_id,
                "Operator configuration updated"
            ),
            Err(e) => warn!(
                %request_id,
                %resource,
                actor = %actor.subject,
                error = %e,
                "Operator configuration change rejected"
            ),
        }
        result
    }

    fn view(&self) -> OperatorResult<OperatorView> {
        Ok(self.store.read()?.view())
    }

    fn read_subresource(&self, resource: SubResource) -> OperatorResult<SubResourceView> {
        self.store
            .read()?
            .subresource_view(resource)
            .ok_or_else(|| NotFoundError::NotInitialized { resource }.into())
    }

    fn n3(&self) -> OperatorResult<N3View> {
        Ok(self.store.read()?.n3_view())
    }

    fn staged_identity_change(&self) -> Option<StagedChangeView> {
        self.pending.lock().as_ref().map(PreparedIdentityChange::view)
    }

    async fn commit_staged_identity_change(&self, actor: &Actor) -> OperatorResult<ApplyReceipt> {
        actor.require(Permission::OperatorUpdateId)?;
        let target = self
            .pending
            .lock()
            .as_ref()
            .map(|prepared| prepared.target().clone())
            .ok_or(NotFoundError::NoStagedChange)?;

        info!(target = %target, actor = %actor.subject, "Retrying staged PLMN change");
        self.apply(
            actor,
            MutationRequest::SetIdentity {
                mcc: target.mcc.as_str().to_string(),
                mnc: target.mnc.as_str().to_string(),
            },
        )
        .await
    }

    fn discard_staged_identity_change(&self, actor: &Actor) -> OperatorResult<StagedChangeView> {
        actor.require(Permission::OperatorUpdateId)?;
        let prepared = self
            .pending
            .lock()
            .take()
            .ok_or(NotFoundError::NoStagedChange)?;
        info!(
            request_id = %prepared.request_id(),
            target = %prepared.target(),
            actor = %actor.subject,
            "Discarded staged PLMN change"
        );
        Ok(prepared.view())
    }

    fn is_initialized(&self) -> bool {
        self.store
            .read()
            .map(|identity| identity.is_complete())
            .unwrap_or(false)
    }

    async fn admit_radio(
        &self,
        actor: &Actor,
        request: RadioRequest,
    ) -> OperatorResult<AttachedRadio> {
        actor.require(Permission::RadiosManage)?;
        let registration = validate_radio(&request)?;

        // Admission and PLMN changes are serialized so a radio cannot slip in
        // under a PLMN that is being replaced.
        let deadline = tokio::time::Instant::now() + self.config.precommit_timeout;
        let _gate = self.admit(deadline).await?;

        let identity = self.store.read()?;
        check_admission(&identity, &registration)?;

        let radio = registration.attach(self.clock.now());
        self.radios.attach(radio.clone()).await?;
        info!(
            radio = %radio.name,
            plmn = %radio.plmn,
            tac = %radio.tac,
            actor = %actor.subject,
            "Radio attached"
        );
        Ok(radio)
    }

    async fn release_radio(&self, actor: &Actor, name: &str) -> OperatorResult<()> {
        actor.require(Permission::RadiosManage)?;
        match self.radios.detach(name).await? {
            Some(radio) => {
                info!(radio = %radio.name, actor = %actor.subject, "Radio detached");
                Ok(())
            }
            None => Err(NotFoundError::Radio {
                name: name.to_string(),
            }
            .into()),
        }
    }

    async fn attached_radios(&self) -> OperatorResult<Vec<AttachedRadio>> {
        Ok(self.radios.attached_radios().await?)
    }
}
