pub mod entities;
pub mod errors;
pub mod invariants;
pub mod mutation;
pub mod radio;
pub mod staging;
pub mod validation;
pub mod value_objects;

pub use entities::{
    CodeStatus, HomeNetworkView, N3View, OperatorIdentity, OperatorView, SliceView,
    SubResourceView, TrackingView,
};
pub use errors::{
    ConflictError, NotFoundError, OperatorError, OperatorResult, RegistryError, StoreError,
};
pub use invariants::{check_admission, check_slice_singleton, impact_of, radios_in_scope};
pub use mutation::{required_permission, ApplyReceipt, Mutation, MutationRequest, SdInput};
pub use radio::{AttachedRadio, RadioRegistration, RadioRequest};
pub use staging::{
    AbortedIdentityChange, ConfirmedIdentityChange, PreparedIdentityChange, StagedChangeView,
};
pub use validation::{validate, validate_radio, validate_request, Field, ValidationError};
pub use value_objects::{
    HomeNetworkPrivateKey, HomeNetworkPublicKey, Mcc, Mnc, N3ExternalAddress, OperatorCode,
    Plmn, RawSecret, Sd, Slice, Tac, TacSet, MAX_SUPPORTED_TACS,
};
