//! # File-Backed Identity Store
//!
//! The record lives in `<data_dir>/operator.json`. A write encodes the next
//! record, writes it to a temp file, fsyncs and renames it over the old file,
//! and only then publishes it to readers. If any step fails the published
//! record is untouched.
//!
//! The file contains the operator code and home-network private key, so it is
//! created owner-only on Unix and every intermediate buffer is zeroized.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use zeroize::{Zeroize, Zeroizing};

use super::lock::DataDirLock;
use crate::domain::{
    HomeNetworkPrivateKey, Mcc, Mnc, Mutation, N3ExternalAddress, OperatorCode, OperatorIdentity,
    Plmn, Sd, Slice, StoreError, Tac, TacSet,
};
use crate::ports::IdentityStore;

const RECORD_FILE: &str = "operator.json";
const FORMAT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct PersistedSlice {
    sst: u8,
    sd: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct PersistedPlmn {
    mcc: String,
    mnc: String,
}

/// On-disk form. Secrets are hex strings, wiped when the value drops.
#[derive(Serialize, Deserialize)]
struct PersistedIdentity {
    version: u32,
    #[serde(default)]
    plmn: Option<PersistedPlmn>,
    #[serde(default)]
    slice: Option<PersistedSlice>,
    #[serde(default)]
    supported_tacs: Option<Vec<String>>,
    #[serde(default)]
    operator_code: Option<String>,
    #[serde(default)]
    home_network_private_key: Option<String>,
    #[serde(default)]
    n3_external_address: Option<String>,
}

impl Drop for PersistedIdentity {
    fn drop(&mut self) {
        self.operator_code.zeroize();
        self.home_network_private_key.zeroize();
    }
}

impl From<&OperatorIdentity> for PersistedIdentity {
    fn from(identity: &OperatorIdentity) -> Self {
        Self {
            version: FORMAT_VERSION,
            plmn: identity.plmn.as_ref().map(|p| PersistedPlmn {
                mcc: p.mcc.as_str().to_string(),
                mnc: p.mnc.as_str().to_string(),
            }),
            slice: identity.slice.map(|s| PersistedSlice {
                sst: s.sst,
                sd: s.sd.map(|sd| sd.to_hex()),
            }),
            supported_tacs: identity.tracking.as_ref().map(TacSet::to_hex_list),
            operator_code: identity.operator_code.as_ref().map(|c| hex::encode(c.expose())),
            home_network_private_key: identity
                .home_network_key
                .as_ref()
                .map(|k| hex::encode(k.expose())),
            n3_external_address: identity.n3_external_address.map(|a| a.to_wire()),
        }
    }
}

impl PersistedIdentity {
    fn decode(&self) -> Result<OperatorIdentity, StoreError> {
        if self.version != FORMAT_VERSION {
            return Err(corrupted(format!(
                "unsupported format version {}",
                self.version
            )));
        }

        let plmn = match &self.plmn {
            Some(p) => Some(Plmn::new(
                Mcc::parse(&p.mcc).map_err(corrupted)?,
                Mnc::parse(&p.mnc).map_err(corrupted)?,
            )),
            None => None,
        };
        let slice = match &self.slice {
            Some(s) => Some(Slice {
                sst: s.sst,
                sd: s
                    .sd
                    .as_deref()
                    .map(Sd::from_hex)
                    .transpose()
                    .map_err(corrupted)?,
            }),
            None => None,
        };
        let tracking = match &self.supported_tacs {
            Some(tacs) => Some(TacSet::new(
                tacs.iter()
                    .map(|t| Tac::parse(t))
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(corrupted)?,
            )),
            None => None,
        };
        let operator_code = self
            .operator_code
            .as_deref()
            .map(OperatorCode::from_hex)
            .transpose()
            .map_err(corrupted)?;
        let home_network_key = self
            .home_network_private_key
            .as_deref()
            .map(HomeNetworkPrivateKey::from_hex)
            .transpose()
            .map_err(corrupted)?;
        let n3_external_address = self
            .n3_external_address
            .as_deref()
            .map(N3ExternalAddress::parse)
            .transpose()
            .map_err(corrupted)?;

        Ok(OperatorIdentity {
            plmn,
            slice,
            tracking,
            operator_code,
            home_network_key,
            n3_external_address,
        })
    }
}

fn corrupted(reason: impl Into<String>) -> StoreError {
    StoreError::Corrupted {
        reason: reason.into(),
    }
}

/// Durable identity store holding an exclusive lock on its data directory.
pub struct FileIdentityStore {
    current: RwLock<Arc<OperatorIdentity>>,
    writer: Mutex<()>,
    dir: PathBuf,
    _lock: DataDirLock,
}

impl FileIdentityStore {
    /// Lock `dir` and load the record, starting empty if none exists.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir).map_err(|e| StoreError::io("create data dir", e))?;
        let lock = DataDirLock::acquire(&dir)?;

        let identity = load(&dir.join(RECORD_FILE))?;
        info!(
            path = %dir.join(RECORD_FILE).display(),
            initialized = identity.is_complete(),
            "Opened operator identity store"
        );

        Ok(Self {
            current: RwLock::new(Arc::new(identity)),
            writer: Mutex::new(()),
            dir,
            _lock: lock,
        })
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(RECORD_FILE)
    }

    fn persist(&self, identity: &OperatorIdentity) -> Result<(), StoreError> {
        let persisted = PersistedIdentity::from(identity);
        let bytes = Zeroizing::new(
            serde_json::to_vec_pretty(&persisted).map_err(|e| StoreError::io("encode record", e))?,
        );
        write_atomically(&self.path(), &bytes)
    }
}

impl IdentityStore for FileIdentityStore {
    fn read(&self) -> Result<Arc<OperatorIdentity>, StoreError> {
        Ok(Arc::clone(&self.current.read()))
    }

    fn write_subresource(&self, mutation: &Mutation) -> Result<Arc<OperatorIdentity>, StoreError> {
        let _writer = self.writer.lock();
        let next = self.current.read().apply(mutation);
        self.persist(&next)?;

        let next = Arc::new(next);
        *self.current.write() = Arc::clone(&next);
        debug!(resource = %mutation.resource(), "Operator record persisted");
        Ok(next)
    }
}

fn load(path: &Path) -> Result<OperatorIdentity, StoreError> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => Zeroizing::new(bytes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(OperatorIdentity::default())
        }
        Err(e) => return Err(StoreError::io("read operator record", e)),
    };
    let persisted: PersistedIdentity =
        serde_json::from_slice(&bytes).map_err(|e| corrupted(e.to_string()))?;
    persisted.decode()
}

fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let temp_path = path.with_extension("tmp");

    let mut options = OpenOptions::new();
    options.create(true).write(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options
        .open(&temp_path)
        .map_err(|e| StoreError::io("create temp file", e))?;
    file.write_all(bytes)
        .and_then(|_| file.sync_all())
        .map_err(|e| StoreError::io("write temp file", e))?;
    std::fs::rename(&temp_path, path).map_err(|e| StoreError::io("rename temp file", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::SubResource;
    use tempfile::TempDir;

    fn plmn(mcc: &str, mnc: &str) -> Plmn {
        Plmn::new(Mcc::parse(mcc).unwrap(), Mnc::parse(mnc).unwrap())
    }

    #[test]
    fn test_reopen_restores_every_subresource() {
        let dir = TempDir::new().unwrap();
        {
            let store = FileIdentityStore::open(dir.path()).unwrap();
            store
                .write_subresource(&Mutation::SetIdentity(plmn("310", "410")))
                .unwrap();
            store
                .write_subresource(&Mutation::SetSlice(Slice {
                    sst: 1,
                    sd: Some(Sd::from_int(0x102030).unwrap()),
                }))
                .unwrap();
            store
                .write_subresource(&Mutation::SetOperatorCode(OperatorCode::from_bytes([9; 16])))
                .unwrap();
            store
                .write_subresource(&Mutation::SetN3ExternalAddress(
                    N3ExternalAddress::parse("10.0.0.1").unwrap(),
                ))
                .unwrap();
        }

        let store = FileIdentityStore::open(dir.path()).unwrap();
        let identity = store.read().unwrap();
        assert_eq!(identity.plmn, Some(plmn("310", "410")));
        assert_eq!(identity.slice.unwrap().sd.unwrap().value(), 0x102030);
        assert_eq!(identity.operator_code, Some(OperatorCode::from_bytes([9; 16])));
        assert_eq!(identity.n3_view().external_address, "10.0.0.1");
        assert!(store.read_subresource(SubResource::Tracking).is_err());
    }

    #[test]
    fn test_second_open_is_locked() {
        let dir = TempDir::new().unwrap();
        let _store = FileIdentityStore::open(dir.path()).unwrap();
        assert!(matches!(
            FileIdentityStore::open(dir.path()),
            Err(StoreError::Locked { .. })
        ));
    }

    #[test]
    fn test_failed_persist_keeps_published_record() {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("data");
        let store = FileIdentityStore::open(&data).unwrap();
        store
            .write_subresource(&Mutation::SetIdentity(plmn("001", "01")))
            .unwrap();

        std::fs::remove_dir_all(&data).unwrap();
        let err = store
            .write_subresource(&Mutation::SetIdentity(plmn("310", "410")))
            .unwrap_err();
        assert!(matches!(err, StoreError::IOFailure { .. }));
        assert_eq!(store.read().unwrap().plmn, Some(plmn("001", "01")));
    }

    #[test]
    fn test_corrupted_record_is_reported() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(RECORD_FILE),
            r#"{"version":1,"plmn":{"mcc":"31","mnc":"410"}}"#,
        )
        .unwrap();
        assert!(matches!(
            FileIdentityStore::open(dir.path()),
            Err(StoreError::Corrupted { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_record_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let store = FileIdentityStore::open(dir.path()).unwrap();
        store
            .write_subresource(&Mutation::SetOperatorCode(OperatorCode::from_bytes([1; 16])))
            .unwrap();
        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
