use crate::backend::BackendResolver;
use crate::config::Config;
use crate::context::StateContext;
use crate::error::{Result, StateLockError};
use crate::locks::{LockId, LockInfo};
use crate::state::{Locker, StateHandle, StorageKind};
use std::cell::{Cell, RefCell};
use std::io::{self, BufRead, Read};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::{LazyLock, Mutex, MutexGuard};

static CWD_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub(crate) struct DirGuard {
    original: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl DirGuard {
    pub(crate) fn new(new_dir: &Path) -> Self {
        // The working directory is process-global; serialize even without #[serial].
        let lock = CWD_LOCK.lock().unwrap_or_else(|poison| poison.into_inner());
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(new_dir).unwrap();
        Self {
            original,
            _lock: lock,
        }
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

/// IDs passed to [`FakeState`]'s `unlock`, in call order.
pub(crate) type CallLog = Rc<RefCell<Vec<String>>>;

/// In-memory state handle that records every release call.
#[derive(Debug, Clone)]
pub(crate) struct FakeState {
    storage: StorageKind,
    lockable: bool,
    held: Option<LockInfo>,
    fail_unlock: Option<String>,
    unlocks: CallLog,
}

impl FakeState {
    fn build(storage: StorageKind, lockable: bool) -> (Self, CallLog) {
        let unlocks = CallLog::default();
        let state = Self {
            storage,
            lockable,
            held: None,
            fail_unlock: None,
            unlocks: Rc::clone(&unlocks),
        };
        (state, unlocks)
    }

    pub(crate) fn shared() -> (Self, CallLog) {
        Self::build(StorageKind::Shared, true)
    }

    pub(crate) fn local() -> (Self, CallLog) {
        Self::build(StorageKind::Local, true)
    }

    pub(crate) fn not_lockable() -> (Self, CallLog) {
        Self::build(StorageKind::Shared, false)
    }

    pub(crate) fn with_held_lock(mut self, info: LockInfo) -> Self {
        self.held = Some(info);
        self
    }

    pub(crate) fn failing_unlock(mut self, message: &str) -> Self {
        self.fail_unlock = Some(message.to_string());
        self
    }
}

impl StateHandle for FakeState {
    fn describe(&self) -> String {
        format!("fake {:?} state", self.storage).to_lowercase()
    }

    fn storage(&self) -> StorageKind {
        self.storage
    }

    fn read(&self) -> Result<Option<String>> {
        Ok(None)
    }

    fn write(&self, _contents: &str) -> Result<()> {
        Ok(())
    }

    fn locker(&self) -> Option<&dyn Locker> {
        if self.lockable { Some(self) } else { None }
    }
}

impl Locker for FakeState {
    fn lock(&self, info: &LockInfo) -> Result<LockId> {
        Ok(info.id.clone())
    }

    fn lock_info(&self) -> Result<Option<LockInfo>> {
        Ok(self.held.clone())
    }

    fn unlock(&self, id: &LockId) -> Result<()> {
        self.unlocks.borrow_mut().push(id.as_str().to_string());
        match &self.fail_unlock {
            Some(message) => Err(StateLockError::Lock(message.clone())),
            None => Ok(()),
        }
    }
}

/// Resolver handing out clones of one [`FakeState`].
pub(crate) struct FakeResolver {
    state: FakeState,
    pub(crate) resolves: Cell<usize>,
}

impl FakeResolver {
    pub(crate) fn new(state: FakeState) -> Self {
        Self {
            state,
            resolves: Cell::new(0),
        }
    }
}

impl BackendResolver for FakeResolver {
    fn resolve(&self, _ctx: &StateContext, _config: &Config) -> Result<Box<dyn StateHandle>> {
        self.resolves.set(self.resolves.get() + 1);
        Ok(Box::new(self.state.clone()))
    }
}

pub(crate) struct FailingResolver(pub(crate) String);

impl BackendResolver for FailingResolver {
    fn resolve(&self, _ctx: &StateContext, _config: &Config) -> Result<Box<dyn StateHandle>> {
        Err(StateLockError::Backend(self.0.clone()))
    }
}

/// Input stream whose every read fails.
pub(crate) struct BrokenInput;

impl Read for BrokenInput {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::other("broken pipe"))
    }
}

impl BufRead for BrokenInput {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        Err(io::Error::other("broken pipe"))
    }

    fn consume(&mut self, _amt: usize) {}
}
