//! Recording fakes for the host collaborators.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use grants::RunConfig;
use storage::{GrantStore, MemoryGrantStore, Permission};

use crate::engine::{ApplicationEngine, RunReport};
use crate::host::{Component, ComponentRegistry, HostError, Prompt};

/// Records every call in one shared log so ordering can be asserted.
pub(crate) type CallLog = Rc<RefCell<Vec<String>>>;

pub(crate) struct RecordingStore {
    pub inner: MemoryGrantStore,
    pub log: CallLog,
    pub fail_origin: Option<String>,
}

impl GrantStore for RecordingStore {
    fn add(&self, origin: &str, key: &str, permission: Permission) -> storage::Result<()> {
        if self.fail_origin.as_deref() == Some(origin) {
            return Err(storage::Error::Rejected("read-only".to_string()));
        }
        self.log
            .borrow_mut()
            .push(format!("add {origin} {key} {}", permission.as_u32()));
        self.inner.add(origin, key, permission)
    }

    fn get(&self, origin: &str, key: &str) -> storage::Result<Option<Permission>> {
        self.inner.get(origin, key)
    }

    fn list(&self) -> storage::Result<Vec<storage::StoredGrant>> {
        self.inner.list()
    }
}

pub(crate) struct FakePrompt {
    pub answer: std::result::Result<bool, String>,
    pub confirms: Cell<usize>,
    /// `(title, message)` of every confirmation shown.
    pub asked: RefCell<Vec<(String, String)>>,
    pub alerts: RefCell<Vec<String>>,
}

impl FakePrompt {
    pub fn answering(answer: bool) -> Self {
        Self {
            answer: Ok(answer),
            confirms: Cell::new(0),
            asked: RefCell::new(Vec::new()),
            alerts: RefCell::new(Vec::new()),
        }
    }
}

impl Prompt for FakePrompt {
    fn confirm(&self, title: &str, message: &str) -> std::result::Result<bool, HostError> {
        self.confirms.set(self.confirms.get() + 1);
        self.asked
            .borrow_mut()
            .push((title.to_string(), message.to_string()));
        self.answer.clone().map_err(HostError::Unavailable)
    }

    fn alert(&self, _title: &str, message: &str) {
        self.alerts.borrow_mut().push(message.to_string());
    }
}

struct FakeComponent {
    log: CallLog,
    fail: bool,
}

impl Component for FakeComponent {
    fn uninstall(self: Box<Self>) -> std::result::Result<(), HostError> {
        if self.fail {
            return Err(HostError::Unavailable("locked".to_string()));
        }
        self.log.borrow_mut().push("uninstall".to_string());
        Ok(())
    }
}

pub(crate) struct FakeRegistry {
    pub log: CallLog,
    pub installed: bool,
    pub fail_uninstall: bool,
}

impl ComponentRegistry for FakeRegistry {
    fn lookup(&self, _id: &str) -> std::result::Result<Option<Box<dyn Component>>, HostError> {
        if !self.installed {
            return Ok(None);
        }
        Ok(Some(Box::new(FakeComponent {
            log: self.log.clone(),
            fail: self.fail_uninstall,
        })))
    }
}

pub(crate) struct Harness {
    pub log: CallLog,
    pub store: RecordingStore,
    pub prompt: FakePrompt,
    pub registry: FakeRegistry,
}

impl Harness {
    pub fn new(answer: bool) -> Self {
        let log = CallLog::default();
        Self {
            store: RecordingStore {
                inner: MemoryGrantStore::new(),
                log: log.clone(),
                fail_origin: None,
            },
            prompt: FakePrompt::answering(answer),
            registry: FakeRegistry {
                log: log.clone(),
                installed: true,
                fail_uninstall: false,
            },
            log,
        }
    }

    pub fn run(&self, config: &RunConfig) -> RunReport {
        self.engine(config).run()
    }

    pub fn engine<'a>(&'a self, config: &'a RunConfig) -> ApplicationEngine<'a> {
        ApplicationEngine::new(config, &self.store, &self.prompt, &self.registry)
    }

    pub fn calls(&self) -> Vec<String> {
        self.log.borrow().clone()
    }
}
