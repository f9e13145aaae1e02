//! In-process collaborators: a scenario store backed by a map and a canned
//! computation service. Used by the QA tester and by tests.
use async_trait::async_trait;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;
use thiserror::Error;

use crate::dashboard::ComputationService;
use crate::error::ScenarioError;
use crate::inputs::ScaleInputSet;
use crate::result::ComputationResponse;
use crate::sync::{ScenarioStore, StoredScenario};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("scenario store is offline")]
pub struct StoreOffline;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum StoreMode {
    #[default]
    Accepting,
    Rejecting,
    Offline,
}

/// Map-backed [`ScenarioStore`]. Clones share the same map and counters.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    scenarios: Rc<RefCell<BTreeMap<String, StoredScenario>>>,
    save_calls: Rc<Cell<usize>>,
    mode: StoreMode,
}

impl MemoryStore {
    /// A store that answers but refuses every save.
    #[must_use]
    pub fn rejecting() -> Self {
        Self {
            mode: StoreMode::Rejecting,
            ..Self::default()
        }
    }

    /// A store that cannot be reached.
    #[must_use]
    pub fn offline() -> Self {
        Self {
            mode: StoreMode::Offline,
            ..Self::default()
        }
    }

    pub fn insert(&self, name: &str, scenario: StoredScenario) {
        self.scenarios
            .borrow_mut()
            .insert(name.to_string(), scenario);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<StoredScenario> {
        self.scenarios.borrow().get(name).cloned()
    }

    /// Number of times `save` reached the store.
    #[must_use]
    pub fn save_calls(&self) -> usize {
        self.save_calls.get()
    }

    const fn check(&self) -> Result<(), StoreOffline> {
        match self.mode {
            StoreMode::Offline => Err(StoreOffline),
            StoreMode::Accepting | StoreMode::Rejecting => Ok(()),
        }
    }
}

#[async_trait(?Send)]
impl ScenarioStore for MemoryStore {
    type Error = StoreOffline;

    async fn save(&self, name: &str, inputs: &ScaleInputSet) -> Result<bool, Self::Error> {
        self.save_calls.set(self.save_calls.get() + 1);
        self.check()?;
        if self.mode == StoreMode::Rejecting {
            return Ok(false);
        }
        self.insert(name, StoredScenario::from_inputs(inputs));
        Ok(true)
    }

    async fn load(&self, name: &str) -> Result<Option<StoredScenario>, Self::Error> {
        self.check()?;
        Ok(self.get(name))
    }

    async fn list(&self) -> Result<Vec<String>, Self::Error> {
        self.check()?;
        Ok(self.scenarios.borrow().keys().cloned().collect())
    }
}

/// [`ComputationService`] returning a fixed response, or a fixed failure.
#[derive(Debug, Clone)]
pub struct StubComputation {
    outcome: Result<ComputationResponse, ScenarioError>,
    calls: Rc<RefCell<Vec<ScaleInputSet>>>,
}

impl StubComputation {
    #[must_use]
    pub fn returning(response: ComputationResponse) -> Self {
        Self {
            outcome: Ok(response),
            calls: Rc::default(),
        }
    }

    #[must_use]
    pub fn failing(status: u16, message: impl Into<String>) -> Self {
        Self {
            outcome: Err(ScenarioError::ComputationFailed {
                status,
                message: message.into(),
            }),
            calls: Rc::default(),
        }
    }

    /// Every input set submitted so far.
    #[must_use]
    pub fn requests(&self) -> Vec<ScaleInputSet> {
        self.calls.borrow().clone()
    }
}

#[async_trait(?Send)]
impl ComputationService for StubComputation {
    type Error = ScenarioError;

    async fn compute(&self, inputs: &ScaleInputSet) -> Result<ComputationResponse, Self::Error> {
        self.calls.borrow_mut().push(inputs.clone());
        self.outcome.clone()
    }
}
