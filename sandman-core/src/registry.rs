//! Control registry
//!
//! The registry owns every [`Control`] for the life of the process and is
//! driven from the tick loop. Name lookups go through a
//! [`ControlDirectory`], a cloneable index of weak references that the
//! dispatcher can hold on its own. Dropping the registry invalidates every
//! handle the directory ever gave out.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, Weak};

use log::{info, warn};

use crate::config::ControlTimings;
use crate::control::{Control, ControlHandle, ControlShared};
use crate::traits::{Actuator, ActuatorError, OutputGate};

/// Errors from registry operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A control with this name already exists
    DuplicateName(String),
    /// The output gate could not be switched
    Gate(ActuatorError),
}

impl core::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RegistryError::DuplicateName(name) => write!(f, "duplicate control name '{}'", name),
            RegistryError::Gate(e) => write!(f, "output gate error: {:?}", e),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Process-wide "hardware output enabled" flag
///
/// Every control in a registry shares one switch. Clearing it stops all
/// backend I/O without touching any control's logical state.
#[derive(Debug, Clone)]
pub struct OutputSwitch(Arc<AtomicBool>);

impl Default for OutputSwitch {
    fn default() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }
}

impl OutputSwitch {
    pub fn is_enabled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub(crate) fn set_enabled(&self, enabled: bool) {
        self.0.store(enabled, Ordering::Release);
    }
}

/// Name-to-control index shared between the registry and its users
#[derive(Debug, Clone, Default)]
pub struct ControlDirectory {
    entries: Arc<RwLock<HashMap<String, Weak<ControlShared>>>>,
}

impl ControlDirectory {
    /// Resolve a name (case-insensitive) to a handle
    ///
    /// Returns `None` for unknown names and for controls whose registry
    /// has been dropped.
    pub fn resolve(&self, name: &str) -> Option<ControlHandle> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        let shared = entries.get(&name.to_lowercase())?.upgrade()?;
        Some(ControlHandle::new(&shared))
    }

    /// Request a stop from every live control
    ///
    /// Returns the names of the controls that were stopped.
    pub fn stop_all(&self) -> Vec<String> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        let mut stopped: Vec<String> = entries
            .values()
            .filter_map(Weak::upgrade)
            .map(|shared| {
                shared.stop();
                shared.name().to_string()
            })
            .collect();
        stopped.sort();
        stopped
    }

    fn insert(&self, name: String, shared: &Arc<ControlShared>) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(name, Arc::downgrade(shared));
    }
}

/// Owner of every control
pub struct Registry {
    controls: Vec<Control>,
    directory: ControlDirectory,
    outputs: OutputSwitch,
    gate: Option<Box<dyn OutputGate>>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Create an empty registry with outputs enabled and no gate line
    pub fn new() -> Self {
        Self {
            controls: Vec::new(),
            directory: ControlDirectory::default(),
            outputs: OutputSwitch::default(),
            gate: None,
        }
    }

    /// Create an empty registry that drives a hardware enable line
    pub fn with_gate(gate: Box<dyn OutputGate>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::new()
        }
    }

    /// Register a control
    ///
    /// Names are lowercased and must be unique.
    pub fn add(
        &mut self,
        name: &str,
        timings: ControlTimings,
        actuator: Option<Box<dyn Actuator>>,
    ) -> Result<ControlHandle, RegistryError> {
        let name = name.to_lowercase();
        if self.control(&name).is_some() {
            return Err(RegistryError::DuplicateName(name));
        }

        if actuator.is_none() {
            warn!("{}: no actuator backend; hardware output disabled", name);
        }

        let control = Control::new(&name, timings, actuator).with_outputs(self.outputs.clone());
        let handle = control.handle();
        self.directory.insert(name.clone(), control.shared());
        self.controls.push(control);
        info!("Registered control '{}'", name);
        Ok(handle)
    }

    /// Resolve a name to a handle
    pub fn handle(&self, name: &str) -> Option<ControlHandle> {
        self.directory.resolve(name)
    }

    /// Directory for resolving names outside the tick loop
    pub fn directory(&self) -> ControlDirectory {
        self.directory.clone()
    }

    /// Look up a control by name
    pub fn control(&self, name: &str) -> Option<&Control> {
        let name = name.to_lowercase();
        self.controls.iter().find(|c| c.name() == name)
    }

    /// All controls in registration order
    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    /// Advance every control by one tick
    pub fn process_all(&mut self, now_ms: u64) {
        for control in &mut self.controls {
            control.process(now_ms);
        }
    }

    /// Request a stop from every control
    pub fn stop_all(&self) {
        for control in &self.controls {
            control.shared().stop();
        }
    }

    /// Enable or disable hardware output for every control
    ///
    /// The switch flips even if the gate line fails, so no backend I/O
    /// happens while disabled.
    pub fn set_outputs_enabled(&mut self, enabled: bool) -> Result<(), RegistryError> {
        self.outputs.set_enabled(enabled);
        info!(
            "Hardware output {}",
            if enabled { "enabled" } else { "disabled" }
        );
        match self.gate.as_mut() {
            Some(gate) => gate.set_outputs_enabled(enabled).map_err(RegistryError::Gate),
            None => Ok(()),
        }
    }

    pub fn outputs_enabled(&self) -> bool {
        self.outputs.is_enabled()
    }
}
