use crate::{Error, Result};
use tracing::{debug, info, warn};

/// How the service stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Input reached end-of-stream.
    Normal,
    /// The model could not be loaded; no requests were served.
    Fatal,
}

impl Termination {
    pub fn exit_code(self) -> u8 {
        match self {
            Self::Normal => 0,
            Self::Fatal => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    Uninitialized,
    Loading,
    Ready,
    Processing,
    Terminated(Termination),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceEvent {
    StartLoading,
    ModelLoaded,
    LoadFailed,
    LineReceived,
    ResponseEmitted,
    InputExhausted,
}

pub struct ServiceStateMachine {
    state: ServiceState,
}

impl ServiceStateMachine {
    pub fn new() -> Self {
        Self {
            state: ServiceState::Uninitialized,
        }
    }

    pub fn current_state(&self) -> ServiceState {
        self.state
    }

    pub fn transition(&mut self, event: ServiceEvent) -> Result<()> {
        let old_state = self.state;

        let new_state = match (old_state, event) {
            (ServiceState::Uninitialized, ServiceEvent::StartLoading) => ServiceState::Loading,
            (ServiceState::Loading, ServiceEvent::ModelLoaded) => ServiceState::Ready,
            (ServiceState::Loading, ServiceEvent::LoadFailed) => {
                ServiceState::Terminated(Termination::Fatal)
            }
            (ServiceState::Ready, ServiceEvent::LineReceived) => ServiceState::Processing,
            (ServiceState::Processing, ServiceEvent::ResponseEmitted) => ServiceState::Ready,
            (ServiceState::Ready, ServiceEvent::InputExhausted) => {
                ServiceState::Terminated(Termination::Normal)
            }
            _ => {
                warn!(
                    "Invalid service transition from {:?} with event {:?}",
                    old_state, event
                );
                return Err(Error::fsm(format!(
                    "Invalid transition from {:?} with event {:?}",
                    old_state, event
                )));
            }
        };

        // Ready <-> Processing happens once per line; keep it out of info logs.
        match new_state {
            ServiceState::Ready | ServiceState::Processing if old_state != ServiceState::Loading => {
                debug!("Service state {:?} -> {:?}", old_state, new_state)
            }
            _ => info!(
                "Service state {:?} -> {:?} (event: {:?})",
                old_state, new_state, event
            ),
        }

        self.state = new_state;
        Ok(())
    }
}

impl Default for ServiceStateMachine {
    fn default() -> Self {
        Self::new()
    }
}
