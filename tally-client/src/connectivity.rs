//! Connectivity observation
//!
//! Abstracts "are we online" away from any particular runtime's event
//! bus: whatever integration hosts the client (desktop shell, network
//! probe, manual toggle) owns a [`ConnectivityHandle`] and reports
//! transitions; the sync coordinator holds the [`ConnectivityObserver`]
//! and awaits changes.

use tokio::sync::watch;

/// Connectivity state of the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    Online,
    Offline,
}

impl Connectivity {
    pub fn is_online(self) -> bool {
        matches!(self, Connectivity::Online)
    }
}

/// Sender half, owned by the runtime integration
#[derive(Debug, Clone)]
pub struct ConnectivityHandle {
    tx: watch::Sender<Connectivity>,
}

impl ConnectivityHandle {
    pub fn set_online(&self) {
        self.set(Connectivity::Online);
    }

    pub fn set_offline(&self) {
        self.set(Connectivity::Offline);
    }

    pub fn set(&self, state: Connectivity) {
        // send_if_modified: repeated reports of the same state are not
        // transitions and must not wake the coordinator
        self.tx.send_if_modified(|current| {
            if *current == state {
                false
            } else {
                *current = state;
                true
            }
        });
    }
}

/// Receiver half, held by the sync coordinator
#[derive(Debug, Clone)]
pub struct ConnectivityObserver {
    rx: watch::Receiver<Connectivity>,
}

impl ConnectivityObserver {
    /// Current state without waiting
    pub fn current(&self) -> Connectivity {
        *self.rx.borrow()
    }

    /// Wait for the next state transition; `None` when the handle is gone
    pub async fn changed(&mut self) -> Option<Connectivity> {
        match self.rx.changed().await {
            Ok(()) => Some(*self.rx.borrow_and_update()),
            Err(_) => None,
        }
    }
}

/// Create a connected handle/observer pair with the given initial state
pub fn channel(initial: Connectivity) -> (ConnectivityHandle, ConnectivityObserver) {
    let (tx, rx) = watch::channel(initial);
    (ConnectivityHandle { tx }, ConnectivityObserver { rx })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn observer_sees_transitions() {
        let (handle, mut observer) = channel(Connectivity::Online);
        assert_eq!(observer.current(), Connectivity::Online);

        handle.set_offline();
        assert_eq!(observer.changed().await, Some(Connectivity::Offline));

        handle.set_online();
        assert_eq!(observer.changed().await, Some(Connectivity::Online));
    }

    #[tokio::test]
    async fn duplicate_reports_do_not_wake() {
        let (handle, mut observer) = channel(Connectivity::Online);
        handle.set_online(); // no transition

        tokio::select! {
            _ = observer.changed() => panic!("duplicate state must not signal a change"),
            _ = tokio::time::sleep(std::time::Duration::from_millis(20)) => {}
        }
    }
}
