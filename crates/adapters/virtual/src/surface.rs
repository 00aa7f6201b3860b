//! Virtual popup surface: keeps track of what a dashboard would show.

use std::sync::{Mutex, MutexGuard, PoisonError};

use autopopup_app::ports::PopupPresenter;
use autopopup_domain::popup::PopupTarget;

#[derive(Debug, Default)]
struct SurfaceState {
    current: Option<PopupTarget>,
    shown: Vec<PopupTarget>,
    closes: usize,
}

/// A popup surface with no UI behind it.
///
/// At most one popup is visible at a time. Every popup ever shown is kept
/// in order so demos and tests can inspect the sequence.
#[derive(Debug, Default)]
pub struct VirtualPopupSurface {
    state: Mutex<SurfaceState>,
}

impl VirtualPopupSurface {
    /// The popup currently visible, if any.
    #[must_use]
    pub fn current(&self) -> Option<PopupTarget> {
        self.lock().current.clone()
    }

    /// Every popup shown so far, oldest first.
    #[must_use]
    pub fn shown(&self) -> Vec<PopupTarget> {
        self.lock().shown.clone()
    }

    /// How many times popups were closed.
    #[must_use]
    pub fn close_count(&self) -> usize {
        self.lock().closes
    }

    fn lock(&self) -> MutexGuard<'_, SurfaceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PopupPresenter for VirtualPopupSurface {
    fn open(&self, target: &PopupTarget) -> bool {
        tracing::info!(popup = %target, "showing popup");
        let mut state = self.lock();
        state.current = Some(target.clone());
        state.shown.push(target.clone());
        true
    }

    fn close_all(&self) {
        let mut state = self.lock();
        state.closes += 1;
        if let Some(previous) = state.current.take() {
            tracing::info!(popup = %previous, "closing popup");
        }
    }
}
