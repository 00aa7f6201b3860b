//! Presenter port: the UI surface that actually shows popups.

use std::sync::Arc;

use autopopup_domain::popup::PopupTarget;

/// Opens and closes popups in the presentation layer.
///
/// Shared between the dispatcher and the auto-close timer task, hence the
/// `Send + Sync + 'static` bound.
pub trait PopupPresenter: Send + Sync + 'static {
    /// Show the popup for `target`. Returns `false` if nothing was shown.
    fn open(&self, target: &PopupTarget) -> bool;

    /// Close every open popup.
    fn close_all(&self);
}

impl<T: PopupPresenter> PopupPresenter for Arc<T> {
    fn open(&self, target: &PopupTarget) -> bool {
        (**self).open(target)
    }

    fn close_all(&self) {
        (**self).close_all();
    }
}
