//! Confirmation dialog contract.

use rowgrid_types::ConfirmationRequest;

/// Continuation run if and only if the user accepts the confirmation.
pub type OnConfirm = Box<dyn FnOnce() + Send>;

/// Modal confirmation capability supplied by the embedder.
///
/// The dialog owns all presentation; declining must drop the continuation
/// without running it.
pub trait ConfirmationDialog: Send + Sync {
    fn confirm(&self, request: ConfirmationRequest, on_confirm: OnConfirm);
}

/// Dialog that accepts every request immediately. Useful for embedders
/// without a modal surface and for wiring demos.
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoConfirm;

impl ConfirmationDialog for AutoConfirm {
    fn confirm(&self, _request: ConfirmationRequest, on_confirm: OnConfirm) {
        on_confirm();
    }
}
