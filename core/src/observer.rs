use alloc::vec::Vec;

use crate::*;

/// Receives the engine's rendering notifications.
///
/// Every method defaults to doing nothing, so a view only implements what it draws.
pub trait RoundObserver {
    /// The target pattern is shown and input is locked.
    fn on_reveal(&mut self, _target: &Pattern) {}

    /// The target pattern is hidden, `selection` (still empty) is shown and input is enabled.
    fn on_hide_reveal(&mut self, _selection: &Pattern) {}

    fn on_selection_changed(&mut self, _selection: &Pattern) {}

    fn on_win(&mut self) {}

    fn on_lose(&mut self) {}

    /// Any previous verdict message should be hidden, a new reveal follows.
    fn on_restart(&mut self) {}
}

impl RoundObserver for () {}

impl<O: RoundObserver + ?Sized> RoundObserver for &mut O {
    fn on_reveal(&mut self, target: &Pattern) {
        (**self).on_reveal(target)
    }

    fn on_hide_reveal(&mut self, selection: &Pattern) {
        (**self).on_hide_reveal(selection)
    }

    fn on_selection_changed(&mut self, selection: &Pattern) {
        (**self).on_selection_changed(selection)
    }

    fn on_win(&mut self) {
        (**self).on_win()
    }

    fn on_lose(&mut self) {
        (**self).on_lose()
    }

    fn on_restart(&mut self) {
        (**self).on_restart()
    }
}

/// Notification as recorded by the `Vec<RoundEvent>` observer.
#[derive(Clone, Debug, PartialEq)]
pub enum RoundEvent {
    Reveal(Pattern),
    HideReveal,
    SelectionChanged(CellCount),
    Won,
    Lost,
    Restart,
}

impl RoundObserver for Vec<RoundEvent> {
    fn on_reveal(&mut self, target: &Pattern) {
        self.push(RoundEvent::Reveal(target.clone()));
    }

    fn on_hide_reveal(&mut self, _selection: &Pattern) {
        self.push(RoundEvent::HideReveal);
    }

    fn on_selection_changed(&mut self, selection: &Pattern) {
        self.push(RoundEvent::SelectionChanged(selection.marked_count()));
    }

    fn on_win(&mut self) {
        self.push(RoundEvent::Won);
    }

    fn on_lose(&mut self) {
        self.push(RoundEvent::Lost);
    }

    fn on_restart(&mut self) {
        self.push(RoundEvent::Restart);
    }
}
