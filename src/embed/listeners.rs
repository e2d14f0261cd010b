//! Scoped global input listeners
//!
//! A mounted player suppresses the context menu and captures clicks for the
//! whole screen. Registration hands back a guard; the listener stays active
//! exactly as long as some guard for it is alive.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlobalListener {
    /// Swallow right-click so the terminal's own menu never opens
    ContextMenu,
    /// Capture-phase click handler; clicks stop here
    ClickCapture,
}

impl GlobalListener {
    /// Listeners a player installs on mount
    pub const PLAYER: [GlobalListener; 2] =
        [GlobalListener::ContextMenu, GlobalListener::ClickCapture];
}

/// Reference-counted listener table shared by the UI loop and its views
#[derive(Clone, Default)]
pub struct ListenerRegistry {
    counts: Rc<RefCell<HashMap<GlobalListener, usize>>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a listener until the returned guard is dropped
    pub fn register(&self, listener: GlobalListener) -> ListenerGuard {
        *self.counts.borrow_mut().entry(listener).or_insert(0) += 1;
        trace!(?listener, "listener registered");
        ListenerGuard {
            registry: self.clone(),
            listener,
        }
    }

    pub fn is_active(&self, listener: GlobalListener) -> bool {
        self.counts
            .borrow()
            .get(&listener)
            .is_some_and(|count| *count > 0)
    }

    /// Number of live registrations across all listeners
    pub fn active_count(&self) -> usize {
        self.counts.borrow().values().sum()
    }

    /// Whether a mouse event is consumed by an active listener
    pub fn intercepts(&self, event: &MouseEvent) -> bool {
        match event.kind {
            MouseEventKind::Down(MouseButton::Right) | MouseEventKind::Up(MouseButton::Right) => {
                self.is_active(GlobalListener::ContextMenu)
            }
            MouseEventKind::Down(_) | MouseEventKind::Up(_) => {
                self.is_active(GlobalListener::ClickCapture)
            }
            _ => false,
        }
    }

    fn release(&self, listener: GlobalListener) {
        let mut counts = self.counts.borrow_mut();
        if let Some(count) = counts.get_mut(&listener) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                counts.remove(&listener);
            }
        }
        trace!(?listener, "listener released");
    }
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.counts.borrow().iter()).finish()
    }
}

/// Keeps one listener registration alive
pub struct ListenerGuard {
    registry: ListenerRegistry,
    listener: GlobalListener,
}

impl fmt::Debug for ListenerGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ListenerGuard").field(&self.listener).finish()
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        self.registry.release(self.listener);
    }
}
