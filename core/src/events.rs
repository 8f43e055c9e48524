use serde::{Deserialize, Serialize};

use crate::*;

/// Notifications raised by a [`GameSession`] at the point the change happens.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    TileChanged {
        index: TileIndex,
        display: TileDisplay,
    },
    GameWon {
        elapsed_seconds: u32,
    },
    GameLost {
        index: TileIndex,
    },
    FlagCountChanged {
        count: CellCount,
    },
    TimerTick {
        elapsed_seconds: u32,
    },
    /// A new board replaced the previous one; every tile is hidden again.
    Reset {
        config: GameConfig,
    },
}

/// Consumer of [`SessionEvent`]s, typically the renderer.
pub trait SessionObserver {
    fn notify(&mut self, event: SessionEvent);
}

/// Ignores every event.
impl SessionObserver for () {
    fn notify(&mut self, _event: SessionEvent) {}
}

/// Records events in order.
impl SessionObserver for Vec<SessionEvent> {
    fn notify(&mut self, event: SessionEvent) {
        self.push(event);
    }
}

impl<O: SessionObserver + ?Sized> SessionObserver for &mut O {
    fn notify(&mut self, event: SessionEvent) {
        (**self).notify(event);
    }
}

impl<O: SessionObserver + ?Sized> SessionObserver for Box<O> {
    fn notify(&mut self, event: SessionEvent) {
        (**self).notify(event);
    }
}
