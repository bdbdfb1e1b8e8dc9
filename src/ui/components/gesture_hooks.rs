use crate::gesture::{spawn_tracker, GestureInput, GestureState, Point};
use crate::AppContext;
use dioxus::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use tokio_stream::wrappers::WatchStream;
use tokio_stream::StreamExt;
use tracing::trace;

/// Live gesture tracker bound to a component
#[derive(Clone)]
pub struct GestureBinding {
    pub input: GestureInput,
    pub state: Signal<GestureState>,
}

impl GestureBinding {
    pub fn press(&self, position: Point) {
        self.input.press(position);
    }

    pub fn move_to(&self, position: Point) {
        self.input.move_to(position);
    }

    pub fn release(&self) {
        self.input.release();
    }
}

/// Hook that runs a gesture tracker for the lifetime of the component.
/// The tracker is torn down when the component unmounts.
pub fn use_gesture() -> GestureBinding {
    let app_context = use_context::<AppContext>();
    let mut state = use_signal(GestureState::default);

    let (input, tracker) = use_hook(|| {
        let handle = spawn_tracker(&app_context.runtime_handle);
        let mut updates = WatchStream::new(handle.subscribe());
        spawn(async move {
            while let Some(next) = updates.next().await {
                state.set(next);
            }
            trace!("Gesture updates ended");
        });
        (handle.input(), Rc::new(RefCell::new(Some(handle))))
    });

    use_drop(move || {
        if let Some(handle) = tracker.borrow_mut().take() {
            handle.teardown();
        }
    });

    GestureBinding { input, state }
}

pub fn pointer_position(evt: &MouseEvent) -> Point {
    let point = evt.client_coordinates();
    Point::new(point.x, point.y)
}
