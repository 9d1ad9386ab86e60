//! Event types: codes, filters, the event value, and the handler interface.

use std::any::{type_name, Any};
use std::rc::Rc;

use crate::engine::{Context, NodeId};
use crate::error::{EngineError, Result};

// =============================================================================
// EVENT CODES
// =============================================================================

/// Kind of occurrence being dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventCode {
    /// Pointer went down on the node.
    Pressed,
    /// Pointer went up after pressing the node.
    Released,
    /// Pressed and released on the same node.
    Clicked,
    /// The node's value changed (e.g. a checkable node toggled).
    ValueChanged,
    /// A layout pass changed the node's size. Param: previous `Area`.
    SizeChanged,
    /// A child was created. Param: the child's `NodeId`.
    ChildCreated,
    /// A child was destroyed. Param: the stale `NodeId`.
    ChildDeleted,
    /// The node is about to be freed.
    Delete,
    /// Application-defined event.
    Custom(u16),
}

impl EventCode {
    /// Input events are not delivered to disabled targets.
    pub const fn is_input(&self) -> bool {
        matches!(self, Self::Pressed | Self::Released | Self::Clicked)
    }

    /// Whether the event may travel to ancestors at all.
    pub const fn bubbles(&self) -> bool {
        !matches!(self, Self::Delete)
    }
}

/// Which codes a registration listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventFilter {
    All,
    Code(EventCode),
}

impl EventFilter {
    pub fn matches(&self, code: EventCode) -> bool {
        match self {
            Self::All => true,
            Self::Code(c) => *c == code,
        }
    }
}

impl From<EventCode> for EventFilter {
    fn from(code: EventCode) -> Self {
        Self::Code(code)
    }
}

// =============================================================================
// EVENT
// =============================================================================

/// Position of a dispatch in its state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Handlers of the target are running.
    #[default]
    Origin,
    /// Handlers of an ancestor are running.
    Bubbling,
    Done,
}

/// One occurrence travelling through the tree.
///
/// Created by the dispatcher, handed to each handler by `&mut`, dropped when
/// the dispatch completes.
pub struct Event {
    code: EventCode,
    target: NodeId,
    pub(crate) current_target: NodeId,
    pub(crate) phase: Phase,
    pub(crate) user_data: Option<Rc<dyn Any>>,
    param: Option<Rc<dyn Any>>,
    pub(crate) bubbling_stopped: bool,
    pub(crate) processing_stopped: bool,
}

impl Event {
    pub(crate) fn new(code: EventCode, target: NodeId, param: Option<Rc<dyn Any>>) -> Self {
        Self {
            code,
            target,
            current_target: target,
            phase: Phase::Origin,
            user_data: None,
            param,
            bubbling_stopped: false,
            processing_stopped: false,
        }
    }

    pub fn code(&self) -> EventCode {
        self.code
    }

    /// The node the event was originally sent to.
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// The node whose handlers are running now.
    pub fn current_target(&self) -> NodeId {
        self.current_target
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// User data given when the running handler was registered.
    ///
    /// A missing payload or a payload of another type is a programming error.
    pub fn user_data<T: Any>(&self) -> Result<&T> {
        downcast(self.user_data.as_deref(), "user data")
    }

    /// Parameter attached by the sender.
    pub fn param<T: Any>(&self) -> Result<&T> {
        downcast(self.param.as_deref(), "event parameter")
    }

    pub fn has_param(&self) -> bool {
        self.param.is_some()
    }

    /// Do not forward the event to further ancestors.
    pub fn stop_bubbling(&mut self) {
        self.bubbling_stopped = true;
    }

    /// Skip the remaining handlers, on this node and on ancestors.
    pub fn stop_processing(&mut self) {
        self.processing_stopped = true;
    }
}

fn downcast<'a, T: Any>(payload: Option<&'a dyn Any>, what: &str) -> Result<&'a T> {
    let payload = payload.ok_or_else(|| {
        EngineError::programming(format!("{what} missing, expected {}", type_name::<T>()))
    })?;
    payload.downcast_ref::<T>().ok_or_else(|| {
        EngineError::programming(format!("{what} is not a {}", type_name::<T>()))
    })
}

impl std::fmt::Debug for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Event")
            .field("code", &self.code)
            .field("target", &self.target)
            .field("current_target", &self.current_target)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

/// Receiver of events.
///
/// Handlers get the tree back by `&mut`, so they can restyle, create, or
/// destroy nodes. An error aborts the dispatch and reaches the sender.
pub trait EventHandler {
    fn on_event(&self, event: &mut Event, ctx: &mut Context) -> Result<()>;
}

impl<F> EventHandler for F
where
    F: Fn(&mut Event, &mut Context) -> Result<()>,
{
    fn on_event(&self, event: &mut Event, ctx: &mut Context) -> Result<()> {
        self(event, ctx)
    }
}

/// Handle returned by registration, used to deregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventRegistration {
    pub(crate) node: NodeId,
    pub(crate) id: u64,
}

impl EventRegistration {
    /// The node the handler is registered on.
    pub fn node(&self) -> NodeId {
        self.node
    }
}

pub(crate) struct Registration {
    pub(crate) id: u64,
    pub(crate) filter: EventFilter,
    pub(crate) handler: Rc<dyn EventHandler>,
    pub(crate) user_data: Option<Rc<dyn Any>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_id() -> NodeId {
        Context::default().screen_active().unwrap()
    }

    #[test]
    fn test_filter_matches() {
        assert!(EventFilter::All.matches(EventCode::Clicked));
        assert!(EventFilter::All.matches(EventCode::Custom(7)));
        assert!(EventFilter::from(EventCode::Clicked).matches(EventCode::Clicked));
        assert!(!EventFilter::from(EventCode::Clicked).matches(EventCode::Pressed));
        assert!(!EventFilter::from(EventCode::Custom(1)).matches(EventCode::Custom(2)));
    }

    #[test]
    fn test_code_classes() {
        assert!(EventCode::Clicked.is_input());
        assert!(!EventCode::ValueChanged.is_input());
        assert!(!EventCode::Delete.bubbles());
        assert!(EventCode::ChildCreated.bubbles());
    }

    #[test]
    fn test_param_downcast() {
        let event = Event::new(EventCode::Custom(0), dummy_id(), Some(Rc::new(42usize)));
        assert_eq!(*event.param::<usize>().unwrap(), 42);
        assert!(matches!(event.param::<String>(), Err(EngineError::Programming(_))));
    }

    #[test]
    fn test_missing_user_data_is_programming_error() {
        let event = Event::new(EventCode::Clicked, dummy_id(), None);
        assert!(matches!(event.user_data::<u32>(), Err(EngineError::Programming(_))));
        assert!(!event.has_param());
    }

    #[test]
    fn test_stop_controls() {
        let mut event = Event::new(EventCode::Clicked, dummy_id(), None);
        assert!(!event.bubbling_stopped);
        event.stop_bubbling();
        assert!(event.bubbling_stopped);
        assert!(!event.processing_stopped);
        event.stop_processing();
        assert!(event.processing_stopped);
    }
}
