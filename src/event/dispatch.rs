//! Dispatch - Registration and bubbling delivery of events.
//!
//! Per dispatch the event moves ORIGIN → BUBBLING → DONE:
//!
//! 1. Start at the target.
//! 2. Run each matching registration of the current node, in registration
//!    order. A registration removed by an earlier handler is skipped.
//! 3. If the current node has `EVENT_BUBBLE` and a live parent, move to the
//!    parent and repeat. Otherwise stop: the last node reached is the bubble
//!    root and has received the event exactly once.
//!
//! Handlers may stop bubbling or processing. A node scheduled for
//! destruction ends the chain.

use std::any::Any;
use std::rc::Rc;

use crate::engine::{Context, NodeId};
use crate::error::Result;
use crate::types::{ObjFlags, StateFlags};

use super::types::{
    Event, EventCode, EventFilter, EventHandler, EventRegistration, Phase, Registration,
};

/// How a dispatch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Every node of the bubble chain was visited.
    Completed,
    /// A handler stopped bubbling or processing.
    Stopped,
    /// Input event for a disabled target; no handler ran.
    Ignored,
}

impl Context {
    // =========================================================================
    // Registration
    // =========================================================================

    /// Register a closure on `node` for events matching `filter`.
    pub fn add_event_cb<F>(
        &mut self,
        node: NodeId,
        filter: impl Into<EventFilter>,
        handler: F,
        user_data: Option<Rc<dyn Any>>,
    ) -> Result<EventRegistration>
    where
        F: Fn(&mut Event, &mut Context) -> Result<()> + 'static,
    {
        self.add_event_handler(node, filter, Rc::new(handler), user_data)
    }

    /// Register a handler object on `node` for events matching `filter`.
    pub fn add_event_handler(
        &mut self,
        node: NodeId,
        filter: impl Into<EventFilter>,
        handler: Rc<dyn EventHandler>,
        user_data: Option<Rc<dyn Any>>,
    ) -> Result<EventRegistration> {
        let id = self.next_registration;
        let filter = filter.into();
        self.node_mut(node)?.handlers.push(Registration {
            id,
            filter,
            handler,
            user_data,
        });
        self.next_registration += 1;

        tracing::trace!(node = %node, ?filter, registration = id, "event handler added");
        Ok(EventRegistration { node, id })
    }

    /// Remove a registration. Returns false if it was already removed.
    pub fn remove_event_cb(&mut self, registration: EventRegistration) -> Result<bool> {
        let handlers = &mut self.node_mut(registration.node)?.handlers;
        let before = handlers.len();
        handlers.retain(|r| r.id != registration.id);
        Ok(handlers.len() != before)
    }

    /// Number of registrations on `node`.
    pub fn event_cb_count(&self, node: NodeId) -> Result<usize> {
        Ok(self.node(node)?.handlers.len())
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Send an event to `target` and bubble it per the `EVENT_BUBBLE` flags.
    ///
    /// The first handler error aborts the dispatch and is returned.
    pub fn send_event(
        &mut self,
        target: NodeId,
        code: EventCode,
        param: Option<Rc<dyn Any>>,
    ) -> Result<Dispatch> {
        let node = self.node(target)?;
        if code.is_input() && node.state.contains(StateFlags::DISABLED) {
            tracing::trace!(node = %target, ?code, "input event ignored on disabled node");
            return Ok(Dispatch::Ignored);
        }

        let mut event = Event::new(code, target, param);
        self.dispatch_stack.push(target);
        let result = self.run_dispatch(&mut event);
        self.dispatch_stack.pop();

        if self.dispatch_stack.is_empty()
            && self.destroy_depth == 0
            && !self.pending_destroy.is_empty()
        {
            let flushed = self.flush_pending_destroy();
            let dispatch = result?;
            flushed?;
            return Ok(dispatch);
        }
        result
    }

    fn run_dispatch(&mut self, event: &mut Event) -> Result<Dispatch> {
        let mut current = event.target();

        loop {
            event.current_target = current;
            if let Some(top) = self.dispatch_stack.last_mut() {
                *top = current;
            }
            tracing::trace!(
                code = ?event.code(),
                target = %event.target(),
                current = %current,
                phase = ?event.phase,
                "dispatching"
            );

            // Handlers added while this node runs wait for the next dispatch
            let snapshot: Vec<(u64, Rc<dyn EventHandler>, Option<Rc<dyn Any>>)> =
                match self.nodes.get(current) {
                    Some(node) => node
                        .handlers
                        .iter()
                        .filter(|r| r.filter.matches(event.code()))
                        .map(|r| (r.id, r.handler.clone(), r.user_data.clone()))
                        .collect(),
                    None => break,
                };

            for (id, handler, user_data) in snapshot {
                let still_registered = self
                    .nodes
                    .get(current)
                    .is_some_and(|n| n.handlers.iter().any(|r| r.id == id));
                if !still_registered {
                    continue;
                }

                event.user_data = user_data;
                handler.on_event(event, self)?;

                if event.processing_stopped {
                    event.phase = Phase::Done;
                    return Ok(Dispatch::Stopped);
                }
            }

            if event.bubbling_stopped {
                event.phase = Phase::Done;
                return Ok(Dispatch::Stopped);
            }

            match self.bubble_parent(current, event.code()) {
                Some(parent) => {
                    current = parent;
                    event.phase = Phase::Bubbling;
                }
                None => break,
            }
        }

        event.phase = Phase::Done;
        Ok(Dispatch::Completed)
    }

    /// Next node of the bubble chain, if the chain continues.
    fn bubble_parent(&self, current: NodeId, code: EventCode) -> Option<NodeId> {
        if !code.bubbles() {
            return None;
        }
        let node = self.nodes.get(current)?;
        if node.pending_delete || !node.flags.contains(ObjFlags::EVENT_BUBBLE) {
            return None;
        }
        let parent = self.nodes.get(node.parent?)?;
        if parent.pending_delete {
            return None;
        }
        node.parent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use std::cell::{Cell, RefCell};

    /// screen > cont > button > label, all bubbling except the container.
    fn tree() -> (Context, NodeId, NodeId, NodeId) {
        let mut ctx = Context::default();
        let screen = ctx.screen_active().unwrap();
        let cont = ctx.create_child(screen).unwrap();
        let button = ctx.create_child(cont).unwrap();
        let label = ctx.create_child(button).unwrap();
        ctx.add_flag(button, ObjFlags::EVENT_BUBBLE).unwrap();
        ctx.add_flag(label, ObjFlags::EVENT_BUBBLE).unwrap();
        (ctx, cont, button, label)
    }

    fn recorder(
        ctx: &mut Context,
        node: NodeId,
        filter: impl Into<EventFilter>,
        log: &Rc<RefCell<Vec<(NodeId, NodeId)>>>,
    ) -> EventRegistration {
        let log = log.clone();
        ctx.add_event_cb(
            node,
            filter,
            move |e: &mut Event, _: &mut Context| {
                log.borrow_mut().push((e.current_target(), e.target()));
                Ok(())
            },
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_bubbles_in_ancestor_order() {
        let (mut ctx, cont, button, label) = tree();
        let log = Rc::new(RefCell::new(Vec::new()));
        for node in [label, button, cont] {
            recorder(&mut ctx, node, EventCode::Clicked, &log);
        }

        let result = ctx.send_event(label, EventCode::Clicked, None).unwrap();

        assert_eq!(result, Dispatch::Completed);
        assert_eq!(
            *log.borrow(),
            vec![(label, label), (button, label), (cont, label)]
        );
    }

    #[test]
    fn test_bubble_root_receives_once() {
        let (mut ctx, cont, button, _label) = tree();
        let screen = ctx.screen_active().unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));
        recorder(&mut ctx, cont, EventCode::Clicked, &log);
        recorder(&mut ctx, screen, EventCode::Clicked, &log);

        ctx.send_event(button, EventCode::Clicked, None).unwrap();

        // cont does not bubble, so the screen never hears about it
        assert_eq!(*log.borrow(), vec![(cont, button)]);
    }

    #[test]
    fn test_no_bubble_flag_stays_local() {
        let (mut ctx, cont, button, _label) = tree();
        ctx.clear_flag(button, ObjFlags::EVENT_BUBBLE).unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));
        recorder(&mut ctx, button, EventCode::Clicked, &log);
        recorder(&mut ctx, cont, EventCode::Clicked, &log);

        ctx.send_event(button, EventCode::Clicked, None).unwrap();
        assert_eq!(*log.borrow(), vec![(button, button)]);
    }

    #[test]
    fn test_registration_order_and_filters() {
        let (mut ctx, _cont, button, _label) = tree();
        let order = Rc::new(RefCell::new(Vec::new()));
        for (i, filter) in [
            EventFilter::All,
            EventFilter::Code(EventCode::Pressed),
            EventFilter::Code(EventCode::Clicked),
        ]
        .into_iter()
        .enumerate()
        {
            let order = order.clone();
            ctx.add_event_cb(
                button,
                filter,
                move |_: &mut Event, _: &mut Context| {
                    order.borrow_mut().push(i);
                    Ok(())
                },
                None,
            )
            .unwrap();
        }

        ctx.send_event(button, EventCode::Clicked, None).unwrap();
        assert_eq!(*order.borrow(), vec![0, 2]);
    }

    #[test]
    fn test_container_click_skips_target_logic() {
        let (mut ctx, cont, button, _label) = tree();
        let recolored = Rc::new(Cell::new(0));
        let recolored_clone = recolored.clone();
        ctx.add_event_cb(
            cont,
            EventCode::Clicked,
            move |e: &mut Event, _: &mut Context| {
                if e.target() == e.current_target() {
                    return Ok(());
                }
                recolored_clone.set(recolored_clone.get() + 1);
                Ok(())
            },
            None,
        )
        .unwrap();

        ctx.send_event(cont, EventCode::Clicked, None).unwrap();
        assert_eq!(recolored.get(), 0);

        ctx.send_event(button, EventCode::Clicked, None).unwrap();
        assert_eq!(recolored.get(), 1);
    }

    #[test]
    fn test_stop_bubbling() {
        let (mut ctx, cont, button, label) = tree();
        let log = Rc::new(RefCell::new(Vec::new()));
        recorder(&mut ctx, label, EventCode::Clicked, &log);
        ctx.add_event_cb(
            button,
            EventCode::Clicked,
            |e: &mut Event, _: &mut Context| {
                e.stop_bubbling();
                Ok(())
            },
            None,
        )
        .unwrap();
        recorder(&mut ctx, button, EventCode::Clicked, &log);
        recorder(&mut ctx, cont, EventCode::Clicked, &log);

        let result = ctx.send_event(label, EventCode::Clicked, None).unwrap();

        // Remaining handlers on the stopping node still run
        assert_eq!(result, Dispatch::Stopped);
        assert_eq!(*log.borrow(), vec![(label, label), (button, label)]);
    }

    #[test]
    fn test_stop_processing() {
        let (mut ctx, _cont, button, label) = tree();
        let log = Rc::new(RefCell::new(Vec::new()));
        ctx.add_event_cb(
            label,
            EventCode::Clicked,
            |e: &mut Event, _: &mut Context| {
                e.stop_processing();
                Ok(())
            },
            None,
        )
        .unwrap();
        recorder(&mut ctx, label, EventCode::Clicked, &log);
        recorder(&mut ctx, button, EventCode::Clicked, &log);

        assert_eq!(
            ctx.send_event(label, EventCode::Clicked, None).unwrap(),
            Dispatch::Stopped
        );
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_removed_mid_dispatch_not_invoked() {
        let (mut ctx, _cont, button, _label) = tree();
        let calls = Rc::new(Cell::new(0));

        let victim_slot: Rc<Cell<Option<EventRegistration>>> = Rc::new(Cell::new(None));
        let slot = victim_slot.clone();
        ctx.add_event_cb(
            button,
            EventCode::Clicked,
            move |_: &mut Event, ctx: &mut Context| {
                if let Some(reg) = slot.get() {
                    ctx.remove_event_cb(reg)?;
                }
                Ok(())
            },
            None,
        )
        .unwrap();
        let calls_clone = calls.clone();
        let victim = ctx
            .add_event_cb(
                button,
                EventCode::Clicked,
                move |_: &mut Event, _: &mut Context| {
                    calls_clone.set(calls_clone.get() + 1);
                    Ok(())
                },
                None,
            )
            .unwrap();
        victim_slot.set(Some(victim));

        ctx.send_event(button, EventCode::Clicked, None).unwrap();
        assert_eq!(calls.get(), 0);
        assert_eq!(ctx.event_cb_count(button).unwrap(), 1);
        assert!(!ctx.remove_event_cb(victim).unwrap());
    }

    #[test]
    fn test_added_mid_dispatch_waits_for_next() {
        let (mut ctx, _cont, button, _label) = tree();
        let calls = Rc::new(Cell::new(0));
        let calls_clone = calls.clone();
        ctx.add_event_cb(
            button,
            EventCode::Clicked,
            move |_: &mut Event, ctx: &mut Context| {
                let calls = calls_clone.clone();
                ctx.add_event_cb(
                    button,
                    EventCode::Clicked,
                    move |_: &mut Event, _: &mut Context| {
                        calls.set(calls.get() + 1);
                        Ok(())
                    },
                    None,
                )?;
                Ok(())
            },
            None,
        )
        .unwrap();

        ctx.send_event(button, EventCode::Clicked, None).unwrap();
        assert_eq!(calls.get(), 0);
        ctx.send_event(button, EventCode::Clicked, None).unwrap();
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_user_data_reaches_handler() {
        let (mut ctx, _cont, button, _label) = tree();
        let seen = Rc::new(RefCell::new(String::new()));
        let seen_clone = seen.clone();
        ctx.add_event_cb(
            button,
            EventFilter::All,
            move |e: &mut Event, _: &mut Context| {
                seen_clone.borrow_mut().push_str(e.user_data::<&str>()?);
                Ok(())
            },
            Some(Rc::new("months")),
        )
        .unwrap();

        ctx.send_event(button, EventCode::ValueChanged, None).unwrap();
        assert_eq!(*seen.borrow(), "months");
    }

    #[test]
    fn test_wrong_payload_fails_fast() {
        let (mut ctx, cont, button, _label) = tree();
        let reached_cont = Rc::new(Cell::new(false));
        let reached = reached_cont.clone();
        ctx.add_event_cb(
            button,
            EventCode::ValueChanged,
            |e: &mut Event, _: &mut Context| {
                let _index: &usize = e.param()?;
                Ok(())
            },
            None,
        )
        .unwrap();
        ctx.add_event_cb(
            cont,
            EventCode::ValueChanged,
            move |_: &mut Event, _: &mut Context| {
                reached.set(true);
                Ok(())
            },
            None,
        )
        .unwrap();

        let err = ctx
            .send_event(button, EventCode::ValueChanged, Some(Rc::new("not an index")))
            .unwrap_err();
        assert!(matches!(err, EngineError::Programming(_)));
        assert!(!reached_cont.get());
    }

    #[test]
    fn test_disabled_target_ignores_input() {
        let (mut ctx, _cont, button, _label) = tree();
        let log = Rc::new(RefCell::new(Vec::new()));
        recorder(&mut ctx, button, EventFilter::All, &log);
        ctx.add_state(button, StateFlags::DISABLED).unwrap();

        assert_eq!(
            ctx.send_event(button, EventCode::Clicked, None).unwrap(),
            Dispatch::Ignored
        );
        assert!(log.borrow().is_empty());

        // Non-input events still arrive
        ctx.send_event(button, EventCode::ValueChanged, None).unwrap();
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn test_send_to_destroyed_node() {
        let (mut ctx, cont, _button, _label) = tree();
        ctx.destroy(cont).unwrap();
        assert!(matches!(
            ctx.send_event(cont, EventCode::Clicked, None),
            Err(EngineError::UseAfterFree(_))
        ));
    }

    #[test]
    fn test_destroy_current_node_is_deferred() {
        let (mut ctx, cont, button, label) = tree();
        let log = Rc::new(RefCell::new(Vec::new()));
        ctx.add_event_cb(
            button,
            EventCode::Clicked,
            move |e: &mut Event, ctx: &mut Context| {
                ctx.destroy(e.current_target())?;
                // Still usable until the dispatch finishes
                assert!(ctx.is_alive(e.current_target()));
                Ok(())
            },
            None,
        )
        .unwrap();
        recorder(&mut ctx, button, EventCode::Clicked, &log);
        recorder(&mut ctx, cont, EventCode::Clicked, &log);

        ctx.send_event(label, EventCode::Clicked, None).unwrap();

        // Remaining handlers on the node ran, the chain ended there
        assert_eq!(*log.borrow(), vec![(button, label)]);
        assert!(!ctx.is_alive(button));
        assert!(!ctx.is_alive(label));
        assert!(ctx.is_alive(cont));
        assert!(ctx.pending_destroy.is_empty());
    }

    #[test]
    fn test_handler_destroys_sibling() {
        let mut ctx = Context::default();
        let screen = ctx.screen_active().unwrap();
        let cont = ctx.create_child(screen).unwrap();
        let a = ctx.create_child(cont).unwrap();
        let b = ctx.create_child(cont).unwrap();
        ctx.add_flag(a, ObjFlags::EVENT_BUBBLE).unwrap();

        let hits = Rc::new(Cell::new(0));
        let hits_clone = hits.clone();
        ctx.add_event_cb(
            a,
            EventCode::Clicked,
            move |_: &mut Event, ctx: &mut Context| ctx.destroy(b),
            None,
        )
        .unwrap();
        ctx.add_event_cb(
            cont,
            EventCode::Clicked,
            move |_: &mut Event, _: &mut Context| {
                hits_clone.set(hits_clone.get() + 1);
                Ok(())
            },
            None,
        )
        .unwrap();

        ctx.send_event(a, EventCode::Clicked, None).unwrap();

        // Sibling is not busy, so it goes immediately and bubbling continues
        assert!(!ctx.is_alive(b));
        assert_eq!(hits.get(), 1);
        assert_eq!(ctx.children(cont).unwrap(), &[a]);
    }

    #[test]
    fn test_parent_destroyed_while_child_dispatching() {
        let (mut ctx, cont, button, label) = tree();
        let log = Rc::new(RefCell::new(Vec::new()));
        ctx.add_event_cb(
            label,
            EventCode::Clicked,
            move |_: &mut Event, ctx: &mut Context| ctx.destroy(button),
            None,
        )
        .unwrap();
        recorder(&mut ctx, button, EventCode::Clicked, &log);

        ctx.send_event(label, EventCode::Clicked, None).unwrap();

        // Parent reference treated as gone: dispatch ended at the label
        assert!(log.borrow().is_empty());
        assert!(!ctx.is_alive(button));
        assert!(ctx.is_alive(cont));
    }

    #[test]
    fn test_trait_object_handler() {
        struct Counter(Cell<u32>);
        impl EventHandler for Counter {
            fn on_event(&self, _event: &mut Event, _ctx: &mut Context) -> Result<()> {
                self.0.set(self.0.get() + 1);
                Ok(())
            }
        }

        let (mut ctx, _cont, button, _label) = tree();
        let counter = Rc::new(Counter(Cell::new(0)));
        ctx.add_event_handler(button, EventFilter::All, counter.clone(), None)
            .unwrap();

        ctx.send_event(button, EventCode::Custom(3), None).unwrap();
        ctx.send_event(button, EventCode::Pressed, None).unwrap();
        assert_eq!(counter.0.get(), 2);
    }

    #[test]
    fn test_phases() {
        let (mut ctx, _cont, button, label) = tree();
        let phases = Rc::new(RefCell::new(Vec::new()));
        for node in [label, button] {
            let phases = phases.clone();
            ctx.add_event_cb(
                node,
                EventCode::Clicked,
                move |e: &mut Event, _: &mut Context| {
                    phases.borrow_mut().push(e.phase());
                    Ok(())
                },
                None,
            )
            .unwrap();
        }

        ctx.send_event(label, EventCode::Clicked, None).unwrap();
        assert_eq!(*phases.borrow(), vec![Phase::Origin, Phase::Bubbling]);
    }
}
