use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use tracing::debug;

type Handler = Rc<RefCell<dyn FnMut()>>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    handlers: HashMap<String, Vec<(u64, Handler)>>,
}

/// Explicit click registry keyed by sort field, standing in for DOM event
/// listeners. Handlers registered during a dispatch do not run in that
/// dispatch; handlers removed during a dispatch still finish it.
#[derive(Clone, Default)]
pub struct ClickHub {
    registry: Rc<RefCell<Registry>>,
}

impl ClickHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, field: &str, handler: impl FnMut() + 'static) -> Subscription {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;

        let handler: Handler = Rc::new(RefCell::new(handler));
        registry
            .handlers
            .entry(field.to_string())
            .or_default()
            .push((id, handler));

        debug!(field, id, "registered click handler");
        Subscription {
            registry: Rc::downgrade(&self.registry),
            field: field.to_string(),
            id,
        }
    }

    pub fn dispatch(&self, field: &str) -> usize {
        let batch: Vec<Handler> = match self.registry.borrow().handlers.get(field) {
            Some(handlers) => handlers.iter().map(|(_, h)| Rc::clone(h)).collect(),
            None => return 0,
        };

        for handler in &batch {
            (&mut *handler.borrow_mut())();
        }
        batch.len()
    }
}

/// Disposer: dropping it detaches the handler.
pub struct Subscription {
    registry: Weak<RefCell<Registry>>,
    field: String,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };

        let mut registry = registry.borrow_mut();
        if let Some(handlers) = registry.handlers.get_mut(&self.field) {
            handlers.retain(|(id, _)| *id != self.id);
            if handlers.is_empty() {
                registry.handlers.remove(&self.field);
            }
        }
        debug!(field = %self.field, id = self.id, "detached click handler");
    }
}
