//! Static command routing.
//!
//! The [`CommandDispatcher`] maps each concrete command type to exactly one
//! handler. It is a registry, not a broadcast bus: a command either reaches
//! the last handler registered for its type, or dispatch fails with
//! [`SimError::NoHandler`]. Commands are never queued or silently dropped.

use crate::command::{Command, CommandHandler};
use crate::error::SimError;
use crate::tick::TickContext;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use tracing::{debug, trace, warn};

/// Type-erased invocation thunk capturing a handler instance.
type RouteThunk = Box<dyn FnMut(&dyn Any, TickContext)>;

struct Route {
    command_name: &'static str,
    thunk: RouteThunk,
}

/// Runtime registry from command type to handler.
#[derive(Default)]
pub struct CommandDispatcher {
    routes: HashMap<TypeId, Route>,
}

impl std::fmt::Debug for CommandDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.routes.values().map(|r| r.command_name).collect();
        names.sort_unstable();
        f.debug_struct("CommandDispatcher")
            .field("routes", &names)
            .finish()
    }
}

impl CommandDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route commands of type `C` to `handler`.
    ///
    /// Re-registering a type replaces the previous handler; the last
    /// registration wins. Returns `true` if an earlier handler was replaced.
    pub fn register<C, H>(&mut self, mut handler: H) -> bool
    where
        C: Command,
        H: CommandHandler<C> + 'static,
    {
        let command_name = std::any::type_name::<C>();
        let thunk: RouteThunk = Box::new(move |command: &dyn Any, ctx: TickContext| {
            // Routes are keyed by TypeId, so the downcast always succeeds.
            if let Some(command) = command.downcast_ref::<C>() {
                handler.handle(command, ctx);
            }
        });
        let replaced = self
            .routes
            .insert(TypeId::of::<C>(), Route { command_name, thunk })
            .is_some();
        if replaced {
            debug!(command = command_name, "replaced command handler");
        } else {
            debug!(command = command_name, "registered command handler");
        }
        replaced
    }

    /// Route `command` to its handler and run it to completion.
    pub fn dispatch(&mut self, command: &dyn Command, ctx: TickContext) -> Result<(), SimError> {
        let type_id = command.as_any().type_id();
        let Some(route) = self.routes.get_mut(&type_id) else {
            let name = command.command_name();
            warn!(command = name, tick = ctx.tick_index(), "no handler registered");
            return Err(SimError::NoHandler { command: name });
        };
        trace!(command = route.command_name, tick = ctx.tick_index(), "dispatching");
        (route.thunk)(command.as_any(), ctx);
        Ok(())
    }

    /// Whether a handler is registered for `C`.
    pub fn is_registered<C: Command>(&self) -> bool {
        self.routes.contains_key(&TypeId::of::<C>())
    }

    /// Number of command types with a registered handler.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
