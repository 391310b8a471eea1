//! Command and handler contracts.
//!
//! A [`Command`] is plain data describing one intended state mutation. It
//! carries no behaviour and no reference to the state it targets. A
//! [`CommandHandler`] applies one command type's effect to the state it owns.

use crate::tick::TickContext;
use std::any::Any;

/// Access to a value as `&dyn Any`. Blanket-implemented for every sized
/// `'static` type; used by the dispatcher to recover the concrete command.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// An immutable value object describing one intended mutation.
///
/// Implement it with an empty `impl Command for MyCommand {}`. The
/// dispatcher routes on the concrete type behind a `&dyn Command`, so a
/// command may be passed around as a trait object without losing its route.
pub trait Command: AsAny + std::fmt::Debug {
    /// Human-readable type name, used in routing errors and logs.
    fn command_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Applies the effect of one command type.
///
/// Handlers are expected to be total over valid input and to mutate only the
/// state they were constructed with.
pub trait CommandHandler<C: Command> {
    fn handle(&mut self, command: &C, ctx: TickContext);
}

impl<C, F> CommandHandler<C> for F
where
    C: Command,
    F: FnMut(&C, TickContext),
{
    fn handle(&mut self, command: &C, ctx: TickContext) {
        self(command, ctx)
    }
}
