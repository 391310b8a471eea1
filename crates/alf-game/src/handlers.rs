//! Command handlers for the player.
//!
//! Each handler holds an `Rc` handle to the player and touches nothing
//! else. Given the same starting player and the same command, a handler
//! always produces the same resulting player.

use crate::commands::{HealCommand, MoveCommand, TakeDamageCommand};
use crate::state::PlayerState;
use alf_core::command::CommandHandler;
use alf_core::dispatcher::CommandDispatcher;
use alf_core::tick::TickContext;
use std::rc::Rc;

/// Applies [`MoveCommand`]: adds the deltas to the position.
#[derive(Debug, Clone)]
pub struct MoveCommandHandler {
    player: Rc<PlayerState>,
}

impl MoveCommandHandler {
    pub fn new(player: Rc<PlayerState>) -> Self {
        Self { player }
    }
}

impl CommandHandler<MoveCommand> for MoveCommandHandler {
    fn handle(&mut self, command: &MoveCommand, _ctx: TickContext) {
        let player = &self.player;
        let x = player.position_x.get() + command.delta_x;
        let y = player.position_y.get() + command.delta_y;
        player.position_x.set(x);
        player.position_y.set(y);
    }
}

/// Applies [`TakeDamageCommand`]: subtracts the amount, flooring at zero.
#[derive(Debug, Clone)]
pub struct TakeDamageCommandHandler {
    player: Rc<PlayerState>,
}

impl TakeDamageCommandHandler {
    pub fn new(player: Rc<PlayerState>) -> Self {
        Self { player }
    }
}

impl CommandHandler<TakeDamageCommand> for TakeDamageCommandHandler {
    fn handle(&mut self, command: &TakeDamageCommand, _ctx: TickContext) {
        let next = self.player.health.get() - command.amount;
        self.player.health.set(floor_health(next));
    }
}

/// Applies [`HealCommand`]: adds the amount with no ceiling.
#[derive(Debug, Clone)]
pub struct HealCommandHandler {
    player: Rc<PlayerState>,
}

impl HealCommandHandler {
    pub fn new(player: Rc<PlayerState>) -> Self {
        Self { player }
    }
}

impl CommandHandler<HealCommand> for HealCommandHandler {
    fn handle(&mut self, command: &HealCommand, _ctx: TickContext) {
        let next = self.player.health.get() + command.amount;
        self.player.health.set(floor_health(next));
    }
}

/// Health never goes below zero. NaN also lands on zero.
fn floor_health(value: f32) -> f32 {
    value.max(0.0)
}

/// Register every player handler, bound to `player`, on `dispatcher`.
pub fn register_player_handlers(dispatcher: &mut CommandDispatcher, player: &Rc<PlayerState>) {
    dispatcher.register::<MoveCommand, _>(MoveCommandHandler::new(player.clone()));
    dispatcher.register::<TakeDamageCommand, _>(TakeDamageCommandHandler::new(player.clone()));
    dispatcher.register::<HealCommand, _>(HealCommandHandler::new(player.clone()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn player() -> Rc<PlayerState> {
        Rc::new(PlayerState::new())
    }

    fn tick() -> TickContext {
        TickContext::new(0.02, 1)
    }

    #[test]
    fn move_and_damage_share_one_player() {
        let player = player();
        let mut mover = MoveCommandHandler::new(player.clone());
        let mut damager = TakeDamageCommandHandler::new(player.clone());

        mover.handle(&MoveCommand::new(2.0, -1.0), tick());
        damager.handle(&TakeDamageCommand::new(5.0), tick());

        let p = &player;
        assert_eq!(p.position_x.get(), 2.0);
        assert_eq!(p.position_y.get(), -1.0);
        assert_eq!(p.health.get(), 95.0);
    }

    #[test]
    fn damage_floors_at_zero() {
        let player = player();
        let mut damager = TakeDamageCommandHandler::new(player.clone());

        damager.handle(&TakeDamageCommand::new(250.0), tick());
        assert_eq!(player.health.get(), 0.0);

        damager.handle(&TakeDamageCommand::new(1.0), tick());
        assert_eq!(player.health.get(), 0.0);
        // Only the first hit changed the value.
        assert_eq!(player.health.version(), 1);
    }

    #[test]
    fn nan_damage_keeps_health_non_negative() {
        let player = player();
        let mut damager = TakeDamageCommandHandler::new(player.clone());
        damager.handle(&TakeDamageCommand::new(f32::NAN), tick());
        assert_eq!(player.health.get(), 0.0);
    }

    #[test]
    fn heal_has_no_ceiling() {
        let player = player();
        let mut healer = HealCommandHandler::new(player.clone());
        healer.handle(&HealCommand::new(50.0), tick());
        assert_eq!(player.health.get(), 150.0);
    }

    #[test]
    fn negative_heal_still_floors() {
        let player = player();
        let mut healer = HealCommandHandler::new(player.clone());
        healer.handle(&HealCommand::new(-500.0), tick());
        assert_eq!(player.health.get(), 0.0);
    }

    #[test]
    fn zero_move_is_not_a_change() {
        let player = player();
        let mut mover = MoveCommandHandler::new(player.clone());
        mover.handle(&MoveCommand::new(0.0, 0.0), tick());
        let p = &player;
        assert_eq!(p.position_x.version(), 0);
        assert_eq!(p.position_y.version(), 0);
    }

    #[test]
    fn registered_handlers_route_through_dispatcher() {
        let player = player();
        let mut dispatcher = CommandDispatcher::new();
        register_player_handlers(&mut dispatcher, &player);

        dispatcher.dispatch(&MoveCommand::new(1.0, 1.0), tick()).unwrap();
        dispatcher.dispatch(&TakeDamageCommand::new(10.0), tick()).unwrap();
        dispatcher.dispatch(&HealCommand::new(4.0), tick()).unwrap();

        let p = &player;
        assert_eq!(p.position_x.get(), 1.0);
        assert_eq!(p.health.get(), 94.0);
        assert_eq!(dispatcher.len(), 3);
    }

    #[test]
    fn position_observer_sees_the_whole_player_mid_move() {
        let player = player();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let (watched, s) = (Rc::downgrade(&player), seen.clone());
        player.position_x.subscribe(move |x| {
            if let Some(p) = watched.upgrade() {
                s.borrow_mut().push((*x, p.position_y.get(), p.health.get()));
            }
        });

        let mut mover = MoveCommandHandler::new(player.clone());
        mover.handle(&MoveCommand::new(3.0, 4.0), tick());

        // x is notified before y is written.
        assert_eq!(*seen.borrow(), vec![(3.0, 0.0, 100.0)]);
        assert_eq!(player.position_y.get(), 4.0);
    }
}
