use super::{
    Action, ActionHandler, ActionOutcome, InputDispatcher, Level, TriggerEvent, TriggerLine,
};
use crate::lock_or_recover;
use crossbeam_channel::unbounded;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct RecordingHandler {
    actions: Mutex<Vec<Action>>,
}

impl ActionHandler for RecordingHandler {
    fn perform(&self, action: Action) -> ActionOutcome {
        lock_or_recover(&self.actions, "test handler").push(action);
        match action {
            Action::Start => ActionOutcome::Started,
            Action::Stop => ActionOutcome::Stopping,
            Action::Preserve => ActionOutcome::PreserveFailed("unused".to_string()),
            Action::CycleInfoMode => ActionOutcome::InfoMode(1),
        }
    }
}

#[test]
fn each_line_maps_to_one_action() {
    assert_eq!(TriggerLine::Copy.action(), Action::Preserve);
    assert_eq!(TriggerLine::Power.action(), Action::Start);
    assert_eq!(TriggerLine::Stop.action(), Action::Stop);
    assert_eq!(TriggerLine::Info.action(), Action::CycleInfoMode);
}

#[test]
fn releases_are_ignored() {
    let handler = Arc::new(RecordingHandler::default());
    let dispatcher = InputDispatcher::new(Arc::clone(&handler));
    let release = TriggerEvent {
        line: TriggerLine::Power,
        level: Level::High,
    };
    assert!(dispatcher.dispatch(release).is_none());
    assert_eq!(
        dispatcher.dispatch(TriggerEvent::pressed(TriggerLine::Power)),
        Some(ActionOutcome::Started)
    );
    assert_eq!(
        *lock_or_recover(&handler.actions, "test handler"),
        vec![Action::Start]
    );
}

#[test]
fn spawned_dispatcher_runs_events_in_order() {
    let handler = Arc::new(RecordingHandler::default());
    let dispatcher = InputDispatcher::new(Arc::clone(&handler));
    let (tx, rx) = unbounded();
    let handle = dispatcher.spawn(rx).expect("spawn dispatcher");
    for line in [
        TriggerLine::Info,
        TriggerLine::Power,
        TriggerLine::Copy,
        TriggerLine::Stop,
    ] {
        tx.send(TriggerEvent::pressed(line)).expect("send");
    }
    drop(tx);
    handle.join().expect("dispatcher exits when senders are gone");
    assert_eq!(
        *lock_or_recover(&handler.actions, "test handler"),
        vec![
            Action::CycleInfoMode,
            Action::Start,
            Action::Preserve,
            Action::Stop
        ]
    );
}
