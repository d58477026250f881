//! # Touch Control
//!
//! Turns a touch drag into movement intents. The drag vector from the point where the touch
//! started is bucketed into one of eight 45° compass sectors, each mapped to one or two
//! intents. Drags inside the deadzone fire nothing, and a touch that ends without ever
//! leaving the deadzone is a tap, which places a block like a left click.
//!
//! Only the first active touch is tracked; further fingers are ignored until it ends.

use std::f64::consts::FRAC_PI_4;

use winit::event::{Touch, TouchPhase};

use super::input_state::{ClickButton, InputEvent, Intent};
use crate::core::EventQueue;

/// Intents per sector, counter-clockwise from pointing right.
const SECTOR_INTENTS: [&[Intent]; 8] = [
    &[Intent::StrafeRight],
    &[Intent::Forward, Intent::StrafeRight],
    &[Intent::Forward],
    &[Intent::Forward, Intent::StrafeLeft],
    &[Intent::StrafeLeft],
    &[Intent::Back, Intent::StrafeLeft],
    &[Intent::Back],
    &[Intent::Back, Intent::StrafeRight],
];

/// Maps a drag vector in screen space (y pointing down) to its intents.
///
/// # Arguments
/// * `dx`, `dy` - Drag vector from the touch origin in pixels
/// * `deadzone` - Drags shorter than this fire no intent
pub fn drag_intents(dx: f64, dy: f64, deadzone: f64) -> &'static [Intent] {
    if dx.hypot(dy) < deadzone {
        return &[];
    }
    let angle = (-dy).atan2(dx);
    let sector = (angle / FRAC_PI_4).round() as i32;
    SECTOR_INTENTS[sector.rem_euclid(8) as usize]
}

struct ActiveTouch {
    id: u64,
    origin: (f64, f64),
    left_deadzone: bool,
}

/// Tracks one touch and the intents it currently holds.
pub struct TouchBridge {
    deadzone: f64,
    window_size: (u32, u32),
    touch: Option<ActiveTouch>,
    held: Vec<Intent>,
}

impl TouchBridge {
    pub fn new(deadzone: f32, window_size: (u32, u32)) -> Self {
        Self {
            deadzone: deadzone as f64,
            window_size,
            touch: None,
            held: Vec::new(),
        }
    }

    pub fn resize(&mut self, window_size: (u32, u32)) {
        self.window_size = window_size;
    }

    /// Intents the tracked touch currently holds.
    pub fn held(&self) -> &[Intent] {
        &self.held
    }

    /// Dispatches a winit touch event.
    pub fn intake_touch(&mut self, touch: &Touch, queue: &mut EventQueue<InputEvent>) {
        let position = (touch.location.x, touch.location.y);
        match touch.phase {
            TouchPhase::Started => self.begin(touch.id, position),
            TouchPhase::Moved => self.drag(touch.id, position, queue),
            TouchPhase::Ended => self.end(touch.id, position, queue),
            TouchPhase::Cancelled => self.cancel(touch.id, queue),
        }
    }

    /// Starts tracking a touch unless another one is already tracked.
    pub fn begin(&mut self, id: u64, position: (f64, f64)) {
        if self.touch.is_none() {
            self.touch = Some(ActiveTouch {
                id,
                origin: position,
                left_deadzone: false,
            });
        }
    }

    /// Updates the held intents from the current drag vector.
    ///
    /// Intents that left the set are released before new ones are pressed.
    pub fn drag(&mut self, id: u64, position: (f64, f64), queue: &mut EventQueue<InputEvent>) {
        let Some(touch) = self.touch.as_mut().filter(|touch| touch.id == id) else {
            return;
        };

        let dx = position.0 - touch.origin.0;
        let dy = position.1 - touch.origin.1;
        let intents = drag_intents(dx, dy, self.deadzone);
        if !intents.is_empty() {
            touch.left_deadzone = true;
        }

        for intent in self.held.iter().filter(|intent| !intents.contains(intent)) {
            queue.push(InputEvent::IntentReleased(*intent));
        }
        for intent in intents.iter().filter(|intent| !self.held.contains(intent)) {
            queue.push(InputEvent::IntentPressed(*intent));
        }
        self.held = intents.to_vec();
    }

    /// Ends the tracked touch, releasing its intents. A tap becomes a click.
    pub fn end(&mut self, id: u64, position: (f64, f64), queue: &mut EventQueue<InputEvent>) {
        let Some(touch) = self.touch.take_if(|touch| touch.id == id) else {
            return;
        };

        self.release_held(queue);
        if !touch.left_deadzone {
            queue.push(InputEvent::Click {
                button: ClickButton::Place,
                x: (position.0 - self.window_size.0 as f64 / 2.0) as f32,
                y: (position.1 - self.window_size.1 as f64 / 2.0) as f32,
            });
        }
    }

    /// Drops the tracked touch without a click.
    pub fn cancel(&mut self, id: u64, queue: &mut EventQueue<InputEvent>) {
        if self.touch.take_if(|touch| touch.id == id).is_some() {
            self.release_held(queue);
        }
    }

    fn release_held(&mut self, queue: &mut EventQueue<InputEvent>) {
        queue.extend(self.held.drain(..).map(InputEvent::IntentReleased));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(queue: &mut EventQueue<InputEvent>) -> Vec<InputEvent> {
        queue.drain().collect()
    }

    #[test]
    fn compass_sectors() {
        assert_eq!(drag_intents(100.0, 0.0, 25.0), &[Intent::StrafeRight]);
        assert_eq!(drag_intents(0.0, -100.0, 25.0), &[Intent::Forward]);
        assert_eq!(drag_intents(-100.0, 0.0, 25.0), &[Intent::StrafeLeft]);
        assert_eq!(drag_intents(0.0, 100.0, 25.0), &[Intent::Back]);
        assert_eq!(drag_intents(-70.0, 70.0, 25.0), &[Intent::Back, Intent::StrafeLeft]);
        assert_eq!(drag_intents(70.0, 70.0, 25.0), &[Intent::Back, Intent::StrafeRight]);
    }

    #[test]
    fn sectors_are_centered_on_their_direction() {
        // 20° above pointing right is still the right sector.
        let (sin, cos) = 20f64.to_radians().sin_cos();
        assert_eq!(drag_intents(100.0 * cos, -100.0 * sin, 25.0), &[Intent::StrafeRight]);
        let (sin, cos) = 25f64.to_radians().sin_cos();
        assert_eq!(
            drag_intents(100.0 * cos, -100.0 * sin, 25.0),
            &[Intent::Forward, Intent::StrafeRight]
        );
    }

    #[test]
    fn drags_inside_the_deadzone_fire_nothing() {
        assert!(drag_intents(10.0, -10.0, 25.0).is_empty());
        assert!(drag_intents(0.0, 0.0, 25.0).is_empty());
    }

    #[test]
    fn diagonal_drag_fires_two_intents_and_releases_them_in_the_deadzone() {
        let mut bridge = TouchBridge::new(25.0, (800, 600));
        let mut queue = EventQueue::new();

        bridge.begin(1, (400.0, 300.0));
        bridge.drag(1, (500.0, 200.0), &mut queue);
        assert_eq!(
            drain(&mut queue),
            vec![
                InputEvent::IntentPressed(Intent::Forward),
                InputEvent::IntentPressed(Intent::StrafeRight),
            ]
        );

        bridge.drag(1, (405.0, 300.0), &mut queue);
        assert_eq!(
            drain(&mut queue),
            vec![
                InputEvent::IntentReleased(Intent::Forward),
                InputEvent::IntentReleased(Intent::StrafeRight),
            ]
        );
        assert!(bridge.held().is_empty());
    }

    #[test]
    fn changing_sector_only_sends_the_difference() {
        let mut bridge = TouchBridge::new(25.0, (800, 600));
        let mut queue = EventQueue::new();

        bridge.begin(1, (0.0, 0.0));
        bridge.drag(1, (0.0, -100.0), &mut queue);
        drain(&mut queue);

        bridge.drag(1, (-100.0, -100.0), &mut queue);
        assert_eq!(drain(&mut queue), vec![InputEvent::IntentPressed(Intent::StrafeLeft)]);

        bridge.drag(1, (-100.0, 0.0), &mut queue);
        assert_eq!(drain(&mut queue), vec![InputEvent::IntentReleased(Intent::Forward)]);
    }

    #[test]
    fn tap_is_a_click_relative_to_the_center() {
        let mut bridge = TouchBridge::new(25.0, (800, 600));
        let mut queue = EventQueue::new();

        bridge.begin(3, (410.0, 280.0));
        bridge.end(3, (412.0, 281.0), &mut queue);
        assert_eq!(
            drain(&mut queue),
            vec![InputEvent::Click {
                button: ClickButton::Place,
                x: 12.0,
                y: -19.0
            }]
        );
    }

    #[test]
    fn drag_release_is_not_a_click() {
        let mut bridge = TouchBridge::new(25.0, (800, 600));
        let mut queue = EventQueue::new();

        bridge.begin(1, (400.0, 300.0));
        bridge.drag(1, (400.0, 200.0), &mut queue);
        bridge.drag(1, (400.0, 300.0), &mut queue);
        drain(&mut queue);
        bridge.end(1, (400.0, 300.0), &mut queue);
        assert!(queue.is_empty());
    }

    #[test]
    fn other_fingers_are_ignored() {
        let mut bridge = TouchBridge::new(25.0, (800, 600));
        let mut queue = EventQueue::new();

        bridge.begin(1, (400.0, 300.0));
        bridge.begin(2, (100.0, 100.0));
        bridge.drag(2, (100.0, 0.0), &mut queue);
        assert!(queue.is_empty());

        bridge.drag(1, (500.0, 300.0), &mut queue);
        bridge.cancel(1, &mut queue);
        assert_eq!(
            drain(&mut queue),
            vec![
                InputEvent::IntentPressed(Intent::StrafeRight),
                InputEvent::IntentReleased(Intent::StrafeRight),
            ]
        );
    }
}
