//! Press-once / press-twice handling for the report shortcut.
//!
//! A single press copies the text report once the repeat window has passed
//! without a second press. A second press inside the window shows the HTML
//! report instead. Further presses in the same burst do nothing.
//!
//! Time is passed in explicitly as an offset from an arbitrary host epoch, so
//! the host drives the deadline with its own timer and calls [`ReportGesture::poll`].

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportAction {
    CopyText,
    ShowHtml,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureStatus {
    #[default]
    Idle,
    /// One press seen; the copy fires at `deadline` unless a second press lands first.
    AwaitingRepeat { deadline: Duration },
    /// The burst already produced its action; more presses are swallowed.
    Settled,
}

#[derive(Debug, Clone)]
pub struct ReportGesture {
    delay: Duration,
    status: GestureStatus,
    last_press: Option<Duration>,
}

impl ReportGesture {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            status: GestureStatus::Idle,
            last_press: None,
        }
    }

    pub fn status(&self) -> GestureStatus {
        self.status
    }

    /// Register a key press at `at`.
    ///
    /// Callers should [`poll`](Self::poll) first so an expired copy is not lost.
    pub fn press(&mut self, at: Duration) -> Option<ReportAction> {
        let repeat = self
            .last_press
            .is_some_and(|last| at.saturating_sub(last) < self.delay);
        self.last_press = Some(at);

        match (self.status, repeat) {
            (GestureStatus::AwaitingRepeat { .. }, true) => {
                self.status = GestureStatus::Settled;
                Some(ReportAction::ShowHtml)
            }
            (GestureStatus::Settled, true) => None,
            _ => {
                self.status = GestureStatus::AwaitingRepeat {
                    deadline: at + self.delay,
                };
                None
            }
        }
    }

    /// Fire the pending copy if its deadline has passed.
    pub fn poll(&mut self, at: Duration) -> Option<ReportAction> {
        match self.status {
            GestureStatus::AwaitingRepeat { deadline } if at >= deadline => {
                self.status = GestureStatus::Idle;
                Some(ReportAction::CopyText)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_single_press_copies_after_delay() {
        let mut gesture = ReportGesture::new(ms(505));

        assert_eq!(gesture.press(ms(1_000)), None);
        assert_eq!(gesture.poll(ms(1_400)), None);
        assert_eq!(gesture.poll(ms(1_505)), Some(ReportAction::CopyText));
        assert_eq!(gesture.poll(ms(2_000)), None);
        assert_eq!(gesture.status(), GestureStatus::Idle);
    }

    #[test]
    fn test_double_press_shows_html_and_cancels_copy() {
        let mut gesture = ReportGesture::new(ms(505));

        gesture.press(ms(0));
        assert_eq!(gesture.press(ms(200)), Some(ReportAction::ShowHtml));
        assert_eq!(gesture.poll(ms(1_000)), None);
    }

    #[test]
    fn test_triple_press_does_nothing_more() {
        let mut gesture = ReportGesture::new(ms(505));

        gesture.press(ms(0));
        gesture.press(ms(200));
        assert_eq!(gesture.press(ms(400)), None);
        assert_eq!(gesture.status(), GestureStatus::Settled);
        assert_eq!(gesture.poll(ms(5_000)), None);
    }

    #[test]
    fn test_slow_second_press_starts_new_burst() {
        let mut gesture = ReportGesture::new(ms(505));

        gesture.press(ms(0));
        assert_eq!(gesture.poll(ms(600)), Some(ReportAction::CopyText));
        assert_eq!(gesture.press(ms(700)), None);
        assert_eq!(gesture.status(), GestureStatus::AwaitingRepeat { deadline: ms(1_205) });
    }

    #[test]
    fn test_new_burst_after_settled() {
        let mut gesture = ReportGesture::new(ms(505));

        gesture.press(ms(0));
        gesture.press(ms(100));
        assert_eq!(gesture.press(ms(2_000)), None);
        assert_eq!(gesture.poll(ms(2_505)), Some(ReportAction::CopyText));
    }
}
