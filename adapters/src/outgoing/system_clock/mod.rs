use time::OffsetDateTime;

use chanban_application::ports::outgoing::clock::ClockPort;

/// Wall clock in UTC, truncated to whole seconds so resolved deadlines
/// round-trip through their canonical text form.
pub struct SystemClockAdapter;

impl SystemClockAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemClockAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockPort for SystemClockAdapter {
    fn now(&self) -> OffsetDateTime {
        let now = OffsetDateTime::now_utc();
        now.replace_nanosecond(0).unwrap_or(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_has_whole_second_precision() {
        assert_eq!(SystemClockAdapter::new().now().nanosecond(), 0);
    }
}
