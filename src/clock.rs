use std::{thread::sleep, time::{Duration, Instant}};

/// Paces the game loop to a fixed number of ticks per second.
pub struct Clock {
    interval: Duration,
    last_tick: Option<Instant>,
}

impl Clock {
    pub fn new(ticks_per_second: u32) -> Self {
        let interval = Duration::from_secs(1) / ticks_per_second.max(1);
        Clock { interval, last_tick: None }
    }

    #[cfg(test)]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Sleeps until a full interval has passed since the previous tick and
    /// returns the time actually elapsed. The first tick doesn't wait.
    pub fn tick(&mut self) -> Duration {
        let now = Instant::now();

        let elapsed = match self.last_tick {
            None => Duration::from_secs(0),
            Some(prev) => {
                let since = now.duration_since(prev);
                if since < self.interval {
                    sleep(self.interval - since);
                }
                prev.elapsed()
            }
        };

        self.last_tick = Some(Instant::now());
        elapsed
    }
}
