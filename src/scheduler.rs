use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Discrete speed levels mapped onto a tick interval range
///
/// Level 0 is the slowest (`max_interval`); the top level is the fastest
/// (`min_interval`); levels in between interpolate linearly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeedConfig {
    pub n_speed_levels: u32,
    pub min_interval: Duration,
    pub max_interval: Duration,
    pub initial_level: u32,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self {
            n_speed_levels: 10,
            min_interval: Duration::from_millis(80),
            max_interval: Duration::from_millis(500),
            initial_level: 4,
        }
    }
}

/// Interval for a speed level, clamping the level into range
pub fn interval_for_level(level: u32, config: &SpeedConfig) -> Duration {
    let max_level = config.n_speed_levels.saturating_sub(1);
    if max_level == 0 {
        return config.max_interval;
    }
    let level = level.min(max_level);
    let span = config.max_interval.saturating_sub(config.min_interval);
    config.max_interval - span * level / max_level
}

#[derive(Debug)]
struct TimerState {
    interval: Duration,
    running: bool,
    killed: bool,
}

struct Shared {
    state: Mutex<TimerState>,
    cond: Condvar,
}

/// Cancelable periodic timer on a dedicated thread
///
/// The callback fires once per interval while the scheduler is running.
/// It executes with the scheduler lock held, which gives `pause()` its
/// guarantee: once `pause()` returns, no callback is in flight and none
/// will fire. The callback must therefore only signal the gameplay thread
/// (typically by sending on a channel) and never call back into the
/// scheduler.
pub struct TickScheduler {
    shared: Arc<Shared>,
    thread: Option<JoinHandle<()>>,
}

impl TickScheduler {
    /// Spawn the timer thread, initially paused
    pub fn new(interval: Duration, mut tick: impl FnMut() + Send + 'static) -> Self {
        let shared = Arc::new(Shared {
            state: Mutex::new(TimerState {
                interval,
                running: false,
                killed: false,
            }),
            cond: Condvar::new(),
        });

        let timer = Arc::clone(&shared);
        let thread = thread::spawn(move || {
            let mut guard = timer.state.lock().unwrap();
            loop {
                if guard.killed {
                    break;
                }
                if !guard.running {
                    guard = timer.cond.wait(guard).unwrap();
                    continue;
                }

                let interval = guard.interval;
                let deadline = Instant::now() + interval;
                // wait out one interval; pause, kill and interval changes
                // cancel the pending tick and restart the outer loop
                loop {
                    if guard.killed || !guard.running || guard.interval != interval {
                        break;
                    }
                    let now = Instant::now();
                    if now >= deadline {
                        tick();
                        break;
                    }
                    let (next, _timeout) =
                        timer.cond.wait_timeout(guard, deadline - now).unwrap();
                    guard = next;
                }
            }
        });

        Self {
            shared,
            thread: Some(thread),
        }
    }

    /// Resume ticking. No-op once killed.
    pub fn start(&self) {
        let mut state = self.shared.state.lock().unwrap();
        if state.killed {
            return;
        }
        state.running = true;
        self.shared.cond.notify_all();
    }

    /// Halt ticking and cancel the pending tick
    ///
    /// Blocks while a tick callback is executing; after this returns no
    /// further callback fires until `start()`.
    pub fn pause(&self) {
        let mut state = self.shared.state.lock().unwrap();
        state.running = false;
        self.shared.cond.notify_all();
    }

    /// Change the tick interval; restarts the pending wait
    pub fn set_interval(&self, interval: Duration) {
        let mut state = self.shared.state.lock().unwrap();
        state.interval = interval;
        self.shared.cond.notify_all();
    }

    pub fn interval(&self) -> Duration {
        self.shared.state.lock().unwrap().interval
    }

    pub fn is_running(&self) -> bool {
        let state = self.shared.state.lock().unwrap();
        state.running && !state.killed
    }

    /// Permanently terminate the timer thread; no restart is possible
    pub fn kill(&mut self) {
        {
            let mut state = self.shared.state.lock().unwrap();
            state.running = false;
            state.killed = true;
            self.shared.cond.notify_all();
        }
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for TickScheduler {
    fn drop(&mut self) {
        self.kill();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    fn channel_scheduler(interval: Duration) -> (TickScheduler, mpsc::Receiver<()>) {
        let (tx, rx) = mpsc::channel();
        let scheduler = TickScheduler::new(interval, move || {
            let _ = tx.send(());
        });
        (scheduler, rx)
    }

    #[test]
    fn test_paused_until_started() {
        let (_scheduler, rx) = channel_scheduler(Duration::from_millis(5));
        std::thread::sleep(Duration::from_millis(50));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_ticks_arrive_while_running() {
        let (scheduler, rx) = channel_scheduler(Duration::from_millis(5));
        scheduler.start();
        for _ in 0..3 {
            rx.recv_timeout(Duration::from_secs(1))
                .expect("tick should arrive");
        }
    }

    #[test]
    fn test_no_tick_after_pause_returns() {
        let (scheduler, rx) = channel_scheduler(Duration::from_millis(5));
        scheduler.start();
        rx.recv_timeout(Duration::from_secs(1)).unwrap();

        scheduler.pause();
        // anything sent before pause returned is already in the channel
        while rx.try_recv().is_ok() {}
        std::thread::sleep(Duration::from_millis(50));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_interval_is_mutable_while_running() {
        let (scheduler, rx) = channel_scheduler(Duration::from_millis(500));
        scheduler.start();
        scheduler.set_interval(Duration::from_millis(5));
        assert_eq!(scheduler.interval(), Duration::from_millis(5));
        // the shortened interval applies without a restart
        rx.recv_timeout(Duration::from_millis(250))
            .expect("tick should arrive at the new interval");
    }

    #[test]
    fn test_kill_is_permanent() {
        let (mut scheduler, rx) = channel_scheduler(Duration::from_millis(5));
        scheduler.kill();
        scheduler.start();
        assert!(!scheduler.is_running());
        std::thread::sleep(Duration::from_millis(50));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_interval_for_level_interpolates() {
        let config = SpeedConfig {
            n_speed_levels: 5,
            min_interval: Duration::from_millis(100),
            max_interval: Duration::from_millis(500),
            initial_level: 0,
        };
        assert_eq!(interval_for_level(0, &config), Duration::from_millis(500));
        assert_eq!(interval_for_level(1, &config), Duration::from_millis(400));
        assert_eq!(interval_for_level(2, &config), Duration::from_millis(300));
        assert_eq!(interval_for_level(4, &config), Duration::from_millis(100));
        // out-of-range levels clamp to the fastest
        assert_eq!(interval_for_level(99, &config), Duration::from_millis(100));
    }

    #[test]
    fn test_single_level_uses_max_interval() {
        let config = SpeedConfig {
            n_speed_levels: 1,
            min_interval: Duration::from_millis(100),
            max_interval: Duration::from_millis(500),
            initial_level: 0,
        };
        assert_eq!(interval_for_level(0, &config), Duration::from_millis(500));
    }
}
