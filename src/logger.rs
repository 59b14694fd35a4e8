use crossbeam::channel::{Receiver, Sender};
use log::{debug, info};

/// Receives status messages and progress from a running tracker
///
/// Calls come from the worker threads and must return promptly.
///
pub trait Logger: Send + Sync {
    fn set_status(&self, status: &str);

    /// Progress in `[0, 1]`
    ///
    fn set_progress(&self, progress: f64);
}

#[derive(Default, Clone, Debug)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn set_status(&self, _status: &str) {}

    fn set_progress(&self, _progress: f64) {}
}

/// Forwards status messages and progress to the `log` facade
///
#[derive(Default, Clone, Debug)]
pub struct LogLogger;

impl Logger for LogLogger {
    fn set_status(&self, status: &str) {
        if !status.is_empty() {
            info!("{}", status);
        }
    }

    fn set_progress(&self, progress: f64) {
        debug!("Progress: {:.1}%", progress * 100.0);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoggerEvent {
    Status(String),
    Progress(f64),
}

/// Sends every status message and progress report to an unbounded channel
///
#[derive(Debug, Clone)]
pub struct ChannelLogger {
    sender: Sender<LoggerEvent>,
}

impl ChannelLogger {
    pub fn new() -> (Self, Receiver<LoggerEvent>) {
        let (sender, receiver) = crossbeam::channel::unbounded();
        (Self { sender }, receiver)
    }

    fn send(&self, event: LoggerEvent) {
        // the receiver may be gone, reports are fire-and-forget
        if let Err(e) = self.sender.send(event) {
            debug!("Logger event dropped: {:?}", e);
        }
    }
}

impl Logger for ChannelLogger {
    fn set_status(&self, status: &str) {
        self.send(LoggerEvent::Status(status.to_string()));
    }

    fn set_progress(&self, progress: f64) {
        self.send(LoggerEvent::Progress(progress));
    }
}

#[cfg(test)]
mod tests {
    use crate::logger::{ChannelLogger, LogLogger, Logger, LoggerEvent, NoopLogger};

    #[test]
    fn channel_logger() {
        let (logger, receiver) = ChannelLogger::new();
        logger.set_status("working");
        logger.set_progress(0.5);
        assert_eq!(
            receiver.try_iter().collect::<Vec<_>>(),
            vec![
                LoggerEvent::Status("working".to_string()),
                LoggerEvent::Progress(0.5)
            ]
        );
        drop(receiver);
        logger.set_progress(1.0);
    }

    #[test]
    fn silent_loggers() {
        let _ = env_logger::builder().is_test(true).try_init();
        for logger in [&NoopLogger as &dyn Logger, &LogLogger] {
            logger.set_status("status");
            logger.set_status("");
            logger.set_progress(0.25);
        }
    }
}
