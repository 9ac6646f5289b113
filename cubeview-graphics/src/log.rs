// Copyright (c) 2019-present Dmitry Stepanov and Fyrox Engine contributors.
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

//! Simple process-wide logger. Information goes to stdout, warnings and errors go to stderr. To
//! mirror the log into a file, call [`Log::set_file_name`] somewhere in your `main` function.

use parking_lot::Mutex;
use std::{
    fmt::{Debug, Display},
    io::{self, Write},
    path::Path,
    sync::{mpsc::Sender, LazyLock},
    time::{Duration, Instant},
};

/// A message that could be sent by the logger to all listeners.
#[derive(Debug, Clone)]
pub struct LogMessage {
    /// Kind of the message: information, warning or error.
    pub kind: MessageKind,
    /// The source message without logger prefixes.
    pub content: String,
    /// Time point at which the message was recorded, relative to logger initialization.
    pub time: Duration,
}

static LOG: LazyLock<Mutex<Log>> = LazyLock::new(|| Mutex::new(Log::new()));

/// A kind of message.
#[derive(Debug, Default, Copy, Clone, PartialOrd, PartialEq, Eq, Ord, Hash)]
#[repr(u32)]
pub enum MessageKind {
    /// Some useful information.
    #[default]
    Information = 0,
    /// A warning.
    Warning = 1,
    /// An error of some kind.
    Error = 2,
}

impl MessageKind {
    fn as_str(self) -> &'static str {
        match self {
            MessageKind::Information => "[INFO]: ",
            MessageKind::Warning => "[WARNING]: ",
            MessageKind::Error => "[ERROR]: ",
        }
    }
}

/// See module docs.
pub struct Log {
    file: Option<std::fs::File>,
    verbosity: MessageKind,
    listeners: Vec<Sender<LogMessage>>,
    time_origin: Instant,
}

impl Log {
    fn new() -> Self {
        Self {
            file: None,
            verbosity: MessageKind::Information,
            listeners: Default::default(),
            time_origin: Instant::now(),
        }
    }

    /// Creates a new log file at the specified path.
    pub fn set_file_name<P: AsRef<Path>>(path: P) {
        LOG.lock().file = std::fs::File::create(path).ok();
    }

    /// Sets new file to write the log to.
    pub fn set_file(file: Option<std::fs::File>) {
        LOG.lock().file = file;
    }

    fn write_internal<S>(&mut self, kind: MessageKind, message: S) -> bool
    where
        S: AsRef<str>,
    {
        if kind < self.verbosity {
            return false;
        }

        let mut msg = message.as_ref().to_owned();

        // Notify listeners about the message and remove all disconnected listeners.
        let time = self.time_origin.elapsed();
        self.listeners.retain(|listener| {
            listener
                .send(LogMessage {
                    kind,
                    content: msg.clone(),
                    time,
                })
                .is_ok()
        });

        msg.insert_str(0, kind.as_str());

        if kind == MessageKind::Information {
            let _ = io::stdout().write_all(msg.as_bytes());
        } else {
            let _ = io::stderr().write_all(msg.as_bytes());
        }

        if let Some(log_file) = self.file.as_mut() {
            let _ = log_file.write_all(msg.as_bytes());
            let _ = log_file.flush();
        }

        true
    }

    fn writeln_internal<S>(&mut self, kind: MessageKind, message: S) -> bool
    where
        S: AsRef<str>,
    {
        let mut msg = message.as_ref().to_owned();
        msg.push('\n');
        self.write_internal(kind, msg)
    }

    /// Writes a string to the console and optionally into the file (if set).
    pub fn write<S>(kind: MessageKind, msg: S)
    where
        S: AsRef<str>,
    {
        LOG.lock().write_internal(kind, msg);
    }

    /// Writes a string to the console and optionally into the file (if set), adds a new line to the
    /// end of the message.
    pub fn writeln<S>(kind: MessageKind, msg: S)
    where
        S: AsRef<str>,
    {
        LOG.lock().writeln_internal(kind, msg);
    }

    /// Writes an information message.
    pub fn info<S>(msg: S)
    where
        S: AsRef<str>,
    {
        Self::writeln(MessageKind::Information, msg)
    }

    /// Writes a warning message.
    pub fn warn<S>(msg: S)
    where
        S: AsRef<str>,
    {
        Self::writeln(MessageKind::Warning, msg)
    }

    /// Writes error message.
    pub fn err<S>(msg: S)
    where
        S: AsRef<str>,
    {
        Self::writeln(MessageKind::Error, msg)
    }

    /// Sets verbosity level. Messages of lower kind are dropped.
    pub fn set_verbosity(kind: MessageKind) {
        LOG.lock().verbosity = kind;
    }

    /// Adds a listener that will receive a copy of every message passed into the log.
    pub fn add_listener(listener: Sender<LogMessage>) {
        LOG.lock().listeners.push(listener)
    }

    /// Allows you to verify that the result of the operation is Ok, or print the error in the log.
    ///
    /// # Use cases
    ///
    /// Typical use case for this method is that when you _can_ ignore errors, but want them to
    /// be in the log.
    pub fn verify<T, E>(result: Result<T, E>)
    where
        E: Debug,
    {
        if let Err(e) = result {
            Self::writeln(
                MessageKind::Error,
                format!("Operation failed! Reason: {e:?}"),
            );
        }
    }

    /// Same as [`Self::verify`], but prefixes the error with the given message.
    pub fn verify_message<S, T, E>(result: Result<T, E>, msg: S)
    where
        E: Debug,
        S: Display,
    {
        if let Err(e) = result {
            Self::writeln(MessageKind::Error, format!("{msg}. Reason: {e:?}"));
        }
    }
}

#[cfg(test)]
mod test {
    use super::{Log, MessageKind};
    use std::sync::mpsc;

    #[test]
    fn listener_receives_message_without_prefix() {
        let mut log = Log::new();
        let (sender, receiver) = mpsc::channel();
        log.listeners.push(sender);

        assert!(log.writeln_internal(MessageKind::Error, "glLinkProgram failed"));

        let message = receiver.try_recv().unwrap();
        assert_eq!(message.kind, MessageKind::Error);
        assert_eq!(message.content, "glLinkProgram failed\n");
    }

    #[test]
    fn messages_below_verbosity_are_dropped() {
        let mut log = Log::new();
        log.verbosity = MessageKind::Warning;
        let (sender, receiver) = mpsc::channel();
        log.listeners.push(sender);

        assert!(!log.writeln_internal(MessageKind::Information, "renderer info"));
        assert!(log.writeln_internal(MessageKind::Warning, "shader warning"));

        let received = receiver.try_iter().collect::<Vec<_>>();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].kind, MessageKind::Warning);
    }

    #[test]
    fn disconnected_listeners_are_removed() {
        let mut log = Log::new();
        let (sender, receiver) = mpsc::channel();
        log.listeners.push(sender);
        drop(receiver);

        log.writeln_internal(MessageKind::Information, "frame size changed");
        assert!(log.listeners.is_empty());
    }
}
