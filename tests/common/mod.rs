use std::{
    cell::RefCell,
    collections::VecDeque,
    io::{Read, Write},
    rc::Rc,
};

use uart_responder::communication::{ComResult, CommunicationError, LineHandle};

#[derive(Debug)]
pub enum ComEvent {
    /// The device sends the given line
    Device(&'static str),
    /// The responder shall write exactly these bytes
    Responder(Vec<u8>),
    /// The responder shall close the connection
    Close,
}

/// This communication handle checks every receive, send and close against the supplied
/// expected events. Reading past the last event reports a disconnect.
pub struct TestCom {
    expected_events: VecDeque<ComEvent>,
    pub closed: bool,
}

impl TestCom {
    pub fn new(events: Vec<ComEvent>) -> Self {
        Self { expected_events: events.into(), closed: false }
    }

    pub fn is_complete(&self) -> bool {
        self.expected_events.is_empty()
    }
}

impl LineHandle for TestCom {
    fn receive_line(&mut self) -> ComResult<String> {
        match self.expected_events.pop_front() {
            Some(ComEvent::Device(line)) => Ok(line.to_string()),
            None => Err(CommunicationError::Disconnected),
            Some(event) => panic!("Expected {event:?} instead of receive_line"),
        }
    }

    fn send_bytes(&mut self, bytes: &[u8]) -> ComResult<()> {
        match self.expected_events.pop_front() {
            Some(ComEvent::Responder(expected)) => assert_eq!(expected, bytes),
            event => panic!("Expected {event:?} instead of send_bytes({bytes:?})"),
        }
        Ok(())
    }

    fn close(&mut self) -> ComResult<()> {
        match self.expected_events.pop_front() {
            Some(ComEvent::Close) => self.closed = true,
            event => panic!("Expected {event:?} instead of close"),
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct PortState {
    pub to_read: VecDeque<u8>,
    pub written: Vec<u8>,
    pub dropped: bool,
}

/// A byte level stand-in for a serial port. The state is shared so it can be inspected after
/// the port was moved into (and dropped by) the command loop.
pub struct FakePort(pub Rc<RefCell<PortState>>);

impl FakePort {
    pub fn with_input(input: &[u8]) -> (Self, Rc<RefCell<PortState>>) {
        let state = Rc::new(RefCell::new(PortState {
            to_read: input.iter().copied().collect(),
            ..Default::default()
        }));
        (Self(state.clone()), state)
    }
}

impl Read for FakePort {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let mut state = self.0.borrow_mut();
        let n = buf.len().min(state.to_read.len());
        for (slot, byte) in buf.iter_mut().zip(state.to_read.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }
}

impl Write for FakePort {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().written.extend(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl Drop for FakePort {
    fn drop(&mut self) {
        self.0.borrow_mut().dropped = true;
    }
}
