#![allow(dead_code)]

use std::{
    collections::VecDeque,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use deskpilot::{
    Result,
    error::{input_error::InputError, oracle_error::OracleError},
    grounding::{Detector, ElementCatalog, PointerModel},
    input::{InputBackend, KeyCode, MouseButton, Press, ScrollAxis, Screenshot},
    message::{Message, ToolCall},
    oracle::{Oracle, OutputSchema},
    tools::ToolInfo,
};
use serde_json::Value;

pub const SCREEN: (u32, u32) = (1920, 1080);

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Move(i32, i32),
    Button(MouseButton, Press),
    Scroll(ScrollAxis, i32),
    Key(KeyCode, Press),
    Capture,
}

/// Backend that records every injected event instead of touching the OS.
#[derive(Clone)]
pub struct RecordingBackend {
    pub events: Arc<Mutex<Vec<Event>>>,
    pub size: (u32, u32),
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
            size: SCREEN,
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn key_events(&self) -> Vec<(KeyCode, Press)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Key(code, press) => Some((code, press)),
                _ => None,
            })
            .collect()
    }

    pub fn captures(&self) -> usize {
        self.events().iter().filter(|e| **e == Event::Capture).count()
    }

    fn record(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

impl InputBackend for RecordingBackend {
    fn screen_size(&mut self) -> std::result::Result<(u32, u32), InputError> {
        Ok(self.size)
    }

    fn capture(&mut self) -> std::result::Result<Screenshot, InputError> {
        self.record(Event::Capture);
        Ok(Screenshot::blank(self.size.0, self.size.1))
    }

    fn move_pointer(&mut self, x: i32, y: i32) -> std::result::Result<(), InputError> {
        self.record(Event::Move(x, y));
        Ok(())
    }

    fn button(&mut self, button: MouseButton, press: Press) -> std::result::Result<(), InputError> {
        self.record(Event::Button(button, press));
        Ok(())
    }

    fn scroll(&mut self, axis: ScrollAxis, delta: i32) -> std::result::Result<(), InputError> {
        self.record(Event::Scroll(axis, delta));
        Ok(())
    }

    fn key(&mut self, code: KeyCode, press: Press) -> std::result::Result<(), InputError> {
        self.record(Event::Key(code, press));
        Ok(())
    }
}

/// Oracle replaying canned replies and recording what it was sent.
#[derive(Default)]
pub struct ScriptedOracle {
    chat_replies: Mutex<VecDeque<Message>>,
    structured_replies: Mutex<VecDeque<std::result::Result<Value, OracleError>>>,
    pub chat_requests: Mutex<Vec<Vec<Message>>>,
    pub structured_requests: Mutex<Vec<&'static str>>,
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then_chat(self, reply: Message) -> Self {
        self.chat_replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn then_structured(self, reply: Value) -> Self {
        self.structured_replies.lock().unwrap().push_back(Ok(reply));
        self
    }

    pub fn then_structured_error(self, err: OracleError) -> Self {
        self.structured_replies.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn chat_calls(&self) -> usize {
        self.chat_requests.lock().unwrap().len()
    }

    pub fn structured_calls(&self) -> Vec<&'static str> {
        self.structured_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Oracle for ScriptedOracle {
    async fn chat(
        &self,
        messages: &[Message],
        _tools: &[ToolInfo],
    ) -> std::result::Result<Message, OracleError> {
        self.chat_requests.lock().unwrap().push(messages.to_vec());
        let reply = self.chat_replies.lock().unwrap().pop_front();
        Ok(reply.unwrap_or_else(|| Message::assistant("finished", Vec::new())))
    }

    async fn structured(
        &self,
        _messages: &[Message],
        schema: &OutputSchema,
    ) -> std::result::Result<Value, OracleError> {
        self.structured_requests.lock().unwrap().push(schema.name);
        self.structured_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(OracleError::InvalidResponse("script exhausted".into())))
    }
}

pub fn tool_reply(calls: Vec<ToolCall>) -> Message {
    Message::assistant("", calls)
}

pub fn text_reply(text: &str) -> Message {
    Message::assistant(text, Vec::new())
}

/// Detector returning the same catalog every time.
pub struct ScriptedDetector {
    pub catalog: ElementCatalog,
    pub calls: Arc<AtomicUsize>,
}

impl ScriptedDetector {
    pub fn new(catalog: ElementCatalog) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                catalog,
                calls: calls.clone(),
            },
            calls,
        )
    }
}

#[async_trait]
impl Detector for ScriptedDetector {
    async fn detect(&self, _screenshot: &Screenshot) -> Result<ElementCatalog> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.catalog.clone())
    }
}

pub struct FixedPointer(pub Vec<(f64, f64)>);

#[async_trait]
impl PointerModel for FixedPointer {
    async fn locate(&self, _screenshot: &Screenshot, _reference: &str) -> Result<Vec<(f64, f64)>> {
        Ok(self.0.clone())
    }
}
