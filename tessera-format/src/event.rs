//! Structural events as data, and a consumer that records them.

use std::borrow::Cow;

use crate::{Consumer, EventError};

/// One structural event.
#[derive(Debug, Clone, PartialEq)]
pub enum Event<'de> {
    /// `null`
    Null,
    /// A boolean
    Boolean(bool),
    /// A signed integer
    I64(i64),
    /// An unsigned integer
    U64(u64),
    /// A double
    F64(f64),
    /// A text string
    String(Cow<'de, str>),
    /// A byte string
    Binary(Cow<'de, [u8]>),
    /// Start of an array, with an optional size hint
    BeginArray(Option<usize>),
    /// End of an array element
    Element,
    /// End of an array, with an optional size hint
    EndArray(Option<usize>),
    /// Start of an object, with an optional size hint
    BeginObject(Option<usize>),
    /// Key of an object member
    Key(Cow<'de, str>),
    /// End of an object member
    Member,
    /// End of an object, with an optional size hint
    EndObject(Option<usize>),
}

impl<'de> Event<'de> {
    /// Deliver this event to `consumer`.
    pub fn feed<C: Consumer<'de> + ?Sized>(self, consumer: &mut C) -> Result<(), EventError> {
        match self {
            Event::Null => consumer.null(),
            Event::Boolean(v) => consumer.boolean(v),
            Event::I64(v) => consumer.number_i64(v),
            Event::U64(v) => consumer.number_u64(v),
            Event::F64(v) => consumer.number_f64(v),
            Event::String(v) => consumer.string(v),
            Event::Binary(v) => consumer.binary(v),
            Event::BeginArray(n) => consumer.begin_array(n),
            Event::Element => consumer.element(),
            Event::EndArray(n) => consumer.end_array(n),
            Event::BeginObject(n) => consumer.begin_object(n),
            Event::Key(v) => consumer.key(v),
            Event::Member => consumer.member(),
            Event::EndObject(n) => consumer.end_object(n),
        }
    }

    /// Short name of the event, as used in diagnostics.
    pub const fn name(&self) -> &'static str {
        match self {
            Event::Null => "null",
            Event::Boolean(_) => "boolean",
            Event::I64(_) => "i64",
            Event::U64(_) => "u64",
            Event::F64(_) => "f64",
            Event::String(_) => "string",
            Event::Binary(_) => "binary",
            Event::BeginArray(_) => "begin_array",
            Event::Element => "element",
            Event::EndArray(_) => "end_array",
            Event::BeginObject(_) => "begin_object",
            Event::Key(_) => "key",
            Event::Member => "member",
            Event::EndObject(_) => "end_object",
        }
    }

    /// Detach the event from the input it borrows from.
    pub fn into_owned(self) -> Event<'static> {
        match self {
            Event::String(v) => Event::String(Cow::Owned(v.into_owned())),
            Event::Binary(v) => Event::Binary(Cow::Owned(v.into_owned())),
            Event::Key(v) => Event::Key(Cow::Owned(v.into_owned())),
            Event::Null => Event::Null,
            Event::Boolean(v) => Event::Boolean(v),
            Event::I64(v) => Event::I64(v),
            Event::U64(v) => Event::U64(v),
            Event::F64(v) => Event::F64(v),
            Event::BeginArray(n) => Event::BeginArray(n),
            Event::Element => Event::Element,
            Event::EndArray(n) => Event::EndArray(n),
            Event::BeginObject(n) => Event::BeginObject(n),
            Event::Member => Event::Member,
            Event::EndObject(n) => Event::EndObject(n),
        }
    }
}

/// Consumer that stores every event it receives, for later replay.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recorder<'de> {
    events: Vec<Event<'de>>,
}

impl<'de> Recorder<'de> {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Recorder { events: Vec::new() }
    }

    /// The recorded events.
    pub fn events(&self) -> &[Event<'de>] {
        &self.events
    }

    /// Consume the recorder, returning its events.
    pub fn into_events(self) -> Vec<Event<'de>> {
        self.events
    }

    /// Feed the recorded events, in order, to another consumer.
    pub fn replay<C: Consumer<'de> + ?Sized>(&self, consumer: &mut C) -> Result<(), EventError> {
        for event in &self.events {
            event.clone().feed(consumer)?;
        }
        Ok(())
    }
}

impl<'de> Consumer<'de> for Recorder<'de> {
    fn null(&mut self) -> Result<(), EventError> {
        self.events.push(Event::Null);
        Ok(())
    }

    fn boolean(&mut self, v: bool) -> Result<(), EventError> {
        self.events.push(Event::Boolean(v));
        Ok(())
    }

    fn number_i64(&mut self, v: i64) -> Result<(), EventError> {
        self.events.push(Event::I64(v));
        Ok(())
    }

    fn number_u64(&mut self, v: u64) -> Result<(), EventError> {
        self.events.push(Event::U64(v));
        Ok(())
    }

    fn number_f64(&mut self, v: f64) -> Result<(), EventError> {
        self.events.push(Event::F64(v));
        Ok(())
    }

    fn string(&mut self, v: Cow<'de, str>) -> Result<(), EventError> {
        self.events.push(Event::String(v));
        Ok(())
    }

    fn binary(&mut self, v: Cow<'de, [u8]>) -> Result<(), EventError> {
        self.events.push(Event::Binary(v));
        Ok(())
    }

    fn begin_array(&mut self, size: Option<usize>) -> Result<(), EventError> {
        self.events.push(Event::BeginArray(size));
        Ok(())
    }

    fn element(&mut self) -> Result<(), EventError> {
        self.events.push(Event::Element);
        Ok(())
    }

    fn end_array(&mut self, size: Option<usize>) -> Result<(), EventError> {
        self.events.push(Event::EndArray(size));
        Ok(())
    }

    fn begin_object(&mut self, size: Option<usize>) -> Result<(), EventError> {
        self.events.push(Event::BeginObject(size));
        Ok(())
    }

    fn key(&mut self, v: Cow<'de, str>) -> Result<(), EventError> {
        self.events.push(Event::Key(v));
        Ok(())
    }

    fn member(&mut self) -> Result<(), EventError> {
        self.events.push(Event::Member);
        Ok(())
    }

    fn end_object(&mut self, size: Option<usize>) -> Result<(), EventError> {
        self.events.push(Event::EndObject(size));
        Ok(())
    }
}
