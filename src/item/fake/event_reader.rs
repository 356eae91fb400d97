use std::{cell::Cell, fmt, ops::RangeInclusive};

use fake::{Dummy, Fake};
use log::trace;
use rand::{Rng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use crate::{
    BatchError,
    core::{
        item::{ItemReader, ItemReaderResult},
        random::RandomSource,
    },
};

use super::{
    mask::SkuMask,
    timestamp::{Clock, SystemClock, TimestampMode, format_event_time, generate_event_time},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    View,
    Like,
    Cart,
    Purchase,
}

impl EventType {
    pub const ALL: [EventType; 4] = [
        EventType::View,
        EventType::Like,
        EventType::Cart,
        EventType::Purchase,
    ];
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventType::View => "view",
            EventType::Like => "like",
            EventType::Cart => "cart",
            EventType::Purchase => "purchase",
        };
        f.write_str(name)
    }
}

/// One synthetic user event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub user_id: String,
    pub site_id: u32,
    pub event: EventType,
    pub sku: String,
    pub amount: u8,
    pub event_time: String,
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "user_id:{}, site_id:{}, event:{}, sku:{}, amount:{}, event_time:{}",
            self.user_id, self.site_id, self.event, self.sku, self.amount, self.event_time
        )
    }
}

/// Generators for every field of a [`Record`].
pub struct EventSchema {
    pub users: Vec<String>,
    pub sites: Vec<u32>,
    pub events: Vec<EventType>,
    pub sku_mask: SkuMask,
    pub amount: RangeInclusive<u8>,
    pub time_mode: TimestampMode,
    pub clock: Box<dyn Clock>,
}

impl Default for EventSchema {
    fn default() -> Self {
        Self {
            users: ["user-875", "user-190", "user-646", "user-033", "user-672"]
                .iter()
                .map(|user| user.to_string())
                .collect(),
            sites: vec![489, 715, 283],
            events: EventType::ALL.to_vec(),
            sku_mask: SkuMask::default(),
            amount: 1..=10,
            time_mode: TimestampMode::BeforeNow,
            clock: Box::new(SystemClock),
        }
    }
}

impl EventSchema {
    pub fn time_mode(mut self, time_mode: TimestampMode) -> Self {
        self.time_mode = time_mode;
        self
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Checks that every field can be generated.
    pub fn validate(&self) -> Result<(), BatchError> {
        let empty = |field: &str| {
            BatchError::Configuration(format!("choice set for '{field}' is empty"))
        };

        if self.users.is_empty() {
            return Err(empty("user_id"));
        }
        if self.sites.is_empty() {
            return Err(empty("site_id"));
        }
        if self.events.is_empty() {
            return Err(empty("event"));
        }
        if self.amount.is_empty() {
            return Err(BatchError::Configuration(format!(
                "amount range {}..={} is empty",
                self.amount.start(),
                self.amount.end()
            )));
        }
        Ok(())
    }
}

impl Dummy<EventSchema> for Record {
    fn dummy_with_rng<R: Rng + ?Sized>(schema: &EventSchema, rng: &mut R) -> Self {
        // Draw order is part of the output: a seed replays the same records.
        let user_id = schema.users.choose(rng).cloned().unwrap_or_default();
        let site_id = schema.sites.choose(rng).copied().unwrap_or_default();
        let event = schema.events.choose(rng).copied().unwrap_or(EventType::View);
        let sku = schema.sku_mask.expand(rng);
        let amount = rng.random_range(schema.amount.clone());
        let event_time = generate_event_time(rng, schema.clock.now(), schema.time_mode);

        Record {
            user_id,
            site_id,
            event,
            sku,
            amount,
            event_time: format_event_time(event_time),
        }
    }
}

/// Reader producing a fixed number of fake [`Record`]s.
pub struct EventReader<'a> {
    schema: EventSchema,
    random: &'a RandomSource,
    count: Cell<usize>,
}

impl ItemReader<Record> for EventReader<'_> {
    fn read(&self) -> ItemReaderResult<Record> {
        if self.count.get() == 0 {
            return Ok(None);
        }

        self.count.set(self.count.get() - 1);

        let record: Record = self.random.with_rng(|rng| self.schema.fake_with_rng(rng));
        trace!("Record: {}", record);
        Ok(Some(record))
    }
}

impl EventReader<'_> {
    /// Number of records still to be generated.
    pub fn remaining(&self) -> usize {
        self.count.get()
    }
}

#[derive(Default)]
pub struct EventReaderBuilder<'a> {
    number_of_items: usize,
    schema: Option<EventSchema>,
    random: Option<&'a RandomSource>,
}

impl<'a> EventReaderBuilder<'a> {
    pub fn new() -> EventReaderBuilder<'a> {
        EventReaderBuilder {
            number_of_items: 0,
            schema: None,
            random: None,
        }
    }

    pub fn number_of_items(mut self, number_of_items: usize) -> EventReaderBuilder<'a> {
        self.number_of_items = number_of_items;
        self
    }

    pub fn schema(mut self, schema: EventSchema) -> EventReaderBuilder<'a> {
        self.schema = Some(schema);
        self
    }

    pub fn random(mut self, random: &'a RandomSource) -> EventReaderBuilder<'a> {
        self.random = Some(random);
        self
    }

    /// Validates the schema before any record is generated.
    pub fn build(self) -> Result<EventReader<'a>, BatchError> {
        let schema = self.schema.unwrap_or_default();
        schema.validate()?;

        let random = self.random.ok_or_else(|| {
            BatchError::Configuration("event reader requires a random source".to_string())
        })?;

        Ok(EventReader {
            schema,
            random,
            count: Cell::new(self.number_of_items),
        })
    }
}
