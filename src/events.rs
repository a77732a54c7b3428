//! Per-surface event queues and the tag-driven wire format.
//!
//! Host events are flattened into a stream of scalars: a tag followed by a
//! fixed number of fields whose count and types are implied by the tag. The
//! stream carries no lengths or framing, so the module must read exactly
//! [`EventTag::arity`] fields after each tag. Reading too few or too many
//! corrupts everything after that point.
//!
//! The module drains a queue one scalar per `shift`/`shiftFloat` call. An
//! empty queue answers `0` (no tag) or `NaN`.

use crate::config::OverflowPolicy;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::warn;

/// Value returned by `shift` when the queue is empty
pub const EMPTY_TAG: i32 = 0;

/// One value in the flat stream
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    /// Integer field or tag
    Int(i32),
    /// Floating-point field
    Float(f32),
}

impl Scalar {
    /// Value as read through the integer channel (floats truncate)
    pub fn as_i32(self) -> i32 {
        match self {
            Scalar::Int(v) => v,
            Scalar::Float(v) => v as i32,
        }
    }

    /// Value as read through the float channel
    pub fn as_f32(self) -> f32 {
        match self {
            Scalar::Int(v) => v as f32,
            Scalar::Float(v) => v,
        }
    }
}

/// Type of one record field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Read with `shift`
    Int,
    /// Read with `shiftFloat`
    Float,
}

/// Record tags agreed with the module
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventTag {
    /// Surface gained focus
    Focused = 1,
    /// Surface lost focus
    Unfocused = 2,
    /// Surface became visible; also the first record of every surface
    Visible = 3,
    /// Surface became hidden
    Hidden = 4,
    /// End of a geometry update
    Draw = 5,
    /// Display mode: 0 normal, 2 fullscreen
    Mode = 6,
    /// Logical size
    Size = 7,
    /// Size in device pixels
    Framebuffer = 8,
    /// Device pixel ratio
    Scale = 9,
    /// Committed text, one code point
    Char = 10,
    /// Composition preview restarted
    PreviewReset = 11,
    /// Composition preview text, one code point
    PreviewChar = 12,
    /// Key or mouse button pressed
    ButtonPress = 14,
    /// Key auto-repeat
    ButtonRepeat = 15,
    /// Key or mouse button released
    ButtonRelease = 16,
    /// Absolute pointer position
    Mouse = 17,
    /// Pointer motion while locked
    MouseRelative = 18,
    /// Vertical wheel delta
    ScrollVertical = 19,
    /// Horizontal wheel delta
    ScrollHorizontal = 20,
}

impl EventTag {
    /// Every tag, in numeric order
    pub const ALL: [EventTag; 19] = [
        EventTag::Focused,
        EventTag::Unfocused,
        EventTag::Visible,
        EventTag::Hidden,
        EventTag::Draw,
        EventTag::Mode,
        EventTag::Size,
        EventTag::Framebuffer,
        EventTag::Scale,
        EventTag::Char,
        EventTag::PreviewReset,
        EventTag::PreviewChar,
        EventTag::ButtonPress,
        EventTag::ButtonRepeat,
        EventTag::ButtonRelease,
        EventTag::Mouse,
        EventTag::MouseRelative,
        EventTag::ScrollVertical,
        EventTag::ScrollHorizontal,
    ];

    /// Field types following the tag, in order
    pub fn fields(self) -> &'static [FieldKind] {
        use FieldKind::{Float, Int};
        match self {
            EventTag::Focused
            | EventTag::Unfocused
            | EventTag::Visible
            | EventTag::Hidden
            | EventTag::Draw
            | EventTag::PreviewReset => &[],
            EventTag::Mode
            | EventTag::Char
            | EventTag::PreviewChar
            | EventTag::ButtonPress
            | EventTag::ButtonRepeat
            | EventTag::ButtonRelease => &[Int],
            EventTag::Size
            | EventTag::Framebuffer
            | EventTag::Mouse
            | EventTag::MouseRelative => &[Int, Int],
            EventTag::Scale | EventTag::ScrollVertical | EventTag::ScrollHorizontal => &[Float],
        }
    }

    /// Number of fields following the tag
    pub fn arity(self) -> usize {
        self.fields().len()
    }

    /// Tag for a raw stream value
    pub fn from_raw(raw: i32) -> Option<Self> {
        Self::ALL.iter().copied().find(|tag| *tag as i32 == raw)
    }
}

/// A typed event record
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventRecord {
    /// Surface gained focus
    Focused,
    /// Surface lost focus
    Unfocused,
    /// Surface became visible
    Visible,
    /// Surface became hidden
    Hidden,
    /// End of a geometry update
    Draw,
    /// Display mode changed
    Mode(i32),
    /// Logical size
    Size {
        /// Width in logical pixels
        width: i32,
        /// Height in logical pixels
        height: i32,
    },
    /// Size in device pixels
    Framebuffer {
        /// Width in device pixels
        width: i32,
        /// Height in device pixels
        height: i32,
    },
    /// Device pixel ratio
    Scale(f32),
    /// Committed code point
    Char(i32),
    /// Composition preview restarted
    PreviewReset,
    /// Composition preview code point
    PreviewChar(i32),
    /// Button id pressed
    ButtonPress(i32),
    /// Button id repeated
    ButtonRepeat(i32),
    /// Button id released
    ButtonRelease(i32),
    /// Absolute pointer position
    Mouse {
        /// Horizontal offset within the surface
        x: i32,
        /// Vertical offset within the surface
        y: i32,
    },
    /// Relative pointer motion
    MouseRelative {
        /// Horizontal delta
        dx: i32,
        /// Vertical delta
        dy: i32,
    },
    /// Vertical wheel delta
    ScrollVertical(f32),
    /// Horizontal wheel delta
    ScrollHorizontal(f32),
}

impl EventRecord {
    /// Tag that leads this record
    pub fn tag(&self) -> EventTag {
        match self {
            EventRecord::Focused => EventTag::Focused,
            EventRecord::Unfocused => EventTag::Unfocused,
            EventRecord::Visible => EventTag::Visible,
            EventRecord::Hidden => EventTag::Hidden,
            EventRecord::Draw => EventTag::Draw,
            EventRecord::Mode(_) => EventTag::Mode,
            EventRecord::Size { .. } => EventTag::Size,
            EventRecord::Framebuffer { .. } => EventTag::Framebuffer,
            EventRecord::Scale(_) => EventTag::Scale,
            EventRecord::Char(_) => EventTag::Char,
            EventRecord::PreviewReset => EventTag::PreviewReset,
            EventRecord::PreviewChar(_) => EventTag::PreviewChar,
            EventRecord::ButtonPress(_) => EventTag::ButtonPress,
            EventRecord::ButtonRepeat(_) => EventTag::ButtonRepeat,
            EventRecord::ButtonRelease(_) => EventTag::ButtonRelease,
            EventRecord::Mouse { .. } => EventTag::Mouse,
            EventRecord::MouseRelative { .. } => EventTag::MouseRelative,
            EventRecord::ScrollVertical(_) => EventTag::ScrollVertical,
            EventRecord::ScrollHorizontal(_) => EventTag::ScrollHorizontal,
        }
    }

    /// Scalars this record occupies, tag included
    pub fn len(&self) -> usize {
        1 + self.tag().arity()
    }

    /// Append tag then fields
    fn encode_into(&self, out: &mut VecDeque<Scalar>) {
        out.push_back(Scalar::Int(self.tag() as i32));
        match *self {
            EventRecord::Mode(v)
            | EventRecord::Char(v)
            | EventRecord::PreviewChar(v)
            | EventRecord::ButtonPress(v)
            | EventRecord::ButtonRepeat(v)
            | EventRecord::ButtonRelease(v) => out.push_back(Scalar::Int(v)),
            EventRecord::Size { width, height } | EventRecord::Framebuffer { width, height } => {
                out.push_back(Scalar::Int(width));
                out.push_back(Scalar::Int(height));
            }
            EventRecord::Mouse { x, y } => {
                out.push_back(Scalar::Int(x));
                out.push_back(Scalar::Int(y));
            }
            EventRecord::MouseRelative { dx, dy } => {
                out.push_back(Scalar::Int(dx));
                out.push_back(Scalar::Int(dy));
            }
            EventRecord::Scale(v)
            | EventRecord::ScrollVertical(v)
            | EventRecord::ScrollHorizontal(v) => out.push_back(Scalar::Float(v)),
            EventRecord::Focused
            | EventRecord::Unfocused
            | EventRecord::Visible
            | EventRecord::Hidden
            | EventRecord::Draw
            | EventRecord::PreviewReset => {}
        }
    }

    /// Rebuild a record from a tag and its already-read fields
    pub fn decode(tag: EventTag, fields: &[Scalar]) -> Option<Self> {
        if fields.len() != tag.arity() {
            return None;
        }
        let int = |i: usize| fields[i].as_i32();
        let float = |i: usize| fields[i].as_f32();
        Some(match tag {
            EventTag::Focused => EventRecord::Focused,
            EventTag::Unfocused => EventRecord::Unfocused,
            EventTag::Visible => EventRecord::Visible,
            EventTag::Hidden => EventRecord::Hidden,
            EventTag::Draw => EventRecord::Draw,
            EventTag::Mode => EventRecord::Mode(int(0)),
            EventTag::Size => EventRecord::Size {
                width: int(0),
                height: int(1),
            },
            EventTag::Framebuffer => EventRecord::Framebuffer {
                width: int(0),
                height: int(1),
            },
            EventTag::Scale => EventRecord::Scale(float(0)),
            EventTag::Char => EventRecord::Char(int(0)),
            EventTag::PreviewReset => EventRecord::PreviewReset,
            EventTag::PreviewChar => EventRecord::PreviewChar(int(0)),
            EventTag::ButtonPress => EventRecord::ButtonPress(int(0)),
            EventTag::ButtonRepeat => EventRecord::ButtonRepeat(int(0)),
            EventTag::ButtonRelease => EventRecord::ButtonRelease(int(0)),
            EventTag::Mouse => EventRecord::Mouse {
                x: int(0),
                y: int(1),
            },
            EventTag::MouseRelative => EventRecord::MouseRelative {
                dx: int(0),
                dy: int(1),
            },
            EventTag::ScrollVertical => EventRecord::ScrollVertical(float(0)),
            EventTag::ScrollHorizontal => EventRecord::ScrollHorizontal(float(0)),
        })
    }
}

/// Counters kept by one queue
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueStats {
    /// Records accepted
    pub pushed_records: u64,
    /// Records discarded by the overflow policy
    pub dropped_records: u64,
    /// Scalars handed to the module
    pub shifted_scalars: u64,
}

/// Records queued together; the cap keeps or drops them as a whole
#[derive(Debug, Clone, Copy)]
struct Group {
    scalars: usize,
    records: usize,
}

/// FIFO of encoded event records
#[derive(Debug)]
pub struct EventQueue {
    /// Flat stream, oldest first
    scalars: VecDeque<Scalar>,
    /// Groups still (partly) queued, oldest first
    groups: VecDeque<Group>,
    /// Scalars of the front group already shifted
    front_consumed: usize,
    /// Cap on `scalars.len()`
    limit: Option<usize>,
    policy: OverflowPolicy,
    stats: QueueStats,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl EventQueue {
    /// Create an unbounded queue
    pub fn new() -> Self {
        Self {
            scalars: VecDeque::new(),
            groups: VecDeque::new(),
            front_consumed: 0,
            limit: None,
            policy: OverflowPolicy::default(),
            stats: QueueStats::default(),
        }
    }

    /// Create a queue holding at most `limit` scalars
    pub fn bounded(limit: Option<usize>, policy: OverflowPolicy) -> Self {
        Self {
            limit,
            policy,
            ..Self::new()
        }
    }

    /// Append a record: tag first, then its fields.
    ///
    /// Returns `false` if the overflow policy discarded the record.
    pub fn push(&mut self, record: EventRecord) -> bool {
        self.push_group(std::slice::from_ref(&record))
    }

    /// Append records that only make sense together, such as the four
    /// records of one resize.
    ///
    /// Under a cap the group is queued whole or not at all, and
    /// [`OverflowPolicy::DropOldest`] later evicts it whole.
    pub fn push_group(&mut self, records: &[EventRecord]) -> bool {
        let Some(first) = records.first() else {
            return true;
        };
        let len: usize = records.iter().map(EventRecord::len).sum();
        if let Some(limit) = self.limit {
            if !self.make_room(len, limit) {
                self.stats.dropped_records += records.len() as u64;
                warn!(
                    tag = ?first.tag(),
                    records = records.len(),
                    queued = self.scalars.len(),
                    limit,
                    policy = ?self.policy,
                    "Event queue full, discarding incoming records"
                );
                return false;
            }
        }

        for record in records {
            record.encode_into(&mut self.scalars);
        }
        self.groups.push_back(Group {
            scalars: len,
            records: records.len(),
        });
        self.stats.pushed_records += records.len() as u64;
        true
    }

    /// Append several independent records in order
    pub fn extend(&mut self, records: impl IntoIterator<Item = EventRecord>) {
        for record in records {
            self.push(record);
        }
    }

    fn make_room(&mut self, incoming: usize, limit: usize) -> bool {
        if incoming > limit {
            return false;
        }
        while self.scalars.len() + incoming > limit {
            if self.policy == OverflowPolicy::DropNewest {
                return false;
            }
            // The front group may be half read; it has to stay.
            let index = usize::from(self.front_consumed > 0);
            let Some(&victim) = self.groups.get(index) else {
                return false;
            };
            let start = match index {
                0 => 0,
                _ => self.groups[0].scalars - self.front_consumed,
            };
            self.scalars.drain(start..start + victim.scalars);
            self.groups.remove(index);
            self.stats.dropped_records += victim.records as u64;
            warn!(limit, records = victim.records, "Event queue full, dropped oldest unread records");
        }
        true
    }

    /// Remove and return the oldest scalar
    pub fn shift(&mut self) -> Option<Scalar> {
        let scalar = self.scalars.pop_front()?;
        self.stats.shifted_scalars += 1;
        self.front_consumed += 1;
        if self.groups.front().map(|group| group.scalars) == Some(self.front_consumed) {
            self.groups.pop_front();
            self.front_consumed = 0;
        }
        Some(scalar)
    }

    /// `shift` through the integer channel; [`EMPTY_TAG`] when empty
    pub fn shift_int(&mut self) -> i32 {
        self.shift().map_or(EMPTY_TAG, Scalar::as_i32)
    }

    /// `shift` through the float channel; `NaN` when empty
    pub fn shift_float(&mut self) -> f32 {
        self.shift().map_or(f32::NAN, Scalar::as_f32)
    }

    /// Read one whole record the way a well-behaved module does
    pub fn shift_record(&mut self) -> Option<EventRecord> {
        let tag = EventTag::from_raw(self.shift()?.as_i32())?;
        let fields: Vec<Scalar> = tag
            .fields()
            .iter()
            .map(|kind| match kind {
                FieldKind::Int => Scalar::Int(self.shift_int()),
                FieldKind::Float => Scalar::Float(self.shift_float()),
            })
            .collect();
        EventRecord::decode(tag, &fields)
    }

    /// Drain every complete record
    pub fn drain_records(&mut self) -> Vec<EventRecord> {
        std::iter::from_fn(|| self.shift_record()).collect()
    }

    /// Scalars waiting to be shifted
    pub fn len(&self) -> usize {
        self.scalars.len()
    }

    /// Whether nothing is waiting
    pub fn is_empty(&self) -> bool {
        self.scalars.is_empty()
    }

    /// Groups with at least one scalar still queued; a lone record is a
    /// group of one
    pub fn pending_groups(&self) -> usize {
        self.groups.len()
    }

    /// Queue counters
    pub fn stats(&self) -> QueueStats {
        self.stats
    }
}
