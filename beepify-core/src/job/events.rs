//! Job events and their transport queue
//!
//! Single-producer single-consumer channel between the render worker and
//! the handle that polls it.

use crate::error::RenderError;
use crate::pipeline::RenderOutput;
use ringbuf::{HeapConsumer, HeapProducer, HeapRb};

/// Pipeline stages announced before each unit of work
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Frame layout and buffer setup
    Framing,
    /// Spectrogram computation
    Analysis,
    /// Tiled peak extraction
    PeakExtraction,
    /// Additive resynthesis
    Synthesis,
    /// Resource release before the terminal event
    Finalize,
}

impl Stage {
    /// All stages in execution order
    pub const ALL: [Stage; 5] = [
        Stage::Framing,
        Stage::Analysis,
        Stage::PeakExtraction,
        Stage::Synthesis,
        Stage::Finalize,
    ];

    /// Human-readable progress label
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Framing => "Preparing buffers",
            Stage::Analysis => "Computing spectrogram",
            Stage::PeakExtraction => "Extracting peaks",
            Stage::Synthesis => "Synthesizing tones",
            Stage::Finalize => "Releasing buffers",
        }
    }
}

/// Event emitted by a render worker
///
/// Progress events arrive in stage order with debug events interleaved;
/// every run ends with exactly one `Done` or `Failed`.
#[derive(Debug, Clone)]
pub enum JobEvent {
    /// The worker entered a new stage
    Progress(Stage),
    /// Informational message, safe to ignore
    Debug(String),
    /// The run finished; carries the output
    Done(RenderOutput),
    /// The run failed or was cancelled
    Failed(RenderError),
}

impl JobEvent {
    /// True for `Done` and `Failed`
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobEvent::Done(_) | JobEvent::Failed(_))
    }
}

/// Lock-free queue carrying job events worker to caller
pub struct EventQueue {
    producer: HeapProducer<JobEvent>,
    consumer: HeapConsumer<JobEvent>,
    capacity: usize,
}

impl EventQueue {
    /// Create a queue holding up to `capacity` undelivered events
    pub fn new(capacity: usize) -> Self {
        let rb = HeapRb::<JobEvent>::new(capacity);
        let (producer, consumer) = rb.split();

        Self {
            producer,
            consumer,
            capacity,
        }
    }

    /// Split into producer and consumer ends
    pub fn split(self) -> (EventProducer, EventConsumer) {
        (
            EventProducer {
                producer: self.producer,
            },
            EventConsumer {
                consumer: self.consumer,
                capacity: self.capacity,
            },
        )
    }
}

/// Producer end (worker side)
pub struct EventProducer {
    producer: HeapProducer<JobEvent>,
}

impl EventProducer {
    /// Enqueue one event
    ///
    /// # Returns
    /// The event back when the queue is full.
    pub fn send(&mut self, event: JobEvent) -> Result<(), JobEvent> {
        self.producer.push(event)
    }

    /// Number of free slots
    pub fn free_len(&self) -> usize {
        self.producer.free_len()
    }
}

/// Consumer end (handle side)
pub struct EventConsumer {
    consumer: HeapConsumer<JobEvent>,
    capacity: usize,
}

impl EventConsumer {
    /// Dequeue the oldest event, if any
    pub fn recv(&mut self) -> Option<JobEvent> {
        self.consumer.pop()
    }

    /// Number of undelivered events
    pub fn len(&self) -> usize {
        self.consumer.len()
    }

    /// True when no events are waiting
    pub fn is_empty(&self) -> bool {
        self.consumer.is_empty()
    }

    /// Queue capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
