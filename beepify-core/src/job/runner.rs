//! Background render jobs
//!
//! Runs the pipeline on a worker thread; the caller polls events off a
//! lock-free queue and can cancel cooperatively between stages.

use super::events::{EventConsumer, EventProducer, EventQueue, JobEvent, Stage};
use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::peaks::extract_peaks;
use crate::pipeline::RenderOutput;
use crate::signal::Signal;
use crate::spectrum::{compute_spectrogram, frame_count};
use crate::synth::synthesize;
use log::debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// A run emits fewer than a dozen events, so the queue never fills while
/// the handle is polling
const EVENT_QUEUE_CAPACITY: usize = 32;

/// Handle to one background render run
///
/// Submitting spawns a worker; the handle polls its events. Dropping the
/// handle cancels the run and joins the worker.
pub struct RenderJob {
    events: EventConsumer,
    cancel: Arc<AtomicBool>,
    worker: Option<thread::JoinHandle<()>>,
    finished: bool,
}

impl RenderJob {
    /// Start a render run on a worker thread
    ///
    /// # Arguments
    /// * `signal` - Input signal (moved; clones share the sample buffer)
    /// * `config` - Render parameters
    /// * `emit_spectrogram` - Include the spectrogram and peak list in `Done`
    pub fn submit(signal: Signal, config: RenderConfig, emit_spectrogram: bool) -> Self {
        let (producer, consumer) = EventQueue::new(EVENT_QUEUE_CAPACITY).split();
        let cancel = Arc::new(AtomicBool::new(false));

        let worker_cancel = Arc::clone(&cancel);
        let worker = thread::spawn(move || {
            run_worker(signal, config, emit_spectrogram, producer, worker_cancel);
        });

        Self {
            events: consumer,
            cancel,
            worker: Some(worker),
            finished: false,
        }
    }

    /// Take the next event without blocking
    ///
    /// Events come back in emission order. After the terminal event the
    /// queue stays empty.
    pub fn poll(&mut self) -> Option<JobEvent> {
        let event = self.events.recv();
        if let Some(ref received) = event {
            if received.is_terminal() {
                self.finished = true;
            }
        }
        event
    }

    /// Request cancellation
    ///
    /// The worker checks the flag between stages and ends the run with
    /// `Failed(Cancelled)`; work already in flight inside a stage completes
    /// first.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    /// True once a terminal event has been polled
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Block until the run ends, discarding progress and debug events
    pub fn wait(mut self) -> Result<RenderOutput, RenderError> {
        loop {
            match self.poll() {
                Some(JobEvent::Done(output)) => return Ok(output),
                Some(JobEvent::Failed(err)) => return Err(err),
                Some(_) => {}
                None => {
                    let worker_exited = self.worker.as_ref().map_or(true, |h| h.is_finished());
                    if worker_exited {
                        // Drain what arrived between the poll and the check
                        while let Some(event) = self.poll() {
                            match event {
                                JobEvent::Done(output) => return Ok(output),
                                JobEvent::Failed(err) => return Err(err),
                                _ => {}
                            }
                        }
                        return Err(RenderError::TransformFailure(
                            "Render worker exited without a result".to_string(),
                        ));
                    }
                    thread::sleep(Duration::from_millis(1));
                }
            }
        }
    }
}

impl Drop for RenderJob {
    fn drop(&mut self) {
        self.cancel.store(true, Ordering::SeqCst);
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }
}

fn run_worker(
    signal: Signal,
    config: RenderConfig,
    emit_spectrogram: bool,
    mut events: EventProducer,
    cancel: Arc<AtomicBool>,
) {
    let result = run_stages(&signal, &config, emit_spectrogram, &mut events, &cancel);
    let terminal = match result {
        Ok(output) => JobEvent::Done(output),
        Err(err) => JobEvent::Failed(err),
    };
    push_event(&mut events, &cancel, terminal);
}

fn run_stages(
    signal: &Signal,
    config: &RenderConfig,
    emit_spectrogram: bool,
    events: &mut EventProducer,
    cancel: &AtomicBool,
) -> Result<RenderOutput, RenderError> {
    config.validate()?;

    enter_stage(events, cancel, Stage::Framing)?;
    let num_frames = frame_count(signal.len(), config.window_len, config.hop_len);
    if num_frames == 0 {
        return Err(RenderError::InsufficientSignal {
            needed: config.window_len,
            got: signal.len(),
        });
    }
    push_event(
        events,
        cancel,
        JobEvent::Debug(format!(
            "{} frames of {} samples, hop {}",
            num_frames, config.window_len, config.hop_len
        )),
    );

    enter_stage(events, cancel, Stage::Analysis)?;
    let spectrogram = compute_spectrogram(signal, config)?;

    enter_stage(events, cancel, Stage::PeakExtraction)?;
    let peaks = extract_peaks(&spectrogram, config.time_win, config.freq_win);
    push_event(
        events,
        cancel,
        JobEvent::Debug(format!("{} peaks", peaks.len())),
    );

    enter_stage(events, cancel, Stage::Synthesis)?;
    let waveform = synthesize(&peaks, config, signal.sample_rate(), signal.len())?;

    enter_stage(events, cancel, Stage::Finalize)?;
    let (spectrogram, peaks) = if emit_spectrogram {
        (Some(spectrogram), Some(peaks))
    } else {
        (None, None)
    };

    Ok(RenderOutput {
        waveform,
        sample_rate: signal.sample_rate(),
        spectrogram,
        peaks,
    })
}

/// Check for cancellation, then announce the stage
fn enter_stage(
    events: &mut EventProducer,
    cancel: &AtomicBool,
    stage: Stage,
) -> Result<(), RenderError> {
    if cancel.load(Ordering::SeqCst) {
        return Err(RenderError::Cancelled);
    }
    debug!("{}", stage.label());
    push_event(events, cancel, JobEvent::Progress(stage));
    Ok(())
}

/// Push an event, yielding while the queue is full
///
/// Gives the event up when cancellation is set and the queue stays full;
/// that only happens once the handle has stopped polling, so nothing is
/// listening for it anyway.
fn push_event(events: &mut EventProducer, cancel: &AtomicBool, event: JobEvent) {
    let mut pending = event;
    loop {
        match events.send(pending) {
            Ok(()) => return,
            Err(rejected) => {
                if cancel.load(Ordering::SeqCst) {
                    return;
                }
                pending = rejected;
                thread::yield_now();
            }
        }
    }
}
