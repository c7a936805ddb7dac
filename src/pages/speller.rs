//! Gesture-speller page — reads fingerspelled letters and submits completed
//! words to the chat model.
//!
//! # State machine
//!
//! ```text
//! Accumulating ──accepted letter──────────────▶ Accumulating  (append)
//! Accumulating ──terminator after terminator──▶ Complete      (submit)
//! Complete ──new round───────────────────────▶ Accumulating  (reset, empty)
//! ```
//!
//! A letter is accepted when its detection confidence is strictly above the
//! speller threshold.  The round ends when the terminator gesture is seen
//! twice in a row; the accumulated sequence minus its trailing terminator is
//! submitted as a chat prompt.  After each appended letter the loop pauses
//! for the configured inter-letter delay so the same gesture is not read
//! twice.

use std::cmp::Ordering;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::scheduler::{Page, PageContext, PageError, PageId};

// ---------------------------------------------------------------------------
// SpellerState / SpellerAction
// ---------------------------------------------------------------------------

/// Phase of the current spelling round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpellerState {
    /// Collecting letters (default).
    Accumulating,
    /// The round's word has been submitted.
    Complete,
}

/// What a single accepted gesture did to the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpellerAction {
    /// The letter was appended; `sequence` is the full accumulation so far.
    Appended {
        /// Accumulated letters, terminators included.
        sequence: String,
    },
    /// A doubled terminator ended the round.
    Submitted {
        /// The accumulated word, trailing terminator stripped.
        word: String,
        /// Prompt to hand to the chat gateway.
        prompt: String,
    },
}

// ---------------------------------------------------------------------------
// SpellerMachine
// ---------------------------------------------------------------------------

/// Pure spelling state machine, independent of capture and network.
#[derive(Debug)]
pub struct SpellerMachine {
    terminator: String,
    letters: Vec<String>,
    last_label: Option<String>,
    state: SpellerState,
}

impl SpellerMachine {
    /// Start a machine with an empty sequence in `Accumulating`.
    pub fn new(terminator: &str) -> Self {
        Self {
            terminator: terminator.to_string(),
            letters: Vec::new(),
            last_label: None,
            state: SpellerState::Accumulating,
        }
    }

    /// Current phase.
    pub fn state(&self) -> SpellerState {
        self.state
    }

    /// The accumulated sequence, terminators included.
    pub fn sequence(&self) -> String {
        self.letters.concat()
    }

    /// Begin a new round: empty sequence, `Accumulating`.
    pub fn reset(&mut self) {
        self.letters.clear();
        self.last_label = None;
        self.state = SpellerState::Accumulating;
    }

    /// Feed one accepted gesture label into the machine.
    ///
    /// Observing a label while `Complete` implicitly starts a new round.
    pub fn observe(&mut self, label: &str) -> SpellerAction {
        if self.state == SpellerState::Complete {
            self.reset();
        }

        if label == self.terminator && self.last_label.as_deref() == Some(&self.terminator) {
            // Doubled terminator: strip the trailing one and submit.
            self.letters.pop();
            let word = self.letters.concat();
            let prompt = format!(
                "Give a short friendly reply about the word spelled by the letters {word}"
            );
            self.state = SpellerState::Complete;
            self.last_label = None;
            return SpellerAction::Submitted { word, prompt };
        }

        self.letters.push(label.to_string());
        self.last_label = Some(label.to_string());
        SpellerAction::Appended {
            sequence: self.sequence(),
        }
    }
}

// ---------------------------------------------------------------------------
// GestureSpellerPage
// ---------------------------------------------------------------------------

/// The speller's polling loop: frame → detect → feed the machine.
pub struct GestureSpellerPage;

#[async_trait]
impl Page for GestureSpellerPage {
    fn id(&self) -> PageId {
        PageId::GestureSpeller
    }

    async fn run(&self, ctx: PageContext, cancel: CancellationToken) -> Result<(), PageError> {
        let cfg = ctx.config.speller.clone();
        let (width, height) = (ctx.config.capture.frame_width, ctx.config.capture.frame_height);
        let idle = Duration::from_millis(ctx.config.scheduler.detector_poll_ms);
        let letter_pause = Duration::from_millis(cfg.inter_letter_delay_ms);

        let mut machine = SpellerMachine::new(&cfg.terminator);
        ctx.sink.status(&format!(
            "spell letters; show {} twice to submit",
            cfg.terminator
        ));

        loop {
            if cancel.is_cancelled() {
                return Ok(());
            }

            let frame = tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                res = ctx.capture.next_frame(width, height) => res?,
            };

            let detections = tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                res = ctx.gateway.detect_objects(&frame) => res?,
            };

            // Highest-confidence gesture above the threshold, if any.
            let best = detections
                .into_iter()
                .filter(|d| d.accepted(cfg.confidence_threshold))
                .max_by(|a, b| {
                    a.confidence
                        .partial_cmp(&b.confidence)
                        .unwrap_or(Ordering::Equal)
                });

            let Some(gesture) = best else {
                tokio::select! {
                    _ = cancel.cancelled() => return Ok(()),
                    _ = tokio::time::sleep(idle) => continue,
                }
            };

            match machine.observe(&gesture.label) {
                SpellerAction::Appended { sequence } => {
                    ctx.sink.status(&format!("letters: {sequence}"));
                    tokio::select! {
                        _ = cancel.cancelled() => return Ok(()),
                        _ = tokio::time::sleep(letter_pause) => {}
                    }
                }
                SpellerAction::Submitted { word, prompt } => {
                    ctx.sink.status(&format!("submitting: {word}"));

                    let answer = tokio::select! {
                        _ = cancel.cancelled() => return Ok(()),
                        res = ctx.gateway.chat_complete(&prompt) => res?,
                    };

                    ctx.sink.status(&answer);
                    machine.reset();
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
