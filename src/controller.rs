use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::client::StudioClient;
use crate::config::ControllerConfig;
use crate::error::Result;
use crate::models::{GenerationRequest, GenerationResult, ImageData, ProgressState};
use crate::progress::ProgressSimulator;

/// The display surface a controller drives. Implementations own the region
/// they render into; two controllers never share one sink.
pub trait DisplaySink: Send + Sync {
    /// Enable/disable the trigger control.
    fn set_busy(&self, busy: bool);
    /// Publish a progress snapshot.
    fn set_progress(&self, state: &ProgressState);
    /// Render a result image. Failing to display it is a render error, which
    /// the controller surfaces separately from request errors.
    fn render_image(&self, image: &ImageData) -> Result<()>;
    /// Replace the result area with an error message.
    fn show_error(&self, message: &str);
    /// Show the wall-clock time the submission took.
    fn show_elapsed(&self, seconds: f64);
    /// Clear any prior result.
    fn clear(&self);
}

/// Observable controller state. Validation and settlement happen
/// synchronously inside `submit`, so only these two states are visible from
/// outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    InFlight,
}

impl ControllerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControllerState::Idle => "idle",
            ControllerState::InFlight => "in-flight",
        }
    }
}

/// How a submission settled. Errors never escape the controller as `Err`;
/// every failure is converted to a visible message and reported here.
#[derive(Debug)]
pub enum SubmitOutcome {
    Completed(GenerationResult),
    Failed(String),
    /// Both prompt and attached image were empty; no request was sent.
    RejectedEmptyInput,
    /// A submission was already in flight on this controller.
    RejectedBusy,
}

impl SubmitOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, SubmitOutcome::Completed(_))
    }
}

/// Orchestrates one submission slot for a single model kind: input
/// validation, the simulated progress ramp, the request, and result or error
/// rendering. Fast and quality deployments are two instances of this type
/// with different configs; they share nothing but the HTTP connection pool.
pub struct GenerationController {
    client: StudioClient,
    config: ControllerConfig,
    sink: Arc<dyn DisplaySink>,
    state: Mutex<ControllerState>,
    attached: Mutex<Option<ImageData>>,
    // Bumped on every submission (and by invalidate); a settlement whose
    // token is stale applies no display updates.
    token: AtomicU64,
}

impl GenerationController {
    pub fn new(client: StudioClient, config: ControllerConfig, sink: Arc<dyn DisplaySink>) -> Self {
        Self {
            client,
            config,
            sink,
            state: Mutex::new(ControllerState::Idle),
            attached: Mutex::new(None),
            token: AtomicU64::new(0),
        }
    }

    pub fn state(&self) -> ControllerState {
        *self.state.lock().unwrap()
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Stores an uploaded image in this controller's slot. It rides along
    /// with every submission until cleared.
    pub fn attach_image(&self, image: ImageData) {
        log::debug!(
            "{}: attached image ({} bytes)",
            self.config.label,
            image.len()
        );
        *self.attached.lock().unwrap() = Some(image);
    }

    pub fn clear_image(&self) {
        *self.attached.lock().unwrap() = None;
    }

    pub fn attached_image(&self) -> Option<ImageData> {
        self.attached.lock().unwrap().clone()
    }

    /// Invalidates the outstanding submission, if any: its settlement will
    /// apply no display updates. The request itself still runs to completion;
    /// there is no transport-level cancellation.
    pub fn invalidate(&self) {
        self.token.fetch_add(1, Ordering::SeqCst);
    }

    /// Runs one submission through to settlement, returning the controller to
    /// an actionable idle state on every path.
    pub async fn submit(&self, prompt: &str) -> SubmitOutcome {
        let prompt = prompt.trim().to_string();
        let image = self.attached_image();

        if prompt.is_empty() && image.is_none() {
            self.sink
                .show_error("Please enter a prompt or attach an image");
            return SubmitOutcome::RejectedEmptyInput;
        }

        // Atomically claim the slot; the disabled trigger control is a
        // courtesy, this guard is the invariant.
        {
            let mut state = self.state.lock().unwrap();
            if *state == ControllerState::InFlight {
                log::warn!("{}: submission rejected, already in flight", self.config.label);
                return SubmitOutcome::RejectedBusy;
            }
            *state = ControllerState::InFlight;
        }

        let token = self.token.fetch_add(1, Ordering::SeqCst) + 1;

        self.sink.set_busy(true);
        self.sink.clear();

        let simulator = ProgressSimulator::start(
            self.config.step_percent,
            self.config.tick_interval,
            self.config.clamped_ceiling(),
            {
                let sink = Arc::clone(&self.sink);
                let label = self.config.label.clone();
                move |percent| {
                    sink.set_progress(&ProgressState {
                        percent,
                        label: label.clone(),
                    })
                }
            },
        );

        let request = GenerationRequest {
            model_kind: self.config.kind,
            prompt,
            image,
        };
        let settled = self.client.generate(request).await;
        simulator.stop().await;

        let current = token == self.token.load(Ordering::SeqCst);
        let outcome = match settled {
            Ok(result) => {
                if current {
                    self.sink.set_progress(&ProgressState {
                        percent: 100,
                        label: self.config.label.clone(),
                    });
                    match self.sink.render_image(&result.image) {
                        Ok(()) => {
                            self.sink.show_elapsed(result.elapsed_seconds);
                            SubmitOutcome::Completed(result)
                        }
                        Err(render_err) => {
                            let message = render_err.message().to_string();
                            self.sink.show_error(&message);
                            SubmitOutcome::Failed(message)
                        }
                    }
                } else {
                    log::debug!("{}: stale settlement ignored", self.config.label);
                    SubmitOutcome::Completed(result)
                }
            }
            Err(err) => {
                let message = err.message().to_string();
                if current {
                    self.sink.show_error(&message);
                }
                SubmitOutcome::Failed(message)
            }
        };

        // Even a stale settlement re-enables the trigger: the submission it
        // belonged to is over, and no newer one can exist while this one
        // holds the in-flight slot.
        self.sink.set_busy(false);
        *self.state.lock().unwrap() = ControllerState::Idle;
        outcome
    }
}
