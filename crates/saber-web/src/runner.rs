use saber_engine::{
    validate_timestamp, FrameSnapshot, GameMode, InputEvent, InputQueue, LandmarkFrame,
    ModeController, ProtocolLayout, SaberConfig,
};

/// Wires the mode controller to the browser loop.
///
/// `lib.rs` keeps one of these in a `thread_local!` and exports free
/// functions via `#[wasm_bindgen]`, because wasm-bindgen cannot export the
/// controller directly.
pub struct SessionRunner {
    controller: ModeController,
    input: InputQueue,
    layout: ProtocolLayout,
    /// Packed output for TypeScript, rewritten on every accepted tick.
    buffer: Vec<f32>,
    snapshot: FrameSnapshot,
    frame_counter: u32,
    rejected_frames: u32,
}

impl SessionRunner {
    pub fn new(config: SaberConfig, mode: GameMode) -> Self {
        let controller = ModeController::new(config, mode);
        let layout = ProtocolLayout::default();
        let buffer = layout.allocate();
        let snapshot = FrameSnapshot::capture(&controller);
        Self {
            controller,
            input: InputQueue::new(),
            layout,
            buffer,
            snapshot,
            frame_counter: 0,
            rejected_frames: 0,
        }
    }

    /// Build from an optional JSON config. A config that fails to parse is
    /// logged and replaced by the defaults.
    pub fn from_json(config_json: Option<&str>, mode: GameMode) -> Self {
        let config = match config_json.map(SaberConfig::from_json) {
            Some(Ok(config)) => config,
            Some(Err(e)) => {
                log::warn!("invalid config, using defaults: {}", e);
                SaberConfig::default()
            }
            None => SaberConfig::default(),
        };
        Self::new(config, mode)
    }

    /// Queue a UI action for the next accepted tick.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one frame from the tracker's flat arrays.
    ///
    /// A malformed frame or a non-finite timestamp is rejected whole: the
    /// controller does not advance, queued input waits for the next tick and
    /// the output buffer keeps the previous frame. Returns whether the frame
    /// was accepted.
    pub fn tick(&mut self, hand_data: &[f32], face_data: &[f32], timestamp_ms: f64) -> bool {
        let checked = validate_timestamp(timestamp_ms)
            .and_then(|_| LandmarkFrame::from_flat(hand_data, face_data));
        let frame = match checked {
            Ok(frame) => frame,
            Err(e) => {
                self.rejected_frames += 1;
                log::warn!("rejected landmark frame: {}", e);
                return false;
            }
        };

        self.controller.update(&frame, &self.input, timestamp_ms);

        // Drain input after update
        self.input.drain();

        self.frame_counter = self.frame_counter.wrapping_add(1);
        self.snapshot = FrameSnapshot::capture(&self.controller);
        self.layout.pack(&self.snapshot, self.frame_counter, &mut self.buffer);
        true
    }

    pub fn controller(&self) -> &ModeController {
        &self.controller
    }

    pub fn snapshot(&self) -> &FrameSnapshot {
        &self.snapshot
    }

    /// Last accepted frame as JSON, for debugging overlays.
    pub fn snapshot_json(&self) -> String {
        self.snapshot.to_json().unwrap_or_else(|e| {
            log::warn!("snapshot serialization failed: {}", e);
            String::from("{}")
        })
    }

    pub fn frame_counter(&self) -> u32 {
        self.frame_counter
    }

    pub fn rejected_frames(&self) -> u32 {
        self.rejected_frames
    }

    // ---- Buffer accessors for zero-copy reads ----

    pub fn buffer(&self) -> &[f32] {
        &self.buffer
    }

    pub fn buffer_ptr(&self) -> *const f32 {
        self.buffer.as_ptr()
    }

    pub fn buffer_len(&self) -> u32 {
        self.buffer.len() as u32
    }

    // ---- Capacity accessors (read by TypeScript via wasm_bindgen exports) ----

    pub fn max_enemies(&self) -> u32 {
        self.layout.max_enemies as u32
    }

    pub fn max_requests(&self) -> u32 {
        self.layout.max_requests as u32
    }

    pub fn max_events(&self) -> u32 {
        self.layout.max_events as u32
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.layout.buffer_total_floats as u32
    }
}
