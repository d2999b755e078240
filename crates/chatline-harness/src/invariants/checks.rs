//! Checks registered by [`super::InvariantRegistry::standard`].

use chatline_app::{CONVERSATION_ID_CAP, MAX_LINE_CHARS, Phase, View};

use super::{CoordinatorSnapshot, Invariant, InvariantResult, Violation};

/// The cursor never leaves the input line and the line never exceeds the cap.
pub struct CursorWithinInput;

impl Invariant for CursorWithinInput {
    fn name(&self) -> &'static str {
        "cursor_within_input"
    }

    fn check(&self, state: &CoordinatorSnapshot) -> InvariantResult {
        if state.cursor > state.input_len {
            return Err(Violation::new(
                self.name(),
                format!("cursor {} past input length {}", state.cursor, state.input_len),
            ));
        }
        if state.input_len > MAX_LINE_CHARS {
            return Err(Violation::new(
                self.name(),
                format!("input length {} over cap {MAX_LINE_CHARS}", state.input_len),
            ));
        }
        Ok(())
    }
}

/// Neither line buffer holds more lines than its capacity.
pub struct BufferWithinCapacity;

impl Invariant for BufferWithinCapacity {
    fn name(&self) -> &'static str {
        "buffer_within_capacity"
    }

    fn check(&self, state: &CoordinatorSnapshot) -> InvariantResult {
        let buffers = [
            ("log", state.log_len, state.log_capacity),
            ("message", state.message_len, state.message_capacity),
        ];
        for (pane, len, capacity) in buffers {
            if len > capacity {
                return Err(Violation::new(
                    self.name(),
                    format!("{pane} buffer holds {len} lines, capacity {capacity}"),
                ));
            }
        }
        Ok(())
    }
}

/// Every drawn row fits inside the pane it was drawn for.
///
/// Rows are wrapped before drawing, so a row wider or a pane taller than the
/// text area means the wrap or the suffix selection is wrong.
pub struct FrameFitsPanes;

impl FrameFitsPanes {
    fn check_pane(
        &self,
        pane: &str,
        rows: &[String],
        (width, height): (usize, usize),
    ) -> InvariantResult {
        if rows.len() > height {
            return Err(Violation::new(
                self.name(),
                format!("{pane} pane drew {} rows into {height}", rows.len()),
            ));
        }
        let width = width.max(1);
        if let Some(row) = rows.iter().find(|row| row.chars().count() > width) {
            return Err(Violation::new(
                self.name(),
                format!("{pane} row {row:?} wider than {width}"),
            ));
        }
        Ok(())
    }

    fn check_frame(&self, frame: &View) -> InvariantResult {
        self.check_pane("log", &frame.log_rows, frame.layout.log_inner())?;
        self.check_pane("message", &frame.message_rows, frame.layout.message_inner())
    }
}

impl Invariant for FrameFitsPanes {
    fn name(&self) -> &'static str {
        "frame_fits_panes"
    }

    fn check(&self, state: &CoordinatorSnapshot) -> InvariantResult {
        state.last_frame.as_ref().map_or(Ok(()), |frame| self.check_frame(frame))
    }
}

/// Once the engine has been told to stop, the loop is no longer running.
pub struct StoppedAfterShutdown;

impl Invariant for StoppedAfterShutdown {
    fn name(&self) -> &'static str {
        "stopped_after_shutdown"
    }

    fn check(&self, state: &CoordinatorSnapshot) -> InvariantResult {
        let shut_down = matches!(state.phase, Phase::ShuttingDown | Phase::Terminated);
        if shut_down && state.running {
            return Err(Violation::new(
                self.name(),
                format!("running flag still set in {:?}", state.phase),
            ));
        }
        Ok(())
    }
}

/// The stored conversation id respects its cap and is never empty.
pub struct ConversationIdBounded;

impl Invariant for ConversationIdBounded {
    fn name(&self) -> &'static str {
        "conversation_id_bounded"
    }

    fn check(&self, state: &CoordinatorSnapshot) -> InvariantResult {
        let Some(id) = &state.conversation_id else {
            return Ok(());
        };
        let len = id.chars().count();
        if len == 0 || len > CONVERSATION_ID_CAP {
            return Err(Violation::new(
                self.name(),
                format!("conversation id of {len} chars, cap {CONVERSATION_ID_CAP}"),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chatline_app::{ClientConfig, PaneLayout};

    use super::*;

    fn frame(log_rows: Vec<String>) -> View {
        View {
            layout: PaneLayout::compute(12, 25, &ClientConfig::default()),
            log_rows,
            message_rows: Vec::new(),
            identity_name: "sim".into(),
            conversation_id: None,
            input: String::new(),
            cursor: 0,
        }
    }

    #[test]
    fn cursor_past_end_is_violation() {
        let state = CoordinatorSnapshot { input_len: 2, cursor: 3, ..CoordinatorSnapshot::idle() };
        let violation = CursorWithinInput.check(&state).unwrap_err();
        assert_eq!(violation.invariant, "cursor_within_input");
    }

    #[test]
    fn overfull_buffer_is_violation() {
        let state = CoordinatorSnapshot { message_len: 101, ..CoordinatorSnapshot::idle() };
        assert!(BufferWithinCapacity.check(&state).is_err());
    }

    #[test]
    fn wide_row_is_violation() {
        // 12 columns leave 10 for text
        let fits = CoordinatorSnapshot {
            last_frame: Some(frame(vec!["0123456789".into()])),
            ..CoordinatorSnapshot::idle()
        };
        assert!(FrameFitsPanes.check(&fits).is_ok());

        let wide = CoordinatorSnapshot {
            last_frame: Some(frame(vec!["0123456789A".into()])),
            ..CoordinatorSnapshot::idle()
        };
        assert!(FrameFitsPanes.check(&wide).is_err());
    }

    #[test]
    fn tall_pane_is_violation() {
        // Log pane is 8 rows high, 6 inside the border
        let rows = (0..7).map(|i| i.to_string()).collect();
        let state =
            CoordinatorSnapshot { last_frame: Some(frame(rows)), ..CoordinatorSnapshot::idle() };
        assert!(FrameFitsPanes.check(&state).is_err());
    }

    #[test]
    fn running_after_shutdown_is_violation() {
        let state = CoordinatorSnapshot { phase: Phase::Terminated, ..CoordinatorSnapshot::idle() };
        assert!(StoppedAfterShutdown.check(&state).is_err());

        let stopped = CoordinatorSnapshot { running: false, ..state };
        assert!(StoppedAfterShutdown.check(&stopped).is_ok());
    }

    #[test]
    fn empty_conversation_id_is_violation() {
        let state =
            CoordinatorSnapshot { conversation_id: Some(String::new()), ..CoordinatorSnapshot::idle() };
        assert!(ConversationIdBounded.check(&state).is_err());
    }
}
