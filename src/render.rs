use crate::transit;

pub const SCREEN_WIDTH: i32 = 64;
pub const SCREEN_HEIGHT: i32 = 32;

// clR6x12-style glyphs: 6px advance, 12px tall.
pub const CHAR_WIDTH: i32 = 6;
pub const FONT_HEIGHT: i32 = 12;

const ROW_TEXT_X: i32 = 2;
const ROW_TOP_Y: [i32; 2] = [2, 16];

pub const TRAIN_LENGTH: i32 = 8;
const TRAIN_Y: i32 = 30;
// The marker moves once per this many render ticks, so its speed is
// independent of the render interval.
const TRAIN_SLOWDOWN: u32 = 4;
const FRESH_WINDOW_SECS: i64 = 2;

// Columns blanked just left of scrolling text each tick, erasing the
// previous frame's leftmost sliver on panels that keep the old buffer.
const SCROLL_ERASE_COLS: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

pub const COLOR_OFF: Color = Color{r: 0, g: 0, b: 0};
pub const COLOR_TEXT: Color = Color{r: 255, g: 0, b: 0};
pub const COLOR_ALERT: Color = Color{r: 255, g: 160, b: 0};
pub const COLOR_TRAIN: Color = Color{r: 255, g: 0, b: 0};
pub const COLOR_TRAIN_FRESH: Color = Color{r: 0, g: 255, b: 0};

/// One frame's worth of drawing, computed without holding any store lock.
/// The panel consumes these after the tick.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear,
    Text{x: i32, y: i32, color: Color, text: String},
    Line{x0: i32, y0: i32, x1: i32, y1: i32, color: Color},
    Circle{cx: i32, cy: i32, r: i32, color: Color},
}

/// What the render loop copied out of the stores for one row.
#[derive(Debug, Clone)]
pub struct RowSnapshot {
    pub line: String,
    pub predictions: Vec<i64>,
    pub alerts: Vec<String>,
}

/// Owned exclusively by the render loop; mutated once per tick.
pub struct RenderState {
    pub scroll_offsets: [i32; 2],
    pub train_x: i32,
    train_shake_back: bool,
    frame: u32,
}

impl RenderState {
    pub fn new() -> RenderState {
        return RenderState {
            scroll_offsets: [SCREEN_WIDTH; 2],
            train_x: 0,
            train_shake_back: false,
            frame: 0,
        };
    }
}

/// "2,5,10" for the first three arrivals, "N/A" for none.
pub fn format_predictions(now: i64, arrivals: &[i64]) -> String {
    if arrivals.is_empty() {
        return "N/A".to_string();
    }
    return arrivals.iter()
        .take(3)
        .map(|ts| transit::minutes_until(now, *ts).to_string())
        .collect::<Vec<String>>()
        .join(",");
}

fn text_pixel_width(text: &str) -> i32 {
    return CHAR_WIDTH * text.chars().count() as i32;
}

/// Advance the animation state machine one frame and emit the draw list.
pub fn render_tick(state: &mut RenderState,
                   rows: &[RowSnapshot],
                   secs_stale: i64,
                   now: i64,
                   stale_threshold_secs: i64) -> Vec<DrawOp> {
    let mut ops = vec![DrawOp::Clear];

    for (i, row) in rows.iter().enumerate().take(2) {
        if row.alerts.is_empty() {
            // A reappearing alert always re-enters from the right edge.
            state.scroll_offsets[i] = SCREEN_WIDTH;
            let text = format!("{}-{}", row.line, format_predictions(now, &row.predictions));
            ops.push(DrawOp::Text{
                x: ROW_TEXT_X, y: ROW_TOP_Y[i], color: COLOR_TEXT, text: text});
        } else {
            // Alerts take visual priority over predictions for the row.
            let text = row.alerts.join(" / ");
            let width = text_pixel_width(&text);
            let x = ROW_TEXT_X + state.scroll_offsets[i];
            ops.push(DrawOp::Text{
                x: x, y: ROW_TOP_Y[i], color: COLOR_ALERT, text: text});
            for col in 1..=SCROLL_ERASE_COLS {
                ops.push(DrawOp::Line{
                    x0: x - col, y0: ROW_TOP_Y[i],
                    x1: x - col, y1: ROW_TOP_Y[i] + FONT_HEIGHT - 1,
                    color: COLOR_OFF});
            }
            state.scroll_offsets[i] -= 1;
            if state.scroll_offsets[i] <= -width {
                state.scroll_offsets[i] = SCREEN_WIDTH;
            }
        }
    }

    state.frame = state.frame.wrapping_add(1);
    if state.frame % TRAIN_SLOWDOWN == 0 {
        step_train(state, secs_stale, stale_threshold_secs);
    }

    let color = if secs_stale < FRESH_WINDOW_SECS { COLOR_TRAIN_FRESH } else { COLOR_TRAIN };
    ops.push(DrawOp::Line{
        x0: state.train_x - TRAIN_LENGTH, y0: TRAIN_Y,
        x1: state.train_x, y1: TRAIN_Y,
        color: color});
    ops.push(DrawOp::Circle{
        cx: state.train_x - 1, cy: TRAIN_Y - 2, r: 1, color: color});

    return ops;
}

/// One marker step. Fresh data: advance one pixel, wrapping so the marker
/// runs off the right edge and back in from the left. Stale data: bounce
/// between two adjacent positions ("stuck" signal).
fn step_train(state: &mut RenderState, secs_stale: i64, stale_threshold_secs: i64) {
    let span = SCREEN_WIDTH + TRAIN_LENGTH;
    if secs_stale >= stale_threshold_secs {
        if state.train_shake_back {
            state.train_x = (state.train_x + span - 1) % span;
        } else {
            state.train_x = (state.train_x + 1) % span;
        }
        state.train_shake_back = !state.train_shake_back;
    } else {
        state.train_x = (state.train_x + 1) % span;
        state.train_shake_back = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_row(line: &str, predictions: Vec<i64>) -> RowSnapshot {
        return RowSnapshot{
            line: line.to_string(),
            predictions: predictions,
            alerts: vec![],
        };
    }

    fn alert_row(line: &str, alerts: Vec<&str>) -> RowSnapshot {
        return RowSnapshot{
            line: line.to_string(),
            predictions: vec![100],
            alerts: alerts.iter().map(|a| a.to_string()).collect(),
        };
    }

    fn texts(ops: &[DrawOp]) -> Vec<String> {
        return ops.iter().filter_map(|op| match op {
            DrawOp::Text{text, ..} => Some(text.clone()),
            _ => None,
        }).collect();
    }

    fn train_color(ops: &[DrawOp]) -> Color {
        for op in ops {
            if let DrawOp::Line{y0, color, ..} = op {
                if *y0 == TRAIN_Y {
                    return *color;
                }
            }
        }
        panic!("no train marker in draw list");
    }

    #[test]
    fn formats_first_three_arrival_minutes() {
        let now = 1700000000;
        assert_eq!("2,5,10", format_predictions(now, &[now + 125, now + 305, now + 650]));
    }

    #[test]
    fn formats_empty_predictions_as_na() {
        assert_eq!("N/A", format_predictions(1700000000, &[]));
    }

    #[test]
    fn formats_only_the_first_three() {
        let now = 1000;
        assert_eq!("1,2,3", format_predictions(now, &[
            now + 60, now + 120, now + 180, now + 240, now + 300]));
    }

    #[test]
    fn just_missed_arrival_shows_zero() {
        let now = 1000;
        assert_eq!("0,5", format_predictions(now, &[now - 30, now + 300]));
    }

    #[test]
    fn quiet_rows_draw_static_prediction_text() {
        let mut state = RenderState::new();
        let now = 1000;
        let rows = vec![
            quiet_row("N", vec![now + 125, now + 305, now + 650]),
            quiet_row("J", vec![]),
        ];

        let ops = render_tick(&mut state, &rows, 0, now, 120);

        assert_eq!(DrawOp::Clear, ops[0]);
        assert_eq!(vec!["N-2,5,10".to_string(), "J-N/A".to_string()], texts(&ops));
    }

    #[test]
    fn alerts_take_priority_over_predictions() {
        let mut state = RenderState::new();
        let rows = vec![
            alert_row("N", vec!["Shuttle buses replace trains"]),
            quiet_row("J", vec![]),
        ];

        let ops = render_tick(&mut state, &rows, 0, 1000, 120);
        let drawn = texts(&ops);

        assert!(drawn.contains(&"Shuttle buses replace trains".to_string()));
        assert!(!drawn.iter().any(|t| t.starts_with("N-")));
    }

    #[test]
    fn multiple_alerts_join_with_slashes() {
        let mut state = RenderState::new();
        let rows = vec![
            alert_row("N", vec!["First alert", "Second alert"]),
            quiet_row("J", vec![]),
        ];

        let ops = render_tick(&mut state, &rows, 0, 1000, 120);
        assert!(texts(&ops).contains(&"First alert / Second alert".to_string()));
    }

    #[test]
    fn scroll_enters_from_the_right_edge() {
        let mut state = RenderState::new();
        let rows = vec![alert_row("N", vec!["DELAY"]), quiet_row("J", vec![])];

        assert_eq!(SCREEN_WIDTH, state.scroll_offsets[0]);
        render_tick(&mut state, &rows, 0, 1000, 120);
        assert_eq!(SCREEN_WIDTH - 1, state.scroll_offsets[0]);
    }

    #[test]
    fn scroll_blanks_columns_left_of_the_text() {
        let mut state = RenderState::new();
        let rows = vec![alert_row("N", vec!["DELAY"]), quiet_row("J", vec![])];

        let ops = render_tick(&mut state, &rows, 0, 1000, 120);

        let text_x = 2 + SCREEN_WIDTH;
        let blanked: Vec<i32> = ops.iter().filter_map(|op| match op {
            DrawOp::Line{x0, color, ..} if *color == COLOR_OFF => Some(*x0),
            _ => None,
        }).collect();
        assert_eq!(vec![text_x - 1, text_x - 2], blanked);
    }

    #[test]
    fn scroll_completes_a_full_cycle_in_width_plus_length_ticks() {
        let mut state = RenderState::new();
        // 5 chars * 6 px = 30 px.
        let rows = vec![alert_row("N", vec!["DELAY"]), quiet_row("J", vec![])];
        let text_len = 30;

        for _ in 0..(SCREEN_WIDTH + text_len) {
            render_tick(&mut state, &rows, 0, 1000, 120);
        }
        assert_eq!(SCREEN_WIDTH, state.scroll_offsets[0]);

        // And the cycle restarts, not sticks.
        render_tick(&mut state, &rows, 0, 1000, 120);
        assert_eq!(SCREEN_WIDTH - 1, state.scroll_offsets[0]);
    }

    #[test]
    fn cleared_alert_resets_the_scroll_to_the_right_edge() {
        let mut state = RenderState::new();
        let alerting = vec![alert_row("N", vec!["DELAY"]), quiet_row("J", vec![])];
        for _ in 0..10 {
            render_tick(&mut state, &alerting, 0, 1000, 120);
        }
        assert_eq!(SCREEN_WIDTH - 10, state.scroll_offsets[0]);

        let quiet = vec![quiet_row("N", vec![]), quiet_row("J", vec![])];
        render_tick(&mut state, &quiet, 0, 1000, 120);
        assert_eq!(SCREEN_WIDTH, state.scroll_offsets[0]);
    }

    #[test]
    fn train_moves_once_per_slowdown_window() {
        let mut state = RenderState::new();
        let rows = vec![quiet_row("N", vec![]), quiet_row("J", vec![])];

        let start_x = state.train_x;
        for _ in 0..(TRAIN_SLOWDOWN - 1) {
            render_tick(&mut state, &rows, 0, 1000, 120);
        }
        assert_eq!(start_x, state.train_x);

        render_tick(&mut state, &rows, 0, 1000, 120);
        assert_eq!(start_x + 1, state.train_x);
    }

    #[test]
    fn train_wraps_modulo_screen_plus_marker_length() {
        let mut state = RenderState::new();
        state.train_x = SCREEN_WIDTH + TRAIN_LENGTH - 1;
        step_train(&mut state, 0, 120);
        assert_eq!(0, state.train_x);
    }

    #[test]
    fn train_switches_to_shake_exactly_at_the_stale_threshold() {
        let mut state = RenderState::new();
        state.train_x = 10;

        // Just under the threshold: still advancing.
        step_train(&mut state, 119, 120);
        assert_eq!(11, state.train_x);

        // Over it: bounce between two adjacent positions.
        step_train(&mut state, 121, 120);
        assert_eq!(12, state.train_x);
        step_train(&mut state, 121, 120);
        assert_eq!(11, state.train_x);
        step_train(&mut state, 121, 120);
        assert_eq!(12, state.train_x);
        step_train(&mut state, 121, 120);
        assert_eq!(11, state.train_x);
    }

    #[test]
    fn train_at_the_threshold_itself_shakes() {
        let mut state = RenderState::new();
        state.train_x = 10;
        step_train(&mut state, 120, 120);
        step_train(&mut state, 120, 120);
        assert_eq!(10, state.train_x);
    }

    #[test]
    fn recovered_data_resumes_advancing() {
        let mut state = RenderState::new();
        state.train_x = 10;
        step_train(&mut state, 500, 120);
        step_train(&mut state, 0, 120);
        step_train(&mut state, 0, 120);
        assert_eq!(13, state.train_x);
    }

    #[test]
    fn train_is_green_only_right_after_an_update() {
        let mut state = RenderState::new();
        let rows = vec![quiet_row("N", vec![]), quiet_row("J", vec![])];

        let ops = render_tick(&mut state, &rows, 0, 1000, 120);
        assert_eq!(COLOR_TRAIN_FRESH, train_color(&ops));

        let ops = render_tick(&mut state, &rows, 1, 1000, 120);
        assert_eq!(COLOR_TRAIN_FRESH, train_color(&ops));

        let ops = render_tick(&mut state, &rows, 2, 1000, 120);
        assert_eq!(COLOR_TRAIN, train_color(&ops));
    }
}
