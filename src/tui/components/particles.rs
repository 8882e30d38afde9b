//! # ParticleLayer Component
//!
//! Paints the stage's live particles and the tap ripple on top of whatever
//! is already in the buffer. Only the glyph and foreground change, so text
//! underneath keeps its background.

use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::Color;

use crate::tui::component::Component;
use crate::tui::stage::{Stage, ripple_glyph};

pub struct ParticleLayer<'a> {
    pub stage: &'a Stage,
}

fn to_cell(area: Rect, (fx, fy): (f32, f32)) -> Option<Position> {
    if !(0.0..1.0).contains(&fx) || !(0.0..1.0).contains(&fy) {
        return None;
    }
    let x = area.x + (fx * f32::from(area.width)) as u16;
    let y = area.y + (fy * f32::from(area.height)) as u16;
    Some(Position::new(x, y))
}

impl Component for ParticleLayer<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let now = self.stage.now_ms();
        let buffer = frame.buffer_mut();

        for particle in self.stage.particles() {
            let Some(pos) = particle.position(now).and_then(|p| to_cell(area, p)) else {
                continue;
            };
            if let Some(cell) = buffer.cell_mut(pos) {
                cell.set_char(particle.glyph).set_fg(particle.color);
            }
        }

        if let Some(ripple) = self.stage.ripple() {
            let pos = Position::new(ripple.x, ripple.y);
            if let (Some(glyph), true) = (ripple_glyph(ripple, now), area.contains(pos)) {
                if let Some(cell) = buffer.cell_mut(pos) {
                    cell.set_char(glyph).set_fg(Color::White);
                }
            }
        }
    }
}
