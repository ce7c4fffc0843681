use crate::consts::{
    Rgb, BG_COLOR, CELL_COLUMNS, DIM_TEXT_COLOR, FOG_COLOR, FOG_RADIUS, FOOD_COLOR,
    FOOD_SHINE_COLOR, GRID_COLOR, OBSTACLE_COLOR, SNAKE_BODY_COLOR, SNAKE_HEAD_COLOR, TEXT_COLOR,
    TARGET_FPS, WARNING_COLOR,
};
use crate::grid::{toroidal_delta, Cell, Point, Size};
use crate::session::GameState;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};

pub(crate) fn rgb((r, g, b): Rgb) -> Color {
    Color::Rgb(r, g, b)
}

/// `fg` drawn at `alpha` opacity over `bg`
pub(crate) fn blend(fg: Rgb, bg: Rgb, alpha: f32) -> Color {
    let alpha = alpha.clamp(0.0, 1.0);
    let mix = |f: u8, b: u8| (b as f32 + (f as f32 - b as f32) * alpha).round() as u8;
    Color::Rgb(mix(fg.0, bg.0), mix(fg.1, bg.1), mix(fg.2, bg.2))
}

pub(crate) fn board_extent(size: Size) -> (u16, u16) {
    (size.width * CELL_COLUMNS + 2, size.height + 2)
}

pub(crate) fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn put(buf: &mut Buffer, area: Rect, column: u16, row: u16, symbol: &str, fg: Color, bg: Color) {
    if column >= area.width || row >= area.height {
        return;
    }
    if let Some(cell) = buf.cell_mut((area.x + column, area.y + row)) {
        cell.set_symbol(symbol).set_fg(fg).set_bg(bg);
    }
}

fn paint(buf: &mut Buffer, area: Rect, cell: Cell, glyphs: [&str; 2], fg: Color, bg: Color) {
    for (i, glyph) in glyphs.iter().enumerate() {
        put(buf, area, cell.x * CELL_COLUMNS + i as u16, cell.y, glyph, fg, bg);
    }
}

/// Opacity of the snake while it is invisible: faint, and flickering
fn invisible_alpha(frames: u64) -> f32 {
    0.15 + 0.15 * ((frames as f32) * 0.4).sin().abs()
}

fn food_pulse(frames: u64) -> f32 {
    let seconds = frames as f32 / TARGET_FPS as f32;
    0.5 + 0.5 * (seconds * 5.0).sin()
}

impl Widget for &GameState {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let size = self.size();
        let bg = rgb(BG_COLOR);

        for cell in size.cells() {
            paint(buf, area, cell, ["·", " "], rgb(GRID_COLOR), bg);
        }

        // Decoys look exactly like the real thing
        for cell in self.obstacles.iter().chain(&self.fake_walls) {
            paint(buf, area, *cell, ["▓", "▓"], rgb(OBSTACLE_COLOR), bg);
        }

        let glow = blend(FOOD_COLOR, BG_COLOR, 0.3 * food_pulse(self.frames));
        let food_fg = blend(FOOD_SHINE_COLOR, FOOD_COLOR, food_pulse(self.frames));
        paint(buf, area, self.food.cell, ["▐", "▌"], food_fg, glow);

        for particle in self.particles.particles() {
            let column = (particle.pos.x * CELL_COLUMNS as f32).round();
            let row = particle.pos.y.round();
            if column < 0.0 || row < 0.0 {
                continue;
            }
            let fg = blend(particle.rgb(), BG_COLOR, particle.alpha());
            put(buf, area, column as u16, row as u16, particle.symbol(), fg, bg);
        }

        let alpha = if self.unfair.is_invisible() {
            invisible_alpha(self.frames)
        } else {
            1.0
        };
        for point in self.display.iter().skip(1) {
            let cell = point.nearest_cell(size);
            paint(buf, area, cell, ["█", "█"], blend(SNAKE_BODY_COLOR, BG_COLOR, alpha), bg);
        }
        if let Some(head) = self.display.first() {
            // Half-cell horizontal resolution for the gliding head
            let columns = size.width * CELL_COLUMNS;
            let column = ((head.x * CELL_COLUMNS as f32).round() as i32).rem_euclid(columns as i32);
            let row = (head.y.round() as i32).rem_euclid(size.height as i32);
            let fg = blend(SNAKE_HEAD_COLOR, BG_COLOR, alpha);
            for i in 0..CELL_COLUMNS {
                let column = (column as u16 + i) % columns;
                put(buf, area, column, row as u16, "█", fg, bg);
            }
        }

        if self.unfair.is_foggy() {
            let center = self.display.first().copied().unwrap_or_else(|| self.head().to_point());
            for cell in size.cells() {
                if !within_fog_radius(center, cell, size) {
                    paint(buf, area, cell, [" ", " "], rgb(FOG_COLOR), rgb(FOG_COLOR));
                }
            }
        }
    }
}

fn within_fog_radius(center: Point, cell: Cell, size: Size) -> bool {
    let dx = toroidal_delta(center.x, cell.x as f32, size.width);
    let dy = toroidal_delta(center.y, cell.y as f32, size.height);
    dx * dx + dy * dy <= FOG_RADIUS * FOG_RADIUS
}

pub(crate) fn hud_line(game: Option<&GameState>, high_score: u32) -> Line<'static> {
    let text = Style::new().fg(rgb(TEXT_COLOR));
    let dim = Style::new().fg(rgb(DIM_TEXT_COLOR));
    let warn = Style::new().fg(rgb(WARNING_COLOR)).add_modifier(Modifier::BOLD);

    let mut spans = vec![Span::styled("UNFAIR SNEK", text.add_modifier(Modifier::BOLD))];
    if let Some(game) = game {
        spans.push(Span::styled(format!("    Score: {}", game.score.points), text));
        spans.push(Span::styled(format!("    Level: {}", game.score.level), dim));
        spans.push(Span::styled(format!("    Speed: {:.1}", game.current_speed()), dim));
    }
    spans.push(Span::styled(format!("    High Score: {}", high_score), dim));

    if let Some(game) = game {
        let warnings = [
            (game.unfair.is_invisible(), "INVISIBLE"),
            (game.unfair.is_foggy(), "FOG"),
            (game.unfair.is_speed_boosted(), "SPEED TRAP"),
        ];
        for (_, label) in warnings.iter().filter(|(active, _)| *active) {
            spans.push(Span::styled(format!("  ⚠ {}", label), warn));
        }
    }
    Line::from(spans)
}

pub(crate) fn render_title(frame: &mut Frame, area: Rect, high_score: u32, ticks: u64) {
    let seconds = ticks as f32 / TARGET_FPS as f32;
    let red = (50.0 + 50.0 * (seconds * 3.0).sin()) as u8;
    let lines = vec![
        Line::styled("🐍 UNFAIR SNEK 🐍", Style::new().fg(Color::Rgb(red, 255, 50)).bold()),
        Line::default(),
        Line::styled(format!("🏆 High Score: {}", high_score), Style::new().fg(rgb(TEXT_COLOR))),
        Line::default(),
        Line::styled("Press any key to start", Style::new().fg(rgb(TEXT_COLOR))),
        Line::styled(
            "Arrows/WASD to move, SPACE to pause, Q to quit",
            Style::new().fg(Color::Rgb(150, 150, 150)),
        ),
        Line::styled(
            "Not everything here plays fair.",
            Style::new().fg(Color::Rgb(150, 150, 150)).italic(),
        ),
    ];
    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    let height = lines.len() as u16;
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        centered(inner, inner.width, height),
    );
}

pub(crate) fn render_board(frame: &mut Frame, area: Rect, game: &GameState, title: &str) {
    let (width, height) = board_extent(game.size());
    if area.width < width || area.height < height {
        frame.render_widget(
            Paragraph::new(format!(
                "Terminal too small: need {}x{}, have {}x{}",
                width, height, area.width, area.height
            ))
            .alignment(Alignment::Center),
            area,
        );
        return;
    }
    let board = centered(area, width, height);
    let block = Block::default().title(title.to_string()).borders(Borders::ALL);
    let inner = block.inner(board);
    frame.render_widget(block, board);
    frame.render_widget(game, inner);
}

pub(crate) fn render_game_over(
    frame: &mut Frame,
    area: Rect,
    final_score: u32,
    high_score: u32,
    new_high_score: bool,
) {
    let mut lines = vec![
        Line::styled("💀 GAME OVER! 💀", Style::new().fg(Color::Rgb(255, 100, 100)).bold()),
        Line::styled(format!("Final Score: {}", final_score), Style::new().fg(rgb(TEXT_COLOR))),
        Line::styled(format!("High Score: {}", high_score), Style::new().fg(Color::Yellow)),
    ];
    if new_high_score {
        lines.push(Line::styled("NEW HIGH SCORE!", Style::new().fg(rgb(WARNING_COLOR)).bold()));
    }
    lines.push(Line::styled(
        "Press R to restart or Q to quit",
        Style::new().fg(rgb(TEXT_COLOR)),
    ));

    let height = lines.len() as u16 + 2;
    let popup = centered(area, 40, height);
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL))
            .style(Style::new().bg(Color::Black)),
        popup,
    );
}
