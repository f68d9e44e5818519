use crate::game::ClientGameState;
use macroquad::prelude::*;
use shared::{column_label, standard_premium_layout, Premium, BLANK, BOARD_SIZE};

const MARGIN: f32 = 10.0;
const LINE_HEIGHT: f32 = 20.0;
const FONT_SIZE: f32 = 20.0;

pub fn premium_color(premium: Premium) -> Color {
    match premium {
        Premium::TripleWord => Color::from_rgba(200, 60, 60, 255),
        Premium::DoubleWord => Color::from_rgba(230, 150, 150, 255),
        Premium::TripleLetter => Color::from_rgba(60, 110, 200, 255),
        Premium::DoubleLetter => Color::from_rgba(150, 190, 230, 255),
        Premium::Plain => Color::from_rgba(40, 110, 70, 255),
    }
}

/// Side of one board cell so that the board and the command line fit
pub fn cell_size(width: f32, height: f32) -> f32 {
    let board_height = height - 2.0 * MARGIN - 2.0 * LINE_HEIGHT;
    let board_width = width * 0.65 - 2.0 * MARGIN;
    // One extra cell for the row and column labels
    (board_height.min(board_width) / (BOARD_SIZE as f32 + 1.0)).max(8.0)
}

pub struct Renderer {
    width: f32,
    height: f32,
    premiums: [[Premium; BOARD_SIZE]; BOARD_SIZE],
}

impl Renderer {
    pub fn new(width: usize, height: usize) -> Self {
        let mut premiums = [[Premium::Plain; BOARD_SIZE]; BOARD_SIZE];
        for (row, col, premium) in standard_premium_layout() {
            premiums[row][col] = premium;
        }
        Renderer {
            width: width as f32,
            height: height as f32,
            premiums,
        }
    }

    pub fn render(&mut self, state: &ClientGameState, command_line: &str) {
        self.width = screen_width();
        self.height = screen_height();
        clear_background(Color::from_rgba(26, 26, 26, 255));

        let cell = cell_size(self.width, self.height);
        self.draw_board(state, cell);
        self.draw_sidebar(state, MARGIN * 3.0 + cell * (BOARD_SIZE as f32 + 1.0));
        self.draw_command_line(command_line);
    }

    fn draw_board(&self, state: &ClientGameState, cell: f32) {
        let origin_x = MARGIN + cell;
        let origin_y = MARGIN + cell;

        for i in 0..BOARD_SIZE {
            let offset = i as f32 * cell;
            let label = column_label(i).to_string();
            draw_text(
                &label,
                origin_x + offset + cell * 0.3,
                origin_y - 4.0,
                cell * 0.7,
                GRAY,
            );
            let label = (i + 1).to_string();
            draw_text(&label, MARGIN, origin_y + offset + cell * 0.75, cell * 0.7, GRAY);
        }

        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                let x = origin_x + col as f32 * cell;
                let y = origin_y + row as f32 * cell;

                match state.cell(row, col) {
                    Some(letter) => {
                        draw_rectangle(x, y, cell, cell, Color::from_rgba(240, 220, 170, 255));
                        // Blanks arrive lowercase
                        let color = if letter.is_ascii_lowercase() { GRAY } else { BLACK };
                        let text = letter.to_ascii_uppercase().to_string();
                        draw_text(&text, x + cell * 0.25, y + cell * 0.8, cell, color);
                    }
                    None => {
                        let premium = self.premiums[row][col];
                        draw_rectangle(x, y, cell, cell, premium_color(premium));
                        if premium != Premium::Plain {
                            let label = premium.label();
                            draw_text(label, x + 2.0, y + cell * 0.65, cell * 0.5, WHITE);
                        }
                    }
                }
                draw_rectangle_lines(x, y, cell, cell, 1.0, Color::from_rgba(20, 20, 20, 255));
            }
        }
    }

    fn draw_sidebar(&self, state: &ClientGameState, x: f32) {
        let mut y = MARGIN + LINE_HEIGHT;

        let status = match (state.connected, state.registered) {
            (false, _) => "disconnected".to_string(),
            (true, false) => "connected, type: hello".to_string(),
            (true, true) => format!("playing as {}", state.name),
        };
        draw_text(&status, x, y, FONT_SIZE, WHITE);
        y += LINE_HEIGHT;

        if let Some(turn) = &state.turn {
            let (text, color) = if state.is_my_turn() {
                ("Your turn".to_string(), GREEN)
            } else {
                (format!("{}'s turn", turn), YELLOW)
            };
            draw_text(&text, x, y, FONT_SIZE, color);
        } else if !state.ready.is_empty() {
            let text = format!("Ready: {}", state.ready.join(", "));
            draw_text(&text, x, y, FONT_SIZE, YELLOW);
        }
        y += LINE_HEIGHT * 1.5;

        for (name, score) in &state.scores {
            let color = if state.turn.as_deref() == Some(name.as_str()) {
                GREEN
            } else {
                WHITE
            };
            draw_text(&format!("{:<12} {:>4}", name, score), x, y, FONT_SIZE, color);
            y += LINE_HEIGHT;
        }
        y += LINE_HEIGHT * 0.5;

        self.draw_rack(&state.rack, x, y);
        y += LINE_HEIGHT * 2.5;

        for line in state.log() {
            draw_text(line, x, y, FONT_SIZE * 0.8, LIGHTGRAY);
            y += LINE_HEIGHT * 0.8;
        }
    }

    fn draw_rack(&self, rack: &[char], x: f32, y: f32) {
        let size = LINE_HEIGHT * 1.6;
        for (i, tile) in rack.iter().enumerate() {
            let tx = x + i as f32 * (size + 4.0);
            draw_rectangle(tx, y, size, size, Color::from_rgba(240, 220, 170, 255));
            draw_rectangle_lines(tx, y, size, size, 2.0, WHITE);
            let text = if *tile == BLANK { " ".to_string() } else { tile.to_string() };
            draw_text(&text, tx + size * 0.25, y + size * 0.8, size, BLACK);
        }
    }

    fn draw_command_line(&self, command_line: &str) {
        let y = self.height - MARGIN;
        draw_rectangle(
            0.0,
            y - LINE_HEIGHT,
            self.width,
            LINE_HEIGHT + MARGIN,
            Color::from_rgba(51, 51, 51, 255),
        );
        draw_text(&format!("> {}_", command_line), MARGIN, y, FONT_SIZE, WHITE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_premium_layout_loaded() {
        let renderer = Renderer::new(1000, 700);
        assert_eq!(renderer.premiums[7][7], Premium::DoubleWord);
        assert_eq!(renderer.premiums[0][0], Premium::TripleWord);
        assert_eq!(renderer.premiums[7][5], Premium::Plain);
    }

    #[test]
    fn test_cell_size_fits_window() {
        let cell = cell_size(1000.0, 700.0);
        assert!(cell * (BOARD_SIZE as f32 + 1.0) <= 700.0);
        assert!(cell * (BOARD_SIZE as f32 + 1.0) <= 1000.0 * 0.65);
        assert_eq!(cell_size(10.0, 10.0), 8.0);
    }

    #[test]
    fn test_premium_colors_are_distinct() {
        let colors = [
            Premium::TripleWord,
            Premium::DoubleWord,
            Premium::TripleLetter,
            Premium::DoubleLetter,
            Premium::Plain,
        ]
        .map(premium_color);
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
