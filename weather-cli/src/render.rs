//! Turns display sections into colored terminal panels.

use owo_colors::{OwoColorize, Style};
use unicode_width::UnicodeWidthStr;
use weather_core::{
    ColorTag, DisplaySection, Row, SectionKind, WeatherError,
    format::render_bar,
};

/// Label column width, in terminal cells.
const LABEL_WIDTH: usize = 18;
/// Outer width of the header and of stacked panels.
const RULE_WIDTH: usize = 56;
/// Space between panels laid out side by side.
const GUTTER: usize = 2;

/// One rendered line and its width on screen, escape codes excluded.
#[derive(Debug, Clone)]
struct Line {
    text: String,
    width: usize,
}

impl Line {
    fn blank(width: usize) -> Self {
        Self { text: " ".repeat(width), width }
    }
}

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
    bar_width: usize,
    columns: usize,
}

impl Renderer {
    /// `columns` is the terminal width used to decide whether panels fit side by side.
    pub fn new(color: bool, bar_width: usize, columns: usize) -> Self {
        Self { color, bar_width, columns }
    }

    pub fn header(&self) -> String {
        let inner = RULE_WIDTH - 2;
        let border = |s: &str| self.paint(s, Some(ColorTag::BrightBlue), false);
        let line = |width: usize, painted: String| {
            let pad = inner.saturating_sub(width + 2);
            format!("{}  {painted}{}{}", border("║"), " ".repeat(pad), border("║"))
        };

        let title = "🌤️  WEATHER TUI  ☔";
        let subtitle = "Get real-time weather data for any city";
        let painted_subtitle = if self.color {
            subtitle.italic().to_string()
        } else {
            subtitle.to_string()
        };

        format!(
            "{}\n{}\n{}\n{}\n",
            border(&format!("╔{}╗", "═".repeat(inner))),
            line(title.width(), self.paint(title, Some(ColorTag::Cyan), true)),
            line(subtitle.width(), painted_subtitle),
            border(&format!("╚{}╝", "═".repeat(inner))),
        )
    }

    /// All panels of one lookup. Wind & pressure and temperature details share
    /// a row when both fit in the terminal.
    pub fn sections(&self, sections: &[DisplaySection]) -> String {
        let mut out = String::new();
        let mut iter = sections.iter().peekable();

        while let Some(section) = iter.next() {
            let paired = match (section.kind, iter.peek()) {
                (SectionKind::WindPressure, Some(next))
                    if next.kind == SectionKind::TemperatureDetail =>
                {
                    let left = self.panel(section.title, section.accent, self.rows(section), 0);
                    let right = self.panel(next.title, next.accent, self.rows(next), 0);
                    let width = panel_width(&left) + GUTTER + panel_width(&right);
                    (width <= self.columns).then(|| side_by_side(left, right))
                }
                _ => None,
            };

            match paired {
                Some(lines) => {
                    iter.next();
                    push_lines(&mut out, &lines);
                }
                None => out.push_str(&self.section(section)),
            }
        }
        out
    }

    fn section(&self, section: &DisplaySection) -> String {
        let lines = self.panel(section.title, section.accent, self.rows(section), RULE_WIDTH);
        let mut out = String::new();
        push_lines(&mut out, &lines);
        out
    }

    fn rows(&self, section: &DisplaySection) -> Vec<Line> {
        section.rows.iter().map(|row| self.row(row)).collect()
    }

    /// Box `body` under `title`, at least `min_width` cells wide.
    fn panel(&self, title: &str, accent: ColorTag, body: Vec<Line>, min_width: usize) -> Vec<Line> {
        let accent = Some(accent);
        let inner = body
            .iter()
            .map(|line| line.width)
            .chain([title.width() + 2, min_width.saturating_sub(4)])
            .max()
            .unwrap_or_default();
        let width = inner + 4;
        let side = self.paint("│", accent, false);

        let mut lines = Vec::with_capacity(body.len() + 2);
        lines.push(Line {
            text: format!(
                "{}{}{}",
                self.paint("╭─ ", accent, false),
                self.paint(title, accent, true),
                self.paint(&format!(" {}╮", "─".repeat(inner - title.width() - 1)), accent, false),
            ),
            width,
        });
        for line in body {
            let pad = " ".repeat(inner - line.width);
            lines.push(Line {
                text: format!("{side} {}{pad} {side}", line.text),
                width,
            });
        }
        lines.push(Line {
            text: self.paint(&format!("╰{}╯", "─".repeat(inner + 2)), accent, false),
            width,
        });
        lines
    }

    fn row(&self, row: &Row) -> Line {
        let value = self.paint(&row.value, row.color, row.bold);
        let value_width = row.value.width();
        let bar = row
            .bar
            .map(|bar| self.paint(&render_bar(bar.ratio, self.bar_width), Some(bar.color), false));

        if row.label.is_empty() && bar.is_none() {
            return Line { text: value, width: value_width };
        }

        let label = pad_to_width(row.label, LABEL_WIDTH);
        let label_width = label.width();
        match (row.value.is_empty(), bar) {
            (_, None) => Line {
                text: format!("{label}{value}"),
                width: label_width + value_width,
            },
            (true, Some(bar)) => Line {
                text: format!("{label}{bar}"),
                width: label_width + self.bar_width,
            },
            (false, Some(bar)) => Line {
                text: format!("{label}{value} {bar}"),
                width: label_width + value_width + 1 + self.bar_width,
            },
        }
    }

    /// Panel for a payload that carried `error`/`message`.
    pub fn api_error(&self, message: &str) -> String {
        let red = Some(ColorTag::Red);
        let body = Line {
            text: format!("{} {message}", self.paint("API Error:", red, true)),
            width: "API Error: ".width() + message.width(),
        };
        let mut out = String::new();
        push_lines(&mut out, &self.panel("❌ Error", ColorTag::Red, vec![body], RULE_WIDTH));
        out
    }

    pub fn error(&self, err: &WeatherError) -> String {
        let prefix = if err.is_fetch_error() { "Error:" } else { "Unexpected error:" };
        format!("{} {err}", self.paint(prefix, Some(ColorTag::Red), true))
    }

    pub fn validation(&self) -> String {
        format!("{}\n", self.paint("Please enter a valid city name", Some(ColorTag::Red), true))
    }

    pub fn fetching(&self, city: &str) -> String {
        self.paint(&format!("Fetching weather for {city}..."), Some(ColorTag::Green), true)
    }

    pub fn farewell(&self) -> String {
        format!(
            "\n{}\n",
            self.paint("Thanks for using Weather TUI! 👋", Some(ColorTag::Green), true)
        )
    }

    pub fn interrupted(&self) -> String {
        format!(
            "\n\n{}\n{}\n",
            self.paint("Application interrupted by user", Some(ColorTag::Yellow), true),
            self.paint("Goodbye! 👋", Some(ColorTag::Green), true),
        )
    }

    fn paint(&self, text: &str, color: Option<ColorTag>, bold: bool) -> String {
        if !self.color {
            return text.to_string();
        }

        let mut style = color.map_or_else(Style::new, style_for);
        if bold {
            style = style.bold();
        }
        text.style(style).to_string()
    }
}

fn panel_width(lines: &[Line]) -> usize {
    lines.first().map_or(0, |line| line.width)
}

/// Join two panels row by row, padding the shorter one with blank lines.
fn side_by_side(left: Vec<Line>, right: Vec<Line>) -> Vec<Line> {
    let (left_width, right_width) = (panel_width(&left), panel_width(&right));
    let height = left.len().max(right.len());
    let gutter = " ".repeat(GUTTER);

    let mut left = left.into_iter();
    let mut right = right.into_iter();
    (0..height)
        .map(|_| {
            let l = left.next().unwrap_or_else(|| Line::blank(left_width));
            let r = right.next().unwrap_or_else(|| Line::blank(right_width));
            Line {
                text: format!("{}{gutter}{}", l.text, r.text),
                width: l.width + GUTTER + r.width,
            }
        })
        .collect()
}

fn push_lines(out: &mut String, lines: &[Line]) {
    for line in lines {
        out.push_str(line.text.trim_end());
        out.push('\n');
    }
}

fn style_for(color: ColorTag) -> Style {
    let style = Style::new();
    match color {
        ColorTag::BrightBlue => style.bright_blue(),
        ColorTag::BrightCyan => style.bright_cyan(),
        ColorTag::BrightWhite => style.bright_white(),
        ColorTag::Blue => style.blue(),
        ColorTag::Cyan => style.cyan(),
        ColorTag::Green => style.green(),
        ColorTag::Yellow => style.yellow(),
        ColorTag::Orange => style.truecolor(255, 165, 0),
        ColorTag::Red => style.red(),
        ColorTag::Magenta => style.magenta(),
    }
}

fn pad_to_width(text: &str, width: usize) -> String {
    let pad = width.saturating_sub(text.width()).max(1);
    format!("{text}{}", " ".repeat(pad))
}
