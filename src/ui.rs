use crate::menu::{DisplaySink, InputSource, LineKind};
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use std::io::{self, BufRead, IsTerminal, Write};

#[derive(Clone)]
struct Theme {
    accent: Color,
    text: Color,
    muted: Color,
    error: Color,
}

impl Theme {
    fn new() -> Self {
        Self {
            accent: Color::Rgb { r: 120, g: 190, b: 255 },
            text: Color::Rgb { r: 220, g: 230, b: 240 },
            muted: Color::Rgb { r: 135, g: 145, b: 155 },
            error: Color::Rgb { r: 235, g: 100, b: 95 },
        }
    }

    fn color(&self, kind: LineKind) -> Color {
        match kind {
            LineKind::Header | LineKind::Category => self.accent,
            LineKind::Entry => self.text,
            LineKind::Notice => self.muted,
            LineKind::Error => self.error,
        }
    }
}

/// Terminal output. Colour and screen clearing are independent: colour
/// follows `--no-color`/`NO_COLOR`, clearing follows whether the writer is a
/// terminal.
pub struct ConsoleDisplay<W: Write> {
    out: W,
    theme: Option<Theme>,
    clear_screen: bool,
}

impl ConsoleDisplay<io::Stdout> {
    pub fn stdout(color: bool) -> Self {
        let out = io::stdout();
        let terminal = out.is_terminal();
        Self::new(out, color).clearing(terminal)
    }
}

impl<W: Write> ConsoleDisplay<W> {
    /// Does not clear; see [`ConsoleDisplay::clearing`].
    pub fn new(out: W, color: bool) -> Self {
        Self {
            out,
            theme: color.then(Theme::new),
            clear_screen: false,
        }
    }

    pub fn clearing(mut self, clear_screen: bool) -> Self {
        self.clear_screen = clear_screen;
        self
    }

    fn write_line(&mut self, kind: LineKind, text: &str) -> io::Result<()> {
        let Some(theme) = &self.theme else {
            writeln!(self.out, "{text}")?;
            return Ok(());
        };
        if kind == LineKind::Header || kind == LineKind::Category {
            queue!(self.out, SetAttribute(Attribute::Bold))?;
        }
        queue!(
            self.out,
            SetForegroundColor(theme.color(kind)),
            Print(text),
            ResetColor,
            SetAttribute(Attribute::Reset),
            Print("\n")
        )?;
        Ok(())
    }
}

impl<W: Write> DisplaySink for ConsoleDisplay<W> {
    fn clear(&mut self) {
        if self.clear_screen {
            let _ = queue!(self.out, Clear(ClearType::All), MoveTo(0, 0));
        }
    }

    fn line(&mut self, kind: LineKind, text: &str) {
        let _ = self.write_line(kind, text);
    }

    fn prompt(&mut self, text: &str) {
        let _ = write!(self.out, "{text}");
        let _ = self.out.flush();
    }
}

/// Line reader over any buffered input; read errors count as end of input.
pub struct LineInput<R: BufRead> {
    reader: R,
}

impl LineInput<io::StdinLock<'static>> {
    pub fn stdin() -> Self {
        Self::new(io::stdin().lock())
    }
}

impl<R: BufRead> LineInput<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> InputSource for LineInput<R> {
    fn read_line(&mut self) -> Option<String> {
        let mut buf = String::new();
        match self.reader.read_line(&mut buf) {
            Ok(0) => None,
            Ok(_) => Some(buf.trim_end_matches(['\r', '\n']).to_string()),
            Err(err) => {
                log::warn!("input read failed: {err}");
                None
            }
        }
    }
}

/// `NO_COLOR` set to anything non-empty disables colour.
pub fn color_enabled(no_color_flag: bool) -> bool {
    if no_color_flag {
        return false;
    }
    !std::env::var_os("NO_COLOR").is_some_and(|value| !value.is_empty())
}
