//! Renderer module
//!
//! Renders hits to the output formats (text, jsonl). Styling comes from an
//! injected [`Theme`] so tests can render without ANSI escapes.

use colored::{Color, Colorize};

use crate::core::model::{Hit, LineHit};
use crate::search::highlight::Highlighter;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Jsonl,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "jsonl" => Ok(OutputFormat::Jsonl),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// When to emit ANSI styling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Let `colored` decide (terminal detection, NO_COLOR, CLICOLOR)
    #[default]
    Auto,
    Always,
    Never,
}

impl std::str::FromStr for ColorChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ColorChoice::Auto),
            "always" => Ok(ColorChoice::Always),
            "never" => Ok(ColorChoice::Never),
            _ => Err(format!("Unknown color mode: {}", s)),
        }
    }
}

/// How a single semantic role is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paint {
    /// Text as-is
    Plain,
    /// ANSI styling via `colored`
    Ansi {
        color: Option<Color>,
        bold: bool,
        dimmed: bool,
    },
    /// Wrap text in literal delimiters so tests can see painted regions
    #[cfg(test)]
    Delimit {
        open: &'static str,
        close: &'static str,
    },
}

impl Paint {
    pub fn apply(&self, text: &str) -> String {
        match *self {
            Paint::Plain => text.to_string(),
            Paint::Ansi {
                color,
                bold,
                dimmed,
            } => {
                let mut styled = text.normal();
                if let Some(color) = color {
                    styled = styled.color(color);
                }
                if bold {
                    styled = styled.bold();
                }
                if dimmed {
                    styled = styled.dimmed();
                }
                styled.to_string()
            }
            #[cfg(test)]
            Paint::Delimit { open, close } => format!("{}{}{}", open, text, close),
        }
    }
}

/// Maps semantic roles to paints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// Matched substring
    pub matched: Paint,
    /// File header in content mode
    pub path: Paint,
    /// Unmatched text around content matches
    pub dimmed: Paint,
    /// `N:` prefix of content lines
    pub line_number: Paint,
}

impl Theme {
    pub fn ansi() -> Self {
        Self {
            matched: Paint::Ansi {
                color: Some(Color::BrightRed),
                bold: true,
                dimmed: false,
            },
            path: Paint::Ansi {
                color: Some(Color::Magenta),
                bold: true,
                dimmed: false,
            },
            dimmed: Paint::Ansi {
                color: None,
                bold: false,
                dimmed: true,
            },
            line_number: Paint::Ansi {
                color: Some(Color::Green),
                bold: false,
                dimmed: false,
            },
        }
    }

    pub fn plain() -> Self {
        Self {
            matched: Paint::Plain,
            path: Paint::Plain,
            dimmed: Paint::Plain,
            line_number: Paint::Plain,
        }
    }

    /// Plain text with matches wrapped in `[` `]`
    #[cfg(test)]
    pub fn bracketed() -> Self {
        Self {
            matched: Paint::Delimit {
                open: "[",
                close: "]",
            },
            ..Self::plain()
        }
    }

    pub fn for_choice(choice: ColorChoice) -> Self {
        match choice {
            ColorChoice::Never => Self::plain(),
            ColorChoice::Auto | ColorChoice::Always => Self::ansi(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::ansi()
    }
}

/// Render configuration combining format and theme
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub theme: Theme,
}

impl RenderConfig {
    pub fn new(format: OutputFormat, theme: Theme) -> Self {
        Self { format, theme }
    }
}

/// Renderer for accumulated hits
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render all hits into one output string (no trailing newline)
    pub fn render(&self, hits: &[Hit]) -> String {
        self.render_lines(hits).join("\n")
    }

    /// Render hits into output lines
    pub fn render_lines(&self, hits: &[Hit]) -> Vec<String> {
        match self.config.format {
            OutputFormat::Text => self.render_text(hits),
            OutputFormat::Jsonl => self.render_jsonl(hits),
        }
    }

    fn render_text(&self, hits: &[Hit]) -> Vec<String> {
        let theme = &self.config.theme;
        let highlighter = Highlighter::new(theme);
        let mut lines = Vec::new();

        for hit in hits {
            match hit {
                Hit::Name { path, span, .. } => lines.push(highlighter.single(path, *span)),
                Hit::Content { path, lines: found } => {
                    lines.push(theme.path.apply(path));
                    lines.extend(found.iter().map(|line| self.render_line(&highlighter, line)));
                }
            }
        }

        lines
    }

    fn render_line(&self, highlighter: &Highlighter<'_>, line: &LineHit) -> String {
        let number = self
            .config
            .theme
            .line_number
            .apply(&format!("{}:", line.number));
        format!("{}{}", number, highlighter.multi(&line.text, &line.spans))
    }

    fn render_jsonl(&self, hits: &[Hit]) -> Vec<String> {
        hits.iter()
            .filter_map(|hit| serde_json::to_string(hit).ok())
            .collect()
    }
}
