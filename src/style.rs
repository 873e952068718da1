//! Styling helpers for terminal output.
//!
//! The [`GameStyle`] trait provides a set of convenience methods for applying
//! ANSI styling via the `colored` crate. Implementations for `&str` and
//! `String` are provided so string literals can be styled directly.

use colored::{ColoredString, Colorize};

/// Convenience trait for applying color and style to text output.
pub trait GameStyle {
    fn room_style(&self) -> ColoredString;
    fn description_style(&self) -> ColoredString;
    fn item_style(&self) -> ColoredString;
    fn npc_style(&self) -> ColoredString;
    fn exit_style(&self) -> ColoredString;
    fn error_style(&self) -> ColoredString;
    fn death_style(&self) -> ColoredString;
    fn prompt_style(&self) -> ColoredString;
    fn objective_style(&self) -> ColoredString;
    fn objective_done_style(&self) -> ColoredString;
    fn heading_style(&self) -> ColoredString;
}

impl GameStyle for &str {
    fn room_style(&self) -> ColoredString {
        self.truecolor(223, 140, 10).underline()
    }
    fn description_style(&self) -> ColoredString {
        self.italic().truecolor(150, 200, 250)
    }
    fn item_style(&self) -> ColoredString {
        self.truecolor(220, 180, 40)
    }
    fn npc_style(&self) -> ColoredString {
        self.truecolor(60, 170, 90).underline()
    }
    fn exit_style(&self) -> ColoredString {
        self.italic().truecolor(110, 220, 110)
    }
    fn error_style(&self) -> ColoredString {
        self.truecolor(230, 30, 30)
    }
    fn death_style(&self) -> ColoredString {
        self.bold().truecolor(230, 30, 30)
    }
    fn prompt_style(&self) -> ColoredString {
        self.truecolor(180, 180, 180)
    }
    fn objective_style(&self) -> ColoredString {
        self.truecolor(220, 40, 220)
    }
    fn objective_done_style(&self) -> ColoredString {
        self.truecolor(220, 40, 220).strikethrough()
    }
    fn heading_style(&self) -> ColoredString {
        self.underline()
    }
}

impl GameStyle for String {
    fn room_style(&self) -> ColoredString {
        self.as_str().room_style()
    }
    fn description_style(&self) -> ColoredString {
        self.as_str().description_style()
    }
    fn item_style(&self) -> ColoredString {
        self.as_str().item_style()
    }
    fn npc_style(&self) -> ColoredString {
        self.as_str().npc_style()
    }
    fn exit_style(&self) -> ColoredString {
        self.as_str().exit_style()
    }
    fn error_style(&self) -> ColoredString {
        self.as_str().error_style()
    }
    fn death_style(&self) -> ColoredString {
        self.as_str().death_style()
    }
    fn prompt_style(&self) -> ColoredString {
        self.as_str().prompt_style()
    }
    fn objective_style(&self) -> ColoredString {
        self.as_str().objective_style()
    }
    fn objective_done_style(&self) -> ColoredString {
        self.as_str().objective_done_style()
    }
    fn heading_style(&self) -> ColoredString {
        self.as_str().heading_style()
    }
}
