// Copyright (c) The amtest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! General support code for amtest-runner.

use owo_colors::{OwoColorize, Style};
use std::fmt;

/// Utilities for pluralizing various words based on count or plurality.
pub(crate) mod plural {
    /// Returns "test" if `count` is 1, otherwise "tests".
    pub(crate) fn tests_str(count: usize) -> &'static str {
        if count == 1 { "test" } else { "tests" }
    }
}

/// Splits a name of the form `class#method` into its parts.
///
/// Names without a `#` are treated as a method without a class.
pub(crate) fn split_test_name(name: &str) -> (Option<&str>, &str) {
    match name.rsplit_once('#') {
        Some((class, method)) => (Some(class), method),
        None => (None, name),
    }
}

/// Wrapper for displaying a `class#method` test name with styling.
pub(crate) struct DisplayTestName<'a> {
    name: &'a str,
    class_style: Style,
    method_style: Style,
}

impl<'a> DisplayTestName<'a> {
    pub(crate) fn new(name: &'a str, class_style: Style, method_style: Style) -> Self {
        Self {
            name,
            class_style,
            method_style,
        }
    }
}

impl fmt::Display for DisplayTestName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (class, method) = split_test_name(self.name);
        if let Some(class) = class {
            write!(
                f,
                "{}{}",
                class.style(self.class_style),
                "#".style(self.class_style)
            )?;
        }
        write!(f, "{}", method.style(self.method_style))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::TestName;
    use test_case::test_case;

    #[test_case("org.example.FooTest#testBar", Some("org.example.FooTest"), "testBar" ; "class and method")]
    #[test_case("testBar", None, "testBar" ; "method only")]
    #[test_case("Outer#Inner#test", Some("Outer#Inner"), "test" ; "splits on last hash")]
    fn split(name: &str, class: Option<&str>, method: &str) {
        assert_eq!(split_test_name(name), (class, method));
    }

    #[test]
    fn display_unstyled() {
        let display = DisplayTestName::new("Foo#bar", Style::new(), Style::new());
        assert_eq!(display.to_string(), "Foo#bar");
    }

    #[test]
    fn split_display_name() {
        let name = TestName::new("org.example.FooTest", "testBar");
        assert_eq!(
            split_test_name(&name.to_string()),
            (Some("org.example.FooTest"), "testBar")
        );
    }
}
