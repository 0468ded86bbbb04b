// Copyright (c) The amtest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Correlating status blocks with the tests that reported them.
//!
//! The instrumentation runner reports statuses for all tests in one stream. Most blocks carry
//! `class` and `test` fields naming their test; some runners also send bare follow-up blocks
//! (such as `test_skipped=true`) that apply to whichever test was named last.

use crate::raw_output::StatusBlock;
use indexmap::IndexMap;
use std::fmt;

/// The name of a single test: a class and a method.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct TestName {
    class: String,
    method: String,
}

impl TestName {
    /// Creates a new test name.
    pub fn new(class: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            method: method.into(),
        }
    }

    /// Returns the test's name if `status` reports both a class and a method.
    pub fn from_status(status: &StatusBlock) -> Option<Self> {
        Some(Self::new(status.class_name()?, status.test_name()?))
    }

    /// The fully qualified class name.
    pub fn class(&self) -> &str {
        &self.class
    }

    /// The method name.
    pub fn method(&self) -> &str {
        &self.method
    }
}

impl fmt::Display for TestName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.class, self.method)
    }
}

/// The status blocks reported for a single test.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TestStatuses {
    /// The test's name.
    pub name: TestName,

    /// The test's status blocks, in report order.
    pub statuses: Vec<StatusBlock>,
}

/// Status blocks grouped by test.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct GroupedStatuses {
    /// One entry per test, in order of each test's first status.
    pub tests: Vec<TestStatuses>,

    /// Blocks reported before any test was named.
    pub unattributed: Vec<StatusBlock>,
}

/// Groups `statuses` by the test they belong to.
///
/// A block naming a test (with both `class` and `test` fields) is added to that test's group
/// and makes that test current. A block that names no test is added to the current test's
/// group.
pub fn group_statuses(statuses: &[StatusBlock]) -> GroupedStatuses {
    let mut groups: IndexMap<TestName, Vec<StatusBlock>> = IndexMap::new();
    let mut unattributed = Vec::new();
    let mut current: Option<usize> = None;

    for status in statuses {
        if let Some(name) = TestName::from_status(status) {
            let entry = groups.entry(name);
            current = Some(entry.index());
            entry.or_default().push(status.clone());
            continue;
        }

        match current.and_then(|index| groups.get_index_mut(index)) {
            Some((_, group)) => group.push(status.clone()),
            None => unattributed.push(status.clone()),
        }
    }

    GroupedStatuses {
        tests: groups
            .into_iter()
            .map(|(name, statuses)| TestStatuses { name, statuses })
            .collect(),
        unattributed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw_output::parse;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn block<const N: usize>(code: i64, fields: [(&str, Vec<&str>); N]) -> StatusBlock {
        StatusBlock::new(code, fields.into_iter().collect())
    }

    fn named(class: &str, method: &str, code: i64) -> StatusBlock {
        block(code, [("class", vec![class]), ("test", vec![method])])
    }

    #[test]
    fn test_name_display() {
        let name = TestName::new("org.example.FooTest", "testBar");
        assert_eq!(name.to_string(), "org.example.FooTest#testBar");
        assert_eq!(name.class(), "org.example.FooTest");
        assert_eq!(name.method(), "testBar");
    }

    #[test]
    fn test_name_requires_class_and_method() {
        assert_eq!(TestName::from_status(&block(1, [("class", vec!["Foo"])])), None);
        assert_eq!(TestName::from_status(&block(1, [("test", vec!["bar"])])), None);
        assert_eq!(
            TestName::from_status(&named("Foo", "bar", 1)),
            Some(TestName::new("Foo", "bar"))
        );
    }

    #[test]
    fn groups_in_order_of_first_appearance() {
        let statuses = [
            named("Foo", "a", 1),
            named("Foo", "a", 0),
            named("Foo", "b", 1),
            named("Foo", "b", -2),
        ];

        let grouped = group_statuses(&statuses);
        assert_eq!(
            grouped,
            GroupedStatuses {
                tests: vec![
                    TestStatuses {
                        name: TestName::new("Foo", "a"),
                        statuses: statuses[..2].to_vec(),
                    },
                    TestStatuses {
                        name: TestName::new("Foo", "b"),
                        statuses: statuses[2..].to_vec(),
                    },
                ],
                unattributed: vec![],
            }
        );
    }

    #[test]
    fn bare_blocks_attach_to_current_test() {
        let statuses = [
            block(0, [("stream", vec!["preamble"])]),
            named("Foo", "a", 1),
            block(0, [("test_skipped", vec!["true"])]),
            named("Foo", "b", 1),
            named("Foo", "b", 0),
        ];

        let grouped = group_statuses(&statuses);
        assert_eq!(grouped.unattributed, vec![statuses[0].clone()]);
        assert_eq!(grouped.tests.len(), 2);
        assert_eq!(grouped.tests[0].statuses, statuses[1..3].to_vec());
        assert_eq!(grouped.tests[1].statuses, statuses[3..].to_vec());
    }

    #[test]
    fn interleaved_tests_return_to_existing_group() {
        let statuses = [
            named("Foo", "a", 1),
            named("Foo", "b", 1),
            named("Foo", "a", 0),
            block(2, [("stream", vec!["."])]),
        ];

        let grouped = group_statuses(&statuses);
        assert_eq!(
            grouped.tests[0].statuses,
            vec![statuses[0].clone(), statuses[2].clone(), statuses[3].clone()]
        );
        assert_eq!(grouped.tests[1].statuses, vec![statuses[1].clone()]);
    }

    #[test]
    fn groups_parsed_output() {
        let raw = indoc! {"
            INSTRUMENTATION_STATUS: numtests=2
            INSTRUMENTATION_STATUS: class=org.example.FooTest
            INSTRUMENTATION_STATUS: test=testOk
            INSTRUMENTATION_STATUS_CODE: 1
            INSTRUMENTATION_STATUS: class=org.example.FooTest
            INSTRUMENTATION_STATUS: test=testOk
            INSTRUMENTATION_STATUS_CODE: 0
            INSTRUMENTATION_STATUS: class=org.example.FooTest
            INSTRUMENTATION_STATUS: test=testSkipped
            INSTRUMENTATION_STATUS_CODE: 1
            INSTRUMENTATION_STATUS: test_skipped=true
            INSTRUMENTATION_STATUS_CODE: 0
            INSTRUMENTATION_RESULT: stream=
            OK (2 tests)
            INSTRUMENTATION_CODE: -1
        "};

        let parsed = parse(raw.lines());
        let grouped = group_statuses(&parsed.statuses);
        let names: Vec<_> = grouped.tests.iter().map(|t| t.name.to_string()).collect();
        assert_eq!(
            names,
            ["org.example.FooTest#testOk", "org.example.FooTest#testSkipped"]
        );
        assert_eq!(grouped.tests[1].statuses.len(), 2);
        assert!(grouped.unattributed.is_empty());
    }
}
