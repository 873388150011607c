use std::cell::RefCell;

use webcontent_core::SessionView;
use webcontent_engine::SessionObserver;

const PLACEHOLDER: &str = "The result will be displayed here";
const ERROR_TEXT: &str = "There was an error. Please, try again";

/// Turns a snapshot into the lines shown on the console.
pub fn render(view: &SessionView) -> Vec<String> {
    if view.busy {
        return vec![format!("Loading... (refresh {})", view.cycle)];
    }

    let word_counter = view
        .word_count()
        .map(|count| count.to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string());
    let every_nth = view
        .every_nth_text()
        .unwrap_or_else(|| PLACEHOLDER.to_string());

    let mut lines = vec![
        format!("Word counter result: {word_counter}"),
        format!("Every {} character result: {every_nth}", ordinal(view.nth)),
    ];
    if view.failed {
        lines.push(match &view.last_error {
            Some(err) => format!("{ERROR_TEXT} ({err})"),
            None => ERROR_TEXT.to_string(),
        });
    }
    lines
}

fn ordinal(n: usize) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

/// Prints each snapshot that renders differently from the previous one.
#[derive(Default)]
pub struct ConsoleRenderer {
    last: RefCell<Vec<String>>,
}

impl ConsoleRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionObserver for ConsoleRenderer {
    fn on_change(&self, view: &SessionView) {
        let lines = render(view);
        let mut last = self.last.borrow_mut();
        if *last == lines {
            return;
        }
        for line in &lines {
            println!("{line}");
        }
        *last = lines;
    }
}
