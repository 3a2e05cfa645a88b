//! Demo command

use anyhow::Result;
use quicklog::theme::{Ink, Theme};
use quicklog::{BaseMessage, ErrorMessage, Loader, LoaderConfig, Message, TitleMessage};
use std::collections::BTreeMap;
use std::thread;

const LOADER_LABEL: &str = "Fetching the package index";

/// Print one example of every message kind, grouped by kind.
pub fn demo() -> Result<()> {
    let mut sections: BTreeMap<&str, Vec<String>> = BTreeMap::new();

    sections.insert(
        "Title",
        vec![
            TitleMessage::new("quicklog demo")
                .with_description("Every built-in message, rendered for this terminal.")
                .render_terminal(),
            TitleMessage::new("A title on its own").render_terminal(),
        ],
    );
    sections.insert(
        "Error",
        vec![
            ErrorMessage::new("Could not reach the registry")
                .with_error("connection refused (os error 111)")
                .render_terminal(),
            ErrorMessage::new("Could not reach the registry").render_terminal(),
            ErrorMessage::from_error("connection refused (os error 111)").render_terminal(),
        ],
    );
    sections.insert(
        "Base",
        vec![
            BaseMessage::new(
                "Base messages wrap long text to the terminal width and pad every line, so \
                 sections stay aligned whatever their length. Set TERM_WIDTH to change the \
                 width, or NO_COLOR to print without styling. Children are rendered right \
                 after their parent, which lets a message group related output.",
            )
            .render_terminal(),
        ],
    );
    sections.insert(
        "Loader",
        vec![
            loader_frame(|_| {}),
            loader_frame(|loader| loader.error("index is 3 days old")),
            loader_frame(|loader| loader.success("Index up to date")),
        ],
    );

    let heading = Ink::new(Theme::default().colors.text).dim();
    println!();
    for (name, renders) in sections {
        println!("{}", heading.paint(&format!("{name}:")));
        for render in renders {
            println!("\t{}", render.trim_end_matches('\n').replace('\n', "\n\t"));
        }
    }

    Ok(())
}

/// Last text frame of a loader after `drive` ran, rendered in CI mode.
fn loader_frame(drive: impl FnOnce(&Loader)) -> String {
    let loader = Loader::new(LOADER_LABEL, LoaderConfig::default());
    let frames = loader.run_terminal(true);
    let initial = frames.recv().unwrap_or_default();

    let reader = thread::spawn(move || frames.last());
    drive(&loader);
    loader.close();

    reader.join().ok().flatten().unwrap_or(initial)
}
