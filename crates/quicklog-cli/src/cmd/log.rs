//! Log command

use anyhow::{Result, bail};
use quicklog::{BaseMessage, ErrorMessage, Level, Message, TitleMessage};

/// Options of a one-shot log.
#[derive(Debug)]
pub struct LogArgs {
    pub level: Level,
    pub json: bool,
    pub text: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub error: Option<String>,
}

/// Build the message described by `args` and log it once.
pub fn log(args: &LogArgs) -> Result<()> {
    let message = build_message(args)?;
    super::logger(args.json).log(args.level, message.as_ref());
    Ok(())
}

fn build_message(args: &LogArgs) -> Result<Box<dyn Message>> {
    let body: Option<Box<dyn Message>> = match (&args.error, args.text.is_empty()) {
        (Some(error), _) => Some(Box::new(ErrorMessage::new(args.text.as_str()).with_error(error))),
        (None, false) => Some(Box::new(BaseMessage::new(args.text.as_str()))),
        (None, true) => None,
    };

    let Some(title) = &args.title else {
        return match body {
            Some(body) => Ok(body),
            None => bail!("nothing to log: pass TEXT, --title or --error"),
        };
    };

    let mut heading = TitleMessage::new(title.as_str());
    if let Some(description) = &args.description {
        heading = heading.with_description(description.as_str());
    }
    if let Some(body) = body {
        heading = heading.with_child(body);
    }
    Ok(Box::new(heading))
}
