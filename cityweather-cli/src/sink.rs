use clap::ValueEnum;
use cityweather_core::{LookupError, LookupEvent, OutputSink, RenderedSummary, render};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Html,
}

impl OutputFormat {
    pub fn summary(self, summary: &RenderedSummary) -> String {
        match self {
            OutputFormat::Text => summary.to_text(),
            OutputFormat::Html => summary.to_html(),
        }
    }

    pub fn error(self, err: &LookupError) -> String {
        match self {
            OutputFormat::Text => err.to_string(),
            OutputFormat::Html => render::error_html(err),
        }
    }

    fn loading(self, city: &str) -> String {
        match self {
            OutputFormat::Text => format!("Looking up location and weather for {city}…"),
            OutputFormat::Html => render::loading_html().to_string(),
        }
    }

    pub fn render(self, event: LookupEvent<'_>) -> String {
        match event {
            LookupEvent::Loading { city } => self.loading(city),
            LookupEvent::Ready(summary) => self.summary(summary),
            LookupEvent::Failed(err) => self.error(err),
        }
    }
}

/// Prints every event; errors go to stderr in text mode.
#[derive(Debug, Clone, Copy)]
pub struct TerminalSink {
    pub format: OutputFormat,
}

impl OutputSink for TerminalSink {
    fn show(&self, event: LookupEvent<'_>) {
        let rendered = self.format.render(event);
        match (self.format, event) {
            (OutputFormat::Text, LookupEvent::Failed(_)) => eprintln!("{rendered}"),
            _ => println!("{rendered}"),
        }
    }
}
